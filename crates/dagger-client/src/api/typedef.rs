use derive_builder::Builder;

use crate::api::{
    load_objects, FieldTypeDefId, FunctionArgId, FunctionId, Handle, InputTypeDefId,
    InterfaceTypeDefId, Json, ListTypeDefId, ObjectTypeDefId, TypeDefId, TypeDefKind,
};
use crate::errors::DaggerError;

object!(
    /// A definition of a parameter or return type in a module.
    TypeDef,
    TypeDefId
);

object!(
    /// A definition of a custom object defined in a module.
    ObjectTypeDef,
    ObjectTypeDefId
);

object!(
    /// A definition of a custom interface defined in a module.
    InterfaceTypeDef,
    InterfaceTypeDefId
);

object!(
    /// A graphql input type, which is essentially just a group of named args.
    /// Used only when representing the core API via type definitions.
    InputTypeDef,
    InputTypeDefId
);

object!(
    /// A definition of a list type in a module.
    ListTypeDef,
    ListTypeDefId
);

object!(
    /// A definition of a field on a custom object defined in a module.
    FieldTypeDef,
    FieldTypeDefId
);

object!(
    /// Function represents a resolver provided by a module.
    Function,
    FunctionId
);

object!(
    /// An argument accepted by a function, as declared at definition time.
    FunctionArg,
    FunctionArgId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct TypeDefWithFieldOpts {
    /// A doc string for the field, if any.
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
}

pub type TypeDefWithInterfaceOpts = TypeDefWithFieldOpts;
pub type TypeDefWithObjectOpts = TypeDefWithFieldOpts;

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct FunctionWithArgOpts {
    /// A doc string for the argument, if any.
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
    /// A default value to use for this argument if not explicitly set by the
    /// caller, if any.
    #[builder(setter(into, strip_option), default)]
    pub default_value: Option<Json>,
}

impl TypeDef {
    /// If kind is INPUT, the input-specific type definition.
    pub fn as_input(&self) -> InputTypeDef {
        self.child(self.selection.select("asInput"))
    }

    /// If kind is INTERFACE, the interface-specific type definition.
    pub fn as_interface(&self) -> InterfaceTypeDef {
        self.child(self.selection.select("asInterface"))
    }

    /// If kind is LIST, the list-specific type definition.
    pub fn as_list(&self) -> ListTypeDef {
        self.child(self.selection.select("asList"))
    }

    /// If kind is OBJECT, the object-specific type definition.
    pub fn as_object(&self) -> ObjectTypeDef {
        self.child(self.selection.select("asObject"))
    }

    /// The kind of type this is (e.g. primitive, list, object).
    pub async fn kind(&self) -> Result<TypeDefKind, DaggerError> {
        let query = self.selection.select("kind");

        query.execute(&self.graphql_client).await
    }

    /// Whether this type can be set to null. Defaults to false.
    pub async fn optional(&self) -> Result<bool, DaggerError> {
        let query = self.selection.select("optional");

        query.execute(&self.graphql_client).await
    }

    /// Adds a function for constructing a new instance of an object type
    /// definition, failing if the type is not an object.
    pub fn with_constructor(&self, function: Function) -> TypeDef {
        let query = self
            .selection
            .select("withConstructor")
            .arg_object("function", function);

        self.child(query)
    }

    pub fn with_field(&self, name: impl Into<String>, type_def: TypeDef) -> TypeDef {
        self.with_field_opts(name, type_def, Default::default())
    }

    /// Adds a static field for an object type definition, failing if the type
    /// is not an object.
    pub fn with_field_opts(
        &self,
        name: impl Into<String>,
        type_def: TypeDef,
        opts: TypeDefWithFieldOpts,
    ) -> TypeDef {
        let query = self
            .selection
            .select("withField")
            .arg("name", name.into())
            .arg_object("typeDef", type_def)
            .arg_opt("description", opts.description);

        self.child(query)
    }

    /// Adds a function for an object or interface type definition, failing if
    /// the type is not one of those kinds.
    pub fn with_function(&self, function: Function) -> TypeDef {
        let query = self
            .selection
            .select("withFunction")
            .arg_object("function", function);

        self.child(query)
    }

    pub fn with_interface(&self, name: impl Into<String>) -> TypeDef {
        self.with_interface_opts(name, Default::default())
    }

    /// Returns a type definition of kind interface with the provided name.
    pub fn with_interface_opts(
        &self,
        name: impl Into<String>,
        opts: TypeDefWithInterfaceOpts,
    ) -> TypeDef {
        let query = self
            .selection
            .select("withInterface")
            .arg("name", name.into())
            .arg_opt("description", opts.description);

        self.child(query)
    }

    /// Sets the kind of the type.
    pub fn with_kind(&self, kind: TypeDefKind) -> TypeDef {
        let query = self.selection.select("withKind").arg_enum("kind", kind);

        self.child(query)
    }

    /// Returns a type definition of kind list with the provided type for its
    /// elements.
    pub fn with_list_of(&self, element_type: TypeDef) -> TypeDef {
        let query = self
            .selection
            .select("withListOf")
            .arg_object("elementType", element_type);

        self.child(query)
    }

    pub fn with_object(&self, name: impl Into<String>) -> TypeDef {
        self.with_object_opts(name, Default::default())
    }

    /// Returns a type definition of kind object with the provided name.
    ///
    /// Objects can be returned by functions and have functions of their own.
    pub fn with_object_opts(&self, name: impl Into<String>, opts: TypeDefWithObjectOpts) -> TypeDef {
        let query = self
            .selection
            .select("withObject")
            .arg("name", name.into())
            .arg_opt("description", opts.description);

        self.child(query)
    }

    /// Sets whether this type can be set to null.
    pub fn with_optional(&self, optional: bool) -> TypeDef {
        let query = self.selection.select("withOptional").arg("optional", optional);

        self.child(query)
    }
}

impl ObjectTypeDef {
    /// The function used to construct new instances of this object, if any.
    pub fn constructor(&self) -> Function {
        self.child(self.selection.select("constructor"))
    }

    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    /// Static fields defined on this object, if any.
    pub async fn fields(&self) -> Result<Vec<FieldTypeDef>, DaggerError> {
        load_objects(self, self.selection.select("fields")).await
    }

    /// Functions defined on this object, if any.
    pub async fn functions(&self) -> Result<Vec<Function>, DaggerError> {
        load_objects(self, self.selection.select("functions")).await
    }

    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The name of the module the object belongs to, if any.
    pub async fn source_module_name(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("sourceModuleName");

        query.execute(&self.graphql_client).await
    }
}

impl InterfaceTypeDef {
    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    /// Functions defined on this interface, if any.
    pub async fn functions(&self) -> Result<Vec<Function>, DaggerError> {
        load_objects(self, self.selection.select("functions")).await
    }

    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    pub async fn source_module_name(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("sourceModuleName");

        query.execute(&self.graphql_client).await
    }
}

impl InputTypeDef {
    /// Static fields defined on this input object, if any.
    pub async fn fields(&self) -> Result<Vec<FieldTypeDef>, DaggerError> {
        load_objects(self, self.selection.select("fields")).await
    }

    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }
}

impl ListTypeDef {
    /// The type of the elements in the list.
    pub fn element_type_def(&self) -> TypeDef {
        self.child(self.selection.select("elementTypeDef"))
    }
}

impl FieldTypeDef {
    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    /// The name of the field in lowerCamelCase format.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    pub fn type_def(&self) -> TypeDef {
        self.child(self.selection.select("typeDef"))
    }
}

impl Function {
    /// Arguments accepted by the function, if any.
    pub async fn args(&self) -> Result<Vec<FunctionArg>, DaggerError> {
        load_objects(self, self.selection.select("args")).await
    }

    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The type returned by the function.
    pub fn return_type(&self) -> TypeDef {
        self.child(self.selection.select("returnType"))
    }

    pub fn with_arg(&self, name: impl Into<String>, type_def: TypeDef) -> Function {
        self.with_arg_opts(name, type_def, Default::default())
    }

    /// Returns the function with the provided argument.
    pub fn with_arg_opts(
        &self,
        name: impl Into<String>,
        type_def: TypeDef,
        opts: FunctionWithArgOpts,
    ) -> Function {
        let query = self
            .selection
            .select("withArg")
            .arg("name", name.into())
            .arg_object("typeDef", type_def)
            .arg_opt("description", opts.description)
            .arg_opt("defaultValue", opts.default_value);

        self.child(query)
    }

    /// Returns the function with the given doc string.
    pub fn with_description(&self, description: impl Into<String>) -> Function {
        let query = self
            .selection
            .select("withDescription")
            .arg("description", description.into());

        self.child(query)
    }
}

impl FunctionArg {
    /// A default value to use for this argument when not explicitly set by
    /// the caller, if any.
    pub async fn default_value(&self) -> Result<Option<Json>, DaggerError> {
        let query = self.selection.select("defaultValue");

        query.execute(&self.graphql_client).await
    }

    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    /// The name of the argument in lowerCamelCase format.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    pub fn type_def(&self) -> TypeDef {
        self.child(self.selection.select("typeDef"))
    }
}
