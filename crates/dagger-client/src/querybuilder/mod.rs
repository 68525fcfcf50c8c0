use std::{future::Future, ops::Deref, pin::Pin, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::core::graphql_client::DynGraphQLClient;
use crate::errors::{custom_error, DaggerError, DaggerUnpackError};

mod literal;

use literal::{is_name, is_zero_literal, to_literal};

pub fn query() -> Selection {
    Selection::default()
}

type ArgFuture = Pin<Box<dyn Future<Output = Result<String, DaggerError>> + Send>>;

/// An object that can be passed as an argument by reference to its ID.
#[async_trait]
pub trait GraphQLObject: Send + Sync {
    /// Resolves the object's ID, querying the engine if it isn't known yet.
    async fn graphql_id(&self) -> Result<String, DaggerError>;
}

#[derive(Clone)]
struct LazyResolve(Arc<dyn Fn() -> ArgFuture + Send + Sync>);

impl LazyResolve {
    fn new(func: impl Fn() -> ArgFuture + Send + Sync + 'static) -> Self {
        Self(Arc::new(func))
    }
}

impl Deref for LazyResolve {
    type Target = Arc<dyn Fn() -> ArgFuture + Send + Sync>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone)]
enum ArgValue {
    Literal(String),
    Lazy(LazyResolve),
    Invalid(String),
}

impl ArgValue {
    async fn resolve(&self, name: &str) -> Result<String, DaggerError> {
        match self {
            ArgValue::Literal(lit) => Ok(lit.clone()),
            ArgValue::Lazy(resolve) => resolve().await,
            ArgValue::Invalid(err) => Err(DaggerError::Serialize(eyre::eyre!(
                "argument `{name}`: {err}"
            ))),
        }
    }
}

/// A chain of field selections, not yet sent anywhere.
///
/// Selections are immutable; every method returns a new selection that
/// shares its parents with the receiver.
#[derive(Clone, Default)]
pub struct Selection {
    name: Option<String>,
    alias: Option<String>,
    args: Vec<(String, ArgValue)>,

    prev: Option<Arc<Selection>>,
}

impl Selection {
    pub fn select_with_alias(&self, alias: &str, name: &str) -> Selection {
        Self {
            name: Some(name.to_string()),
            alias: Some(alias.to_string()),
            args: Vec::new(),
            prev: Some(Arc::new(self.clone())),
        }
    }

    pub fn select(&self, name: &str) -> Selection {
        Self {
            name: Some(name.to_string()),
            alias: None,
            args: Vec::new(),
            prev: Some(Arc::new(self.clone())),
        }
    }

    pub fn arg<S>(&self, name: &str, value: S) -> Selection
    where
        S: Serialize,
    {
        let value = match to_literal(&value) {
            Ok(lit) => ArgValue::Literal(lit),
            Err(err) => ArgValue::Invalid(err.to_string()),
        };

        self.with_arg(name, value)
    }

    /// Binds an enum argument as a bare name. Values that serialize as
    /// strings (`"LOCKED"`) are unquoted; anything that is not a GraphQL name
    /// fails at build time.
    pub fn arg_enum<S>(&self, name: &str, value: S) -> Selection
    where
        S: Serialize,
    {
        let value = match to_literal(&value) {
            Ok(lit) => {
                let bare = lit
                    .strip_prefix('"')
                    .and_then(|l| l.strip_suffix('"'))
                    .unwrap_or(lit.as_str());

                if is_name(bare) {
                    ArgValue::Literal(bare.to_string())
                } else {
                    ArgValue::Invalid(format!("{lit} is not an enum value"))
                }
            }
            Err(err) => ArgValue::Invalid(err.to_string()),
        };

        self.with_arg(name, value)
    }

    /// Binds an optional argument. Nothing is attached for `None` or for a
    /// zero value (`""`, `0`, `false`, `[]`, ...).
    pub fn arg_opt<S>(&self, name: &str, value: Option<S>) -> Selection
    where
        S: Serialize,
    {
        let Some(value) = value else {
            return self.clone();
        };

        match to_literal(&value) {
            Ok(lit) if is_zero_literal(&lit) => self.clone(),
            Ok(lit) => self.with_arg(name, ArgValue::Literal(lit)),
            Err(err) => self.with_arg(name, ArgValue::Invalid(err.to_string())),
        }
    }

    /// Binds an object argument by ID. The ID is resolved when the query is
    /// built, not when the argument is bound.
    pub fn arg_object<O>(&self, name: &str, object: O) -> Selection
    where
        O: GraphQLObject + Clone + 'static,
    {
        let resolve = LazyResolve::new(move || {
            let object = object.clone();
            Box::pin(async move {
                let id = object.graphql_id().await?;
                to_literal(&id).map_err(|e| DaggerError::Serialize(e.into()))
            })
        });

        self.with_arg(name, ArgValue::Lazy(resolve))
    }

    pub fn arg_objects<O>(&self, name: &str, objects: Vec<O>) -> Selection
    where
        O: GraphQLObject + Clone + 'static,
    {
        let resolve = LazyResolve::new(move || {
            let objects = objects.clone();
            Box::pin(async move {
                let ids =
                    futures::future::try_join_all(objects.iter().map(|o| o.graphql_id())).await?;
                to_literal(&ids).map_err(|e| DaggerError::Serialize(e.into()))
            })
        });

        self.with_arg(name, ArgValue::Lazy(resolve))
    }

    fn with_arg(&self, name: &str, value: ArgValue) -> Selection {
        let mut s = self.clone();

        match s.args.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => s.args.push((name.to_string(), value)),
        }

        s
    }

    pub async fn build(&self) -> Result<String, DaggerError> {
        let mut fields = vec!["query".to_string()];

        for sel in self.path() {
            let Some(mut field) = sel.name.clone() else {
                continue;
            };

            if !sel.args.is_empty() {
                let mut actualargs = Vec::with_capacity(sel.args.len());
                for (name, arg) in sel.args.iter() {
                    let value = arg.resolve(name).await?;
                    actualargs.push(format!("{name}:{value}"));
                }

                field = format!("{field}({})", actualargs.join(", "));
            }

            if let Some(alias) = &sel.alias {
                field = format!("{alias}:{field}");
            }

            fields.push(field);
        }

        Ok(fields.join("{") + &"}".repeat(fields.len() - 1))
    }

    pub async fn execute<D>(&self, gql_client: &DynGraphQLClient) -> Result<D, DaggerError>
    where
        D: DeserializeOwned,
    {
        let query = self.build().await?;

        tracing::trace!(query = query.as_str(), "dagger-query");

        let resp = match gql_client.query(&query).await {
            Ok(r) => r,
            Err(e) => {
                return Err(match custom_error(&e) {
                    Some(exec) => DaggerError::Exec(exec),
                    None => DaggerError::Query(e),
                })
            }
        };

        self.unpack_resp(resp)?
            .ok_or(DaggerError::Unpack(DaggerUnpackError::EmptyResponse))
    }

    fn path(&self) -> Vec<&Selection> {
        let mut selections = vec![];
        let mut cur = self;

        while let Some(prev) = cur.prev.as_deref() {
            selections.push(cur);
            cur = prev;
        }

        selections.reverse();
        selections
    }

    pub(crate) fn unpack_resp<D>(
        &self,
        resp: Option<serde_json::Value>,
    ) -> Result<Option<D>, DaggerError>
    where
        D: DeserializeOwned,
    {
        match resp {
            Some(r) => self.unpack_resp_value::<D>(r).map(Some),
            None => Ok(None),
        }
    }

    fn unpack_resp_value<D>(&self, r: serde_json::Value) -> Result<D, DaggerError>
    where
        D: DeserializeOwned,
    {
        if let serde_json::Value::Object(mut o) = r {
            if o.len() != 1 {
                return Err(DaggerError::Unpack(DaggerUnpackError::TooManyNestedObjects));
            }

            let key = o.keys().next().cloned().unwrap_or_default();
            let inner = o.remove(&key).unwrap_or(serde_json::Value::Null);
            return self.unpack_resp_value(inner);
        }

        serde_json::from_value::<D>(r)
            .map_err(DaggerUnpackError::Deserialize)
            .map_err(DaggerError::Unpack)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::{query, GraphQLObject};
    use crate::errors::{DaggerError, DaggerUnpackError};

    #[tokio::test]
    async fn test_query() {
        let root = query()
            .select("core")
            .select("image")
            .arg("ref", "alpine")
            .select("file")
            .arg("path", "/etc/alpine-release");

        let query = root.build().await.unwrap();

        assert_eq!(
            query,
            r#"query{core{image(ref:"alpine"){file(path:"/etc/alpine-release")}}}"#.to_string()
        )
    }

    #[tokio::test]
    async fn test_query_alias() {
        let root = query()
            .select("core")
            .select("image")
            .arg("ref", "alpine")
            .select_with_alias("foo", "file")
            .arg("path", "/etc/alpine-release");

        let query = root.build().await.unwrap();

        assert_eq!(
            query,
            r#"query{core{image(ref:"alpine"){foo:file(path:"/etc/alpine-release")}}}"#.to_string()
        )
    }

    #[tokio::test]
    async fn test_arg_collision() {
        let root = query()
            .select("a")
            .arg("arg", "one")
            .select("b")
            .arg("arg", "two");

        let query = root.build().await.unwrap();

        assert_eq!(query, r#"query{a(arg:"one"){b(arg:"two")}}"#.to_string())
    }

    #[tokio::test]
    async fn test_rebinding_replaces_in_place() {
        let root = query()
            .select("a")
            .arg("x", 1)
            .arg("y", 2)
            .arg("x", 3);

        let query = root.build().await.unwrap();

        assert_eq!(query, r#"query{a(x:3, y:2)}"#.to_string())
    }

    #[tokio::test]
    async fn test_vec_arg() {
        let input = vec!["some-string"];

        let root = query().select("a").arg("arg", input);
        let query = root.build().await.unwrap();

        assert_eq!(query, r#"query{a(arg:["some-string"])}"#.to_string())
    }

    #[tokio::test]
    async fn test_field_immutability() {
        let root = query().select("test");

        let a = root.select("a").build().await.unwrap();
        assert_eq!(a, r#"query{test{a}}"#.to_string());

        let b = root.select("b").build().await.unwrap();
        assert_eq!(b, r#"query{test{b}}"#.to_string());
    }

    #[derive(Serialize)]
    struct CustomType {
        pub name: String,
        pub s: Option<Box<CustomType>>,
    }

    #[tokio::test]
    async fn test_arg_custom_type() {
        let input = CustomType {
            name: "some-name".to_string(),
            s: Some(Box::new(CustomType {
                name: "some-other-name".to_string(),
                s: None,
            })),
        };

        let root = query().select("a").arg("arg", input);
        let query = root.build().await.unwrap();

        assert_eq!(
            query,
            r#"query{a(arg:{name:"some-name",s:{name:"some-other-name",s:null}})}"#.to_string()
        )
    }

    #[tokio::test]
    async fn test_zero_optional_args_are_skipped() {
        let root = query()
            .select("withExec")
            .arg("args", vec!["echo"])
            .arg_opt("stdin", Some(""))
            .arg_opt("skipEntrypoint", Some(false))
            .arg_opt::<String>("redirectStdout", None)
            .arg_opt("insecureRootCapabilities", Some(true));

        let query = root.build().await.unwrap();

        assert_eq!(
            query,
            r#"query{withExec(args:["echo"], insecureRootCapabilities:true)}"#.to_string()
        )
    }

    #[derive(Serialize)]
    enum Sharing {
        #[serde(rename = "LOCKED")]
        Locked,
    }

    #[tokio::test]
    async fn test_enum_args_are_bare() {
        let root = query()
            .select("withMountedCache")
            .arg_enum("sharing", Sharing::Locked);

        let query = root.build().await.unwrap();

        assert_eq!(query, r#"query{withMountedCache(sharing:LOCKED)}"#.to_string())
    }

    #[tokio::test]
    async fn test_enum_args_from_strings() {
        let root = query()
            .select("withExposedPort")
            .arg_enum("protocol", "UDP");

        let query = root.build().await.unwrap();

        assert_eq!(query, r#"query{withExposedPort(protocol:UDP)}"#.to_string())
    }

    #[tokio::test]
    async fn test_non_name_enum_args_fail_at_build() {
        let root = query()
            .select("withExposedPort")
            .arg_enum("protocol", "not an enum");

        let err = root.build().await.unwrap_err();

        assert!(matches!(err, DaggerError::Serialize(_)));
    }

    #[derive(Clone)]
    struct Fixed(&'static str);

    #[async_trait]
    impl GraphQLObject for Fixed {
        async fn graphql_id(&self) -> Result<String, DaggerError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_object_args_resolve_to_ids() {
        let root = query()
            .select("withFiles")
            .arg_objects("sources", vec![Fixed("f1"), Fixed("f2")])
            .select("withDirectory")
            .arg_object("directory", Fixed("d1"));

        let query = root.build().await.unwrap();

        assert_eq!(
            query,
            r#"query{withFiles(sources:["f1","f2"]){withDirectory(directory:"d1")}}"#.to_string()
        )
    }

    #[test]
    fn test_unpack_nested_response() {
        let resp = serde_json::json!({"container": {"from": {"stdout": "hello"}}});

        let out: Option<String> = query().unpack_resp(Some(resp)).unwrap();

        assert_eq!(out, Some("hello".to_string()));
    }

    #[test]
    fn test_unpack_rejects_ambiguous_objects() {
        let resp = serde_json::json!({"a": 1, "b": 2});

        let err = query().unpack_resp::<i64>(Some(resp)).unwrap_err();

        assert!(matches!(
            err,
            DaggerError::Unpack(DaggerUnpackError::TooManyNestedObjects)
        ));
    }
}
