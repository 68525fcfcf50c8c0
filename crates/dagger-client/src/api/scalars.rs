use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! scalar {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Default)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

scalar!(CacheVolumeId);
scalar!(ContainerId);
scalar!(CurrentModuleId);
scalar!(DirectoryId);
scalar!(EnvVariableId);
scalar!(FieldTypeDefId);
scalar!(FileId);
scalar!(FunctionArgId);
scalar!(FunctionCallArgValueId);
scalar!(FunctionCallId);
scalar!(FunctionId);
scalar!(GeneratedCodeId);
scalar!(GitModuleSourceId);
scalar!(GitRefId);
scalar!(GitRepositoryId);
scalar!(HostId);
scalar!(InputTypeDefId);
scalar!(InterfaceTypeDefId);
scalar!(LabelId);
scalar!(ListTypeDefId);
scalar!(LocalModuleSourceId);
scalar!(ModuleId);
scalar!(ModuleDependencyId);
scalar!(ModuleSourceId);
scalar!(ObjectTypeDefId);
scalar!(PortId);
scalar!(SecretId);
scalar!(ServiceId);
scalar!(SocketId);
scalar!(TerminalId);
scalar!(TypeDefId);
scalar!(
    /// A platform specifier, e.g. `linux/amd64`.
    Platform
);
scalar!(
    /// An arbitrary JSON-encoded value.
    Json
);

/// The result of a field returning nothing.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(transparent)]
pub struct Void(pub Option<String>);

/// Sharing mode of a cache volume.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CacheSharingMode {
    #[serde(rename = "LOCKED")]
    Locked,
    #[serde(rename = "PRIVATE")]
    Private,
    #[serde(rename = "SHARED")]
    Shared,
}

/// Compression algorithm for image layers.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageLayerCompression {
    EStarGZ,
    Gzip,
    Uncompressed,
    Zstd,
}

/// Mediatypes to use in published or exported image metadata.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageMediaTypes {
    DockerMediaTypes,
    OCIMediaTypes,
}

/// Transport layer network protocol.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetworkProtocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

/// The kind of a module source.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModuleSourceKind {
    #[serde(rename = "GIT_SOURCE")]
    GitSource,
    #[serde(rename = "LOCAL_SOURCE")]
    LocalSource,
}

/// Distinguishes the different kinds of type definitions.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeDefKind {
    #[serde(rename = "BOOLEAN_KIND")]
    Boolean,
    /// A graphql input type, used only when representing the core API via
    /// type definitions.
    #[serde(rename = "INPUT_KIND")]
    Input,
    #[serde(rename = "INTEGER_KIND")]
    Integer,
    /// Always paired with an interface type definition.
    #[serde(rename = "INTERFACE_KIND")]
    Interface,
    /// Always paired with a list type definition.
    #[serde(rename = "LIST_KIND")]
    List,
    /// Always paired with an object type definition.
    #[serde(rename = "OBJECT_KIND")]
    Object,
    #[serde(rename = "STRING_KIND")]
    String,
    /// No value is returned. The outer type definition is always optional.
    #[serde(rename = "VOID_KIND")]
    Void,
}

/// Key value object that represents a build argument.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct BuildArg {
    pub name: String,
    pub value: String,
}

/// Key value object that represents a pipeline label.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PipelineLabel {
    pub name: String,
    pub value: String,
}

/// Port forwarding rules for tunneling network traffic.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PortForward {
    /// Destination port for traffic.
    pub backend: isize,
    /// Port to expose to clients. If unspecified, a default will be chosen.
    pub frontend: isize,
    /// Transport layer protocol to use for traffic.
    pub protocol: NetworkProtocol,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        CacheSharingMode, ContainerId, ModuleSourceKind, NetworkProtocol, TypeDefKind, Void,
    };

    #[test]
    fn test_ids_are_transparent() {
        let id: ContainerId = serde_json::from_str(r#""abc""#).unwrap();

        assert_eq!(id, ContainerId::from("abc"));
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_enums_use_schema_names() {
        assert_eq!(
            serde_json::to_string(&CacheSharingMode::Locked).unwrap(),
            r#""LOCKED""#
        );
        assert_eq!(
            serde_json::from_str::<NetworkProtocol>(r#""UDP""#).unwrap(),
            NetworkProtocol::Udp
        );
        assert_eq!(
            serde_json::from_str::<ModuleSourceKind>(r#""GIT_SOURCE""#).unwrap(),
            ModuleSourceKind::GitSource
        );
        assert_eq!(
            serde_json::from_str::<TypeDefKind>(r#""VOID_KIND""#).unwrap(),
            TypeDefKind::Void
        );
    }

    #[test]
    fn test_void_accepts_null() {
        assert_eq!(serde_json::from_str::<Void>("null").unwrap(), Void(None));
    }
}
