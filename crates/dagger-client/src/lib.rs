mod api;
mod client;
pub mod core;
pub mod errors;
pub mod logging;
mod querybuilder;

pub use crate::api::*;
pub use crate::client::*;
pub use crate::core::config::Config;
pub use crate::core::graphql_client::{DynGraphQLClient, GraphQLClient, GraphQLError};
pub use crate::querybuilder::{query, GraphQLObject, Selection};
