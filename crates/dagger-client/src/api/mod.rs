//! Typed handles over the engine schema.
//!
//! Every handle wraps a pending [`Selection`]. Methods returning another
//! handle only extend the selection; `async` methods execute it.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::cli_session::EngineProcess;
use crate::core::graphql_client::DynGraphQLClient;
use crate::errors::DaggerError;
use crate::querybuilder::{query, Selection};

macro_rules! object {
    ($(#[$meta:meta])* $name:ident, $id:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pub proc: Option<std::sync::Arc<$crate::core::cli_session::EngineProcess>>,
            pub selection: $crate::querybuilder::Selection,
            pub graphql_client: $crate::core::graphql_client::DynGraphQLClient,

            id: Option<$id>,
        }

        impl $name {
            /// A unique identifier for this object. Answered from the cache
            /// when the handle was loaded by ID.
            pub async fn id(&self) -> Result<$id, $crate::errors::DaggerError> {
                if let Some(id) = &self.id {
                    return Ok(id.clone());
                }

                let query = self.selection.select("id");
                query.execute(&self.graphql_client).await
            }

            /// Applies a reusable chain fragment to this handle.
            pub fn with<F>(&self, f: F) -> $name
            where
                F: FnOnce($name) -> $name,
            {
                f(self.clone())
            }
        }

        impl $crate::api::Object for $name {
            type Id = $id;

            const LOAD_FIELD: &'static str = concat!("load", stringify!($name), "FromID");

            fn from_parts(
                proc: Option<std::sync::Arc<$crate::core::cli_session::EngineProcess>>,
                selection: $crate::querybuilder::Selection,
                graphql_client: $crate::core::graphql_client::DynGraphQLClient,
                id: Option<$id>,
            ) -> Self {
                Self {
                    proc,
                    selection,
                    graphql_client,
                    id,
                }
            }
        }

        impl $crate::api::Handle for $name {
            fn proc(&self) -> &Option<std::sync::Arc<$crate::core::cli_session::EngineProcess>> {
                &self.proc
            }

            fn graphql_client(&self) -> &$crate::core::graphql_client::DynGraphQLClient {
                &self.graphql_client
            }
        }

        #[async_trait::async_trait]
        impl $crate::querybuilder::GraphQLObject for $name {
            async fn graphql_id(&self) -> Result<String, $crate::errors::DaggerError> {
                Ok(self.id().await?.to_string())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .finish_non_exhaustive()
            }
        }
    };
}

/// A schema object that can be loaded back from its ID.
pub trait Object: Sized {
    type Id: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Root field loading the object by ID, e.g. `loadContainerFromID`.
    const LOAD_FIELD: &'static str;

    fn from_parts(
        proc: Option<Arc<EngineProcess>>,
        selection: Selection,
        graphql_client: DynGraphQLClient,
        id: Option<Self::Id>,
    ) -> Self;
}

/// Shared plumbing of every handle, `Query` included.
pub(crate) trait Handle {
    fn proc(&self) -> &Option<Arc<EngineProcess>>;

    fn graphql_client(&self) -> &DynGraphQLClient;

    fn child<T: Object>(&self, selection: Selection) -> T {
        T::from_parts(
            self.proc().clone(),
            selection,
            self.graphql_client().clone(),
            None,
        )
    }

    /// Loads an object by ID from the query root. The ID is cached on the
    /// handle.
    fn load<T: Object>(&self, id: T::Id) -> T {
        let selection = query().select(T::LOAD_FIELD).arg("id", &id);

        T::from_parts(
            self.proc().clone(),
            selection,
            self.graphql_client().clone(),
            Some(id),
        )
    }
}

#[derive(Deserialize)]
struct IdEntry<I> {
    id: I,
}

/// Executes a list-of-objects field, selecting only the IDs, and returns a
/// loaded handle per entry.
pub(crate) async fn load_objects<T, H>(
    parent: &H,
    selection: Selection,
) -> Result<Vec<T>, DaggerError>
where
    T: Object,
    H: Handle,
{
    let entries: Vec<IdEntry<T::Id>> = selection
        .select("id")
        .execute(parent.graphql_client())
        .await?;

    Ok(entries.into_iter().map(|e| parent.load::<T>(e.id)).collect())
}

pub(crate) fn strings(args: Vec<impl Into<String>>) -> Vec<String> {
    args.into_iter().map(|i| i.into()).collect()
}

mod container;
mod current;
mod directory;
mod file;
mod git;
mod host;
mod module;
mod root;
mod scalars;
mod secret;
mod service;
mod typedef;
mod variables;

pub use container::*;
pub use current::*;
pub use directory::*;
pub use file::*;
pub use git::*;
pub use host::*;
pub use module::*;
pub use root::*;
pub use scalars::*;
pub use secret::*;
pub use service::*;
pub use typedef::*;
pub use variables::*;
