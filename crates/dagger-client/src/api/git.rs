use derive_builder::Builder;

use crate::api::{Directory, GitRefId, GitRepositoryId, Handle, Socket};
use crate::errors::DaggerError;

object!(
    /// A git repository.
    GitRepository,
    GitRepositoryId
);

object!(
    /// A git ref (tag, branch, or commit).
    GitRef,
    GitRefId
);

#[derive(Builder, Debug, Clone, Default)]
pub struct GitRefTreeOpts {
    /// Deprecated, pass this to `git` instead.
    #[builder(setter(into, strip_option), default)]
    pub ssh_known_hosts: Option<String>,
    /// Deprecated, pass this to `git` instead.
    #[builder(setter(into, strip_option), default)]
    pub ssh_auth_socket: Option<Socket>,
}

impl GitRepository {
    /// Returns details of a branch.
    pub fn branch(&self, name: impl Into<String>) -> GitRef {
        let query = self.selection.select("branch").arg("name", name.into());

        self.child(query)
    }

    /// Returns details of a commit.
    pub fn commit(&self, id: impl Into<String>) -> GitRef {
        let query = self.selection.select("commit").arg("id", id.into());

        self.child(query)
    }

    /// Returns details of a ref.
    pub fn git_ref(&self, name: impl Into<String>) -> GitRef {
        let query = self.selection.select("ref").arg("name", name.into());

        self.child(query)
    }

    /// Returns details of a tag.
    pub fn tag(&self, name: impl Into<String>) -> GitRef {
        let query = self.selection.select("tag").arg("name", name.into());

        self.child(query)
    }
}

impl GitRef {
    /// The resolved commit id at this ref.
    pub async fn commit(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("commit");

        query.execute(&self.graphql_client).await
    }

    /// The filesystem tree at this ref.
    pub fn tree(&self) -> Directory {
        self.tree_opts(Default::default())
    }

    pub fn tree_opts(&self, opts: GitRefTreeOpts) -> Directory {
        let mut query = self
            .selection
            .select("tree")
            .arg_opt("sshKnownHosts", opts.ssh_known_hosts);
        if let Some(ssh_auth_socket) = opts.ssh_auth_socket {
            query = query.arg_object("sshAuthSocket", ssh_auth_socket);
        }

        self.child(query)
    }
}
