//! CircleCI context API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::git::VcsType;

pub mod circleci;
#[cfg(test)]
pub mod fixtures;
pub mod graphql;
#[cfg(test)]
pub mod mock;

pub use circleci::CircleCiClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockContextClient;

/// Context API operations.
///
/// Implemented by the real GraphQL-backed client and by the test mock. Every
/// operation is one synchronous request/response exchange; nothing is retried
/// and nothing is cached across calls.
#[async_trait]
pub trait ContextApi: Send + Sync {
    /// Fetch the organization id and every context it owns, with resources.
    async fn list_contexts(
        &self,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<ContextsQueryResponse>;

    /// Create a context owned by the named organization.
    ///
    /// Resolves the organization id first, so this costs two round trips.
    async fn create_context(
        &self,
        context_name: &str,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<()>;

    /// Delete a context by its server-side id.
    async fn delete_context(&self, context_id: &str) -> Result<()>;

    /// Store (or overwrite) an environment variable in a context.
    async fn store_environment_variable(
        &self,
        context_id: &str,
        variable: &str,
        value: &str,
    ) -> Result<()>;

    /// Remove an environment variable from a context.
    async fn delete_environment_variable(&self, context_id: &str, variable: &str) -> Result<()>;
}

/// A context: a named, organization-scoped group of environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Opaque server-side id
    pub id: String,

    /// Context name, unique within the owning organization's listing
    pub name: String,

    /// Creation timestamp as reported by the server
    pub created_at: String,

    /// Security groups granted access to this context
    #[serde(default)]
    pub groups: GroupConnection,

    /// Environment variable records
    #[serde(default)]
    pub resources: Vec<ContextResource>,
}

/// One environment variable record inside a context.
///
/// The server only ever returns a partially masked value; the full secret is
/// never revealed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResource {
    /// Environment variable name
    pub variable: String,

    /// Creation timestamp as reported by the server
    pub created_at: String,

    /// Partially masked value, for display only
    pub truncated_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupConnection {
    #[serde(default)]
    pub edges: Vec<GroupEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEdge {
    pub node: Group,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Response shape of the contexts listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextsQueryResponse {
    pub organization: OrganizationNode,
}

/// The organization node of the listing query: its id plus context edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationNode {
    pub id: String,
    pub contexts: ContextConnection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConnection {
    #[serde(default)]
    pub edges: Vec<ContextEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEdge {
    pub node: Context,
}

impl ContextsQueryResponse {
    /// Iterate the listed contexts in server order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.organization.contexts.edges.iter().map(|e| &e.node)
    }

    /// Find a context by name.
    ///
    /// Names are unique within an organization's listing; if the server ever
    /// returned duplicates this yields the first match.
    pub fn context_by_name(&self, name: &str) -> Option<&Context> {
        self.contexts().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{sample_context, sample_listing};
    use super::*;

    #[test]
    fn test_context_by_name_finds_matching_id() {
        let listing = sample_listing(
            "org-id-1",
            vec![sample_context("id-a", "a"), sample_context("id-b", "b")],
        );

        let found = listing.context_by_name("b").expect("context 'b' exists");
        assert_eq!(found.id, "id-b");
    }

    #[test]
    fn test_context_by_name_misses() {
        let listing = sample_listing(
            "org-id-1",
            vec![sample_context("id-a", "a"), sample_context("id-b", "b")],
        );

        assert!(listing.context_by_name("c").is_none());
    }

    #[test]
    fn test_context_by_name_returns_first_of_duplicates() {
        let listing = sample_listing(
            "org-id-1",
            vec![sample_context("id-1", "dup"), sample_context("id-2", "dup")],
        );

        let found = listing.context_by_name("dup").expect("duplicate exists");
        assert_eq!(found.id, "id-1");
    }

    #[test]
    fn test_listing_deserializes_wire_shape() {
        let raw = r#"{
            "organization": {
                "id": "org-42",
                "contexts": {
                    "edges": [
                        {
                            "node": {
                                "id": "ctx-1",
                                "name": "deploy",
                                "createdAt": "2024-01-15T09:30:00Z",
                                "groups": {
                                    "edges": [
                                        { "node": { "id": "grp-1", "name": "All members" } }
                                    ]
                                },
                                "resources": [
                                    {
                                        "variable": "AWS_SECRET_ACCESS_KEY",
                                        "createdAt": "2024-01-16T10:00:00Z",
                                        "truncatedValue": "eH3k"
                                    }
                                ]
                            }
                        }
                    ]
                }
            }
        }"#;

        let listing: ContextsQueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.organization.id, "org-42");

        let ctx = listing.context_by_name("deploy").unwrap();
        assert_eq!(ctx.id, "ctx-1");
        assert_eq!(ctx.resources.len(), 1);
        assert_eq!(ctx.resources[0].variable, "AWS_SECRET_ACCESS_KEY");
        assert_eq!(ctx.resources[0].truncated_value, "eH3k");
        assert_eq!(ctx.groups.edges[0].node.id, "grp-1");
        assert_eq!(ctx.groups.edges[0].node.name, "All members");
    }

    #[test]
    fn test_context_tolerates_missing_optional_collections() {
        let raw = r#"{
            "id": "ctx-2",
            "name": "bare",
            "createdAt": "2024-01-15T09:30:00Z"
        }"#;

        let ctx: Context = serde_json::from_str(raw).unwrap();
        assert!(ctx.resources.is_empty());
        assert!(ctx.groups.edges.is_empty());
    }
}
