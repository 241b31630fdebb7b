//! Shared test fixtures for context API data

use super::{
    Context, ContextConnection, ContextEdge, ContextResource, ContextsQueryResponse,
    GroupConnection, OrganizationNode,
};

/// A context with no resources or groups.
pub fn sample_context(id: &str, name: &str) -> Context {
    Context {
        id: id.to_string(),
        name: name.to_string(),
        created_at: "2024-03-01T12:00:00Z".to_string(),
        groups: GroupConnection::default(),
        resources: Vec::new(),
    }
}

/// One masked environment variable record.
pub fn sample_resource(variable: &str, truncated_value: &str) -> ContextResource {
    ContextResource {
        variable: variable.to_string(),
        created_at: "2024-03-02T08:00:00Z".to_string(),
        truncated_value: truncated_value.to_string(),
    }
}

/// A listing response owning the given contexts.
pub fn sample_listing(org_id: &str, contexts: Vec<Context>) -> ContextsQueryResponse {
    ContextsQueryResponse {
        organization: OrganizationNode {
            id: org_id.to_string(),
            contexts: ContextConnection {
                edges: contexts
                    .into_iter()
                    .map(|node| ContextEdge { node })
                    .collect(),
            },
        },
    }
}
