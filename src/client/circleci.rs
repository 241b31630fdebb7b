//! GraphQL-backed implementation of the context operations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::graphql::{GraphQlClient, GraphQlRequest};
use super::{ContextApi, ContextsQueryResponse};
use crate::error::{ApiError, Error, Result};
use crate::git::VcsType;

// Operation documents. The field names (`ownerId`, `ownerType`, `contextName`,
// `contextId`, `variable`, `value`) are part of the wire contract with the
// CircleCI API and must not change.

const CONTEXTS_QUERY: &str = r#"
query ContextsQuery($orgName: String!, $vcsType: VCSType!) {
	organization(name: $orgName, vcsType: $vcsType) {
		id
		contexts {
			edges {
				node {
					...Context
				}
			}
		}
	}
}

fragment Context on Context {
	id
	name
	createdAt
	groups {
		edges {
			node {
				...SecurityGroups
			}
		}
	}
	resources {
		...EnvVars
	}
}

fragment EnvVars on EnvironmentVariable {
	variable
	createdAt
	truncatedValue
}

fragment SecurityGroups on Group {
	id
	name
}
"#;

const CREATE_CONTEXT_MUTATION: &str = r#"
mutation CreateContext($input: CreateContextInput!) {
	createContext(input: $input) {
		...CreateButton
	}
}

fragment CreateButton on CreateContextPayload {
	error {
		type
	}
}
"#;

const DELETE_CONTEXT_MUTATION: &str = r#"
mutation DeleteContext($input: DeleteContextInput!) {
	deleteContext(input: $input) {
		clientMutationId
	}
}
"#;

const STORE_ENV_VAR_MUTATION: &str = r#"
mutation CreateEnvVar($input: StoreEnvironmentVariableInput!) {
	storeEnvironmentVariable(input: $input) {
		context {
			id
			resources {
				...EnvVars
			}
		}
		...CreateEnvVarButton
	}
}

fragment EnvVars on EnvironmentVariable {
	variable
	createdAt
	truncatedValue
}

fragment CreateEnvVarButton on StoreEnvironmentVariablePayload {
	error {
		type
	}
}
"#;

const DELETE_ENV_VAR_MUTATION: &str = r#"
mutation DeleteEnvVar($input: RemoveEnvironmentVariableInput!) {
	removeEnvironmentVariable(input: $input) {
		context {
			id
			resources {
				...EnvVars
			}
		}
	}
}

fragment EnvVars on EnvironmentVariable {
	variable
	createdAt
	truncatedValue
}
"#;

/// Error block of a mutation payload.
///
/// A non-empty `type` means the server accepted the request but rejected the
/// operation; the transport call itself succeeded.
#[derive(Debug, Default, Deserialize)]
struct MutationError {
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

impl MutationError {
    fn into_application_error(self, what: &str) -> Result<()> {
        match self.error_type {
            Some(error_type) if !error_type.is_empty() => {
                Err(ApiError::Application(format!("Error {}: {}", what, error_type)).into())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MutationPayload {
    #[serde(default)]
    error: Option<MutationError>,
}

impl MutationPayload {
    fn check(self, what: &str) -> Result<()> {
        self.error.unwrap_or_default().into_application_error(what)
    }
}

fn wrap(err: Error, prefix: &str) -> Error {
    Error::Other(format!("{}: {}", prefix, err))
}

/// Context API client for the CircleCI GraphQL endpoint.
pub struct CircleCiClient {
    graphql: GraphQlClient,
}

impl CircleCiClient {
    /// Create a client for the GraphQL endpoint under `host`.
    pub fn new(host: &str, token: String) -> Result<Self> {
        let endpoint = format!("{}/graphql-unstable", host.trim_end_matches('/'));
        Ok(Self {
            graphql: GraphQlClient::new(endpoint, token)?,
        })
    }

    /// Resolve an organization name to its opaque id.
    ///
    /// Fetches the full context listing to obtain the id; create_context keeps
    /// this two-round-trip behavior as its contract.
    pub async fn resolve_organization_id(
        &self,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<String> {
        let contexts = self.list_contexts(org_name, vcs_type).await?;
        Ok(contexts.organization.id)
    }
}

#[async_trait]
impl ContextApi for CircleCiClient {
    async fn list_contexts(
        &self,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<ContextsQueryResponse> {
        let request = GraphQlRequest::new(CONTEXTS_QUERY)
            .var("orgName", org_name)?
            .var("vcsType", vcs_type)?;

        self.graphql
            .run(&request)
            .await
            .map_err(|e| wrap(e, "failed to load contexts"))
    }

    async fn create_context(
        &self,
        context_name: &str,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<()> {
        let org_id = self.resolve_organization_id(org_name, vcs_type).await?;

        #[derive(Serialize)]
        struct Input<'a> {
            #[serde(rename = "ownerId")]
            owner_id: &'a str,
            #[serde(rename = "ownerType")]
            owner_type: &'a str,
            #[serde(rename = "contextName")]
            context_name: &'a str,
        }

        let request = GraphQlRequest::new(CREATE_CONTEXT_MUTATION).var(
            "input",
            Input {
                owner_id: &org_id,
                owner_type: "ORGANIZATION",
                context_name,
            },
        )?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            create_context: MutationPayload,
        }

        let response: Response = self.graphql.run(&request).await?;
        response.create_context.check("creating context")
    }

    async fn delete_context(&self, context_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Input<'a> {
            #[serde(rename = "contextId")]
            context_id: &'a str,
        }

        let request =
            GraphQlRequest::new(DELETE_CONTEXT_MUTATION).var("input", Input { context_id })?;

        self.graphql
            .run::<serde_json::Value>(&request)
            .await
            .map_err(|e| wrap(e, "failed to delete context"))?;

        Ok(())
    }

    async fn store_environment_variable(
        &self,
        context_id: &str,
        variable: &str,
        value: &str,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct Input<'a> {
            #[serde(rename = "contextId")]
            context_id: &'a str,
            variable: &'a str,
            value: &'a str,
        }

        let request = GraphQlRequest::new(STORE_ENV_VAR_MUTATION).var(
            "input",
            Input {
                context_id,
                variable,
                value,
            },
        )?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            store_environment_variable: MutationPayload,
        }

        let response: Response = self
            .graphql
            .run(&request)
            .await
            .map_err(|e| wrap(e, "failed to store environment variable in context"))?;

        response
            .store_environment_variable
            .check("storing environment variable")
    }

    async fn delete_environment_variable(&self, context_id: &str, variable: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Input<'a> {
            #[serde(rename = "contextId")]
            context_id: &'a str,
            variable: &'a str,
        }

        let request = GraphQlRequest::new(DELETE_ENV_VAR_MUTATION).var(
            "input",
            Input {
                context_id,
                variable,
            },
        )?;

        self.graphql
            .run::<serde_json::Value>(&request)
            .await
            .map_err(|e| wrap(e, "failed to delete environment variable"))?;

        Ok(())
    }
}
