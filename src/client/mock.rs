//! Mock context API client for testing
//!
//! Implements [`ContextApi`] without network access so command handlers can be
//! unit tested.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ContextApi, ContextsQueryResponse};
use crate::error::{ApiError, Error, Result};
use crate::git::VcsType;

/// A mutation observed by the mock, for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedCall {
    ListContexts {
        org_name: String,
        vcs_type: VcsType,
    },
    CreateContext {
        context_name: String,
        org_name: String,
        vcs_type: VcsType,
    },
    DeleteContext {
        context_id: String,
    },
    StoreEnvironmentVariable {
        context_id: String,
        variable: String,
        value: String,
    },
    DeleteEnvironmentVariable {
        context_id: String,
        variable: String,
    },
}

/// Mock API client. Configure via the builder methods, then assert on
/// `captured_calls`.
#[derive(Default)]
pub struct MockContextClient {
    listing: Arc<Mutex<Option<ContextsQueryResponse>>>,
    /// Error to return from the next operation, consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
}

impl MockContextClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the listing returned by `list_contexts`.
    pub async fn with_listing(self, listing: ContextsQueryResponse) -> Self {
        *self.listing.lock().await = Some(listing);
        self
    }

    /// Configure an error returned by the next operation.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    pub async fn captured_calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: CapturedCall) {
        self.calls.lock().await.push(call);
    }

    async fn take_error(&self) -> Option<Error> {
        self.error.lock().await.take().map(Error::from)
    }
}

#[async_trait]
impl ContextApi for MockContextClient {
    async fn list_contexts(
        &self,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<ContextsQueryResponse> {
        self.record(CapturedCall::ListContexts {
            org_name: org_name.to_string(),
            vcs_type,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.listing
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::InvalidResponse("mock has no listing".to_string()).into())
    }

    async fn create_context(
        &self,
        context_name: &str,
        org_name: &str,
        vcs_type: VcsType,
    ) -> Result<()> {
        self.record(CapturedCall::CreateContext {
            context_name: context_name.to_string(),
            org_name: org_name.to_string(),
            vcs_type,
        })
        .await;

        match self.take_error().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn delete_context(&self, context_id: &str) -> Result<()> {
        self.record(CapturedCall::DeleteContext {
            context_id: context_id.to_string(),
        })
        .await;

        match self.take_error().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn store_environment_variable(
        &self,
        context_id: &str,
        variable: &str,
        value: &str,
    ) -> Result<()> {
        self.record(CapturedCall::StoreEnvironmentVariable {
            context_id: context_id.to_string(),
            variable: variable.to_string(),
            value: value.to_string(),
        })
        .await;

        match self.take_error().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn delete_environment_variable(&self, context_id: &str, variable: &str) -> Result<()> {
        self.record(CapturedCall::DeleteEnvironmentVariable {
            context_id: context_id.to_string(),
            variable: variable.to_string(),
        })
        .await;

        match self.take_error().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
