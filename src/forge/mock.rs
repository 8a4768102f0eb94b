//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Example
//!
//! ```
//! use relcut::forge::mock::MockForge;
//! use relcut::forge::{Forge, CreatePrRequest, PrState};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//!
//! let pr = forge.create_pr(CreatePrRequest {
//!     head: "release/candidate/v1.2.0".to_string(),
//!     base: "release/stable".to_string(),
//!     title: "Merge release candidate for v1.2.0".to_string(),
//!     body: String::new(),
//! }).await.unwrap();
//!
//! assert_eq!(pr.number, 1);
//! assert_eq!(pr.state, PrState::Open);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{CreatePrRequest, Forge, ForgeError, PrState, PullRequest};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping, so a clone can be
/// kept by the test while the forge is handed to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Default)]
struct MockForgeInner {
    /// PRs created so far, in creation order.
    created: Vec<CreatePrRequest>,
    /// Error to return from the next create_pr call, if set.
    fail_with: Option<ForgeError>,
}

impl MockForge {
    /// Create an empty mock forge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_pr` call fail with the given error.
    pub fn fail_with(&self, error: ForgeError) {
        self.lock().fail_with = Some(error);
    }

    /// Requests recorded by `create_pr`, in order.
    pub fn created_prs(&self) -> Vec<CreatePrRequest> {
        self.lock().created.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockForgeInner> {
        // A poisoned lock means a test already panicked; propagating the
        // panic is the right behavior here.
        self.inner.lock().expect("mock forge lock poisoned")
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_pr(&self, request: CreatePrRequest) -> Result<PullRequest, ForgeError> {
        let mut inner = self.lock();
        if let Some(error) = inner.fail_with.take() {
            return Err(error);
        }

        inner.created.push(request.clone());
        let number = inner.created.len() as u64;

        Ok(PullRequest {
            number,
            url: format!("https://example.invalid/pr/{number}"),
            state: PrState::Open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_created_prs() {
        let forge = MockForge::new();

        let pr = forge
            .create_pr(CreatePrRequest {
                head: "release/candidate/v1.0.1".into(),
                base: "release/stable".into(),
                title: "Merge release candidate for v1.0.1".into(),
                body: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(pr.number, 1);
        let created = forge.created_prs();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].head, "release/candidate/v1.0.1");
    }

    #[tokio::test]
    async fn configured_failure_is_returned_once() {
        let forge = MockForge::new();
        forge.fail_with(ForgeError::ApiError {
            status: 422,
            message: "already exists".into(),
        });

        let request = CreatePrRequest {
            head: "h".into(),
            base: "b".into(),
            title: "t".into(),
            body: String::new(),
        };

        assert!(forge.create_pr(request.clone()).await.is_err());
        assert!(forge.create_pr(request).await.is_ok());
    }
}
