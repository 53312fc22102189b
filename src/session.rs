use async_trait::async_trait;
use ulid::Ulid;

use crate::engine::EngineError;

/// Resolves the caller's identity. Engine operations take the resolved id as
/// an explicit argument; this trait is how the embedding layer obtains it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Ulid, EngineError>;
}

/// Identity pinned at construction time. Useful for tests and for embedders
/// that authenticate out-of-band.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity {
    user: Option<Ulid>,
}

impl FixedIdentity {
    pub fn new(user: Ulid) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> Result<Ulid, EngineError> {
        self.user.ok_or(EngineError::Unauthenticated)
    }
}
