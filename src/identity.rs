//! Caller identity as resolved by the authentication filter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::InviteError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Stable identifier of the authenticated principal.
    pub subject: String,
}

impl CallerIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Who is invoking a lifecycle operation.
///
/// Actions that require a logged-in caller receive this explicitly rather
/// than reading request state, and refuse `Unauthenticated` with
/// [`InviteError::Unauthorized`](crate::InviteError::Unauthorized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Authenticated(CallerIdentity),
    Unauthenticated,
}

impl Caller {
    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            Caller::Authenticated(identity) => Some(identity),
            Caller::Unauthenticated => None,
        }
    }
}

impl From<Option<CallerIdentity>> for Caller {
    fn from(identity: Option<CallerIdentity>) -> Self {
        identity.map_or(Caller::Unauthenticated, Caller::Authenticated)
    }
}

/// Resolves a presented credential to a caller identity.
///
/// This is the authentication filter in front of the lifecycle. `Ok(None)`
/// means the credential is unknown; `Err` means the lookup itself failed.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credential: &str) -> Result<Option<CallerIdentity>, InviteError>;
}

/// Authenticator backed by a fixed set of API keys.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    keys: Arc<HashMap<String, CallerIdentity>>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_key(self, key: impl Into<String>, subject: impl Into<String>) -> Self {
        let mut keys = Arc::unwrap_or_clone(self.keys);
        keys.insert(key.into(), CallerIdentity::new(subject));
        Self {
            keys: Arc::new(keys),
        }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> Result<Option<CallerIdentity>, InviteError> {
        Ok(self.keys.get(credential).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_authenticator() {
        let auth = StaticTokenAuthenticator::new().with_key("secret-key", "admin");

        let caller: Caller = auth.authenticate("secret-key").await.unwrap().into();
        assert_eq!(caller, Caller::Authenticated(CallerIdentity::new("admin")));

        let caller: Caller = auth.authenticate("wrong").await.unwrap().into();
        assert_eq!(caller, Caller::Unauthenticated);
        assert!(caller.identity().is_none());
    }
}
