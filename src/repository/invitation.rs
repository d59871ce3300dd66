use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{InviteError, SecretString};

/// Storage-native identifier of an invitation record.
///
/// Twelve bytes: the creation time as big-endian unix seconds followed by
/// eight random bytes. Written to storage as 24 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternalKey([u8; 12]);

impl InternalKey {
    pub fn generate<G: RngCore + ?Sized>(rng: &mut G) -> Self {
        let mut bytes = [0u8; 12];
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let (time, random) = bytes.split_at_mut(4);
        time.copy_from_slice(&secs.to_be_bytes());
        rng.fill_bytes(random);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternalKey({})", self.to_hex())
    }
}

impl fmt::Display for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for InternalKey {
    type Err = InviteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| InviteError::StoreFailure(format!("malformed internal key: {e}")))?;
        Ok(Self(bytes))
    }
}

/// A pending invitation.
///
/// Records are inserted once and removed once; they are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invitation {
    #[serde(skip)]
    pub key: InternalKey,
    /// Single-use activation credential, 128 hex characters.
    pub token: String,
    pub email: String,
    pub organization: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Account details submitted when activating an invitation.
///
/// There is intentionally no email here: the account is always provisioned
/// under the invitation's own address.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationData {
    pub organization: String,
    pub password: SecretString,
}

#[cfg(any(test, feature = "mocks"))]
impl Invitation {
    pub fn mock_for_email(email: &str) -> Self {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(email.len() as u64);
        let key = InternalKey::generate(&mut rng);
        Invitation {
            token: crate::crypto::generate_invitation_token(&mut rng, &key, email),
            key,
            email: email.to_owned(),
            organization: None,
            created_at: Utc::now(),
        }
    }
}

/// Persistence for invitation records.
///
/// "Not found" is `Ok(None)`; `Err` always means the store itself failed,
/// except for [`InviteError::DuplicateInvitation`] from [`insert`].
///
/// [`insert`]: InvitationRepository::insert
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, InviteError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError>;

    /// Persists a new record. Implementations must reject a second record
    /// with the same email or token with `DuplicateInvitation`.
    async fn insert(&self, invitation: &Invitation) -> Result<(), InviteError>;

    /// Removes the record with this token, if any.
    async fn delete_by_token(&self, token: &str) -> Result<(), InviteError>;

    /// Atomically removes the record with this token and returns it.
    ///
    /// Of several concurrent callers at most one receives `Some`.
    async fn take_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError>;
}
