use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as ArgonPasswordHasher, SaltString};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use crate::repository::InternalKey;

/// Length of an invitation token in hex characters (a full SHA-512 digest).
pub const INVITATION_TOKEN_LENGTH: usize = 128;

/// Generates the activation token for a new invitation.
///
/// Draws a 63-bit nonce from `rng` and hands it to [`invitation_token`].
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use vestibule::InternalKey;
/// use vestibule::crypto::generate_invitation_token;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let key = InternalKey::generate(&mut rng);
/// let token = generate_invitation_token(&mut rng, &key, "alice@example.com");
/// assert_eq!(token.len(), 128);
/// ```
pub fn generate_invitation_token<G>(rng: &mut G, key: &InternalKey, email: &str) -> String
where
    G: RngCore + CryptoRng + ?Sized,
{
    let nonce = rng.next_u64() & (i64::MAX as u64);
    invitation_token(nonce, key, email)
}

/// SHA-512 over `nonce (8 bytes LE) || hex(key) || email`, hex encoded.
pub fn invitation_token(nonce: u64, key: &InternalKey, email: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(nonce.to_le_bytes());
    hasher.update(key.to_hex().as_bytes());
    hasher.update(email.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true if `token` has the shape of an invitation token.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == INVITATION_TOKEN_LENGTH
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashError;

/// Pluggable password hashing, used by the account provisioner.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Argon2id hasher with configurable cost parameters.
///
/// ```rust
/// use vestibule::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new(1024, 1, 1);
/// let hash = hasher.hash("p@ss").unwrap();
/// assert!(hasher.verify("p@ss", &hash).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB - argon2 default
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| PasswordHashError)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordHashError)?;

        // params are read from the hash string
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
