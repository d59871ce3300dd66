//! Configuration for invitation handling and account password hashing.
//!
//! ```rust
//! use vestibule::config::{HashingConfig, VestibuleConfig};
//!
//! let config = VestibuleConfig {
//!     hashing: HashingConfig::production(),
//!     ..Default::default()
//! };
//! let hasher = config.hashing.hasher();
//! ```

use crate::crypto::Argon2Hasher;

#[derive(Debug, Clone, Default)]
pub struct VestibuleConfig {
    pub invitations: InvitationConfig,
    pub hashing: HashingConfig,
}

impl VestibuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap hashing for local runs and tests.
    pub fn development() -> Self {
        Self {
            invitations: InvitationConfig::default(),
            hashing: HashingConfig {
                memory_cost: 1024,
                time_cost: 1,
                parallelism: 1,
            },
        }
    }

    pub fn strict() -> Self {
        Self {
            invitations: InvitationConfig {
                validate_email: true,
            },
            hashing: HashingConfig::production(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Reject invitations whose email does not look like an address.
    ///
    /// Default: true
    pub validate_email: bool,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            validate_email: true,
        }
    }
}

/// Argon2id parameters used when provisioning accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory usage in KiB.
    ///
    /// Default: 19456 (19 MiB)
    pub memory_cost: u32,
    /// Default: 2
    pub time_cost: u32,
    /// Default: 1
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashingConfig {
    /// OWASP 2024 parameters: 64 MiB memory, 3 iterations, 4 lanes.
    pub fn production() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher::new(self.memory_cost, self.time_cost, self.parallelism)
    }
}
