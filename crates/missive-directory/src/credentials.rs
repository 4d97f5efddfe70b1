//! Password hashing and verification.

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{DirectoryError, Result};

/// Argon2id cost parameters. Fixed for the lifetime of a [`Credentials`];
/// existing digests keep verifying after a change because the PHC string
/// records the parameters it was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted one-way digests of passwords. Plaintext never leaves this type.
#[derive(Clone)]
pub struct Credentials {
    argon2: Argon2<'static>,
}

impl Credentials {
    pub fn new(config: HashConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DirectoryError::Hashing(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DirectoryError::Hashing(e.to_string()))?
            .to_string();

        Ok(digest)
    }

    /// Check `password` against a stored digest. A mismatch is `Ok(false)`;
    /// only an unparseable digest or an algorithm failure is an error.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let parsed = PasswordHash::new(digest).map_err(|e| DirectoryError::Hashing(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DirectoryError::Hashing(e.to_string())),
        }
    }
}
