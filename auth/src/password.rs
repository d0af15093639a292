use crate::error::Error;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Argon2id hashing with a configurable work factor. Verification reads the parameters
/// embedded in the stored hash, so changing the work factor doesn't invalidate existing
/// passwords.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// `memory_kib` and `iterations` are the Argon2 m_cost and t_cost.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, Error> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| Error::InvalidHashParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let saltstring = SaltString::generate(&mut OsRng);

        let hash = self
            .argon()
            .hash_password(password.as_bytes(), &saltstring)
            .map_err(|e| Error::PasswordHasherError(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Returns false for a wrong password and for anything that isn't a parseable hash.
    pub fn verify(&self, password: &str, hash_str: &str) -> bool {
        let Ok(hash) = PasswordHash::new(hash_str) else {
            return false;
        };

        self.argon()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }

    /// Verify a login attempt. When there is no stored hash the password is checked against
    /// `decoy` instead, so an unknown username costs as much as a wrong password. That path
    /// always fails.
    pub fn verify_or_decoy(&self, password: &str, stored: Option<&str>, decoy: &str) -> bool {
        match stored {
            Some(hash) => self.verify(password, hash),
            None => {
                self.verify(password, decoy);
                false
            }
        }
    }
}

pub fn new_hash(password: &str) -> Result<String, Error> {
    PasswordHasher::default().hash(password)
}
