//! Password capture via bcrypt.
//!
//! Login attempts are audited, not authenticated, but the submitted password
//! is still only kept as a bcrypt hash.

use std::ops::RangeInclusive;

use thiserror::Error;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Cost factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Password capture errors.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("bcrypt hash: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("bcrypt cost {0} is outside 4..=31")]
    Cost(u32),
}

/// Check a cost factor before any password is hashed with it.
pub fn check_cost(cost: u32) -> Result<u32, CaptureError> {
    if BCRYPT_COST_RANGE.contains(&cost) {
        Ok(cost)
    } else {
        Err(CaptureError::Cost(cost))
    }
}

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CaptureError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Verify a password against a captured bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CaptureError> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lowest cost bcrypt accepts.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_and_hides_password() {
        let hash = hash_password("hunter2", TEST_COST).unwrap();
        assert!(!hash.contains("hunter2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(hash_password("pw", 99).is_err());
    }

    #[test]
    fn cost_check_matches_bcrypt_bounds() {
        assert_eq!(check_cost(4).unwrap(), 4);
        assert_eq!(check_cost(DEFAULT_BCRYPT_COST).unwrap(), DEFAULT_BCRYPT_COST);
        assert_eq!(check_cost(31).unwrap(), 31);
        assert!(matches!(check_cost(3), Err(CaptureError::Cost(3))));
        assert!(matches!(check_cost(99), Err(CaptureError::Cost(99))));
    }
}
