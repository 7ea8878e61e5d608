// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::BigInt;
use num_traits::Signed;
use std::sync::Arc;
use std::time::SystemTime;
use std::vec::Vec;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::polynomial::Polynomial;
use crate::secretshare::SecretShare;

// ============================================================================
// Public Info
// ============================================================================

/// Parameters every share of one split carries.
///
/// Built once per split (or per combine of externally parsed shares) and
/// shared through an `Arc` by all shares of that operation.
#[derive(Debug, Clone)]
pub struct PublicInfo {
    n: Option<u32>,
    k: u32,
    prime_modulus: Option<BigInt>,
    description: String,
    uuid: String,
    created_at: SystemTime,
}

impl PublicInfo {
    /// - Parameters:
    ///   - n: total number of shares, unknown when combining parsed shares
    ///   - k: threshold, at least 1 and never above `n`
    ///   - prime_modulus: modulus all share values are reduced by
    ///   - description: free text carried along with the shares
    pub fn new(
        n: Option<u32>,
        k: u32,
        prime_modulus: Option<BigInt>,
        description: impl Into<String>,
    ) -> Result<Arc<Self>> {
        if k < 1 {
            return Err(Error::InvalidInput("k must be at least 1".to_string()));
        }
        if let Some(n) = n {
            if k > n {
                return Err(Error::InvalidInput(format!(
                    "k ({}) must not be greater than n ({})",
                    k, n
                )));
            }
        }
        if let Some(modulus) = &prime_modulus {
            if !modulus.is_positive() {
                return Err(Error::InvalidInput("modulus must be positive".to_string()));
            }
        }
        Ok(Arc::new(PublicInfo {
            n,
            k,
            prime_modulus,
            description: description.into(),
            uuid: Uuid::new_v4().to_string(),
            created_at: SystemTime::now(),
        }))
    }

    /// Copy with a different share count, keeping uuid, description and timestamp.
    pub fn with_n(&self, n: u32) -> Result<Arc<Self>> {
        if self.k > n {
            return Err(Error::InvalidInput(format!(
                "k ({}) must not be greater than n ({})",
                self.k, n
            )));
        }
        Ok(Arc::new(PublicInfo {
            n: Some(n),
            ..self.clone()
        }))
    }

    pub fn n(&self) -> Option<u32> {
        self.n
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn prime_modulus(&self) -> Option<&BigInt> {
        self.prime_modulus.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Fails with the first of k, n, modulus that both sides set differently.
    /// `x` names the share being checked in the error.
    pub(crate) fn check_consistent(&self, other: &PublicInfo, x: i32) -> Result<()> {
        if self.k != other.k {
            return Err(Error::InconsistentPublicInfo { field: "k", x });
        }
        if let (Some(a), Some(b)) = (self.n, other.n) {
            if a != b {
                return Err(Error::InconsistentPublicInfo { field: "n", x });
            }
        }
        if let (Some(a), Some(b)) = (&self.prime_modulus, &other.prime_modulus) {
            if a != b {
                return Err(Error::InconsistentPublicInfo {
                    field: "modulus",
                    x,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Share Info
// ============================================================================

/// One `(x, f(x))` point handed to a participant.
///
/// Two shares compare equal when x, value and threshold match.
#[derive(Debug, Clone)]
pub struct ShareInfo {
    x: i32,
    value: BigInt,
    public_info: Arc<PublicInfo>,
}

impl ShareInfo {
    pub fn new(x: i32, value: BigInt, public_info: Arc<PublicInfo>) -> Result<Self> {
        if x < 1 {
            return Err(Error::InvalidInput(format!(
                "share index must be at least 1, got {}",
                x
            )));
        }
        Ok(ShareInfo {
            x,
            value,
            public_info,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn public_info(&self) -> &Arc<PublicInfo> {
        &self.public_info
    }
}

impl PartialEq for ShareInfo {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.value == other.value && self.public_info.k == other.public_info.k
    }
}

impl Eq for ShareInfo {}

// ============================================================================
// Operation results
// ============================================================================

/// Everything one split produced.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub(crate) public_info: Arc<PublicInfo>,
    pub(crate) polynomial: Polynomial,
    pub(crate) shares: Vec<ShareInfo>,
}

impl SplitResult {
    pub fn public_info(&self) -> &Arc<PublicInfo> {
        &self.public_info
    }

    /// The generating polynomial, kept for inspection and regeneration.
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn shares(&self) -> &[ShareInfo] {
        &self.shares
    }

    pub fn into_shares(self) -> Vec<ShareInfo> {
        self.shares
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombineResult {
    pub secret: BigInt,
    /// Recovered polynomial coefficients, the secret first.
    pub coefficients: Option<Vec<BigInt>>,
}

impl CombineResult {
    /// Re-evaluates the recovered polynomial for `public_info`, e.g. with a
    /// larger `n`, so that more shares can be issued after the fact.
    pub fn regenerate(&self, public_info: Arc<PublicInfo>) -> Result<SplitResult> {
        let coefficients = self.coefficients.clone().ok_or_else(|| {
            Error::InvalidInput("combine result carries no coefficients".to_string())
        })?;
        SecretShare::new(public_info).split_from_coefficients(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_info_validation() {
        assert!(PublicInfo::new(Some(6), 3, None, "").is_ok());
        assert!(PublicInfo::new(None, 3, None, "").is_ok());
        assert!(matches!(
            PublicInfo::new(Some(2), 3, None, ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PublicInfo::new(Some(2), 0, None, ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PublicInfo::new(Some(2), 1, Some(BigInt::from(0)), ""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_public_info_identity() {
        let a = PublicInfo::new(Some(6), 3, None, "vault key").unwrap();
        let b = PublicInfo::new(Some(6), 3, None, "vault key").unwrap();
        assert_ne!(a.uuid(), b.uuid());
        assert_eq!(a.description(), "vault key");

        let grown = a.with_n(10).unwrap();
        assert_eq!(grown.uuid(), a.uuid());
        assert_eq!(grown.n(), Some(10));
        assert_eq!(grown.created_at(), a.created_at());
        assert!(a.with_n(2).is_err());
    }

    #[test]
    fn test_check_consistent() {
        let base = PublicInfo::new(Some(6), 3, Some(BigInt::from(59561)), "").unwrap();
        let unknown_n = PublicInfo::new(None, 3, None, "").unwrap();
        let other_k = PublicInfo::new(Some(6), 4, None, "").unwrap();
        let other_n = PublicInfo::new(Some(7), 3, None, "").unwrap();
        let other_modulus = PublicInfo::new(None, 3, Some(BigInt::from(65537)), "").unwrap();

        assert_eq!(base.check_consistent(&unknown_n, 1), Ok(()));
        assert_eq!(
            base.check_consistent(&other_k, 2),
            Err(Error::InconsistentPublicInfo { field: "k", x: 2 })
        );
        assert_eq!(
            base.check_consistent(&other_n, 3),
            Err(Error::InconsistentPublicInfo { field: "n", x: 3 })
        );
        assert_eq!(
            base.check_consistent(&other_modulus, 4),
            Err(Error::InconsistentPublicInfo {
                field: "modulus",
                x: 4
            })
        );
    }

    #[test]
    fn test_share_equality() {
        let info = PublicInfo::new(Some(3), 2, None, "").unwrap();
        let same_k = PublicInfo::new(None, 2, None, "other").unwrap();
        let other_k = PublicInfo::new(None, 3, None, "").unwrap();

        let share = ShareInfo::new(1, BigInt::from(42), info).unwrap();
        assert_eq!(share, ShareInfo::new(1, BigInt::from(42), same_k.clone()).unwrap());
        assert_ne!(share, ShareInfo::new(2, BigInt::from(42), same_k.clone()).unwrap());
        assert_ne!(share, ShareInfo::new(1, BigInt::from(43), same_k).unwrap());
        assert_ne!(share, ShareInfo::new(1, BigInt::from(42), other_k).unwrap());
        assert!(ShareInfo::new(0, BigInt::from(42), share.public_info().clone()).is_err());
    }
}
