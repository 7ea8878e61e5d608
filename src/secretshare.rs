// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::identities::{One, Zero};
use num_traits::Signed;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::paranoid::{self, ParanoidConfig, ParanoidResult};
use crate::polynomial::Polynomial;
use crate::share::{CombineResult, PublicInfo, ShareInfo, SplitResult};
use crate::solver;

/// Lower bound on the bit width of the random factors behind each coefficient.
const MIN_RANDOM_FACTOR_BITS: usize = 64;

/// Polynomials drawn by one split before giving up on distinct share values.
const MAX_SPLIT_ATTEMPTS: u32 = 1_000;

/// The dealer and combiner of one secret sharing operation.
///
/// Every share it produces points at the engine's `PublicInfo`, and every
/// share it combines must agree with it on k, n and the modulus.
#[derive(Debug, Clone)]
pub struct SecretShare {
    public_info: Arc<PublicInfo>,
}

impl SecretShare {
    /// ## Example
    ///
    /// ```rust
    /// use secretshare_rs::{PublicInfo, SecretShare};
    /// use num_bigint::BigInt;
    ///
    /// let info = PublicInfo::new(Some(6), 3, Some(BigInt::from(59561)), "demo").unwrap();
    /// let engine = SecretShare::new(info);
    /// assert_eq!(engine.public_info().k(), 3);
    /// ```
    pub fn new(public_info: Arc<PublicInfo>) -> Self {
        SecretShare { public_info }
    }

    pub fn public_info(&self) -> &Arc<PublicInfo> {
        &self.public_info
    }

    /// Splits `secret` into `n` shares, any `k` of which recover it.
    ///
    /// - Requires: `n` is set on the public info, `secret > 0`, and
    ///   `secret < modulus` when a modulus is set. With `k > 1` the secret
    ///   must be at least 2 and `n` smaller than the modulus.
    /// - Returns: the shares for `x = 1..=n` together with the polynomial
    ///   that produced them. For `k > 1` the polynomial is redrawn until it
    ///   is not constant and all share values differ.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use secretshare_rs::{PublicInfo, SecretShare};
    /// use num_bigint::BigInt;
    ///
    /// let info = PublicInfo::new(Some(6), 3, Some(BigInt::from(59561)), "demo").unwrap();
    /// let engine = SecretShare::new(info);
    /// let split = engine.split(&BigInt::from(45654), &mut rand::thread_rng()).unwrap();
    /// assert_eq!(split.shares().len(), 6);
    ///
    /// let combined = engine.combine(&split.shares()[2..5]).unwrap();
    /// assert_eq!(combined.secret, BigInt::from(45654));
    /// ```
    pub fn split<R: Rng + ?Sized>(&self, secret: &BigInt, rng: &mut R) -> Result<SplitResult> {
        if !secret.is_positive() {
            return Err(Error::SecretNotPositive);
        }
        let modulus = self.public_info.prime_modulus();
        if let Some(m) = modulus {
            if secret >= m {
                return Err(Error::SecretTooLarge);
            }
        }

        let k = self.public_info.k();
        if k == 1 {
            return self.split_from_coefficients(vec![secret.clone()]);
        }
        if secret.is_one() {
            return Err(Error::InvalidInput(
                "a secret of 1 only allows k = 1, every random coefficient would be 0".to_string(),
            ));
        }
        if let (Some(m), Some(n)) = (modulus, self.public_info.n()) {
            if &BigInt::from(n) >= m {
                return Err(Error::InvalidInput(format!(
                    "n ({}) must be smaller than the modulus",
                    n
                )));
            }
        }

        for attempt in 1..=MAX_SPLIT_ATTEMPTS {
            let mut coefficients = Vec::with_capacity(k as usize);
            coefficients.push(secret.clone());
            for _ in 1..k {
                coefficients.push(random_coefficient(secret, modulus, rng));
            }
            if coefficients[1..].iter().all(|c| c.is_zero()) {
                trace!(attempt, "constant polynomial drawn, redrawing");
                continue;
            }
            let split = self.split_from_coefficients(coefficients)?;
            if !has_distinct_values(&split.shares) {
                trace!(attempt, "share values collide, redrawing");
                continue;
            }
            return Ok(split);
        }
        Err(Error::InvalidInput(format!(
            "no polynomial with distinct share values after {} attempts",
            MAX_SPLIT_ATTEMPTS
        )))
    }

    /// Evaluates the polynomial with the given coefficients (secret first)
    /// at `x = 1..=n`. Shares at an x already handed out come back identical,
    /// which is how extra shares are issued after a combine.
    pub fn split_from_coefficients(&self, coefficients: Vec<BigInt>) -> Result<SplitResult> {
        let k = self.public_info.k();
        if coefficients.len() != k as usize {
            return Err(Error::InvalidInput(format!(
                "expected {} coefficients, got {}",
                k,
                coefficients.len()
            )));
        }
        let n = self
            .public_info
            .n()
            .ok_or_else(|| Error::InvalidInput("n must be set to split".to_string()))?;
        if n > i32::MAX as u32 {
            return Err(Error::InvalidInput(format!("n ({}) is too large", n)));
        }

        let polynomial = Polynomial::new(coefficients)?;
        let modulus = self.public_info.prime_modulus();
        debug!(
            k,
            n,
            modulus_bits = modulus.map(|m| m.bits()).unwrap_or(0),
            uuid = self.public_info.uuid(),
            "splitting secret"
        );

        let shares = (1..=n as i32)
            .map(|x| {
                let value = polynomial.evaluate(&BigInt::from(x));
                let value = match modulus {
                    Some(m) => value.mod_floor(m),
                    None => value,
                };
                ShareInfo::new(x, value, self.public_info.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SplitResult {
            public_info: self.public_info.clone(),
            polynomial,
            shares,
        })
    }

    /// Recovers the secret from at least `k` shares.
    ///
    /// Exact repeats of a share are ignored; the first `k` remaining shares
    /// (in input order) are solved.
    pub fn combine(&self, shares: &[ShareInfo]) -> Result<CombineResult> {
        let distinct = self.validate(shares)?;
        let k = self.public_info.k() as usize;
        debug!(
            k,
            supplied = shares.len(),
            uuid = self.public_info.uuid(),
            "combining shares"
        );
        self.solve(&distinct[..k])
    }

    /// Solves many `k`-subsets of `shares` and reports whether they agree.
    /// See [`paranoid::verify`].
    pub fn combine_paranoid(
        &self,
        shares: &[ShareInfo],
        config: &ParanoidConfig,
    ) -> Result<ParanoidResult> {
        paranoid::verify(self, shares, config)
    }

    /// Checks count, public info and duplicates; returns the shares with
    /// exact repeats dropped. With `k = 1` every share holds the secret, so
    /// equal values at different x are not duplicates there.
    pub(crate) fn validate(&self, shares: &[ShareInfo]) -> Result<Vec<ShareInfo>> {
        let k = self.public_info.k();
        if shares.len() < k as usize {
            return Err(Error::InsufficientShares {
                needed: k,
                supplied: shares.len(),
            });
        }

        for share in shares {
            self.public_info
                .check_consistent(share.public_info(), share.x())?;
            shares[0]
                .public_info()
                .check_consistent(share.public_info(), share.x())?;
        }

        let mut distinct: Vec<ShareInfo> = Vec::with_capacity(shares.len());
        for share in shares {
            let clash = distinct
                .iter()
                .find(|seen| seen.x() == share.x() || (k > 1 && seen.value() == share.value()));
            match clash {
                Some(seen) if seen == share => continue,
                Some(seen) => {
                    return Err(Error::DuplicateShare {
                        x: share.x(),
                        other_x: seen.x(),
                    })
                }
                None => distinct.push(share.clone()),
            }
        }

        if distinct.len() < k as usize {
            return Err(Error::InsufficientShares {
                needed: k,
                supplied: distinct.len(),
            });
        }
        Ok(distinct)
    }

    /// Solves exactly the given shares, which must already be validated.
    pub(crate) fn solve(&self, shares: &[ShareInfo]) -> Result<CombineResult> {
        let points: Vec<(BigInt, BigInt)> = shares
            .iter()
            .map(|share| (BigInt::from(share.x()), share.value().clone()))
            .collect();
        let coefficients = solver::solve_polynomial(
            &points,
            self.public_info.k() as usize,
            self.public_info.prime_modulus().cloned(),
        )?;
        let secret = coefficients.first().cloned().unwrap_or_else(BigInt::zero);
        Ok(CombineResult {
            secret,
            coefficients: Some(coefficients),
        })
    }
}

fn has_distinct_values(shares: &[ShareInfo]) -> bool {
    let mut seen = HashSet::with_capacity(shares.len());
    shares.iter().all(|share| seen.insert(share.value()))
}

/// `|a * b|` for two random values as wide as the secret, reduced by the
/// modulus (if any) and then by the secret.
fn random_coefficient<R: Rng + ?Sized>(
    secret: &BigInt,
    modulus: Option<&BigInt>,
    rng: &mut R,
) -> BigInt {
    let bits = secret.bits().max(MIN_RANDOM_FACTOR_BITS);
    let mut value = (rng.gen_bigint(bits) * rng.gen_bigint(bits)).abs();
    if let Some(m) = modulus {
        value = value % m;
    }
    value % secret
}

/// Splits `secret` with a fresh [`PublicInfo`] for `k` of `n`.
pub fn split<R: Rng + ?Sized>(
    secret: &BigInt,
    k: u32,
    n: u32,
    modulus: Option<BigInt>,
    rng: &mut R,
) -> Result<SplitResult> {
    let public_info = PublicInfo::new(Some(n), k, modulus, "")?;
    SecretShare::new(public_info).split(secret, rng)
}

/// Combines shares using the public info the first share carries.
pub fn combine(shares: &[ShareInfo]) -> Result<CombineResult> {
    engine_for(shares)?.combine(shares)
}

/// Paranoid combine using the public info the first share carries.
pub fn combine_paranoid(shares: &[ShareInfo], config: &ParanoidConfig) -> Result<ParanoidResult> {
    engine_for(shares)?.combine_paranoid(shares, config)
}

fn engine_for(shares: &[ShareInfo]) -> Result<SecretShare> {
    shares
        .first()
        .map(|share| SecretShare::new(share.public_info().clone()))
        .ok_or(Error::InsufficientShares {
            needed: 1,
            supplied: 0,
        })
}
