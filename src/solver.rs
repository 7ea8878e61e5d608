// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Exact recovery of polynomial coefficients from sample points.
//!
//! Every equation is a row `[y, a_1, a_2, .., a_k]` meaning
//! `y = a_1*c_1 + a_2*c_2 + .. + a_k*c_k`. For a sample `(x, f(x))` of a
//! polynomial with `k` coefficients the row is `[f(x), 1, x, x^2, .., x^(k-1)]`
//! and `c_1` is the constant term, the secret.
//!
//! Elimination never forms fractions. Two rows cancel a column by cross
//! multiplication: each row is scaled by the other's entry in that column and
//! the results subtracted. Values grow quickly but stay exact integers. The
//! back substitution divides exactly, and under a modulus a remainder is
//! absorbed by adding multiples of the modulus to the numerator.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::identities::{One, Zero};
use num_traits::Signed;
use std::collections::HashSet;
use tracing::trace;

use crate::error::{Error, Result};
use crate::util::Util;

/// How many multiples of the modulus are tried one by one before the
/// smallest working multiple is computed directly.
pub const MODULAR_DIVISION_RETRY_LIMIT: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct LinearSystemSolver {
    rows: Vec<Vec<BigInt>>,
    modulus: Option<BigInt>,
}

impl LinearSystemSolver {
    /// `rows` must be square apart from the leading constant column.
    pub fn new(rows: Vec<Vec<BigInt>>, modulus: Option<BigInt>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidInput("linear system has no rows".to_string()));
        }
        let width = rows.len() + 1;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(Error::InvalidInput(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if let Some(m) = &modulus {
            if !m.is_positive() {
                return Err(Error::InvalidInput("modulus must be positive".to_string()));
            }
        }
        Ok(LinearSystemSolver { rows, modulus })
    }

    /// Builds the system for the polynomial with `k` coefficients passing
    /// through `points`. The first point seen for each x is used; later
    /// points with an x already taken are ignored.
    pub fn from_observations(
        points: &[(BigInt, BigInt)],
        k: usize,
        modulus: Option<BigInt>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let distinct: Vec<&(BigInt, BigInt)> = points
            .iter()
            .filter(|(x, _)| seen.insert(x.clone()))
            .collect();
        if k == 0 || distinct.len() < k {
            return Err(Error::TooFewObservations {
                needed: k,
                distinct: distinct.len(),
            });
        }

        let rows = distinct
            .into_iter()
            .take(k)
            .map(|(x, y)| {
                let mut row = Vec::with_capacity(k + 1);
                row.push(y.clone());
                let mut power = BigInt::one();
                for _ in 0..k {
                    row.push(power.clone());
                    power *= x;
                }
                row
            })
            .collect();
        LinearSystemSolver::new(rows, modulus)
    }

    pub fn modulus(&self) -> Option<&BigInt> {
        self.modulus.as_ref()
    }

    /// Solves the system, returning `c_1..c_k` (reduced by the modulus if one is set).
    pub fn solve(mut self) -> Result<Vec<BigInt>> {
        let k = self.rows.len();

        for pivot in 0..k {
            let col = pivot + 1;
            if self.rows[pivot][col].is_zero() {
                let swap = (pivot + 1..k)
                    .find(|&r| !self.rows[r][col].is_zero())
                    .ok_or_else(|| {
                        Error::ArithmeticInconsistency(format!(
                            "column {} has no non-zero pivot, the system is singular",
                            col
                        ))
                    })?;
                self.rows.swap(pivot, swap);
            }
            for row in pivot + 1..k {
                if self.rows[row][col].is_zero() {
                    continue;
                }
                let lead = self.rows[pivot][col].clone();
                let factor = self.rows[row][col].clone();
                self.rows[row] = cross_eliminate(&self.rows[row], &lead, &self.rows[pivot], &factor);
            }
        }

        for pivot in (0..k).rev() {
            let col = pivot + 1;
            let quotient = self.divide(pivot, &self.rows[pivot][0], &self.rows[pivot][col])?;
            let mut normalized = vec![BigInt::zero(); k + 1];
            normalized[0] = quotient;
            normalized[col] = BigInt::one();

            for row in 0..pivot {
                let factor = self.rows[row][col].clone();
                if factor.is_zero() {
                    continue;
                }
                let mut reduced =
                    cross_eliminate(&self.rows[row], &BigInt::one(), &normalized, &factor);
                // under a modulus the constant column is kept non-negative
                if self.modulus.is_some() && reduced[0].is_negative() {
                    reduced =
                        cross_eliminate(&self.rows[row], &-BigInt::one(), &normalized, &-factor);
                }
                self.rows[row] = reduced;
            }
            self.rows[pivot] = normalized;
        }

        let modulus = self.modulus;
        Ok(self
            .rows
            .into_iter()
            .map(|row| {
                let value = row.into_iter().next().unwrap_or_else(BigInt::zero);
                match &modulus {
                    Some(m) => value.mod_floor(m),
                    None => value,
                }
            })
            .collect())
    }

    fn divide(&self, row: usize, numerator: &BigInt, divisor: &BigInt) -> Result<BigInt> {
        if divisor.is_zero() {
            return Err(Error::ArithmeticInconsistency(format!(
                "row {} has a zero pivot",
                row
            )));
        }
        let (quotient, remainder) = numerator.div_rem(divisor);
        if remainder.is_zero() {
            return Ok(quotient);
        }
        match &self.modulus {
            Some(modulus) => modular_divide(numerator, divisor, modulus),
            None => Err(Error::DivisionRemainder {
                row,
                numerator: numerator.clone(),
                divisor: divisor.clone(),
            }),
        }
    }
}

/// Recovers `k` coefficients of the polynomial through `points`, the secret first.
pub fn solve_polynomial(
    points: &[(BigInt, BigInt)],
    k: usize,
    modulus: Option<BigInt>,
) -> Result<Vec<BigInt>> {
    LinearSystemSolver::from_observations(points, k, modulus)?.solve()
}

/// `target * target_factor - source * source_factor`, column by column.
fn cross_eliminate(
    target: &[BigInt],
    target_factor: &BigInt,
    source: &[BigInt],
    source_factor: &BigInt,
) -> Vec<BigInt> {
    target
        .iter()
        .zip(source)
        .map(|(t, s)| t * target_factor - s * source_factor)
        .collect()
}

/// Finds the smallest `j >= 1` with `divisor | numerator + j*modulus` and
/// returns the quotient reduced by the modulus.
fn modular_divide(numerator: &BigInt, divisor: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    let mut candidate = numerator.clone();
    for _ in 0..MODULAR_DIVISION_RETRY_LIMIT {
        candidate += modulus;
        let (quotient, remainder) = candidate.div_rem(divisor);
        if remainder.is_zero() {
            return Ok(quotient.mod_floor(modulus));
        }
    }

    trace!(
        divisor_bits = divisor.bits(),
        "modular division search exhausted, solving for the multiple directly"
    );
    // divisor | numerator + j*modulus  <=>  j*(modulus/g) = -numerator/g  (mod |divisor|/g)
    let exhausted = || Error::RetryExhausted {
        numerator: numerator.clone(),
        divisor: divisor.clone(),
    };
    let magnitude = divisor.abs();
    let (g, _, _) = Util::extend_gcd(modulus, &magnitude);
    let g = g.abs();
    let negated = -numerator;
    if !negated.is_multiple_of(&g) {
        return Err(exhausted());
    }
    let reduced_divisor = &magnitude / &g;
    let inverse = Util::mod_inverse(&(modulus / &g), &reduced_divisor).ok_or_else(exhausted)?;
    let j = ((negated / &g) * inverse).mod_floor(&reduced_divisor);

    let (quotient, remainder) = (numerator + j * modulus).div_rem(divisor);
    if !remainder.is_zero() {
        return Err(exhausted());
    }
    Ok(quotient.mod_floor(modulus))
}
