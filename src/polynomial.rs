// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::BigInt;
use num_traits::identities::{One, Zero};
use std::fmt;
use std::vec::Vec;

use crate::error::{Error, Result};

/// Secret Shares on Polynomial, (k,n) threshold scheme
/// f(x) = c_0*x^0 + c_1*x^1 + c_2*x^2 + ... + c_(k-1)*x^(k-1)
/// degree is k - 1
/// s = f(0) = c_0
/// s_i = f(i)
///
/// No modulus is applied here, callers reduce the evaluated value themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<BigInt>,
}

impl Polynomial {
    /// Build from coefficients ordered by ascending power, index 0 is the constant term.
    pub fn new(coefficients: Vec<BigInt>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::InvalidInput(
                "polynomial needs at least one coefficient".to_string(),
            ));
        }
        Ok(Polynomial { coefficients })
    }

    /// Same as [`Polynomial::new`] for coefficient lists that may have gaps.
    pub fn from_optional(coefficients: Vec<Option<BigInt>>) -> Result<Self> {
        let coefficients = coefficients
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                c.ok_or_else(|| Error::InvalidInput(format!("coefficient {} is missing", i)))
            })
            .collect::<Result<Vec<_>>>()?;
        Polynomial::new(coefficients)
    }

    pub fn coefficients(&self) -> &[BigInt] {
        &self.coefficients
    }

    /// Number of coefficients, which is the threshold k.
    pub fn degree_plus_one(&self) -> usize {
        self.coefficients.len()
    }

    /// The constant term c_0.
    pub fn constant(&self) -> &BigInt {
        &self.coefficients[0]
    }

    /// Get f(x) = value
    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        let mut x_power = BigInt::one();
        for coefficient in &self.coefficients {
            result += coefficient * &x_power;
            x_power *= x;
        }
        result
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(x) = ")?;
        for (i, c) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match i {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}*x", c)?,
                _ => write!(f, "{}*x^{}", c, i)?,
            }
        }
        Ok(())
    }
}
