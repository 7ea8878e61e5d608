// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::identities::{One, Zero};

pub struct Util {}

impl Util {
    /// Finds *g* = gcd(*a*, *b*) together with Bézout coefficients *x*, *y*
    /// such that *ax* + *by* = *g*.
    ///
    /// Iterative form of the [extended Euclidean
    /// algorithm](https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm),
    /// so large moduli do not recurse once per quotient step.
    pub fn extend_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
        let (mut old_r, mut r) = (a.clone(), b.clone());
        let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
        let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

        while !r.is_zero() {
            let quotient = &old_r / &r;
            let next_r = &old_r - &quotient * &r;
            old_r = std::mem::replace(&mut r, next_r);
            let next_s = &old_s - &quotient * &s;
            old_s = std::mem::replace(&mut s, next_s);
            let next_t = &old_t - &quotient * &t;
            old_t = std::mem::replace(&mut t, next_t);
        }
        (old_r, old_s, old_t)
    }

    /// Calculates the [modular multiplicative
    /// inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse) *x*
    /// of an integer *a* such that *ax* ≡ 1 (mod *m*), normalized into `[0, m)`.
    ///
    /// Returns `None` when *a* and *m* are not coprime.
    pub fn mod_inverse(a: &BigInt, modular: &BigInt) -> Option<BigInt> {
        let (g, x, _) = Util::extend_gcd(&a.mod_floor(modular), modular);
        if g != BigInt::one() {
            None
        } else {
            Some(x.mod_floor(modular))
        }
    }

    /// `n!` as an exact big integer.
    pub fn factorial(n: u64) -> BigInt {
        (2..=n).fold(BigInt::one(), |acc, i| acc * BigInt::from(i))
    }

    /// Binomial coefficient `n! / (k! * (n-k)!)` from full factorials.
    pub fn binomial(n: u64, k: u64) -> BigInt {
        if k > n {
            return BigInt::zero();
        }
        Util::factorial(n) / (Util::factorial(k) * Util::factorial(n - k))
    }
}
