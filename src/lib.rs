// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Threshold secret sharing over big integers.
//!
//! A secret is split into `n` shares so that any `k` of them recover it
//! exactly while fewer reveal nothing. Shares, secrets and moduli travel as
//! checksum protected `bigintcs:` strings.

pub mod checksum;
pub mod combination;
pub mod error;
pub mod paranoid;
pub mod polynomial;
pub mod primes;
pub mod secretshare;
pub mod share;
pub mod solver;
pub mod util;

pub use checksum::BigIntChecksum;
pub use combination::CombinationGenerator;
pub use error::{Error, Result};
pub use paranoid::{ParanoidConfig, ParanoidResult, ParanoidSample};
pub use polynomial::Polynomial;
pub use secretshare::{combine, combine_paranoid, split, SecretShare};
pub use share::{CombineResult, PublicInfo, ShareInfo, SplitResult};
pub use solver::LinearSystemSolver;
