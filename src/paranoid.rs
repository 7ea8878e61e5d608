// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Cross checking of share sets by solving many `k`-subsets.
//!
//! If every subset recovers the same secret the shares are consistent. More
//! than one distinct answer means at least one share is wrong, although the
//! tally alone does not say which. A subset that cannot be solved at all
//! (without a modulus a wrong share usually makes the coefficients
//! fractional) is counted as failed, which also rules out agreement.
//!
//! Subsets are solved in parallel batches, but tallied strictly in
//! enumeration order, so the counts, samples and early exit point are the
//! same as for a sequential run.

use num_bigint::BigInt;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::combination::CombinationGenerator;
use crate::error::{Error, Result};
use crate::secretshare::SecretShare;
use crate::share::ShareInfo;

pub const DEFAULT_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParanoidConfig {
    /// Stop after this many subsets, `None` tests all of them.
    pub max_combinations_to_test: Option<u64>,
    /// Stop as soon as one answer has been seen this many times.
    pub stop_when_any_answer_seen_count: Option<u64>,
    /// How many of the first subsets are kept in [`ParanoidResult::samples`].
    pub limit_printed_samples: u32,
    /// Subsets solved per parallel batch, 1 runs sequentially.
    pub batch_size: usize,
}

impl Default for ParanoidConfig {
    fn default() -> Self {
        ParanoidConfig {
            max_combinations_to_test: None,
            stop_when_any_answer_seen_count: None,
            limit_printed_samples: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Parses `<max>[,limitPrint=<n>][,stopCombiningWhenAnyCount=<n>][,batchSize=<n>]`,
/// where `<max>` is a count or `all`.
impl FromStr for ParanoidConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut config = ParanoidConfig::default();
        let mut parts = s.split(',').map(str::trim);

        let max = parts.next().unwrap_or_default();
        if !max.eq_ignore_ascii_case("all") {
            config.max_combinations_to_test = Some(parse_count(max, "maximum combinations")?);
        }

        for part in parts {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::InvalidInput(format!("expected key=value in paranoid option, got '{}'", part))
            })?;
            match key.trim() {
                "limitPrint" => {
                    let limit = parse_count(value, key)?;
                    config.limit_printed_samples = u32::try_from(limit).map_err(|_| {
                        Error::InvalidInput(format!("{} is too large, got {}", key, limit))
                    })?;
                }
                "stopCombiningWhenAnyCount" => {
                    config.stop_when_any_answer_seen_count = Some(parse_count(value, key)?);
                }
                "batchSize" => {
                    config.batch_size = (parse_count(value, key)? as usize).max(1);
                }
                other => {
                    return Err(Error::InvalidInput(format!(
                        "unknown paranoid option '{}'",
                        other
                    )))
                }
            }
        }
        Ok(config)
    }
}

fn parse_count(value: &str, what: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidInput(format!("{} must be a count, got '{}'", what, value)))
}

/// One tested subset, as recorded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParanoidSample {
    pub ordinal: u64,
    pub indexes: String,
    /// `None` when the subset could not be solved.
    pub secret: Option<BigInt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParanoidResult {
    pub total_combinations: BigInt,
    pub tested_count: u64,
    pub answer_tally: BTreeMap<BigInt, u64>,
    /// Tested subsets that did not solve to an integer polynomial.
    pub failed_count: u64,
    /// The secret when exactly one distinct answer was seen and no subset failed.
    pub agreed_answer: Option<BigInt>,
    pub samples: Vec<ParanoidSample>,
}

impl ParanoidResult {
    pub fn distinct_answers(&self) -> usize {
        self.answer_tally.len()
    }

    pub fn summary(&self) -> String {
        if self.agreed_answer.is_some() {
            return format!(
                "all {} tested combinations of {} agree",
                self.tested_count, self.total_combinations
            );
        }
        if self.tested_count == 0 {
            return format!("no combinations tested out of {}", self.total_combinations);
        }
        let failed = match self.failed_count {
            0 => String::new(),
            n => format!(" and {} unsolvable", n),
        };
        format!(
            "disagreement: {} distinct answers{} in {} tested combinations of {}",
            self.distinct_answers(),
            failed,
            self.tested_count,
            self.total_combinations
        )
    }
}

impl fmt::Display for ParanoidResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Runs the subset check for `engine` over `shares`.
///
/// The shares are validated like a normal combine first. Iteration stops
/// when `max_combinations_to_test` subsets were solved, when one answer
/// reaches `stop_when_any_answer_seen_count`, or when all subsets are done.
pub fn verify(
    engine: &SecretShare,
    shares: &[ShareInfo],
    config: &ParanoidConfig,
) -> Result<ParanoidResult> {
    let distinct = engine.validate(shares)?;
    let k = engine.public_info().k() as usize;
    let mut generator = CombinationGenerator::new(distinct, k)?;
    let total_combinations = generator.total_count().clone();
    debug!(
        total = %total_combinations,
        max = ?config.max_combinations_to_test,
        "paranoid combine started"
    );

    let batch_size = config.batch_size.max(1);
    let mut answer_tally: BTreeMap<BigInt, u64> = BTreeMap::new();
    let mut samples = Vec::new();
    let mut tested_count: u64 = 0;
    let mut failed_count: u64 = 0;

    'batches: loop {
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            if let Some(max) = config.max_combinations_to_test {
                if tested_count + batch.len() as u64 >= max {
                    break;
                }
            }
            match generator.next() {
                Some(subset) => batch.push((
                    generator.current_ordinal(),
                    generator.indexes_as_string(),
                    subset,
                )),
                None => break,
            }
        }
        if batch.is_empty() {
            break;
        }

        let answers: Vec<Result<BigInt>> = batch
            .par_iter()
            .map(|(_, _, subset)| engine.solve(subset).map(|combined| combined.secret))
            .collect();

        for ((ordinal, indexes, _), answer) in batch.into_iter().zip(answers) {
            tested_count += 1;
            let secret = match answer {
                Ok(secret) => {
                    trace!(ordinal, indexes = %indexes, "combination solved");
                    Some(secret)
                }
                Err(error) => {
                    trace!(ordinal, indexes = %indexes, %error, "combination failed");
                    failed_count += 1;
                    None
                }
            };

            if samples.len() < config.limit_printed_samples as usize {
                samples.push(ParanoidSample {
                    ordinal,
                    indexes,
                    secret: secret.clone(),
                });
            }
            let secret = match secret {
                Some(secret) => secret,
                None => continue,
            };
            let seen = answer_tally.entry(secret).or_insert(0);
            *seen += 1;
            if let Some(stop) = config.stop_when_any_answer_seen_count {
                if *seen >= stop {
                    break 'batches;
                }
            }
        }
    }

    let agreed_answer = if answer_tally.len() == 1 && failed_count == 0 {
        answer_tally.keys().next().cloned()
    } else {
        None
    };
    let result = ParanoidResult {
        total_combinations,
        tested_count,
        answer_tally,
        failed_count,
        agreed_answer,
        samples,
    };
    debug!(tested = result.tested_count, "{}", result.summary());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::PublicInfo;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn split_shares(n: u32, k: u32) -> (SecretShare, Vec<ShareInfo>) {
        let info = PublicInfo::new(Some(n), k, Some(BigInt::from(59561)), "").unwrap();
        let engine = SecretShare::new(info);
        let split = engine
            .split(&BigInt::from(45654), &mut StdRng::from_seed([3u8; 32]))
            .unwrap();
        (engine, split.into_shares())
    }

    fn corrupt(shares: &mut [ShareInfo], index: usize) {
        let share = &shares[index];
        // stays below the modulus and away from the other values
        let value = (share.value() + BigInt::from(1)) % BigInt::from(59561);
        shares[index] = ShareInfo::new(share.x(), value, share.public_info().clone()).unwrap();
    }

    #[test]
    fn test_all_combinations_agree() {
        let (engine, shares) = split_shares(6, 3);
        let result = engine
            .combine_paranoid(&shares, &ParanoidConfig::default())
            .unwrap();
        assert_eq!(result.total_combinations, BigInt::from(20));
        assert_eq!(result.tested_count, 20);
        assert_eq!(result.agreed_answer, Some(BigInt::from(45654)));
        assert_eq!(result.answer_tally.get(&BigInt::from(45654)), Some(&20));
        assert!(result.samples.is_empty());
        assert!(result.summary().starts_with("all 20"));
    }

    #[test]
    fn test_corrupted_share_disagrees() {
        let (engine, mut shares) = split_shares(5, 3);
        corrupt(&mut shares, 4);
        let result = engine
            .combine_paranoid(&shares, &ParanoidConfig::default())
            .unwrap();
        assert_eq!(result.tested_count, 10);
        assert_eq!(result.agreed_answer, None);
        assert!(result.distinct_answers() > 1);
        // the 4 subsets that avoid the last share all recover the secret
        assert_eq!(result.answer_tally.get(&BigInt::from(45654)), Some(&4));
        assert!(result.to_string().starts_with("disagreement"));
    }

    #[test]
    fn test_unsolvable_subsets_without_modulus() {
        let info = PublicInfo::new(Some(6), 3, None, "").unwrap();
        let engine = SecretShare::new(info);
        let coefficients = vec![BigInt::from(45654), BigInt::from(1000), BigInt::from(2000)];
        let mut shares = engine
            .split_from_coefficients(coefficients)
            .unwrap()
            .into_shares();
        // f(1) + 1 puts a fractional x^2 term into every subset holding x = 1
        let share = &shares[0];
        let value = share.value() + BigInt::from(1);
        shares[0] = ShareInfo::new(1, value, share.public_info().clone()).unwrap();

        let config = ParanoidConfig {
            limit_printed_samples: 20,
            ..ParanoidConfig::default()
        };
        let result = engine.combine_paranoid(&shares, &config).unwrap();
        assert_eq!(result.tested_count, 20);
        assert_eq!(result.failed_count, 10);
        assert_eq!(result.answer_tally.len(), 1);
        assert_eq!(result.answer_tally.get(&BigInt::from(45654)), Some(&10));
        assert_eq!(result.agreed_answer, None);
        assert_eq!(result.samples[0].indexes, "[0, 1, 2]");
        assert_eq!(result.samples[0].secret, None);
        assert_eq!(result.samples[10].indexes, "[1, 2, 3]");
        assert_eq!(result.samples[10].secret, Some(BigInt::from(45654)));
        assert_eq!(
            result.summary(),
            "disagreement: 1 distinct answers and 10 unsolvable in 20 tested combinations of 20"
        );
    }

    #[test]
    fn test_max_combinations() {
        let (engine, shares) = split_shares(6, 3);
        let config = ParanoidConfig {
            max_combinations_to_test: Some(7),
            limit_printed_samples: 3,
            batch_size: 4,
            ..ParanoidConfig::default()
        };
        let result = engine.combine_paranoid(&shares, &config).unwrap();
        assert_eq!(result.tested_count, 7);
        assert_eq!(result.samples.len(), 3);
        assert_eq!(result.samples[0].ordinal, 1);
        assert_eq!(result.samples[0].indexes, "[0, 1, 2]");
        assert_eq!(result.samples[2].indexes, "[0, 1, 4]");
        assert_eq!(result.samples[2].secret, Some(BigInt::from(45654)));
    }

    #[test]
    fn test_stop_when_answer_repeats() {
        let (engine, shares) = split_shares(6, 3);
        let config = ParanoidConfig {
            stop_when_any_answer_seen_count: Some(5),
            ..ParanoidConfig::default()
        };
        let result = engine.combine_paranoid(&shares, &config).unwrap();
        assert_eq!(result.tested_count, 5);
        assert_eq!(result.agreed_answer, Some(BigInt::from(45654)));
    }

    #[test]
    fn test_batching_matches_sequential() {
        let (engine, mut shares) = split_shares(7, 3);
        corrupt(&mut shares, 2);
        let sequential = ParanoidConfig {
            stop_when_any_answer_seen_count: Some(6),
            limit_printed_samples: 10,
            batch_size: 1,
            ..ParanoidConfig::default()
        };
        let batched = ParanoidConfig {
            batch_size: 16,
            ..sequential.clone()
        };
        assert_eq!(
            engine.combine_paranoid(&shares, &sequential).unwrap(),
            engine.combine_paranoid(&shares, &batched).unwrap()
        );
    }

    #[test]
    fn test_zero_max_tests_nothing() {
        let (engine, shares) = split_shares(4, 2);
        let config = ParanoidConfig {
            max_combinations_to_test: Some(0),
            ..ParanoidConfig::default()
        };
        let result = engine.combine_paranoid(&shares, &config).unwrap();
        assert_eq!(result.tested_count, 0);
        assert_eq!(result.agreed_answer, None);
        assert!(result.summary().starts_with("no combinations"));
    }

    #[test]
    fn test_config_from_str() {
        let config: ParanoidConfig = "110,limitPrint=4,stopCombiningWhenAnyCount=30"
            .parse()
            .unwrap();
        assert_eq!(config.max_combinations_to_test, Some(110));
        assert_eq!(config.limit_printed_samples, 4);
        assert_eq!(config.stop_when_any_answer_seen_count, Some(30));
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);

        let all: ParanoidConfig = "all, batchSize=0".parse().unwrap();
        assert_eq!(all.max_combinations_to_test, None);
        assert_eq!(all.batch_size, 1);

        assert!("ten".parse::<ParanoidConfig>().is_err());
        assert!("10,limitPrint".parse::<ParanoidConfig>().is_err());
        assert!("10,verbose=1".parse::<ParanoidConfig>().is_err());
        assert!(matches!(
            "10,limitPrint=4294967296".parse::<ParanoidConfig>(),
            Err(Error::InvalidInput(_))
        ));
        let widest: ParanoidConfig = "10,limitPrint=4294967295".parse().unwrap();
        assert_eq!(widest.limit_printed_samples, u32::MAX);
    }
}
