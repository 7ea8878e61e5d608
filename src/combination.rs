// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Lazy enumeration of the k-element subsets of a sequence.

use num_bigint::BigInt;
use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::util::Util;

/// Yields every `choice_size` subset of `items` in lexicographic order of the
/// selected indexes, starting with `[0, 1, .., k-1]`.
///
/// The generator is consumed as it goes and cannot be restarted.
#[derive(Debug, Clone)]
pub struct CombinationGenerator<T> {
    items: Vec<T>,
    choice_size: usize,
    indexes: Vec<usize>,
    last: Vec<usize>,
    total: BigInt,
    ordinal: u64,
    exhausted: bool,
}

impl<T: Clone> CombinationGenerator<T> {
    pub fn new(items: Vec<T>, choice_size: usize) -> Result<Self> {
        if choice_size < 1 {
            return Err(Error::InvalidInput(
                "combination size must be at least 1".to_string(),
            ));
        }
        if choice_size > items.len() {
            return Err(Error::InvalidInput(format!(
                "cannot choose {} out of {} items",
                choice_size,
                items.len()
            )));
        }

        let total = Util::binomial(items.len() as u64, choice_size as u64);
        Ok(CombinationGenerator {
            indexes: (0..choice_size).collect(),
            last: Vec::new(),
            items,
            choice_size,
            total,
            ordinal: 0,
            exhausted: false,
        })
    }

    /// `n! / (k! * (n-k)!)`, fixed at construction.
    pub fn total_count(&self) -> &BigInt {
        &self.total
    }

    /// 1-based ordinal of the subset returned last, 0 before the first one.
    pub fn current_ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Indexes of the subset returned last, e.g. `[0, 2, 3]`.
    pub fn indexes_as_string(&self) -> String {
        let selected: Vec<String> = self.last.iter().map(|i| i.to_string()).collect();
        format!("[{}]", selected.join(", "))
    }

    /// Like `next()` but reports exhaustion as [`Error::NoMoreElements`].
    pub fn try_next(&mut self) -> Result<Vec<T>> {
        self.next().ok_or(Error::NoMoreElements)
    }

    fn advance(&mut self) -> bool {
        let size = self.items.len();
        let k = self.choice_size;
        let mut position = k;
        while position > 0 {
            position -= 1;
            if self.indexes[position] < size - k + position {
                self.indexes[position] += 1;
                for right in position + 1..k {
                    self.indexes[right] = self.indexes[right - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl<T: Clone> Iterator for CombinationGenerator<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let subset = self.indexes.iter().map(|&i| self.items[i].clone()).collect();
        // `indexes` moves on to the successor, `last` keeps what was handed out
        self.last.clone_from(&self.indexes);
        self.exhausted = !self.advance();
        self.ordinal += 1;
        Some(subset)
    }
}

impl<T: Clone> FusedIterator for CombinationGenerator<T> {}
