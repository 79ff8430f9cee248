use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ConfigError;

/// Longest candidate a rule may ask for.
pub const MAX_RULE_LENGTH: usize = 64;

/// Default number of generated candidates kept per run.
pub const DEFAULT_GENERATION_CAP: usize = 10_000;

/// Upper bound accepted for `--generate-cap`.
pub const MAX_GENERATION_CAP: usize = 1_000_000;

/// A `min:max:alphabet` password generation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRule {
    pub min_len: usize,
    pub max_len: usize,
    pub alphabet: Vec<char>,
}

impl FromStr for GenerationRule {
    type Err = ConfigError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigError::InvalidRule {
            rule: rule.to_string(),
            reason,
        };

        let fields: Vec<&str> = rule.split(':').collect();
        if fields.len() != 3 {
            return Err(invalid(format!("expected 3 fields, found {}", fields.len())));
        }

        let min_len = fields[0]
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(format!("minimum length '{}' is not a number", fields[0])))?;
        let max_len = fields[1]
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(format!("maximum length '{}' is not a number", fields[1])))?;
        let alphabet: Vec<char> = fields[2].chars().collect();

        if min_len > max_len {
            return Err(invalid(format!("minimum length {} exceeds maximum {}", min_len, max_len)));
        }
        if max_len > MAX_RULE_LENGTH {
            return Err(invalid(format!("maximum length is limited to {}", MAX_RULE_LENGTH)));
        }
        if alphabet.is_empty() {
            return Err(invalid("alphabet is empty".to_string()));
        }

        Ok(GenerationRule { min_len, max_len, alphabet })
    }
}

impl fmt::Display for GenerationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alphabet: String = self.alphabet.iter().collect();
        write!(f, "{}:{}:{}", self.min_len, self.max_len, alphabet)
    }
}

impl GenerationRule {
    /// Number of candidates of each length, saturating at `u128::MAX`.
    fn counts_per_length(&self) -> Vec<u128> {
        let radix = self.alphabet.len() as u128;
        (self.min_len..=self.max_len)
            .map(|len| radix.checked_pow(len as u32).unwrap_or(u128::MAX))
            .collect()
    }

    /// Size of the whole candidate space, saturating.
    pub fn space_size(&self) -> u128 {
        self.counts_per_length()
            .iter()
            .fold(0u128, |acc, count| acc.saturating_add(*count))
    }

    /// Produces up to `cap` candidates in random order.
    ///
    /// Small spaces are enumerated completely and shuffled. Larger ones are
    /// sampled without replacement, so memory never grows past `cap` entries.
    pub fn generate<R: Rng + ?Sized>(&self, cap: usize, rng: &mut R) -> Vec<String> {
        let counts = self.counts_per_length();
        let total = self.space_size();

        if total <= cap as u128 {
            let mut all = Vec::with_capacity(total as usize);
            for (offset, count) in counts.iter().enumerate() {
                let len = self.min_len + offset;
                for index in 0..*count {
                    all.push(self.decode(len, index));
                }
            }
            all.shuffle(rng);
            return all;
        }

        let mut picked = HashSet::with_capacity(cap);
        let mut out = Vec::with_capacity(cap);
        while out.len() < cap {
            let index = rng.gen_range(0..total);
            if picked.insert(index) {
                out.push(self.nth(index, &counts));
            }
        }
        out
    }

    /// Maps a global index onto (length, index within that length).
    fn nth(&self, mut index: u128, counts: &[u128]) -> String {
        for (offset, count) in counts.iter().enumerate() {
            if index < *count {
                return self.decode(self.min_len + offset, index);
            }
            index -= count;
        }
        // Unreachable for index < space_size(); fall back to the longest length.
        self.decode(self.max_len, index)
    }

    /// Decodes `index` as a base-|alphabet| number of exactly `len` digits.
    fn decode(&self, len: usize, mut index: u128) -> String {
        let radix = self.alphabet.len() as u128;
        let mut chars = vec![self.alphabet[0]; len];
        for slot in chars.iter_mut().rev() {
            *slot = self.alphabet[(index % radix) as usize];
            index /= radix;
        }
        chars.into_iter().collect()
    }
}
