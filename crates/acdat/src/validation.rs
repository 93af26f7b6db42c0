//! Structural validation for restored automatons
//!
//! Matching treats the double-array invariant as a precondition and never
//! re-checks it (spotting corruption per transition would cost more than
//! the transition). When an automaton comes back from an untrusted byte
//! stream via [`Automaton::from_parts`](crate::Automaton::from_parts),
//! run [`validate_structure`] on it first.

use crate::automaton::Automaton;
use crate::error::{AcdatError, Result};

/// Validation outcome: errors make the automaton unusable, warnings flag
/// oddities that matching tolerates.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Critical problems; any entry means matching behavior is undefined.
    pub errors: Vec<String>,
    /// Non-fatal oddities worth a look.
    pub warnings: Vec<String>,
    /// Statistics gathered during the walk.
    pub stats: AutomatonStats,
}

/// Statistics gathered while validating an automaton.
#[derive(Debug, Clone, Default)]
pub struct AutomatonStats {
    /// Transition-table length in slots.
    pub state_count: usize,
    /// Slots with a non-zero `check` entry.
    pub occupied_slots: usize,
    /// Slots holding a negative terminal marker.
    pub leaf_slots: usize,
    /// Number of keywords in the dictionary.
    pub keyword_count: usize,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: AutomatonStats::default(),
        }
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `Result`, folding all errors into one
    /// [`AcdatError::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AcdatError::Validation(self.errors.join("; ")))
        }
    }
}

/// Validate the frozen arrays of `automaton`.
///
/// Checks array lengths against each other, `fail` targets, `check`
/// back-references, terminal-marker and output keyword indices. Does not
/// prove full transition-graph equivalence to any dictionary; it catches
/// the corruption classes a broken restore produces.
pub fn validate_structure<V>(automaton: &Automaton<V>) -> ValidationResult {
    let mut result = ValidationResult::new();
    let size = automaton.check.len();
    let keywords = automaton.values.len();

    result.stats.state_count = size;
    result.stats.keyword_count = keywords;

    if automaton.base.len() != size {
        result.errors.push(format!(
            "base length {} != check length {}",
            automaton.base.len(),
            size
        ));
    }
    if automaton.fail.len() != size {
        result.errors.push(format!(
            "fail length {} != check length {}",
            automaton.fail.len(),
            size
        ));
    }
    if automaton.output.len() != size {
        result.errors.push(format!(
            "output length {} != check length {}",
            automaton.output.len(),
            size
        ));
    }
    if automaton.lengths.len() != keywords {
        result.errors.push(format!(
            "lengths table has {} entries for {} keywords",
            automaton.lengths.len(),
            keywords
        ));
    }
    if !result.errors.is_empty() {
        // Per-slot checks index across arrays; skip them on length mismatch.
        return result;
    }

    for slot in 0..size {
        let check = automaton.check[slot];
        if check != 0 {
            result.stats.occupied_slots += 1;
            // check[t] holds the owning begin: at least 1, at most t.
            if check < 0 || check as usize > slot {
                result.errors.push(format!(
                    "slot {}: check {} is not a plausible begin",
                    slot, check
                ));
            }
        }

        let fail = automaton.fail[slot] as usize;
        if fail >= size {
            result
                .errors
                .push(format!("slot {}: fail target {} out of table", slot, fail));
        }

        let base = automaton.base[slot];
        if base < 0 {
            result.stats.leaf_slots += 1;
            let index = (-(i64::from(base)) - 1) as usize;
            if index >= keywords {
                result.errors.push(format!(
                    "slot {}: terminal marker references keyword {} of {}",
                    slot, index, keywords
                ));
            }
        } else if check != 0 && base == 0 {
            result
                .warnings
                .push(format!("slot {}: occupied but base never finalized", slot));
        }

        for &index in &automaton.output[slot] {
            if index as usize >= keywords {
                result.errors.push(format!(
                    "slot {}: output references keyword {} of {}",
                    slot, index, keywords
                ));
            }
        }
    }

    result
}
