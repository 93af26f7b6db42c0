//! Immutable matching automaton
//!
//! The five frozen arrays (`base`, `check`, `fail`, `output`, `lengths`)
//! plus the value table are everything matching needs. Nothing here is ever
//! mutated after construction, so an [`Automaton`] can be shared across any
//! number of concurrent scans; per-scan state is two stack-local integers.

use std::fmt;

use crate::builder::AutomatonBuilder;
use crate::error::Result;

/// A single match: `[begin, end)` in 0-based character offsets, plus the
/// bound value. `end - begin` always equals the matched keyword's character
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a, V> {
    /// The beginning offset, inclusive.
    pub begin: usize,
    /// The ending offset, exclusive.
    pub end: usize,
    /// The value bound to the matched keyword.
    pub value: &'a V,
}

impl<V: fmt::Display> fmt::Display for Hit<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]={}", self.begin, self.end, self.value)
    }
}

/// The frozen arrays of an [`Automaton`], exposed so callers can persist
/// and later restore them without rebuilding. The serialization format
/// itself is the caller's business.
///
/// [`Automaton::from_parts`] performs no validation; restoring corrupted
/// parts makes matching behavior undefined. Run
/// [`validate_structure`](crate::validation::validate_structure) on
/// untrusted input first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutomatonParts<V> {
    /// Double-array `base`: per-state placement offset, or a negative
    /// terminal marker `-(keyword index) - 1` on leaf slots.
    pub base: Vec<i32>,
    /// Double-array `check`: owning `base` value of each used slot, 0 when
    /// the slot is free.
    pub check: Vec<i32>,
    /// State index -> failure state index.
    pub fail: Vec<u32>,
    /// State index -> keyword indices recognized in that state.
    pub output: Vec<Vec<u32>>,
    /// Keyword index -> keyword length in characters.
    pub lengths: Vec<u32>,
    /// Keyword index -> bound value.
    pub values: Vec<V>,
}

/// Immutable Aho-Corasick automaton over a double-array trie.
///
/// Built once from a keyword→value dictionary via [`AutomatonBuilder`] or
/// [`Automaton::build`]; thereafter read-only. Scanning visits each input
/// character exactly once regardless of dictionary size.
///
/// # Example
///
/// ```
/// use acdat::Automaton;
/// use std::collections::BTreeMap;
///
/// let mut dictionary = BTreeMap::new();
/// for word in ["hers", "his", "she", "he"] {
///     dictionary.insert(word, word.to_uppercase());
/// }
/// let automaton = Automaton::build(dictionary)?;
///
/// let hits = automaton.parse_text("uhers");
/// let spans: Vec<_> = hits.iter().map(|h| (h.begin, h.end)).collect();
/// assert_eq!(spans, vec![(1, 3), (1, 5)]);
/// assert_eq!(hits[1].value, "HERS");
/// # Ok::<(), acdat::AcdatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Automaton<V> {
    pub(crate) base: Vec<i32>,
    pub(crate) check: Vec<i32>,
    pub(crate) fail: Vec<u32>,
    pub(crate) output: Vec<Vec<u32>>,
    pub(crate) lengths: Vec<u32>,
    pub(crate) values: Vec<V>,
}

impl<V> Automaton<V> {
    /// Build from an ordered keyword→value mapping. Iteration order decides
    /// keyword-index assignment and therefore the report order of
    /// co-terminating matches.
    ///
    /// An empty dictionary is valid: the resulting automaton matches
    /// nothing, for any input.
    pub fn build<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        let mut builder = AutomatonBuilder::new();
        for (keyword, value) in entries {
            builder.insert(keyword.as_ref(), value);
        }
        builder.build()
    }

    /// Number of keywords in the dictionary.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of slots in the frozen transition table.
    pub fn transition_table_len(&self) -> usize {
        self.check.len()
    }

    /// Scan `text` and collect every match in text order.
    ///
    /// Matches are ordered by end position; co-terminating keywords appear
    /// in output-table order (a state's own emissions before inherited
    /// ones, each run in descending keyword-index order).
    pub fn parse_text(&self, text: &str) -> Vec<Hit<'_, V>> {
        let mut hits = Vec::new();
        self.scan(text, |begin, end, index| {
            hits.push(Hit {
                begin,
                end,
                value: &self.values[index as usize],
            });
            true
        });
        hits
    }

    /// Scan `text`, delivering each match to `handler` as it is found.
    pub fn parse_text_with<F>(&self, text: &str, mut handler: F)
    where
        F: FnMut(usize, usize, &V),
    {
        self.scan(text, |begin, end, index| {
            handler(begin, end, &self.values[index as usize]);
            true
        });
    }

    /// Like [`parse_text_with`](Self::parse_text_with), but the handler
    /// returns `true` to continue and `false` to stop the scan immediately,
    /// leaving the rest of the text unexamined.
    pub fn parse_text_cancellable<F>(&self, text: &str, mut handler: F)
    where
        F: FnMut(usize, usize, &V) -> bool,
    {
        self.scan(text, |begin, end, index| {
            handler(begin, end, &self.values[index as usize])
        });
    }

    /// Callback scan that also passes the keyword's dense index, usable as
    /// a perfect hash into caller-side tables.
    pub fn parse_text_indexed<F>(&self, text: &str, mut handler: F)
    where
        F: FnMut(usize, usize, &V, usize),
    {
        self.scan(text, |begin, end, index| {
            handler(begin, end, &self.values[index as usize], index as usize);
            true
        });
    }

    /// Whether `text` contains at least one keyword. Short-circuits on the
    /// first hit.
    pub fn matches(&self, text: &str) -> bool {
        let mut found = false;
        self.scan(text, |_, _, _| {
            found = true;
            false
        });
        found
    }

    /// First match in `text`, or `None`. "First" means smallest end
    /// position; among keywords sharing that end position, the one inserted
    /// earliest into the dictionary wins.
    pub fn find_first(&self, text: &str) -> Option<Hit<'_, V>> {
        let mut found: Option<(usize, usize, u32)> = None;
        self.scan(text, |begin, end, index| match found {
            None => {
                found = Some((begin, end, index));
                true
            }
            Some((_, first_end, best)) if end == first_end => {
                if index < best {
                    found = Some((begin, end, index));
                }
                true
            }
            Some(_) => false,
        });
        found.map(|(begin, end, index)| Hit {
            begin,
            end,
            value: &self.values[index as usize],
        })
    }

    /// Exact-match lookup of a whole keyword, returning its dense index and
    /// value. Walks `base`/`check` without failure links and reads the
    /// negative terminal marker at the final state; prefixes and extensions
    /// of keywords miss. A keyword inserted more than once resolves to its
    /// latest index.
    pub fn exact_match(&self, keyword: &str) -> Option<(usize, &V)> {
        let mut b = self.base.first().copied()?;
        for ch in keyword.chars() {
            let slot = usize::try_from(i64::from(b) + i64::from(ch as u32) + 1).ok()?;
            if self.check.get(slot).copied()? != b {
                return None;
            }
            b = self.base[slot];
        }
        let slot = usize::try_from(b).ok()?;
        let marker = self.base.get(slot).copied()?;
        if self.check[slot] == b && marker < 0 {
            let index = (-marker - 1) as usize;
            Some((index, &self.values[index]))
        } else {
            None
        }
    }

    /// Value bound to `keyword`, if the dictionary contains it exactly.
    pub fn get(&self, keyword: &str) -> Option<&V> {
        self.exact_match(keyword).map(|(_, value)| value)
    }

    /// Disassemble into the frozen arrays for external persistence.
    pub fn into_parts(self) -> AutomatonParts<V> {
        AutomatonParts {
            base: self.base,
            check: self.check,
            fail: self.fail,
            output: self.output,
            lengths: self.lengths,
            values: self.values,
        }
    }

    /// Reassemble from previously exported parts.
    ///
    /// The double-array invariant is a precondition, not checked here; see
    /// [`AutomatonParts`].
    pub fn from_parts(parts: AutomatonParts<V>) -> Self {
        Self {
            base: parts.base,
            check: parts.check,
            fail: parts.fail,
            output: parts.output,
            lengths: parts.lengths,
            values: parts.values,
        }
    }

    #[cfg(test)]
    pub(crate) fn base_slice(&self) -> &[i32] {
        &self.base
    }

    #[cfg(test)]
    pub(crate) fn check_slice(&self) -> &[i32] {
        &self.check
    }

    /// The shared transition-walking loop behind every public operation.
    ///
    /// `handler` receives `(begin, end, keyword index)` per match and
    /// returns whether to keep scanning. Positions are 1-based internally;
    /// `begin = position - length` lands back on 0-based offsets.
    fn scan<F>(&self, text: &str, mut handler: F)
    where
        F: FnMut(usize, usize, u32) -> bool,
    {
        let mut state = 0usize;
        let mut position = 0usize;
        for ch in text.chars() {
            state = self.next_state(state, ch as u32);
            position += 1;
            let emitted = match self.output.get(state) {
                Some(indices) => indices.as_slice(),
                None => &[],
            };
            for &index in emitted {
                let begin = position - self.lengths[index as usize] as usize;
                if !handler(begin, position, index) {
                    return;
                }
            }
        }
    }

    /// Follow the failure chain until a defined transition on `code`
    /// resolves. The root transitions to itself on undefined input, so this
    /// always terminates in a valid state.
    #[inline]
    fn next_state(&self, mut state: usize, code: u32) -> usize {
        loop {
            if let Some(next) = self.transition_with_root(state, code) {
                return next;
            }
            state = self.fail[state] as usize;
        }
    }

    /// One double-array transition: candidate slot `base[state] + code + 1`
    /// is taken iff its `check` entry points back at `base[state]`. The
    /// root self-loops instead of failing; any other state reports no
    /// transition. The table is trimmed to its exact used size, so the
    /// candidate is bounds-checked rather than padded for.
    #[inline]
    fn transition_with_root(&self, state: usize, code: u32) -> Option<usize> {
        let b = self.base.get(state).copied().unwrap_or(0);
        let candidate = usize::try_from(i64::from(b) + i64::from(code) + 1).ok();
        let next = candidate.filter(|&slot| self.check.get(slot).copied() == Some(b));
        match next {
            Some(slot) => Some(slot),
            None if state == 0 => Some(0),
            None => None,
        }
    }
}
