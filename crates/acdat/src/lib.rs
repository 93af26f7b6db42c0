//! acdat - Aho-Corasick automaton over a double-array trie
//!
//! Build a compact automaton from a dictionary of keyword→value pairs, then
//! scan any text once and get every occurrence of every keyword — spans and
//! bound values, in text order — in time linear in the text and independent
//! of dictionary size.
//!
//! # Quick Start
//!
//! ```rust
//! use acdat::Automaton;
//! use std::collections::BTreeMap;
//!
//! // Any ordered keyword→value mapping works; iteration order assigns
//! // keyword indices.
//! let mut dictionary = BTreeMap::new();
//! dictionary.insert("he", 1);
//! dictionary.insert("hers", 2);
//! dictionary.insert("his", 3);
//! dictionary.insert("she", 4);
//!
//! let automaton = Automaton::build(dictionary)?;
//!
//! // Collect every match with its [begin, end) character span.
//! for hit in automaton.parse_text("ushers") {
//!     println!("[{}:{}] -> {}", hit.begin, hit.end, hit.value);
//! }
//!
//! // Or stream matches to a callback, short-circuit on membership, ...
//! assert!(automaton.matches("ushers"));
//! assert_eq!(automaton.find_first("ushers").map(|h| h.end), Some(4));
//! # Ok::<(), acdat::AcdatError>(())
//! ```
//!
//! # Architecture
//!
//! The dictionary is first loaded into an ephemeral keyword trie, then a
//! single build pass packs every node's transitions into two shared integer
//! arrays and wires Aho-Corasick failure links over them:
//!
//! ```text
//! keyword→value map ──> Keyword Trie ──> Packer (base/check placement)
//!                                          │
//!                                          ▼
//!                       Automaton  <── failure/output BFS
//!                 (base, check, fail, output, lengths, values)
//! ```
//!
//! The double-array encoding makes one transition a single indexed read and
//! compare (`check[base[s] + c + 1] == base[s]`) — no per-node hash maps,
//! no pointer chasing. The finished automaton is immutable and safe to
//! share across any number of threads; per-scan state is two stack-local
//! integers.
//!
//! Persistence of a built automaton is the caller's business: export the
//! frozen arrays with [`Automaton::into_parts`], restore with
//! [`Automaton::from_parts`] (enable the `serde` feature for ready-made
//! derives on [`AutomatonParts`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Runtime automaton and matching operations
pub mod automaton;
/// Automaton construction: trie packing and failure-link BFS
pub mod builder;
/// Error types
pub mod error;
/// Structural validation for restored automatons
pub mod validation;

mod trie;

pub use crate::automaton::{Automaton, AutomatonParts, Hit};
pub use crate::builder::AutomatonBuilder;
pub use crate::error::{AcdatError, Result};
pub use crate::validation::{validate_structure, AutomatonStats, ValidationResult};

/// Library version string
pub const ACDAT_VERSION: &str = env!("CARGO_PKG_VERSION");
