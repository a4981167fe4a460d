//! Goldengine - Table-Driven Parsing Engine for Compiled Grammar Tables
//!
//! This library loads GOLD Parser compiled grammar tables (the CGT and EGT
//! binary formats) and parses input with them. It provides:
//! - Binary table deserialization with strict alignment checking
//! - An immutable, shareable grammar model (symbols, rules, DFA states,
//!   LALR states, character sets, lexical groups)
//! - A maximal-munch DFA tokenizer with nested lexical group support
//! - A deterministic LALR shift-reduce engine producing reduction trees
//! - A step-by-step parser session API with a diagnostics callback
//! - Arena allocation for parse trees
//! - Table analysis warnings and debugging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use goldengine::engine::{load_tables, ParseMessage, ParserSession};
//!
//! let bytes = std::fs::read("MyLanguage.egt")?;
//! let model = load_tables(&bytes)?;
//!
//! let mut session = ParserSession::from_str(&model, "1 + 2 + 3");
//! match session.parse_to_end() {
//!     ParseMessage::Accept => {
//!         let tree = session.result().unwrap();
//!         // walk tree.root() / tree.children(..)
//!     }
//!     other => eprintln!("parse stopped: {other}"),
//! }
//! ```
//!
//! The model is immutable once loaded and can back any number of
//! concurrent sessions; each session owns its own mutable state.
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
// Allow some pedantic lints that are too noisy
#![allow(clippy::module_inception)]
#![allow(clippy::redundant_closure)]

// Prelude module for convenient imports
pub mod prelude;

// Core engine
pub mod engine;

/// Re-export commonly used types for convenience
pub use engine::{
    // Analysis
    analysis::{GrammarAnalyzer, GrammarWarning, WarningKind},
    // Debug tools
    debug::{GrammarSummary, TreePrinter},
    // Loading
    load_tables,
    FormatError,
    GrammarModel,
    LexError,
    // Parsing
    ParseMessage,
    ParseTree,
    ParserSession,
    SessionConfig,
    SessionState,
    TableReader,
    Token,
    Tokenizer,
    TreeArena,
    TreeNode,
};
