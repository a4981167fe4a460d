//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from goldengine.
//! Importing this module with a wildcard import brings the core types
//! into scope:
//!
//! ```
//! use goldengine::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Loading
//! - [`load_tables()`] - bytes to [`GrammarModel`] in one call
//! - [`TableReader`] - lazy binary record decoder
//! - [`FormatError`] - load-time error taxonomy
//!
//! ## Parsing
//! - [`ParserSession`] - step-by-step parse over one source
//! - [`SessionConfig`] / [`SessionState`] - session knobs and lifecycle
//! - [`ParseMessage`] - per-step outcome codes
//! - [`ParseTree`] / [`TreeNode`] / [`TreeArena`] - result trees
//! - [`Token`] / [`Tokenizer`] / [`LexError`] - the DFA tokenizer
//! - [`CharSource`] / [`StrSource`] - character input
//!
//! ## Diagnostics
//! - [`DiagnosticSink`] - parse-message callback
//! - [`GrammarWarning`] - table analysis warnings

// ============================================================================
// Loading
// ============================================================================

pub use crate::engine::{load_tables, FormatError, GrammarModel, TableReader, TableVersion};

// ============================================================================
// Parsing
// ============================================================================

pub use crate::engine::{
    CharSource, LexError, ParseMessage, ParseTree, ParserSession, SessionConfig, SessionState,
    StrSource, Token, Tokenizer, TreeArena, TreeNode,
};

// ============================================================================
// Diagnostics
// ============================================================================

pub use crate::engine::{DiagnosticSink, GrammarWarning, Position, WarningKind};
