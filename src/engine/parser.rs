//! Parser session facade
//!
//! A [`ParserSession`] drives the DFA tokenizer and the LALR engine over
//! one source, one step at a time. Each [`ParserSession::step`] advances
//! exactly one token read or one reduction and reports the outcome as a
//! [`ParseMessage`]; [`ParserSession::parse_to_end`] loops until the
//! session accepts or stops on an error.
//!
//! The immutable grammar model is borrowed and may back any number of
//! concurrent sessions; all mutable parse state (LALR stack, group
//! nesting, cursor, tree arena) is owned by the session exclusively.
//! Cancellation is cooperative: stop calling `step`.

use super::codes::ParseMessage;
use super::error::LexError;
use super::grammar::{GrammarModel, SymbolId};
use super::lalr::{LalrEngine, LalrOutcome};
use super::source::{CharSource, Position, StrSource};
use super::tokenizer::Tokenizer;
use super::tree::{ParseTree, TreeArena, TreeNode};
use crate::engine::log_debug;

/// Immutable per-session configuration
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Elide reductions of rules with a single nonterminal on the right,
    /// substituting the child directly (smaller trees, same meaning)
    pub trim_reductions: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trim_reductions: false,
        }
    }
}

/// Lifecycle state of a session
///
/// `Shifting` and `Reducing` are transient within one step and collapse
/// back to `Ready` before the step returns; `Accepted` and `Errored` are
/// terminal. A lexical error leaves the session `Ready` because the
/// offending character was consumed and the caller may step past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next step
    Ready,
    /// Pushing a token (transient)
    Shifting,
    /// Performing a reduction (transient)
    Reducing,
    /// Input accepted; the result is available
    Accepted,
    /// A terminal error occurred
    Errored,
}

/// Receiver for per-step diagnostic events
///
/// Implemented for any `FnMut(ParseMessage, Position, &str)` closure.
pub trait DiagnosticSink {
    /// Called once per emitted message with the cursor position and a
    /// short human-readable detail.
    fn report(&mut self, message: ParseMessage, position: Position, detail: &str);
}

impl<F: FnMut(ParseMessage, Position, &str)> DiagnosticSink for F {
    fn report(&mut self, message: ParseMessage, position: Position, detail: &str) {
        self(message, position, detail)
    }
}

/// One parse in progress over one character source
pub struct ParserSession<'m, S> {
    model: &'m GrammarModel,
    tokenizer: Tokenizer<'m, S>,
    engine: LalrEngine<'m>,
    arena: TreeArena,
    state: SessionState,
    lookahead: Option<(SymbolId, TreeNode)>,
    last_message: Option<ParseMessage>,
    expected: Vec<SymbolId>,
    sink: Option<Box<dyn DiagnosticSink + 'm>>,
}

impl<'m> ParserSession<'m, StrSource<'m>> {
    /// Create a session over an in-memory string.
    pub fn from_str(model: &'m GrammarModel, input: &'m str) -> Self {
        Self::new(model, StrSource::new(input))
    }
}

impl<'m, S: CharSource> ParserSession<'m, S> {
    /// Create a session with the default configuration.
    pub fn new(model: &'m GrammarModel, source: S) -> Self {
        Self::with_config(model, source, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(model: &'m GrammarModel, source: S, config: SessionConfig) -> Self {
        Self {
            model,
            tokenizer: Tokenizer::new(model, source),
            engine: LalrEngine::new(model, config.trim_reductions),
            arena: TreeArena::new(),
            state: SessionState::Ready,
            lookahead: None,
            last_message: None,
            expected: Vec::new(),
            sink: None,
        }
    }

    /// Install a diagnostics sink receiving every emitted message.
    pub fn set_sink(&mut self, sink: impl DiagnosticSink + 'm) {
        self.sink = Some(Box::new(sink));
    }

    /// The grammar model backing this session.
    #[inline]
    pub fn model(&self) -> &'m GrammarModel {
        self.model
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current cursor position in the source.
    #[inline]
    pub fn position(&self) -> Position {
        self.tokenizer.position()
    }

    /// Symbols that would have been accepted at the last syntax error.
    #[inline]
    pub fn expected_symbols(&self) -> &[SymbolId] {
        &self.expected
    }

    /// The accepted parse tree; `None` unless the session accepted.
    pub fn result(&self) -> Option<ParseTree<'_>> {
        if self.state != SessionState::Accepted {
            return None;
        }
        self.engine
            .result()
            .map(|root| ParseTree::new(&self.arena, root))
    }

    /// Advance by exactly one token read or reduction.
    ///
    /// Terminal sessions (accepted or errored) return their final message
    /// again without doing any work.
    pub fn step(&mut self) -> ParseMessage {
        if matches!(self.state, SessionState::Accepted | SessionState::Errored) {
            return self.last_message.unwrap_or(ParseMessage::InternalError);
        }
        if !self.model.is_loaded() {
            return self.fail(
                ParseMessage::NotLoadedError,
                "grammar model has no tables loaded".to_string(),
            );
        }

        if self.lookahead.is_none() {
            match self.read_lookahead() {
                Ok(()) => {}
                Err(message) => return message,
            }
        }
        let Some((symbol, node)) = self.lookahead else {
            return self.fail(
                ParseMessage::InternalError,
                "lookahead unavailable after read".to_string(),
            );
        };

        match self.engine.step(symbol, node, &mut self.arena) {
            LalrOutcome::Shift => {
                self.state = SessionState::Shifting;
                self.lookahead = None;
                let detail = self
                    .arena
                    .token_text(node)
                    .unwrap_or_default()
                    .to_string();
                self.state = SessionState::Ready;
                self.emit(ParseMessage::TokenRead, &detail)
            }
            LalrOutcome::Reduction => {
                self.state = SessionState::Reducing;
                let detail = format!("reduced to {}", self.describe_top());
                self.state = SessionState::Ready;
                self.emit(ParseMessage::Reduction, &detail)
            }
            LalrOutcome::Accept => {
                self.state = SessionState::Accepted;
                self.last_message = Some(ParseMessage::Accept);
                self.report(ParseMessage::Accept, "input accepted");
                ParseMessage::Accept
            }
            LalrOutcome::SyntaxError { expected } => {
                let names: Vec<&str> = expected
                    .iter()
                    .map(|&id| self.model.symbol_name(id))
                    .collect();
                let detail = format!(
                    "unexpected {}; expected one of: {}",
                    self.model.symbol_name(symbol),
                    names.join(", ")
                );
                self.expected = expected;
                self.fail(ParseMessage::SyntaxError, detail)
            }
            LalrOutcome::InternalError { detail } => {
                log_debug!(
                    "internal error at depth {}: {}",
                    self.engine.stack_depth(),
                    detail
                );
                self.fail(ParseMessage::InternalError, detail)
            }
        }
    }

    /// Run until the session accepts or stops on an error.
    ///
    /// Stops at the first lexical error too; the session stays steppable
    /// there, so a caller wanting report-and-skip can call again.
    pub fn parse_to_end(&mut self) -> ParseMessage {
        loop {
            let message = self.step();
            if !message.is_continuable() {
                return message;
            }
        }
    }

    /// Pull tokens until a shiftable one is buffered, skipping noise.
    fn read_lookahead(&mut self) -> Result<(), ParseMessage> {
        loop {
            match self.tokenizer.next_token() {
                Ok(Some(token)) if token.discardable => {
                    log_debug!("skipping noise token {:?}", token.text);
                }
                Ok(Some(token)) => {
                    let node =
                        self.arena
                            .token(token.symbol, &token.text, token.start, token.end);
                    self.lookahead = Some((token.symbol, node));
                    return Ok(());
                }
                Ok(None) => {
                    let Some(end) = self.model.end_symbol() else {
                        return Err(self.fail(
                            ParseMessage::InternalError,
                            "table declares no END symbol".to_string(),
                        ));
                    };
                    let offset = self.tokenizer.position().offset;
                    let node = self.arena.token(end, "", offset, offset);
                    self.lookahead = Some((end, node));
                    return Ok(());
                }
                Err(err @ LexError::UnrecognizedToken { .. }) => {
                    // The bad character was consumed; session stays Ready
                    // so the caller may report and continue past it.
                    let detail = err.to_string();
                    return Err(self.emit(ParseMessage::LexicalError, &detail));
                }
                Err(err @ LexError::UnterminatedGroup { .. }) => {
                    return Err(self.fail(ParseMessage::GroupError, err.to_string()));
                }
            }
        }
    }

    fn describe_top(&self) -> String {
        format!("state {}", self.engine.current_state())
    }

    /// Emit a non-fatal message.
    fn emit(&mut self, message: ParseMessage, detail: &str) -> ParseMessage {
        self.last_message = Some(message);
        self.report(message, detail);
        message
    }

    /// Emit a message and move the session to its terminal error state.
    fn fail(&mut self, message: ParseMessage, detail: String) -> ParseMessage {
        self.state = SessionState::Errored;
        self.last_message = Some(message);
        self.report(message, &detail);
        message
    }

    fn report(&mut self, message: ParseMessage, detail: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report(message, self.tokenizer.position(), detail);
        }
    }
}
