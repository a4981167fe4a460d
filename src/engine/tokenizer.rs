//! DFA tokenizer with lexical group handling
//!
//! Walks the model's character-range DFA over a buffered character source
//! using the maximal-munch policy: keep extending while any edge matches,
//! then back up to the last accepting state. Lexical groups (strings,
//! comments) switch the tokenizer into content mode, where recognized
//! tokens only matter as group terminators or nested group openers; group
//! nesting is tracked as an explicit stack whose depth is bounded by the
//! input itself, since every push consumes at least one character.

use super::codes::{AdvanceMode, EndingMode};
use super::error::LexError;
use super::grammar::{GrammarModel, GroupId, StateId, SymbolId};
use super::source::{CharSource, Position, SourceBuffer};

/// One recognized token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Symbol of the token (terminal or group container)
    pub symbol: SymbolId,
    /// The matched text
    pub text: String,
    /// Byte offset where the token started
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
    /// Whether the parser should skip this token (noise symbols and
    /// groups whose content is discarded)
    pub discardable: bool,
}

/// An active group on the nesting stack
#[derive(Debug)]
struct GroupFrame {
    group: GroupId,
    text: String,
    start_offset: usize,
}

/// Result of one DFA walk from the initial state
#[derive(Debug, Clone, Copy)]
struct Scan {
    /// Accepted symbol and its length in characters, if any prefix matched
    accept: Option<(SymbolId, usize)>,
}

/// The tokenizer: a DFA walker plus the group nesting stack
///
/// Produces a lazy, finite token sequence; restart by constructing a new
/// tokenizer over a fresh source. `Ok(None)` means clean end of input.
#[derive(Debug)]
pub struct Tokenizer<'m, S> {
    model: &'m GrammarModel,
    source: SourceBuffer<S>,
    groups: Vec<GroupFrame>,
}

impl<'m, S: CharSource> Tokenizer<'m, S> {
    /// Create a tokenizer over `source` for `model`.
    pub fn new(model: &'m GrammarModel, source: S) -> Self {
        Self {
            model,
            source: SourceBuffer::new(source),
            groups: Vec::new(),
        }
    }

    /// Current cursor position, for diagnostics.
    #[inline]
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Recognize the next token.
    ///
    /// `Ok(None)` at clean end of input. `Err(UnrecognizedToken)` consumes
    /// the offending character, so the caller may report and step again to
    /// skip past it. `Err(UnterminatedGroup)` is terminal: end of input was
    /// reached inside a CLOSED group.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            if self.groups.is_empty() {
                match self.next_top_level()? {
                    TopLevel::Eof => return Ok(None),
                    TopLevel::Token(token) => return Ok(Some(token)),
                    TopLevel::GroupOpened => continue,
                }
            } else if let Some(token) = self.step_group()? {
                return Ok(Some(token));
            }
        }
    }

    fn next_top_level(&mut self) -> Result<TopLevel, LexError> {
        if self.source.at_end() {
            return Ok(TopLevel::Eof);
        }
        let start = self.source.offset();
        let scan = self.scan();
        let Some((symbol, length)) = scan.accept else {
            // No accepting state was ever reached: consume one character
            // as an error token and report it.
            let offset = self.source.offset();
            let character = self.source.consume().unwrap_or('\u{FFFD}');
            return Err(LexError::UnrecognizedToken { offset, character });
        };

        if let Some(group) = self.model.group_opened_by(symbol) {
            let (group_id, advance) = (group.id, group.advance);
            let consumed = match advance {
                AdvanceMode::Character => self.take(1),
                _ => self.take(length),
            };
            self.groups.push(GroupFrame {
                group: group_id,
                text: consumed,
                start_offset: start,
            });
            return Ok(TopLevel::GroupOpened);
        }

        let text = self.take(length);
        let kind = self
            .model
            .symbol(symbol)
            .map(|s| s.kind)
            .unwrap_or(super::codes::SymbolKind::Undefined);
        Ok(TopLevel::Token(Token {
            symbol,
            text,
            start,
            end: self.source.offset(),
            discardable: kind.is_noise(),
        }))
    }

    /// Advance the innermost active group by one token or character.
    ///
    /// Returns a finished outermost group as a token; `None` means more
    /// content remains (or a nested group closed into its parent).
    fn step_group(&mut self) -> Result<Option<Token>, LexError> {
        let current = match self.groups.last() {
            Some(frame) => frame.group,
            None => return Ok(None),
        };
        // Copy the group attributes out so no model borrow is held while
        // the source advances.
        let (advance, ending, end_symbol) = match self.model.group(current) {
            Some(g) => (g.advance, g.ending, g.end),
            None => (AdvanceMode::Token, EndingMode::Closed, None),
        };

        // OPEN groups end at a line break or end of input, neither of
        // which is consumed; the newline is re-lexed as ordinary input.
        let at_line_end = matches!(self.source.peek(0), Some('\n') | Some('\r'));
        if ending != EndingMode::Closed && (self.source.at_end() || at_line_end) {
            return Ok(self.finish_group(String::new()));
        }
        if self.source.at_end() {
            let name = self
                .model
                .group(current)
                .map(|g| g.name.clone())
                .unwrap_or_default();
            let start_offset = self.groups.last().map_or(0, |f| f.start_offset);
            return Err(LexError::UnterminatedGroup { group: name, start_offset });
        }

        let scan = self.scan();
        if let Some((symbol, length)) = scan.accept {
            if Some(symbol) == end_symbol {
                // Terminator found. Token advance appends its text
                // (inclusive span); character advance leaves it out
                // (exclusive span). Either way it is consumed.
                let text = self.take(length);
                let appended = match advance {
                    AdvanceMode::Character => String::new(),
                    _ => text,
                };
                return Ok(self.finish_group(appended));
            }
            let nested = self
                .model
                .group_opened_by(symbol)
                .map(|g| (g.id, g.advance));
            if let Some((nested_id, nested_advance)) = nested {
                let allowed = self
                    .model
                    .group(current)
                    .is_some_and(|g| g.can_nest(nested_id));
                if allowed {
                    let start = self.source.offset();
                    let consumed = match nested_advance {
                        AdvanceMode::Character => self.take(1),
                        _ => self.take(length),
                    };
                    self.groups.push(GroupFrame {
                        group: nested_id,
                        text: consumed,
                        start_offset: start,
                    });
                    return Ok(None);
                }
            }
            // Ordinary content: the advance mode decides how much of the
            // match is committed before the next look.
            let consumed = match advance {
                AdvanceMode::Character => self.take(1),
                _ => self.take(length),
            };
            self.append_to_top(&consumed);
            return Ok(None);
        }

        // Nothing recognizable here; inside a group that is plain content.
        let consumed = self.take(1);
        self.append_to_top(&consumed);
        Ok(None)
    }

    /// Pop the innermost group, folding `terminator` into its text.
    ///
    /// A nested group folds its whole text into its parent; the outermost
    /// group becomes the container token.
    fn finish_group(&mut self, terminator: String) -> Option<Token> {
        let mut frame = self.groups.pop()?;
        frame.text.push_str(&terminator);

        if let Some(parent) = self.groups.last_mut() {
            parent.text.push_str(&frame.text);
            return None;
        }

        let group = self.model.group(frame.group)?;
        let kind = self
            .model
            .symbol(group.container)
            .map(|s| s.kind)
            .unwrap_or(super::codes::SymbolKind::Undefined);
        Some(Token {
            symbol: group.container,
            text: frame.text,
            start: frame.start_offset,
            end: self.source.offset(),
            discardable: !group.produce_token || kind.is_noise(),
        })
    }

    fn append_to_top(&mut self, text: &str) {
        if let Some(frame) = self.groups.last_mut() {
            frame.text.push_str(text);
        }
    }

    /// Walk the DFA from the initial state over lookahead characters.
    ///
    /// Maximal munch: remembers the last accepting state passed through
    /// and its length; the cursor is not moved.
    fn scan(&mut self) -> Scan {
        let mut state = self.model.dfa_initial;
        let mut accept: Option<(SymbolId, usize)> = None;
        let mut length = 0usize;

        while let Some(ch) = self.source.peek(length) {
            let Some(next) = self.dfa_step(state, ch) else {
                break;
            };
            state = next;
            length += 1;
            if let Some(symbol) = self
                .model
                .dfa_states
                .get(state as usize)
                .and_then(|s| s.accept)
            {
                accept = Some((symbol, length));
            }
        }
        Scan { accept }
    }

    /// One DFA transition, honoring the table's case sensitivity.
    fn dfa_step(&self, state: StateId, ch: char) -> Option<StateId> {
        let dfa_state = self.model.dfa_states.get(state as usize)?;
        let direct = dfa_state.step(&self.model.charsets, ch);
        if direct.is_some() || self.model.case_sensitive {
            return direct;
        }
        let flipped = if ch.is_ascii_uppercase() {
            ch.to_ascii_lowercase()
        } else if ch.is_ascii_lowercase() {
            ch.to_ascii_uppercase()
        } else {
            return None;
        };
        dfa_state.step(&self.model.charsets, flipped)
    }

    /// Consume `count` characters and return them as a string.
    fn take(&mut self, count: usize) -> String {
        let mut text = String::new();
        for _ in 0..count {
            match self.source.consume() {
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        text
    }
}

enum TopLevel {
    Eof,
    Token(Token),
    GroupOpened,
}
