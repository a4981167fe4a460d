//! Grammar table analysis and warnings
//!
//! A loaded model can be internally consistent yet still suspicious: DFA
//! states nobody can reach, terminals the tokenizer can never produce,
//! groups that never open, or the legacy COMMENT_LINE symbol kind
//! coexisting with an explicit group for the same symbol. None of these
//! are load errors - the engine runs fine without ever touching the dead
//! parts - so they surface as warnings, not [`FormatError`]s.
//!
//! [`FormatError`]: super::error::FormatError

use super::codes::SymbolKind;
use super::grammar::GrammarModel;
use hashbrown::HashSet;
use std::fmt;

/// Kind of table warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A symbol has both the deprecated COMMENT_LINE kind and an explicit
    /// group; the explicit group wins
    LegacyCommentOverlap,

    /// A DFA state no edge path from the initial state can reach
    UnreachableDfaState,

    /// A content terminal no DFA state accepts and no group produces
    UnproducedTerminal,

    /// A group whose start symbol no DFA state accepts
    GroupNeverOpened,

    /// A rule no LALR reduce action references
    UnusedRule,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyCommentOverlap => write!(f, "legacy comment-line overlap"),
            Self::UnreachableDfaState => write!(f, "unreachable DFA state"),
            Self::UnproducedTerminal => write!(f, "unproduced terminal"),
            Self::GroupNeverOpened => write!(f, "group never opened"),
            Self::UnusedRule => write!(f, "unused rule"),
        }
    }
}

/// One table warning
#[derive(Debug, Clone)]
pub struct GrammarWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// Id of the symbol, state, group or rule concerned
    pub subject: usize,
    /// Human-readable message
    pub message: String,
}

impl GrammarWarning {
    /// Create a new warning.
    pub fn new(kind: WarningKind, subject: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject,
            message: message.into(),
        }
    }
}

impl fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.subject, self.kind, self.message)
    }
}

/// Analyzer over a built model
pub struct GrammarAnalyzer<'a> {
    model: &'a GrammarModel,
}

impl<'a> GrammarAnalyzer<'a> {
    /// Create an analyzer for the given model.
    pub fn new(model: &'a GrammarModel) -> Self {
        Self { model }
    }

    /// Run every check and return the collected warnings.
    pub fn analyze(&self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();
        self.check_legacy_comment_overlap(&mut warnings);
        self.check_unreachable_dfa_states(&mut warnings);
        self.check_unproduced_terminals(&mut warnings);
        self.check_groups_never_opened(&mut warnings);
        self.check_unused_rules(&mut warnings);
        warnings
    }

    fn check_legacy_comment_overlap(&self, warnings: &mut Vec<GrammarWarning>) {
        for symbol in &self.model.symbols {
            if symbol.kind != SymbolKind::CommentLine {
                continue;
            }
            let has_explicit = self
                .model
                .groups
                .iter()
                .any(|g| g.start == symbol.id && g.end.is_some());
            if has_explicit {
                warnings.push(GrammarWarning::new(
                    WarningKind::LegacyCommentOverlap,
                    symbol.id as usize,
                    format!(
                        "symbol {:?} is COMMENT_LINE but also starts an explicit group; \
                         the explicit group takes precedence",
                        symbol.name
                    ),
                ));
            }
        }
    }

    fn check_unreachable_dfa_states(&self, warnings: &mut Vec<GrammarWarning>) {
        if self.model.dfa_states.is_empty() {
            return;
        }
        let mut seen: HashSet<u16> = HashSet::new();
        let mut work = vec![self.model.dfa_initial];
        while let Some(id) = work.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(state) = self.model.dfa_states.get(id as usize) {
                work.extend(state.edges.iter().map(|e| e.target));
            }
        }
        for state in &self.model.dfa_states {
            if !seen.contains(&state.id) {
                warnings.push(GrammarWarning::new(
                    WarningKind::UnreachableDfaState,
                    state.id as usize,
                    format!("DFA state {} is unreachable from the initial state", state.id),
                ));
            }
        }
    }

    fn check_unproduced_terminals(&self, warnings: &mut Vec<GrammarWarning>) {
        if self.model.dfa_states.is_empty() {
            return;
        }
        let accepted: HashSet<u16> = self
            .model
            .dfa_states
            .iter()
            .filter_map(|s| s.accept)
            .collect();
        let containers: HashSet<u16> = self.model.groups.iter().map(|g| g.container).collect();
        for symbol in &self.model.symbols {
            if symbol.kind != SymbolKind::Content {
                continue;
            }
            if !accepted.contains(&symbol.id) && !containers.contains(&symbol.id) {
                warnings.push(GrammarWarning::new(
                    WarningKind::UnproducedTerminal,
                    symbol.id as usize,
                    format!(
                        "terminal {:?} is accepted by no DFA state and produced by no group",
                        symbol.name
                    ),
                ));
            }
        }
    }

    fn check_groups_never_opened(&self, warnings: &mut Vec<GrammarWarning>) {
        if self.model.dfa_states.is_empty() {
            return;
        }
        let accepted: HashSet<u16> = self
            .model
            .dfa_states
            .iter()
            .filter_map(|s| s.accept)
            .collect();
        for group in &self.model.groups {
            if !accepted.contains(&group.start) {
                warnings.push(GrammarWarning::new(
                    WarningKind::GroupNeverOpened,
                    group.id as usize,
                    format!(
                        "group {:?} can never open: no DFA state accepts its start symbol",
                        group.name
                    ),
                ));
            }
        }
    }

    fn check_unused_rules(&self, warnings: &mut Vec<GrammarWarning>) {
        if self.model.lr_states.is_empty() {
            return;
        }
        let mut reduced: HashSet<u16> = HashSet::new();
        for state in &self.model.lr_states {
            for action in state.actions.values() {
                if action.kind == super::codes::ActionKind::Reduce {
                    reduced.insert(action.value);
                }
            }
        }
        for rule in &self.model.rules {
            if !reduced.contains(&rule.id) {
                warnings.push(GrammarWarning::new(
                    WarningKind::UnusedRule,
                    rule.id as usize,
                    format!("rule {} is referenced by no reduce action", rule.id),
                ));
            }
        }
    }
}
