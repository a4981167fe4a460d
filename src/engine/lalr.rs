//! Deterministic LALR shift-reduce engine
//!
//! Consumes the token stream against the model's action tables. The stack
//! holds (state, subtree) frames; reductions pop the rule's right-hand
//! side, synthesize a nonterminal node and re-consult the table at the
//! same lookahead without reading a new token. All conflicts were resolved
//! when the tables were generated, so every (state, symbol) pair has at
//! most one action; a missing GOTO after a reduction is a table-invariant
//! violation and is fatal to the session.

use super::codes::{ActionKind, SymbolKind};
use super::grammar::{GrammarModel, RuleId, StateId, SymbolId};
use super::tree::{TreeArena, TreeNode};
use crate::engine::log_debug;

/// Outcome of feeding one lookahead to the engine
///
/// `Shift` consumed the lookahead; `Reduction` did not, so the caller
/// presents the same token again. The error outcomes are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LalrOutcome {
    /// The lookahead was pushed; read the next token
    Shift,
    /// A rule was reduced; present the same lookahead again
    Reduction,
    /// The input was accepted; the result tree is available
    Accept,
    /// No action is defined for (current state, lookahead)
    SyntaxError {
        /// Symbols that would have been accepted in the current state
        expected: Vec<SymbolId>,
    },
    /// A built-table invariant was violated
    InternalError {
        /// Human-readable context: state, symbol, stack depth
        detail: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    state: StateId,
    node: Option<TreeNode>,
}

/// The LALR stack machine for one parse
#[derive(Debug)]
pub struct LalrEngine<'m> {
    model: &'m GrammarModel,
    stack: Vec<Frame>,
    trim_reductions: bool,
    result: Option<TreeNode>,
}

impl<'m> LalrEngine<'m> {
    /// Create an engine positioned at the model's initial state.
    pub fn new(model: &'m GrammarModel, trim_reductions: bool) -> Self {
        Self {
            model,
            stack: vec![Frame {
                state: model.lr_initial,
                node: None,
            }],
            trim_reductions,
            result: None,
        }
    }

    /// Current stack depth, counting the initial frame.
    #[inline]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// The LALR state on top of the stack.
    #[inline]
    pub fn current_state(&self) -> StateId {
        self.stack.last().map_or(self.model.lr_initial, |f| f.state)
    }

    /// The accepted parse tree, after [`LalrOutcome::Accept`].
    #[inline]
    pub fn result(&self) -> Option<TreeNode> {
        self.result
    }

    /// Feed the lookahead `symbol` (with its tree node) to the automaton.
    pub fn step(
        &mut self,
        symbol: SymbolId,
        node: TreeNode,
        arena: &mut TreeArena,
    ) -> LalrOutcome {
        let state = self.current_state();
        let Some(lr_state) = self.model.lr_states.get(state as usize) else {
            return self.internal(format!(
                "LALR state {} missing (lookahead {}, depth {})",
                state,
                self.model.symbol_name(symbol),
                self.stack.len()
            ));
        };

        match lr_state.action(symbol) {
            None => LalrOutcome::SyntaxError {
                expected: lr_state.expected_symbols(),
            },
            Some(action) => match action.kind {
                ActionKind::Shift => {
                    log_debug!(
                        "shift {} -> state {}",
                        self.model.symbol_name(symbol),
                        action.value
                    );
                    self.stack.push(Frame {
                        state: action.value,
                        node: Some(node),
                    });
                    LalrOutcome::Shift
                }
                ActionKind::Reduce => self.reduce(action.value, symbol, arena),
                ActionKind::Accept => {
                    match self.stack.last().and_then(|f| f.node) {
                        Some(root) => {
                            self.result = Some(root);
                            LalrOutcome::Accept
                        }
                        None => self.internal(format!(
                            "accept with no completed subtree (state {}, depth {})",
                            state,
                            self.stack.len()
                        )),
                    }
                }
                ActionKind::Goto | ActionKind::Undefined => self.internal(format!(
                    "unexpected {:?} action on lookahead {} in state {}",
                    action.kind,
                    self.model.symbol_name(symbol),
                    state
                )),
            },
        }
    }

    /// Pop the rule's right-hand side, build the subtree, follow GOTO.
    fn reduce(&mut self, rule_id: RuleId, lookahead: SymbolId, arena: &mut TreeArena) -> LalrOutcome {
        let Some(rule) = self.model.rule(rule_id) else {
            return self.internal(format!("reduce by unknown rule {}", rule_id));
        };
        let (head, arity) = (rule.head, rule.rhs.len());

        if self.stack.len() <= arity {
            return self.internal(format!(
                "stack underflow reducing rule {} (need {}, depth {})",
                rule_id,
                arity,
                self.stack.len()
            ));
        }

        let mut children = Vec::with_capacity(arity);
        for frame in self.stack.drain(self.stack.len() - arity..) {
            match frame.node {
                Some(node) => children.push(node),
                None => {
                    return LalrOutcome::InternalError {
                        detail: format!("empty frame under reduction of rule {}", rule_id),
                    }
                }
            }
        }

        // Trim policy: a rule with exactly one nonterminal on the right
        // adds no structure, so its single child stands in directly.
        let elide = self.trim_reductions
            && children.len() == 1
            && self
                .model
                .rule(rule_id)
                .and_then(|r| self.model.symbol(r.rhs[0]))
                .is_some_and(|s| s.kind == SymbolKind::Nonterminal);
        let node = if elide {
            children[0]
        } else {
            arena.reduction(rule_id, head, &children)
        };

        let state = self.current_state();
        let goto = self
            .model
            .lr_states
            .get(state as usize)
            .and_then(|s| s.action(head));
        match goto {
            Some(action) if matches!(action.kind, ActionKind::Goto) => {
                log_debug!(
                    "reduce rule {} ({} children) -> goto state {}",
                    rule_id,
                    arity,
                    action.value
                );
                self.stack.push(Frame {
                    state: action.value,
                    node: Some(node),
                });
                LalrOutcome::Reduction
            }
            other => self.internal(format!(
                "missing GOTO for {} in state {} after rule {} (lookahead {}, depth {}, found {:?})",
                self.model.symbol_name(head),
                state,
                rule_id,
                self.model.symbol_name(lookahead),
                self.stack.len(),
                other
            )),
        }
    }

    fn internal(&self, detail: String) -> LalrOutcome {
        log_debug!("internal error: {}", detail);
        LalrOutcome::InternalError { detail }
    }
}
