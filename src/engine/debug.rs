//! Developer tools: tree printing and table summaries
//!
//! Nothing here is needed to parse; these helpers exist for debugging
//! grammars and inspecting what the engine built.

use super::codes::SymbolKind;
use super::grammar::GrammarModel;
use super::tree::{ParseTree, TreeArena, TreeNode};
use std::fmt::Write;

/// Parse tree pretty printer
pub struct TreePrinter {
    indent: String,
    max_depth: Option<usize>,
}

impl TreePrinter {
    /// Create a printer with two-space indentation and no depth limit.
    pub fn new() -> Self {
        Self {
            indent: "  ".to_string(),
            max_depth: None,
        }
    }

    /// Set the indentation string.
    pub fn indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Limit the printed depth; deeper nodes render as `...`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Render a whole parse tree.
    pub fn print(&self, tree: &ParseTree<'_>, model: &GrammarModel) -> String {
        let mut output = String::new();
        self.print_node(tree.root(), tree.arena(), model, 0, &mut output);
        output
    }

    fn print_node(
        &self,
        node: TreeNode,
        arena: &TreeArena,
        model: &GrammarModel,
        depth: usize,
        output: &mut String,
    ) {
        let pad = self.indent.repeat(depth);
        if let Some(max) = self.max_depth {
            if depth > max {
                let _ = writeln!(output, "{}...", pad);
                return;
            }
        }

        match node {
            TreeNode::Token { symbol, start, end, .. } => {
                let text = arena.token_text(node).unwrap_or_default();
                let _ = writeln!(
                    output,
                    "{}{} {:?} @ {}..{}",
                    pad,
                    model.symbol_name(symbol),
                    text,
                    start,
                    end
                );
            }
            TreeNode::Reduction { rule, head, .. } => {
                let _ = writeln!(
                    output,
                    "{}{} (rule {})",
                    pad,
                    model.symbol_name(head),
                    rule
                );
                for child in arena.children(node) {
                    self.print_node(*child, arena, model, depth + 1, output);
                }
            }
        }
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable overview of a loaded model
pub struct GrammarSummary<'a> {
    model: &'a GrammarModel,
}

impl<'a> GrammarSummary<'a> {
    /// Create a summary view over a model.
    pub fn new(model: &'a GrammarModel) -> Self {
        Self { model }
    }

    /// Render table sizes and the symbol listing.
    pub fn to_text(&self) -> String {
        let m = self.model;
        let mut output = String::new();
        let name = if m.name.is_empty() {
            "<unnamed>"
        } else {
            m.name.as_str()
        };
        let _ = writeln!(output, "grammar: {}", name);
        let _ = writeln!(
            output,
            "tables: {} symbols, {} rules, {} charsets, {} DFA states, {} LALR states, {} groups",
            m.symbols.len(),
            m.rules.len(),
            m.charsets.len(),
            m.dfa_states.len(),
            m.lr_states.len(),
            m.groups.len()
        );
        let _ = writeln!(
            output,
            "initial states: DFA {}, LALR {}; case {}",
            m.dfa_initial,
            m.lr_initial,
            if m.case_sensitive {
                "sensitive"
            } else {
                "insensitive"
            }
        );
        for symbol in &m.symbols {
            let _ = writeln!(
                output,
                "  symbol {:>3}  {:<12} {:?}",
                symbol.id,
                kind_tag(symbol.kind),
                symbol.name
            );
        }
        for rule in &m.rules {
            let rhs: Vec<&str> = rule.rhs.iter().map(|&s| m.symbol_name(s)).collect();
            let _ = writeln!(
                output,
                "  rule {:>4}  {} ::= {}",
                rule.id,
                m.symbol_name(rule.head),
                if rhs.is_empty() {
                    "<empty>".to_string()
                } else {
                    rhs.join(" ")
                }
            );
        }
        output
    }
}

fn kind_tag(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Nonterminal => "nonterminal",
        SymbolKind::Content => "terminal",
        SymbolKind::Noise => "noise",
        SymbolKind::End => "end",
        SymbolKind::GroupStart => "group-start",
        SymbolKind::GroupEnd => "group-end",
        SymbolKind::CommentLine => "comment",
        SymbolKind::Error => "error",
        SymbolKind::Undefined => "undefined",
    }
}
