//! Arena allocation for parse trees
//!
//! Reductions are stored in pools: nodes are small `Copy` values holding
//! indices into a shared child pool, and token lexemes are interned into a
//! shared text pool. A whole parse allocates a handful of growing vectors
//! instead of one box per node, and dropping the arena frees the tree in
//! O(1).

use super::grammar::{RuleId, SymbolId};
use std::hash::{Hash, Hasher};

/// One node of a parse tree
///
/// 16 bytes, `Copy`. Token leaves reference interned lexeme text; reduction
/// nodes reference a contiguous run of children in the arena's child pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode {
    /// A shifted token
    Token {
        /// Symbol of the token
        symbol: SymbolId,
        /// Index into the arena's text pool
        text_index: u32,
        /// Byte offset where the lexeme started
        start: u32,
        /// Byte offset just past the lexeme
        end: u32,
    },
    /// A completed reduction
    Reduction {
        /// Rule that was reduced
        rule: RuleId,
        /// The rule's head nonterminal
        head: SymbolId,
        /// Index of the first child in the child pool
        pool_index: u32,
        /// Number of children
        length: u32,
    },
}

impl TreeNode {
    /// The symbol this node produces (token symbol or rule head).
    #[inline]
    pub fn symbol(&self) -> SymbolId {
        match self {
            Self::Token { symbol, .. } => *symbol,
            Self::Reduction { head, .. } => *head,
        }
    }

    /// Whether this node is a token leaf.
    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct TextEntry {
    offset: u32,
    length: u32,
}

/// Pool-backed storage for parse trees
#[derive(Debug, Default)]
pub struct TreeArena {
    text_data: String,
    text_pool: Vec<TextEntry>,
    text_hash: hashbrown::HashMap<u64, u32, ahash::RandomState>,
    child_pool: Vec<TreeNode>,
}

impl TreeArena {
    /// Create an empty arena.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create an arena pre-sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text_data: String::with_capacity(capacity * 4),
            text_pool: Vec::with_capacity(capacity),
            text_hash: hashbrown::HashMap::default(),
            child_pool: Vec::with_capacity(capacity),
        }
    }

    /// Reset for reuse, keeping allocated memory.
    pub fn reset(&mut self) {
        self.text_data.clear();
        self.text_pool.clear();
        self.text_hash.clear();
        self.child_pool.clear();
    }

    /// Intern a lexeme and return its text pool index.
    ///
    /// Repeated lexemes (operators, keywords) share one pool entry.
    pub fn intern_text(&mut self, text: &str) -> u32 {
        let hash = self.hash_text(text);
        if let Some(&index) = self.text_hash.get(&hash) {
            if self.text(index) == text {
                return index;
            }
        }
        let offset = self.text_data.len() as u32;
        self.text_data.push_str(text);
        let index = self.text_pool.len() as u32;
        self.text_pool.push(TextEntry {
            offset,
            length: text.len() as u32,
        });
        self.text_hash.insert(hash, index);
        index
    }

    fn hash_text(&self, text: &str) -> u64 {
        let mut hasher = ahash::AHasher::default();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// The interned text at `index`.
    ///
    /// Indices come from [`TreeArena::intern_text`] on the same arena;
    /// anything else is out of range and panics like a slice index would.
    pub fn text(&self, index: u32) -> &str {
        let entry = self.text_pool[index as usize];
        &self.text_data[entry.offset as usize..(entry.offset + entry.length) as usize]
    }

    /// Build a token leaf, interning its lexeme.
    pub fn token(&mut self, symbol: SymbolId, text: &str, start: usize, end: usize) -> TreeNode {
        TreeNode::Token {
            symbol,
            text_index: self.intern_text(text),
            start: start as u32,
            end: end as u32,
        }
    }

    /// Store a reduction's children contiguously and build its node.
    pub fn reduction(&mut self, rule: RuleId, head: SymbolId, children: &[TreeNode]) -> TreeNode {
        let pool_index = self.child_pool.len() as u32;
        self.child_pool.extend_from_slice(children);
        TreeNode::Reduction {
            rule,
            head,
            pool_index,
            length: children.len() as u32,
        }
    }

    /// The children of a node (empty for tokens and epsilon reductions).
    pub fn children(&self, node: TreeNode) -> &[TreeNode] {
        match node {
            TreeNode::Token { .. } => &[],
            TreeNode::Reduction {
                pool_index, length, ..
            } => {
                let start = pool_index as usize;
                &self.child_pool[start..start + length as usize]
            }
        }
    }

    /// The lexeme of a token node, or `None` for reductions.
    pub fn token_text(&self, node: TreeNode) -> Option<&str> {
        match node {
            TreeNode::Token { text_index, .. } => Some(self.text(text_index)),
            TreeNode::Reduction { .. } => None,
        }
    }

    /// Structural equality of two trees, possibly across arenas.
    ///
    /// Pool indices are ignored; tokens compare by (symbol, lexeme, span)
    /// and reductions by (rule, head, children). Iterative so that deep
    /// trees cannot overflow the call stack.
    pub fn tree_eq(&self, a: TreeNode, other: &TreeArena, b: TreeNode) -> bool {
        let mut work = vec![(a, b)];
        while let Some((a, b)) = work.pop() {
            match (a, b) {
                (
                    TreeNode::Token {
                        symbol: sa,
                        text_index: ta,
                        start: starta,
                        end: enda,
                    },
                    TreeNode::Token {
                        symbol: sb,
                        text_index: tb,
                        start: startb,
                        end: endb,
                    },
                ) => {
                    if sa != sb
                        || starta != startb
                        || enda != endb
                        || self.text(ta) != other.text(tb)
                    {
                        return false;
                    }
                }
                (
                    TreeNode::Reduction {
                        rule: ra, head: ha, ..
                    },
                    TreeNode::Reduction {
                        rule: rb, head: hb, ..
                    },
                ) => {
                    if ra != rb || ha != hb {
                        return false;
                    }
                    let ca = self.children(a);
                    let cb = other.children(b);
                    if ca.len() != cb.len() {
                        return false;
                    }
                    work.extend(ca.iter().copied().zip(cb.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }

    /// Memory usage estimate in bytes.
    pub fn memory_usage(&self) -> usize {
        self.text_data.capacity()
            + self.text_pool.capacity() * std::mem::size_of::<TextEntry>()
            + self.child_pool.capacity() * std::mem::size_of::<TreeNode>()
    }
}

/// A completed parse: a root node plus the arena holding the tree
///
/// Borrowed from the session that produced it; valid only while the
/// session is alive and only after it accepted.
#[derive(Debug, Clone, Copy)]
pub struct ParseTree<'a> {
    arena: &'a TreeArena,
    root: TreeNode,
}

impl<'a> ParseTree<'a> {
    /// Bundle a root node with its arena.
    #[inline]
    pub fn new(arena: &'a TreeArena, root: TreeNode) -> Self {
        Self { arena, root }
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> TreeNode {
        self.root
    }

    /// The arena holding every node of this tree.
    #[inline]
    pub fn arena(&self) -> &'a TreeArena {
        self.arena
    }

    /// Children of a node in this tree.
    #[inline]
    pub fn children(&self, node: TreeNode) -> &'a [TreeNode] {
        self.arena.children(node)
    }

    /// Lexeme of a token node in this tree.
    #[inline]
    pub fn token_text(&self, node: TreeNode) -> Option<&'a str> {
        self.arena.token_text(node)
    }

    /// Structural equality with another tree, possibly from another
    /// session. See [`TreeArena::tree_eq`].
    pub fn structurally_eq(&self, other: &ParseTree<'_>) -> bool {
        self.arena.tree_eq(self.root, other.arena, other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedupes() {
        let mut arena = TreeArena::new();
        let a = arena.intern_text("plus");
        let b = arena.intern_text("plus");
        let c = arena.intern_text("minus");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(arena.text(a), "plus");
        assert_eq!(arena.text(c), "minus");
    }

    #[test]
    fn test_token_and_children() {
        let mut arena = TreeArena::new();
        let tok = arena.token(2, "42", 0, 2);
        assert!(tok.is_token());
        assert_eq!(tok.symbol(), 2);
        assert_eq!(arena.token_text(tok), Some("42"));
        assert!(arena.children(tok).is_empty());
    }

    #[test]
    fn test_reduction_children() {
        let mut arena = TreeArena::new();
        let lhs = arena.token(2, "1", 0, 1);
        let op = arena.token(3, "+", 1, 2);
        let rhs = arena.token(2, "2", 2, 3);
        let node = arena.reduction(0, 5, &[lhs, op, rhs]);
        assert!(!node.is_token());
        assert_eq!(node.symbol(), 5);
        let children = arena.children(node);
        assert_eq!(children.len(), 3);
        assert_eq!(arena.token_text(children[1]), Some("+"));
    }

    #[test]
    fn test_epsilon_reduction() {
        let mut arena = TreeArena::new();
        let node = arena.reduction(1, 4, &[]);
        assert!(arena.children(node).is_empty());
    }

    #[test]
    fn test_tree_eq_across_arenas() {
        let mut a = TreeArena::new();
        let mut b = TreeArena::new();
        // Interleave interning so pool indices differ between arenas.
        b.intern_text("padding");

        let ta = a.token(2, "1", 0, 1);
        let tb = b.token(2, "1", 0, 1);
        let ra = a.reduction(0, 5, &[ta]);
        let rb = b.reduction(0, 5, &[tb]);
        assert!(a.tree_eq(ra, &b, rb));

        let other = b.token(2, "9", 0, 1);
        let rb2 = b.reduction(0, 5, &[other]);
        assert!(!a.tree_eq(ra, &b, rb2));
    }

    #[test]
    fn test_tree_eq_shape_mismatch() {
        let mut a = TreeArena::new();
        let tok = a.token(2, "1", 0, 1);
        let red = a.reduction(0, 5, &[tok]);
        assert!(!a.tree_eq(tok, &a, red));
    }

    #[test]
    fn test_reset() {
        let mut arena = TreeArena::new();
        arena.token(1, "abc", 0, 3);
        arena.reset();
        assert_eq!(arena.intern_text("abc"), 0);
    }
}
