//! Prefix tree over key symbols.
//!
//! Nodes live in an arena and refer to each other by index, so the parent
//! back-reference used to reconstruct a matched path is a plain non-owning
//! index rather than a shared pointer.

use std::collections::HashMap;

/// Index of a node within a [`Trie`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct TrieNode {
    symbol: char,
    terminates: bool,
    parent: Option<NodeId>,
    children: HashMap<char, NodeId>,
}

/// A prefix tree over symbol sequences. Pure data structure, no I/O.
///
/// The root holds a placeholder symbol and is never terminal. The matcher
/// layer guarantees before registration that no sequence is a prefix of
/// another, so a terminal node never has children; the trie itself does not
/// re-check this.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode {
                symbol: '\0',
                terminates: false,
                parent: None,
                children: HashMap::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Register a sequence, descending and creating nodes symbol by symbol
    /// and marking the final node terminal. An empty sequence is a no-op.
    pub fn add_word(&mut self, word: &[char]) {
        if word.is_empty() {
            return;
        }

        let mut node = self.root();
        for &symbol in word {
            node = match self.nodes[node.0].children.get(&symbol) {
                Some(&child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(TrieNode {
                        symbol,
                        terminates: false,
                        parent: Some(node),
                        children: HashMap::new(),
                    });
                    self.nodes[node.0].children.insert(symbol, child);
                    child
                }
            };
        }
        self.nodes[node.0].terminates = true;
    }

    /// True iff a node path exists for the full sequence, terminal or not.
    pub fn is_prefix(&self, word: &[char]) -> bool {
        let mut node = self.root();
        for &symbol in word {
            match self.child(node, symbol) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }

    /// Walks the sequence; the moment a symbol has no matching child, returns
    /// whether the last reached node was terminal. If the full path exists,
    /// returns whether its final node is terminal.
    pub fn does_prefix_word_exist(&self, word: &[char]) -> bool {
        let mut node = self.root();
        for &symbol in word {
            match self.child(node, symbol) {
                Some(child) => node = child,
                None => return self.is_terminal(node),
            }
        }
        self.is_terminal(node)
    }

    pub fn child(&self, node: NodeId, symbol: char) -> Option<NodeId> {
        self.nodes[node.0].children.get(&symbol).copied()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn symbol(&self, node: NodeId) -> char {
        self.nodes[node.0].symbol
    }

    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node.0].terminates
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        !self.nodes[node.0].children.is_empty()
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
