use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bitvec::prelude::*;
use tracing::debug;

use crate::error::CodecError;
use crate::min_heap::MinHeap;

/// An owned sequence of code bits, MSB-first over byte storage.
pub type Bits = BitVec<u8, Msb0>;

/// A node of the code tree: either a single symbol or a merged group.
///
/// Internal nodes carry the symbols of their whole subtree in merge order
/// (left child's symbols first). Sibling symbol sets are disjoint, which is
/// what makes the encode descent unambiguous.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf {
        weight: usize,
        symbol: u8,
    },
    Internal {
        weight: usize,
        symbols: Vec<u8>,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn leaf(symbol: u8, weight: usize) -> Self {
        Node::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> usize {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// The symbols covered by this subtree, in merge order.
    pub fn symbols(&self) -> &[u8] {
        match self {
            Node::Leaf { symbol, .. } => std::slice::from_ref(symbol),
            Node::Internal { symbols, .. } => symbols,
        }
    }

    /// Exact element membership, not substring search.
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols().contains(&symbol)
    }

    /// Merges two subtrees: `a` becomes the left child, `b` the right.
    fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        let mut symbols = a.symbols().to_vec();
        symbols.extend_from_slice(b.symbols());
        Node::Internal {
            weight,
            symbols,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    /// Tie-break key for the merge queue. Sibling symbol sets are disjoint,
    /// so (weight, min_symbol) is a total order over queue members.
    fn min_symbol(&self) -> u8 {
        match self {
            Node::Leaf { symbol, .. } => *symbol,
            Node::Internal { symbols, .. } => symbols.iter().copied().min().unwrap_or(u8::MAX),
        }
    }

    /// Root-to-leaf descent for one symbol: left appends 0, right appends 1.
    /// Returns an empty code if the symbol is absent from this subtree.
    fn descend(&self, symbol: u8, mut code: Bits) -> Bits {
        match self {
            Node::Leaf { symbol: s, .. } if *s == symbol => code,
            Node::Leaf { .. } => Bits::new(),
            Node::Internal { left, right, .. } => {
                if left.contains(symbol) {
                    code.push(false);
                    left.descend(symbol, code)
                } else if right.contains(symbol) {
                    code.push(true);
                    right.descend(symbol, code)
                } else {
                    Bits::new()
                }
            }
        }
    }

    fn fill_table(&self, table: &mut BTreeMap<u8, Bits>, prefix: Bits) {
        match self {
            Node::Leaf { symbol, .. } => {
                table.insert(*symbol, prefix);
            }
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(false);
                left.fill_table(table, left_prefix);

                let mut right_prefix = prefix;
                right_prefix.push(true);
                right.fill_table(table, right_prefix);
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Weight first; ties go to the subtree holding the lowest symbol
        // value, which pins the produced code across runs.
        self.weight()
            .cmp(&other.weight())
            .then_with(|| self.min_symbol().cmp(&other.min_symbol()))
    }
}

/// A prefix-free code tree learned from symbol frequencies.
///
/// Built once, immutable afterwards. An alphabet of one symbol yields the
/// degenerate tree: a lone leaf whose symbol is coded as a single `0`.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Learns a tree from sample text. Rejects empty input: the tree would
    /// be indeterminate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let counts: HashMap<u8, usize> = bytes.iter().copied().fold(
            HashMap::new(),
            |mut acc, byte| {
                *acc.entry(byte).or_insert(0) += 1;
                acc
            },
        );
        debug!(
            input_len = bytes.len(),
            alphabet = counts.len(),
            "learned symbol frequencies"
        );
        Self::from_frequencies(counts)
    }

    /// Builds the tree by greedy priority merge: repeatedly join the two
    /// lowest-weight subtrees until one remains.
    pub fn from_frequencies(frequencies: HashMap<u8, usize>) -> Result<Self, CodecError> {
        let mut leaves: Vec<Node> = frequencies
            .into_iter()
            .map(|(symbol, count)| Node::leaf(symbol, count))
            .collect();
        if leaves.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        // HashMap iteration order must not leak into the heap layout.
        leaves.sort_unstable();

        let mut queue = MinHeap::build(leaves);
        while queue.len() > 1 {
            let (Some(first), Some(second)) = (queue.extract_min(), queue.extract_min()) else {
                break;
            };
            queue.insert(Node::merge(first, second));
        }
        let root = queue.extract_min().ok_or(CodecError::EmptyInput)?;

        debug!(
            total_weight = root.weight(),
            alphabet = root.symbols().len(),
            "code tree built"
        );
        Ok(HuffmanTree { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Code for one symbol, root-to-leaf. Empty means the symbol is absent
    /// from the learned alphabet.
    pub fn code_for(&self, symbol: u8) -> Bits {
        if let Node::Leaf { symbol: s, .. } = &self.root {
            return if *s == symbol {
                bitvec![u8, Msb0; 0]
            } else {
                Bits::new()
            };
        }
        self.root.descend(symbol, Bits::new())
    }

    /// Derives the full symbol → code table in one walk.
    pub fn code_table(&self) -> BTreeMap<u8, Bits> {
        let mut table = BTreeMap::new();
        match &self.root {
            Node::Leaf { symbol, .. } => {
                table.insert(*symbol, bitvec![u8, Msb0; 0]);
            }
            root => root.fill_table(&mut table, Bits::new()),
        }
        table
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(f, &self.root, 0, "root")
    }
}

fn fmt_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize, label: &str) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "  ")?;
    }
    match node {
        Node::Leaf { symbol, weight } => {
            writeln!(f, "{label} -> leaf {:?} ({symbol}) [weight: {weight}]", *symbol as char)
        }
        Node::Internal { weight, left, right, .. } => {
            writeln!(f, "{label} -> internal [weight: {weight}]")?;
            fmt_node(f, left, depth + 1, "L")?;
            fmt_node(f, right, depth + 1, "R")
        }
    }
}
