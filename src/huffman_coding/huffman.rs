use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::PSEUDO_EOF;
use crate::error::HuffError;
use crate::tools::freq_count::FreqCount;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u16),
}

/// A node of the code tree. `seq` is the creation order, used to break weight ties.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: usize,
    pub seq: usize,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: usize, seq: usize, node_data: NodeData) -> Node {
        Node {
            weight,
            seq,
            node_data,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// The symbol of a leaf, None for an internal node.
    pub fn symbol(&self) -> Option<u16> {
        match self.node_data {
            NodeData::Leaf(symbol) => Some(symbol),
            NodeData::Kids(..) => None,
        }
    }

    /// Left and right child of an internal node, None for a leaf.
    pub fn kids(&self) -> Option<(&Node, &Node)> {
        match &self.node_data {
            NodeData::Kids(left, right) => Some((&**left, &**right)),
            NodeData::Leaf(_) => None,
        }
    }

    /// True if both trees have the same shape and the same symbols at the same leaves.
    /// Weights and sequence numbers are ignored.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (&self.node_data, &other.node_data) {
            (NodeData::Leaf(a), NodeData::Leaf(b)) => a == b,
            (NodeData::Kids(l1, r1), NodeData::Kids(l2, r2)) => {
                l1.same_shape(l2) && r1.same_shape(r2)
            }
            _ => false,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.node_data {
            NodeData::Kids(left, right) => left.leaf_count() + right.leaf_count(),
            NodeData::Leaf(_) => 1,
        }
    }
}

impl Ord for Node {
    /// Reversed so the BinaryHeap pops the lightest node first, and of equal weights the
    /// one created first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary code tree. Every internal node has exactly two kids.
#[derive(Debug, Clone)]
pub struct HuffTree {
    pub root: Node,
}

impl HuffTree {
    /// Build the tree from a frequency count. One leaf is seeded per counted symbol in
    /// ascending symbol order, then the end-of-stream leaf with weight 1. The two lightest
    /// nodes are merged (first removed on the left) until a single root is left.
    pub fn build(counts: &FreqCount) -> HuffTree {
        let mut heap = BinaryHeap::new();
        let mut seq = 0;

        let symbols = counts.symbols();
        // With nothing counted the end-of-stream leaf would be alone, so give it a partner.
        if symbols.is_empty() {
            debug!("No symbols counted, seeding a placeholder leaf.");
            heap.push(Node::new(0, seq, NodeData::Leaf(0)));
            seq += 1;
        }
        for (symbol, weight) in symbols {
            heap.push(Node::new(weight, seq, NodeData::Leaf(symbol)));
            seq += 1;
        }
        heap.push(Node::new(1, seq, NodeData::Leaf(PSEUDO_EOF as u16)));
        seq += 1;
        debug!("Seeded {} leaves.", heap.len());

        // Pare the heap down to one single node with child nodes.
        loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    trace!(
                        "Merging {}@{} and {}@{} into node {}",
                        left.weight,
                        left.seq,
                        right.weight,
                        right.seq,
                        seq
                    );
                    heap.push(Node::new(
                        left.weight + right.weight,
                        seq,
                        NodeData::Kids(Box::new(left), Box::new(right)),
                    ));
                    seq += 1;
                }
                (Some(root), None) => return HuffTree { root },
                (None, _) => unreachable!("the end-of-stream leaf is always seeded"),
            }
        }
    }

    /// Walk the tree and collect the code for every leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = FxHashMap::default();
        let mut path = Vec::new();
        return_codes(&self.root, &mut path, &mut codes);
        CodeTable { codes }
    }
}

/// Recursively walk the tree, appending 0 for left and 1 for right, and record the path
/// when we land on a leaf.
fn return_codes(node: &Node, path: &mut Vec<bool>, codes: &mut FxHashMap<u16, Code>) {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            path.push(false);
            return_codes(left, path, codes);
            path.pop();
            path.push(true);
            return_codes(right, path, codes);
            path.pop();
        }
        NodeData::Leaf(symbol) => {
            codes.insert(*symbol, Code(path.clone()));
        }
    }
}

/// The bits of one code, first bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.0 {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Symbol to code map. One entry per leaf of the tree it was made from.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: FxHashMap<u16, Code>,
}

impl CodeTable {
    /// Code for a symbol. Symbols above the end-of-stream symbol, or not in the tree, are
    /// reported as invalid.
    pub fn get(&self, symbol: usize) -> Result<&Code, HuffError> {
        if symbol > PSEUDO_EOF {
            return Err(HuffError::InvalidSymbol(symbol));
        }
        self.codes
            .get(&(symbol as u16))
            .ok_or(HuffError::InvalidSymbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u16, &Code)> {
        self.codes.iter()
    }
}
