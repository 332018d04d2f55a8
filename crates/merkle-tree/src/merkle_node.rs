//! Node types of the binary Merkle-Patricia tree.
//!
//! Three node kinds exist: `Binary` nodes with two children covering one bit
//! of the path each, `Edge` nodes compressing a run of unbranched path bits,
//! and `Leaf` nodes holding a value at the fixed tree depth. Edges must be
//! maximal, which makes the tree shape canonical for a given set of leaves.

use bitvec::order::Msb0;
use bitvec::prelude::BitVec;
use bitvec::slice::BitSlice;
use kestrel_crypto::Felt;

use crate::FeltHash;

/// A node in the in-memory tree under construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InternalNode {
    Binary(BinaryNode),
    Edge(EdgeNode),
    Leaf(Felt),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BinaryNode {
    pub left: Box<InternalNode>,
    pub right: Box<InternalNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeNode {
    /// The run of path bits this edge covers, at least one.
    pub path: BitVec<u8, Msb0>,
    pub child: Box<InternalNode>,
}

/// The child slot a path bit selects in a [BinaryNode].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl From<bool> for Direction {
    fn from(bit: bool) -> Self {
        match bit {
            false => Direction::Left,
            true => Direction::Right,
        }
    }
}

impl BinaryNode {
    pub fn child_mut(&mut self, direction: Direction) -> &mut InternalNode {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    pub fn calculate_hash<H: FeltHash>(left: Felt, right: Felt) -> Felt {
        H::hash(left, right)
    }
}

impl EdgeNode {
    /// The longest shared prefix of this edge's path and the key remainder.
    pub fn common_path<'a>(&'a self, key: &BitSlice<u8, Msb0>) -> &'a BitSlice<u8, Msb0> {
        let common_length = self
            .path
            .iter()
            .zip(key.iter())
            .take_while(|(a, b)| a == b)
            .count();
        &self.path[..common_length]
    }

    pub fn calculate_hash<H: FeltHash>(child: Felt, path: &BitSlice<u8, Msb0>) -> Felt {
        let length = Felt::from(path.len() as u64);
        // Path lengths never exceed the tree height, well below 251 bits.
        let path = Felt::from_bits(path).expect("edge path fits a felt");
        H::hash(child, path) + length
    }
}
