use std::marker::PhantomData;

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use kestrel_crypto::Felt;

use crate::merkle_node::{BinaryNode, Direction, EdgeNode, InternalNode};
use crate::FeltHash;

/// An in-memory binary Merkle-Patricia tree of fixed height.
///
/// Keys are felts interpreted as `HEIGHT`-bit paths, most significant bit
/// first. The tree is a commitment device: populate it with [set](Self::set),
/// consume it with [commit](Self::commit), and every node is released. An
/// empty tree commits to zero.
#[derive(Debug, Clone)]
pub struct MerkleTree<H: FeltHash, const HEIGHT: usize> {
    root: Option<InternalNode>,
    _hasher: PhantomData<H>,
}

/// The key does not fit the tree's height.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("key {key} requires more than {height} bits")]
pub struct KeyOutOfRangeError {
    pub key: Felt,
    pub height: usize,
}

impl<H: FeltHash, const HEIGHT: usize> Default for MerkleTree<H, HEIGHT> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H: FeltHash, const HEIGHT: usize> MerkleTree<H, HEIGHT> {
    pub fn empty() -> Self {
        Self {
            root: None,
            _hasher: PhantomData,
        }
    }

    /// Inserts or overwrites the value at `key`, returning the displaced
    /// value if there was one. Fails only if `key` has bits set above
    /// `HEIGHT`.
    pub fn set(&mut self, key: Felt, value: Felt) -> Result<Option<Felt>, KeyOutOfRangeError> {
        let bits = key.view_bits();
        let (high, path) = bits.split_at(256 - HEIGHT);
        if high.any() {
            return Err(KeyOutOfRangeError {
                key,
                height: HEIGHT,
            });
        }

        Ok(match self.root.take() {
            None => {
                self.root = Some(Self::leaf_branch(path, value));
                None
            }
            Some(node) => {
                let (node, previous) = Self::insert(node, path, value);
                self.root = Some(node);
                previous
            }
        })
    }

    /// Consumes the tree and produces its root hash.
    pub fn commit(self) -> Felt {
        match &self.root {
            None => Felt::ZERO,
            Some(node) => Self::hash_node(node),
        }
    }

    /// A maximal chain from `path` down to a leaf holding `value`.
    fn leaf_branch(path: &BitSlice<u8, Msb0>, value: Felt) -> InternalNode {
        if path.is_empty() {
            InternalNode::Leaf(value)
        } else {
            InternalNode::Edge(EdgeNode {
                path: path.to_bitvec(),
                child: Box::new(InternalNode::Leaf(value)),
            })
        }
    }

    fn insert(
        node: InternalNode,
        key: &BitSlice<u8, Msb0>,
        value: Felt,
    ) -> (InternalNode, Option<Felt>) {
        match node {
            // Keys all have exactly HEIGHT bits, so reaching a leaf means the
            // key is exhausted and this is an overwrite.
            InternalNode::Leaf(previous) => (InternalNode::Leaf(value), Some(previous)),
            InternalNode::Binary(mut binary) => {
                let slot = binary.child_mut(Direction::from(key[0]));
                let child = std::mem::replace(slot, InternalNode::Leaf(Felt::ZERO));
                let (child, previous) = Self::insert(child, &key[1..], value);
                *slot = child;
                (InternalNode::Binary(binary), previous)
            }
            InternalNode::Edge(edge) => {
                let common = edge.common_path(key).len();
                if common == edge.path.len() {
                    let (child, previous) = Self::insert(*edge.child, &key[common..], value);
                    (
                        InternalNode::Edge(EdgeNode {
                            path: edge.path,
                            child: Box::new(child),
                        }),
                        previous,
                    )
                } else {
                    // The key diverges inside the edge: split it with a
                    // branch at the first differing bit.
                    (Self::split_edge(edge, common, key, value), None)
                }
            }
        }
    }

    fn split_edge(
        edge: EdgeNode,
        common: usize,
        key: &BitSlice<u8, Msb0>,
        value: Felt,
    ) -> InternalNode {
        let old_side = if edge.path.len() == common + 1 {
            *edge.child
        } else {
            InternalNode::Edge(EdgeNode {
                path: edge.path[common + 1..].to_bitvec(),
                child: edge.child,
            })
        };
        let new_side = Self::leaf_branch(&key[common + 1..], value);

        let (left, right) = match Direction::from(edge.path[common]) {
            Direction::Left => (old_side, new_side),
            Direction::Right => (new_side, old_side),
        };
        let branch = InternalNode::Binary(BinaryNode {
            left: Box::new(left),
            right: Box::new(right),
        });

        if common == 0 {
            branch
        } else {
            InternalNode::Edge(EdgeNode {
                path: edge.path[..common].to_bitvec(),
                child: Box::new(branch),
            })
        }
    }

    fn hash_node(node: &InternalNode) -> Felt {
        match node {
            InternalNode::Leaf(value) => *value,
            InternalNode::Binary(binary) => BinaryNode::calculate_hash::<H>(
                Self::hash_node(&binary.left),
                Self::hash_node(&binary.right),
            ),
            InternalNode::Edge(edge) => {
                EdgeNode::calculate_hash::<H>(Self::hash_node(&edge.child), &edge.path)
            }
        }
    }
}
