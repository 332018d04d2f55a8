use crate::{pedersen_hash, Felt};

/// The hash construction cairo calls `compute_hash_on_elements`: a left fold
/// of [pedersen_hash] starting from zero, finalized by hashing in the number
/// of elements.
///
/// An empty chain therefore finalizes to `H(0, 0)`.
pub struct HashChain {
    hash: Felt,
    count: usize,
}

impl Default for HashChain {
    fn default() -> Self {
        HashChain {
            hash: Felt::ZERO,
            count: 0,
        }
    }
}

impl HashChain {
    pub fn update(&mut self, value: Felt) {
        self.hash = pedersen_hash(self.hash, value);
        self.count = self
            .count
            .checked_add(1)
            .expect("count overflow requires more than usize::MAX updates");
    }

    pub fn finalize(self) -> Felt {
        pedersen_hash(self.hash, Felt::from(self.count as u64))
    }
}

/// Hashes the values as a length-suffixed chain.
pub fn pedersen_array(values: &[Felt]) -> Felt {
    let mut chain = HashChain::default();
    for value in values {
        chain.update(*value);
    }
    chain.finalize()
}
