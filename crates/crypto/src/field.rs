use ff::PrimeField;

use crate::Felt;

/// Montgomery-form arithmetic over the Starknet prime, generated by `ff`.
#[derive(PrimeField)]
#[PrimeFieldModulus = "3618502788666131213697322783095070105623107215331596699973092056135872020481"]
#[PrimeFieldGenerator = "7"]
#[PrimeFieldReprEndianness = "big"]
pub struct FieldElement([u64; 4]);

impl FieldElement {
    /// Constructs a field element directly from its internal Montgomery-form
    /// limbs. Used for hardcoded curve constants that are already known in
    /// that representation.
    pub(crate) const fn from_montgomery_limbs(limbs: [u64; 4]) -> Self {
        FieldElement(limbs)
    }
}

impl From<Felt> for FieldElement {
    fn from(felt: Felt) -> Self {
        let mut repr = FieldElementRepr::default();
        repr.as_mut().copy_from_slice(felt.as_be_bytes());
        // A canonical felt is by definition smaller than the modulus.
        FieldElement::from_repr(repr).unwrap()
    }
}

impl From<FieldElement> for Felt {
    fn from(fe: FieldElement) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(fe.to_repr().as_ref());
        Felt::from_be_bytes(bytes).expect("field elements are always canonical")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use pretty_assertions::assert_eq;

    #[test]
    fn felt_round_trip() {
        let felt = Felt::from_hex_str("0x123456789abcdef123456789abcdef").unwrap();
        assert_eq!(Felt::from(FieldElement::from(felt)), felt);
    }

    #[test]
    fn zero_and_one() {
        assert_eq!(Felt::from(FieldElement::ZERO), Felt::ZERO);
        assert_eq!(Felt::from(FieldElement::ONE), Felt::ONE);
    }

    #[test]
    fn addition_wraps() {
        // (p - 1) + 2 == 1
        let p_minus_one = Felt::from_hex_str(
            "0x800000000000011000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(p_minus_one + Felt::from(2u64), Felt::ONE);
    }
}
