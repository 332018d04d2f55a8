use bitvec::order::Msb0;
use bitvec::view::BitView;

use crate::curve::{PEDERSEN_P0, PEDERSEN_P1, PEDERSEN_P2, PEDERSEN_P3, PEDERSEN_P4};
use crate::Felt;

/// Computes the [Starknet Pedersen hash] of `a` and `b`.
///
/// The inputs are split into a low 248-bit and a high 4-bit window, each
/// multiplied onto its published generator and summed off the shift point:
///
/// `P0 + a_low * P1 + a_high * P2 + b_low * P3 + b_high * P4`
///
/// The result is the x-coordinate of the sum.
///
/// [Starknet Pedersen hash]: https://docs.starkware.co/starkex-v3/crypto/pedersen-hash-function
pub fn pedersen_hash(a: Felt, b: Felt) -> Felt {
    let a = a.to_be_bytes();
    let b = b.to_be_bytes();
    // Big-endian views; a felt occupies the low 252 of 256 bits.
    let a = a.view_bits::<Msb0>();
    let b = b.view_bits::<Msb0>();

    let mut acc = PEDERSEN_P0;
    acc = acc.add(&PEDERSEN_P1.multiply(&a[8..]));
    acc = acc.add(&PEDERSEN_P2.multiply(&a[4..8]));
    acc = acc.add(&PEDERSEN_P3.multiply(&b[8..]));
    acc = acc.add(&PEDERSEN_P4.multiply(&b[4..8]));

    Felt::from(acc.x)
}
