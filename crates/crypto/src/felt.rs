use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use bitvec::view::BitView;

use crate::field::FieldElement;

/// The Starknet prime `2^251 + 17*2^192 + 1` in big-endian bytes.
const MODULUS_BE: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x01,
];

/// A field element over the Starknet prime, held as canonical big-endian
/// bytes. Always `0 <= x < 2^251 + 17*2^192 + 1`.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt([u8; 32]);

/// The value was larger than the field modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value is larger than the field modulus")]
pub struct OverflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("invalid hex digit: {0:#x}")]
    InvalidNibble(u8),
    #[error("more than 64 hex digits: {0}")]
    InvalidLength(usize),
    #[error(transparent)]
    Overflow(#[from] OverflowError),
}

impl Felt {
    pub const ZERO: Felt = Felt([0u8; 32]);

    pub const ONE: Felt = {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        Felt(bytes)
    };

    /// Creates a felt from canonical big-endian bytes. Errors if the value
    /// is not smaller than the modulus; use [Felt::from_be_bytes_reduced]
    /// for arbitrary input.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, OverflowError> {
        let mut i = 0;
        while i < 32 {
            if bytes[i] < MODULUS_BE[i] {
                return Ok(Felt(bytes));
            }
            if bytes[i] > MODULUS_BE[i] {
                return Err(OverflowError);
            }
            i += 1;
        }
        // Equal to the modulus.
        Err(OverflowError)
    }

    /// Creates a felt from up to 32 big-endian bytes, most significant
    /// bytes omitted.
    pub const fn from_be_slice(bytes: &[u8]) -> Result<Self, OverflowError> {
        if bytes.len() > 32 {
            return Err(OverflowError);
        }
        let mut buf = [0u8; 32];
        let offset = 32 - bytes.len();
        let mut i = 0;
        while i < bytes.len() {
            buf[offset + i] = bytes[i];
            i += 1;
        }
        Self::from_be_bytes(buf)
    }

    /// Interprets the bytes as a big-endian 256-bit integer and reduces it
    /// modulo the field prime.
    pub fn from_be_bytes_reduced(bytes: [u8; 32]) -> Self {
        use ff::Field;
        let shift = FieldElement::from(256u64);
        let mut acc = FieldElement::ZERO;
        for byte in bytes {
            acc = acc * shift + FieldElement::from(byte as u64);
        }
        acc.into()
    }

    pub const fn to_be_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    /// A big-endian bit view of the 256-bit byte representation. The first
    /// five bits are always zero.
    pub fn view_bits(&self) -> &BitSlice<u8, Msb0> {
        self.0.view_bits()
    }

    /// Creates a felt from up to 251 big-endian bits.
    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Result<Self, OverflowError> {
        if bits.len() > 251 {
            return Err(OverflowError);
        }
        let mut bytes = [0u8; 32];
        bytes.view_bits_mut::<Msb0>()[256 - bits.len()..].copy_from_bitslice(bits);
        Ok(Felt(bytes))
    }

    /// Parses a hex string, with or without a `0x` prefix. Usable in const
    /// context, which is what the `felt!` macro relies on.
    pub const fn from_hex_str(hex: &str) -> Result<Self, HexParseError> {
        let hex = hex.as_bytes();
        let start = if hex.len() >= 2 && hex[0] == b'0' && (hex[1] == b'x' || hex[1] == b'X') {
            2
        } else {
            0
        };
        let digits = hex.len() - start;
        if digits > 64 {
            return Err(HexParseError::InvalidLength(digits));
        }
        let mut buf = [0u8; 32];
        let mut i = 0;
        while i < digits {
            // Fill nibbles from the least significant end.
            let nibble = match hex[start + digits - 1 - i] {
                d @ b'0'..=b'9' => d - b'0',
                d @ b'a'..=b'f' => d - b'a' + 10,
                d @ b'A'..=b'F' => d - b'A' + 10,
                other => return Err(HexParseError::InvalidNibble(other)),
            };
            buf[31 - i / 2] |= nibble << ((i % 2) * 4);
            i += 1;
        }
        match Self::from_be_bytes(buf) {
            Ok(felt) => Ok(felt),
            Err(e) => Err(HexParseError::Overflow(e)),
        }
    }

    /// Minimal `0x`-prefixed lowercase hex.
    pub fn to_hex_str(&self) -> String {
        let mut hex = String::with_capacity(66);
        hex.push_str("0x");
        let mut nibbles = self
            .0
            .iter()
            .flat_map(|b| [b >> 4, b & 0xf])
            .skip_while(|&n| n == 0)
            .peekable();
        if nibbles.peek().is_none() {
            hex.push('0');
        }
        for nibble in nibbles {
            hex.push(b"0123456789abcdef"[nibble as usize] as char);
        }
        hex
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Felt(bytes)
    }
}

impl std::ops::Add for Felt {
    type Output = Felt;

    fn add(self, rhs: Felt) -> Felt {
        (FieldElement::from(self) + FieldElement::from(rhs)).into()
    }
}

impl std::fmt::Display for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_str())
    }
}

impl std::fmt::Debug for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl serde::Serialize for Felt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_str())
    }
}

impl<'de> serde::Deserialize<'de> for Felt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex: std::borrow::Cow<'_, str> = serde::Deserialize::deserialize(deserializer)?;
        Felt::from_hex_str(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_round_trip() {
        let original = [
            0x07, 0xff, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xab, 0xcd,
        ];
        let felt = Felt::from_be_bytes(original).unwrap();
        assert_eq!(felt.to_be_bytes(), original);
    }

    #[test]
    fn modulus_overflows() {
        assert_eq!(Felt::from_be_bytes(MODULUS_BE), Err(OverflowError));
    }

    #[test]
    fn modulus_reduces_to_zero() {
        assert_eq!(Felt::from_be_bytes_reduced(MODULUS_BE), Felt::ZERO);
    }

    #[test]
    fn reduction_matches_subtraction() {
        // modulus + 5 reduces to 5
        let mut bytes = MODULUS_BE;
        bytes[31] += 5;
        assert_eq!(Felt::from_be_bytes_reduced(bytes), Felt::from(5u64));
    }

    #[test]
    fn hex_round_trip() {
        let felt = Felt::from_hex_str("0x12fe03").unwrap();
        assert_eq!(felt.to_hex_str(), "0x12fe03");
        assert_eq!(Felt::from_hex_str("12FE03").unwrap(), felt);
    }

    #[test]
    fn hex_zero() {
        assert_eq!(Felt::from_hex_str("0x0").unwrap(), Felt::ZERO);
        assert_eq!(Felt::ZERO.to_hex_str(), "0x0");
    }

    #[test]
    fn hex_rejects_junk() {
        assert_eq!(
            Felt::from_hex_str("0x12g3"),
            Err(HexParseError::InvalidNibble(b'g'))
        );
        assert!(matches!(
            Felt::from_hex_str(
                "0x800000000000011000000000000000000000000000000000000000000000001"
            ),
            Err(HexParseError::Overflow(_))
        ));
    }

    #[test]
    fn from_u64() {
        assert_eq!(Felt::from(0u64), Felt::ZERO);
        assert_eq!(Felt::from(1u64), Felt::ONE);
        assert_eq!(Felt::from(0x1234u64).to_hex_str(), "0x1234");
    }

    #[test]
    fn bits_round_trip() {
        let felt = Felt::from_hex_str("0x123456789abcdef").unwrap();
        let bits = &felt.view_bits()[5..];
        assert_eq!(Felt::from_bits(bits).unwrap(), felt);
    }

    #[test]
    fn serde_hex_string() {
        let felt = Felt::from_hex_str("0xabc").unwrap();
        let json = serde_json::to_string(&felt).unwrap();
        assert_eq!(json, r#""0xabc""#);
        assert_eq!(serde_json::from_str::<Felt>(&json).unwrap(), felt);
    }
}
