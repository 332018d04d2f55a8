/// Creates a [Felt](kestrel_crypto::Felt) from a hex string literal verified
/// at compile time.
#[macro_export]
macro_rules! felt {
    ($hex:expr) => {{
        // Forces const evaluation; without the const binding the parse would
        // only run at runtime.
        const CONST_FELT: kestrel_crypto::Felt =
            match kestrel_crypto::Felt::from_hex_str($hex) {
                Ok(f) => f,
                Err(kestrel_crypto::HexParseError::InvalidNibble(_)) => panic!("Invalid hex digit"),
                Err(kestrel_crypto::HexParseError::InvalidLength(_)) => panic!("Too many hex digits"),
                Err(kestrel_crypto::HexParseError::Overflow(_)) => panic!("Felt overflow"),
            };
        CONST_FELT
    }};
}

/// Creates a [Felt](kestrel_crypto::Felt) from a byte string literal verified
/// at compile time.
#[macro_export]
macro_rules! felt_bytes {
    ($bytes:expr) => {{
        const CONST_FELT: kestrel_crypto::Felt =
            match kestrel_crypto::Felt::from_be_slice($bytes) {
                Ok(f) => f,
                Err(kestrel_crypto::OverflowError) => panic!("Felt overflow"),
            };
        CONST_FELT
    }};
}

#[cfg(test)]
mod tests {
    use kestrel_crypto::Felt;

    #[test]
    fn felt_macro() {
        assert_eq!(felt!("0x1234"), Felt::from(0x1234u64));
        assert_eq!(felt!("1234"), Felt::from(0x1234u64));
    }

    #[test]
    fn felt_bytes_macro() {
        assert_eq!(
            felt_bytes!(b"a"),
            Felt::from(b'a' as u64),
        );
    }
}
