//! Shared-secret check for incoming slash commands

/// Compare the presented token with the configured one in constant time
///
/// Both inputs are padded to the longer length with different fill bytes, so
/// neither the contents nor the length of the secret leak through timing.
pub fn token_matches(presented: &str, expected: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = presented.len().max(expected.len());

    let mut presented_padded = vec![0u8; max_len];
    let mut expected_padded = vec![0xFFu8; max_len];
    presented_padded[..presented.len()].copy_from_slice(presented.as_bytes());
    expected_padded[..expected.len()].copy_from_slice(expected.as_bytes());

    let lengths_equal = presented.len().ct_eq(&expected.len());
    let contents_equal = presented_padded.ct_eq(&expected_padded);

    (lengths_equal & contents_equal).into()
}
