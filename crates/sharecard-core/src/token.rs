//! Short public tokens for share links.
//!
//! Tokens are 6 characters from a 36-symbol alphabet (about 2.18e9 values).
//! They come from a non-cryptographic RNG and are never checked against the
//! store before use: a collision silently overwrites the older record.

use rand::Rng;

/// Number of characters in a token.
pub const TOKEN_LEN: usize = 6;

/// Symbols a token is drawn from.
pub const TOKEN_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a new token using the thread-local RNG.
pub fn generate_token() -> String {
    generate_token_with(&mut rand::thread_rng())
}

/// Generate a token from the given RNG.
pub fn generate_token_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Check whether a string has the shape of a token.
///
/// Anything else can never have been issued, so callers treat it as not found
/// without a store lookup.
pub fn is_valid_token(s: &str) -> bool {
    s.len() == TOKEN_LEN && s.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn token_has_fixed_length_and_alphabet() {
        for _ in 0..1000 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(is_valid_token(&token), "bad token {token}");
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate_token_with(&mut StdRng::seed_from_u64(7));
        let b = generate_token_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn sequential_tokens_differ() {
        let a = generate_token();
        let b = generate_token();
        // 1 in 2.18e9 chance of a false failure
        assert_ne!(a, b);
    }

    #[test]
    fn uses_whole_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.extend(generate_token_with(&mut rng).bytes());
        }
        assert_eq!(seen.len(), TOKEN_ALPHABET.len());
    }

    #[test]
    fn is_valid_token_rejects_wrong_shapes() {
        assert!(is_valid_token("abc123"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("abc12"));
        assert!(!is_valid_token("abc1234"));
        assert!(!is_valid_token("ABC123"));
        assert!(!is_valid_token("abc-12"));
        assert!(!is_valid_token("abc12é"));
    }
}
