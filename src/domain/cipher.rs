/// Cipher generation and text encryption.
///
/// A `CipherMapping` is a permutation of the alphabet with both directions
/// materialized. The invariant is a true bijection: every letter appears
/// exactly once as a source and exactly once as a target. Fixed points are
/// legal — a letter may map to itself.
///
/// Randomness is threaded in by the caller (`&mut impl Rng`); the module
/// keeps no random state of its own. Uniformity over permutations is the
/// requirement here (fairness), not cryptographic strength.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::alphabet::{letter_index, ALPHABET, ALPHABET_LEN};

/// Placeholder shown for a letter position that has not been revealed.
pub const MASK_GLYPH: char = '_';

/// The array passed to `from_permutation` was not a bijection over the
/// alphabet (a repeated letter, or a character outside `A..=Z`).
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
#[error("not a permutation of the alphabet")]
pub struct InvalidPermutation;

/// A bijective substitution mapping over the alphabet.
///
/// `forward[i]` is the cipher image of the i-th plaintext letter;
/// `inverse` is its exact functional inverse, built at construction so
/// decryption queries never search.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CipherMapping {
    forward: [char; ALPHABET_LEN],
    inverse: [char; ALPHABET_LEN],
}

impl CipherMapping {
    /// Generate a uniformly random permutation of the alphabet.
    pub fn generate(rng: &mut impl Rng) -> Self {
        // Fisher–Yates over a copy of the alphabet: a shuffle of a
        // permutation is a permutation, so the invariant holds by
        // construction.
        let mut forward = ALPHABET;
        forward.shuffle(rng);
        let mut inverse = [MASK_GLYPH; ALPHABET_LEN];
        for (plain_idx, &cipher) in forward.iter().enumerate() {
            if let Some(cipher_idx) = letter_index(cipher) {
                inverse[cipher_idx] = ALPHABET[plain_idx];
            }
        }
        CipherMapping { forward, inverse }
    }

    /// Build a mapping from an explicit permutation array, where index i
    /// holds the cipher image of the i-th plaintext letter. Rejects
    /// anything that is not a bijection over the alphabet.
    pub fn from_permutation(
        forward: [char; ALPHABET_LEN],
    ) -> Result<Self, InvalidPermutation> {
        let mut inverse = [MASK_GLYPH; ALPHABET_LEN];
        let mut seen = [false; ALPHABET_LEN];
        for (plain_idx, &cipher) in forward.iter().enumerate() {
            let cipher_idx = letter_index(cipher).ok_or(InvalidPermutation)?;
            if seen[cipher_idx] {
                return Err(InvalidPermutation);
            }
            seen[cipher_idx] = true;
            inverse[cipher_idx] = ALPHABET[plain_idx];
        }
        Ok(CipherMapping { forward, inverse })
    }

    /// Cipher image of a plaintext letter. Non-letters pass through.
    #[inline]
    pub fn encrypt_char(&self, c: char) -> char {
        match letter_index(c) {
            Some(i) => self.forward[i],
            None => c,
        }
    }

    /// Plaintext source of a cipher letter. Non-letters pass through.
    #[inline]
    pub fn decrypt_char(&self, c: char) -> char {
        match letter_index(c) {
            Some(i) => self.inverse[i],
            None => c,
        }
    }

    /// Encrypt a whole solution: letters mapped, everything else unchanged.
    pub fn encrypt(&self, solution: &str) -> String {
        solution.chars().map(|c| self.encrypt_char(c)).collect()
    }
}

/// The masked text shown before any guess: every letter replaced by
/// `MASK_GLYPH`, non-letters passed through unchanged.
pub fn initial_display(solution: &str) -> String {
    solution
        .chars()
        .map(|c| if letter_index(c).is_some() { MASK_GLYPH } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generated_mapping_is_a_bijection() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let m = CipherMapping::generate(&mut rng);

            let mut as_source = [false; ALPHABET_LEN];
            let mut as_target = [false; ALPHABET_LEN];
            for &c in ALPHABET.iter() {
                let img = m.encrypt_char(c);
                let src = letter_index(img).expect("image stays in alphabet");
                assert!(!as_target[src], "two letters share target {img}");
                as_target[src] = true;
                as_source[letter_index(c).unwrap()] = true;
            }
            assert!(as_source.iter().all(|&b| b));
            assert!(as_target.iter().all(|&b| b));
        }
    }

    #[test]
    fn inverse_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let m = CipherMapping::generate(&mut rng);
        for &c in ALPHABET.iter() {
            assert_eq!(m.decrypt_char(m.encrypt_char(c)), c);
            assert_eq!(m.encrypt_char(m.decrypt_char(c)), c);
        }
    }

    #[test]
    fn encrypt_passes_non_letters_through() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let m = CipherMapping::generate(&mut rng);
        let out = m.encrypt("TO BE, OR NOT!");
        // Same shape: letters stay letters, the rest is untouched.
        for (s, o) in "TO BE, OR NOT!".chars().zip(out.chars()) {
            if letter_index(s).is_some() {
                assert!(letter_index(o).is_some());
            } else {
                assert_eq!(s, o);
            }
        }
    }

    #[test]
    fn from_permutation_rejects_duplicates() {
        let mut forward = ALPHABET;
        forward[1] = 'A'; // 'A' now a target twice
        assert_eq!(
            CipherMapping::from_permutation(forward),
            Err(InvalidPermutation)
        );
    }

    #[test]
    fn from_permutation_rejects_foreign_chars() {
        let mut forward = ALPHABET;
        forward[0] = '?';
        assert!(CipherMapping::from_permutation(forward).is_err());
    }

    #[test]
    fn identity_permutation_is_legal() {
        // No fixed-point restriction: the identity is a valid (if useless)
        // cipher.
        let m = CipherMapping::from_permutation(ALPHABET).unwrap();
        assert_eq!(m.encrypt("HELLO"), "HELLO");
    }

    #[test]
    fn initial_display_masks_only_letters() {
        assert_eq!(initial_display("AB C!"), "__ _!");
        assert_eq!(initial_display("..."), "...");
    }
}
