//! 25-word secret phrases.
//!
//! The first 24 words carry the 32-byte ed25519 seed as little-endian 11-bit groups drawn
//! from the BIP-39 English word list. The 25th word is a checksum taken from the first
//! 11 bits of the SHA-512/256 digest of the seed.

use crate::constants::{Byte32, MNEMONIC_BITS_PER_WORD, MNEMONIC_WORD_COUNT};
use crate::error::GroupfundTransactError;
use crate::utils::hash;
use bip39::Language;

const WORD_MASK: u32 = (1 << MNEMONIC_BITS_PER_WORD) - 1;

/// Trims the phrase, collapses runs of whitespace to single spaces and lowercases it.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Encodes a 32-byte seed as a 25-word phrase.
pub fn from_key(seed: &Byte32) -> String {
    let words = Language::English.word_list();
    let mut indices = to_11_bit(seed);
    indices.push(checksum_index(seed));
    indices
        .into_iter()
        .map(|i| words[i as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recovers the 32-byte seed from a 25-word phrase, verifying its checksum word.
pub fn to_key(phrase: &str) -> Result<Byte32, GroupfundTransactError> {
    let normalized = normalize_phrase(phrase);
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

    if words.len() != MNEMONIC_WORD_COUNT {
        return Err(GroupfundTransactError::InvalidMnemonic {
            message: format!(
                "expected {} words, got {}",
                MNEMONIC_WORD_COUNT,
                words.len()
            ),
        });
    }

    let word_list = Language::English.word_list();
    let indices = words
        .iter()
        .map(|word| {
            word_list
                .iter()
                .position(|candidate| candidate == word)
                .map(|i| i as u32)
                .ok_or_else(|| GroupfundTransactError::InvalidMnemonic {
                    message: format!("'{}' is not in the word list", word),
                })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let (checksum_word, data_words) = indices
        .split_last()
        .ok_or_else(|| GroupfundTransactError::InvalidMnemonic {
            message: "phrase is empty".to_string(),
        })?;

    let bytes = from_11_bit(data_words);
    // 24 words hold 264 bits: 32 seed bytes plus one byte that must be zero.
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(GroupfundTransactError::InvalidMnemonic {
            message: "phrase does not encode a 32-byte key".to_string(),
        });
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);

    if checksum_index(&seed) != *checksum_word {
        return Err(GroupfundTransactError::InvalidMnemonic {
            message: "checksum word does not match".to_string(),
        });
    }

    Ok(seed)
}

fn checksum_index(seed: &Byte32) -> u32 {
    let digest = hash(seed);
    to_11_bit(&digest[..2])[0]
}

fn to_11_bit(bytes: &[u8]) -> Vec<u32> {
    let mut buffer: u32 = 0;
    let mut num_bits = 0;
    let mut out = Vec::with_capacity(bytes.len() * 8 / MNEMONIC_BITS_PER_WORD + 1);

    for &byte in bytes {
        buffer |= (byte as u32) << num_bits;
        num_bits += 8;
        if num_bits >= MNEMONIC_BITS_PER_WORD {
            out.push(buffer & WORD_MASK);
            buffer >>= MNEMONIC_BITS_PER_WORD;
            num_bits -= MNEMONIC_BITS_PER_WORD;
        }
    }
    if num_bits != 0 {
        out.push(buffer & WORD_MASK);
    }
    out
}

fn from_11_bit(words: &[u32]) -> Vec<u8> {
    let mut buffer: u32 = 0;
    let mut num_bits = 0;
    let mut out = Vec::with_capacity(words.len() * MNEMONIC_BITS_PER_WORD / 8 + 1);

    for &word in words {
        buffer |= word << num_bits;
        num_bits += MNEMONIC_BITS_PER_WORD;
        while num_bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            num_bits -= 8;
        }
    }
    if num_bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_phrase_has_25_words_and_round_trips() {
        let seed = [7u8; 32];
        let phrase = from_key(&seed);
        assert_eq!(phrase.split(' ').count(), MNEMONIC_WORD_COUNT);
        assert_eq!(to_key(&phrase).unwrap(), seed);
    }

    fn phrase_from_indices(indices: &[usize]) -> String {
        let words = Language::English.word_list();
        indices
            .iter()
            .map(|&i| words[i])
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[rstest]
    #[case::sevens(
        [7u8; 32],
        [
            1799, 224, 1052, 899, 112, 1550, 449, 56, 1799, 224, 1052, 899, 112, 1550, 449, 56,
            1799, 224, 1052, 899, 112, 1550, 449, 0, 413,
        ]
    )]
    #[case::zeros([0u8; 32], { let mut i = [0; 25]; i[24] = 943; i })]
    fn test_known_phrase_word_indices(#[case] seed: Byte32, #[case] indices: [usize; 25]) {
        let expected = phrase_from_indices(&indices);
        assert_eq!(from_key(&seed), expected);
        assert_eq!(to_key(&expected).unwrap(), seed);
    }

    #[test]
    fn test_messy_whitespace_and_case_are_accepted() {
        let seed = [42u8; 32];
        let phrase = from_key(&seed);
        let messy = format!(
            "  {}\n",
            phrase.to_uppercase().replace(' ', " \t  ")
        );
        assert_eq!(to_key(&messy).unwrap(), seed);
    }

    #[test]
    fn test_wrong_checksum_word_is_rejected() {
        let phrase = from_key(&[7u8; 32]);
        let mut words: Vec<&str> = phrase.split(' ').collect();
        let last = words[24];
        words[24] = if last == "abandon" { "ability" } else { "abandon" };

        let err = to_key(&words.join(" ")).unwrap_err();
        assert!(err.to_string().contains("checksum"), "{}", err);
    }

    #[rstest]
    #[case::too_short("abandon abandon abandon")]
    #[case::empty("")]
    fn test_wrong_word_count_is_rejected(#[case] phrase: &str) {
        let err = to_key(phrase).unwrap_err();
        assert!(err.to_string().contains("expected 25 words"), "{}", err);
    }

    #[test]
    fn test_unknown_word_is_rejected() {
        let phrase = from_key(&[1u8; 32]);
        let mut words: Vec<&str> = phrase.split(' ').collect();
        words[3] = "notaword";
        let err = to_key(&words.join(" ")).unwrap_err();
        assert!(err.to_string().contains("notaword"), "{}", err);
    }

    #[test]
    fn test_nonzero_padding_is_rejected() {
        // "zoo" (2047) in position 24 sets bits past the 256-bit seed.
        let mut words = vec!["abandon"; 23];
        words.push("zoo");
        words.push("abandon");
        let err = to_key(&words.join(" ")).unwrap_err();
        assert!(err.to_string().contains("32-byte key"), "{}", err);
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  Foo \n\tBAR  baz "), "foo bar baz");
    }
}
