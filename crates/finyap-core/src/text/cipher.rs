//! Phonetic silhouette of a word.
//!
//! Letters collapse to four class markers so the learner sees vowel height,
//! consonant positions and length but never the letters themselves.

/// Marker for `a`, `o`, `u`.
pub const LOW_VOWEL: char = 'U';
/// Marker for `e`, `i`.
pub const MID_VOWEL: char = 'E';
/// Marker for `ä`, `ö`, `y`.
pub const FRONT_VOWEL: char = 'Ä';
/// Marker for consonant letters.
pub const CONSONANT: char = 'x';

const CONSONANTS: &str = "bcdfghjklmnpqrstvwxzšž";

/// Replace every letter of `text` by its class marker.
///
/// Anything that is not a known letter (punctuation, digits, the markers
/// themselves) is copied through, so the output has as many chars as the input.
pub fn cipher(text: &str) -> String {
    text.chars().map(cipher_char).collect()
}

fn cipher_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'a' | 'o' | 'u' => LOW_VOWEL,
        'e' | 'i' => MID_VOWEL,
        'ä' | 'ö' | 'y' => FRONT_VOWEL,
        _ if CONSONANTS.contains(lower) => CONSONANT,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn maps_letter_classes() {
        assert_eq!(cipher("talo"), "xUxU");
        assert_eq!(cipher("Minä"), "xExÄ");
        assert_eq!(cipher("YÖ"), "ÄÄ");
    }

    #[test]
    fn passes_other_characters_through() {
        assert_eq!(cipher("linja-auto,"), "xExxU-UUxU,");
        assert_eq!(cipher("42"), "42");
    }

    #[test]
    fn cipher_is_stable_on_its_own_output() {
        let once = cipher("Hyvää päivää!");
        assert_eq!(cipher(&once), once);
    }

    proptest! {
        #[test]
        fn cipher_preserves_char_count(text in "[a-zA-ZäöÄÖyY.,!? -]{0,24}") {
            prop_assert_eq!(cipher(&text).chars().count(), text.chars().count());
        }
    }
}
