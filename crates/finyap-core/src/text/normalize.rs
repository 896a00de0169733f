/// Punctuation stripped from both ends of a word.
const TRIM_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '(', ')', '[', ']', '{', '}', '„', '“', '”', '«', '»',
];

/// Lowercase a word and strip leading/trailing punctuation.
///
/// Interior punctuation is kept, so hyphenated compounds survive intact.
pub fn normalize(word: &str) -> String {
    word.to_lowercase().trim_matches(TRIM_CHARS).to_string()
}

/// A token is guessable when something is left after normalization.
pub fn is_guessable(word: &str) -> bool {
    !normalize(word).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("Minä,"), "minä");
        assert_eq!(normalize("„Hei!“"), "hei");
        assert_eq!(normalize("(Talo)."), "talo");
    }

    #[test]
    fn keeps_interior_punctuation() {
        assert_eq!(normalize("Linja-auto."), "linja-auto");
        assert_eq!(normalize("e.g."), "e.g");
    }

    #[test]
    fn pure_punctuation_is_not_guessable() {
        assert_eq!(normalize("—"), "—");
        assert!(!is_guessable("..."));
        assert!(!is_guessable("?!"));
        assert!(is_guessable("ok?"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(word in "\\PC{0,16}") {
            let once = normalize(&word);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
