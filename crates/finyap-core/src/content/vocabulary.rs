use std::collections::BTreeSet;

use super::Sentence;

/// Distinct normalized words across `sentences`, sorted.
///
/// This is the candidate list offered to the word picker, so it is built
/// from the whole scenario content rather than just the sampled queue.
pub fn vocabulary<'a>(sentences: impl IntoIterator<Item = &'a Sentence>) -> BTreeSet<String> {
    sentences
        .into_iter()
        .flat_map(|s| s.normalized().iter())
        .filter(|w| !w.is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_distinct_words() {
        let a = Sentence::new(1, "s", "Minä menen.", "I go.").unwrap();
        let b = Sentence::new(2, "s", "Sinä menet , minä jään", "You go, I stay").unwrap();
        let vocab = vocabulary([&a, &b]);
        let words: Vec<_> = vocab.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["jään", "menen", "menet", "minä", "sinä"]);
    }
}
