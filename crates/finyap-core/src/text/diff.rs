//! Positional character diff for post-guess review.
//!
//! Comparison is by code point position only. An inserted or dropped
//! character shifts everything after it into mismatch.

use serde::{Deserialize, Serialize};

use super::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Match,
    Mismatch,
}

/// One character with its diff annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotated {
    pub ch: char,
    pub mark: Mark,
}

impl Annotated {
    fn new(ch: char, mark: Mark) -> Self {
        Self { ch, mark }
    }

    pub fn is_match(&self) -> bool {
        self.mark == Mark::Match
    }
}

/// Both sides of a diff. Each side only holds the characters it actually has,
/// so the shorter side ends early.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub input: Vec<Annotated>,
    pub target: Vec<Annotated>,
}

impl Diff {
    pub fn is_exact(&self) -> bool {
        self.input.len() == self.target.len()
            && self.input.iter().chain(&self.target).all(Annotated::is_match)
    }
}

/// Align `input` against `target` position by position, ignoring case.
pub fn diff(input: &str, target: &str) -> Diff {
    let input: Vec<char> = input.chars().collect();
    let target: Vec<char> = target.chars().collect();
    let len = input.len().max(target.len());

    let mut out = Diff {
        input: Vec::with_capacity(input.len()),
        target: Vec::with_capacity(target.len()),
    };

    for i in 0..len {
        match (input.get(i), target.get(i)) {
            (Some(&a), Some(&b)) => {
                let mark = if same_ignoring_case(a, b) {
                    Mark::Match
                } else {
                    Mark::Mismatch
                };
                out.input.push(Annotated::new(a, mark));
                out.target.push(Annotated::new(b, mark));
            }
            (Some(&a), None) => out.input.push(Annotated::new(a, Mark::Mismatch)),
            (None, Some(&b)) => out.target.push(Annotated::new(b, Mark::Mismatch)),
            (None, None) => {}
        }
    }
    out
}

/// Running feedback while a guess is being typed.
///
/// The partial input is normalized first and compared exactly against the
/// normalized target. Returns `None` when there is nothing to show yet.
pub fn live_feedback(input: &str, normalized_target: &str) -> Option<Vec<Annotated>> {
    let input = normalize(input);
    if input.is_empty() {
        return None;
    }
    let target: Vec<char> = normalized_target.chars().collect();
    let marks = input
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let mark = match target.get(i) {
                Some(&t) if t == c => Mark::Match,
                _ => Mark::Mismatch,
            };
            Annotated::new(c, mark)
        })
        .collect();
    Some(marks)
}

fn same_ignoring_case(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(side: &[Annotated]) -> Vec<Mark> {
        side.iter().map(|a| a.mark).collect()
    }

    #[test]
    fn missing_tail_character() {
        let d = diff("talo", "talon");
        assert_eq!(d.input.len(), 4);
        assert!(d.input.iter().all(Annotated::is_match));
        assert_eq!(d.target.len(), 5);
        assert!(d.target[..4].iter().all(Annotated::is_match));
        assert_eq!(d.target[4], Annotated::new('n', Mark::Mismatch));
        assert!(!d.is_exact());
    }

    #[test]
    fn case_is_ignored() {
        let d = diff("MINÄ", "minä");
        assert!(d.is_exact());
        assert_eq!(d.input.iter().map(|a| a.ch).collect::<String>(), "MINÄ");
    }

    #[test]
    fn substitution_marks_both_sides() {
        let d = diff("meen", "menen");
        assert_eq!(
            marks(&d.input),
            vec![Mark::Match, Mark::Match, Mark::Mismatch, Mark::Mismatch]
        );
        assert_eq!(
            marks(&d.target),
            vec![Mark::Match, Mark::Match, Mark::Mismatch, Mark::Mismatch, Mark::Mismatch]
        );
    }

    #[test]
    fn extra_input_is_mismatch() {
        let d = diff("talot", "talo");
        assert_eq!(d.input[4], Annotated::new('t', Mark::Mismatch));
        assert_eq!(d.target.len(), 4);
    }

    #[test]
    fn live_feedback_is_empty_for_blank_input() {
        assert!(live_feedback("", "talo").is_none());
        assert!(live_feedback("?", "talo").is_none());
    }

    #[test]
    fn live_feedback_marks_prefix() {
        let fb = live_feedback("Tav", "talo").unwrap();
        assert_eq!(marks(&fb), vec![Mark::Match, Mark::Match, Mark::Mismatch]);
    }
}
