//! Structural display model for a sentence in play.
//!
//! Nothing here knows about colours or terminals. Words are split into
//! annotated segments and the presentation layer decides how to draw them.

use serde::{Deserialize, Serialize};

use crate::text::{cipher, CliticSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Stem,
    Clitic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordState {
    /// Already guessed (or auto-revealed); shown in plain text.
    Revealed,
    /// The word being guessed now; ciphered and highlighted.
    Current,
    /// Still ahead; ciphered.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordView {
    pub index: usize,
    pub state: WordState,
    pub segments: Vec<Segment>,
}

impl WordView {
    /// Segments joined back into one string.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Display model for one word.
///
/// Revealed words keep their letters; everything else is ciphered, stem
/// and clitics separately so the particles stay visually apart.
pub fn word_view(word: &str, index: usize, state: WordState, clitics: &CliticSet) -> WordView {
    let seg = clitics.segment(word);
    let show = |text: &str| match state {
        WordState::Revealed => text.to_string(),
        WordState::Current | WordState::Hidden => cipher(text),
    };

    let mut segments = Vec::with_capacity(seg.clitics.len() + 1);
    if !seg.stem.is_empty() {
        segments.push(Segment {
            text: show(&seg.stem),
            kind: SegmentKind::Stem,
        });
    }
    segments.extend(seg.clitics.iter().map(|c| Segment {
        text: show(c),
        kind: SegmentKind::Clitic,
    }));

    WordView {
        index,
        state,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_word_ciphers_stem_and_clitic_separately() {
        let view = word_view("Minäkin", 0, WordState::Hidden, &CliticSet::default());
        assert_eq!(
            view.segments,
            vec![
                Segment { text: "xExÄ".into(), kind: SegmentKind::Stem },
                Segment { text: "xEx".into(), kind: SegmentKind::Clitic },
            ]
        );
        assert_eq!(view.text(), "xExÄxEx");
    }

    #[test]
    fn revealed_word_keeps_letters() {
        let view = word_view("Minäkin", 2, WordState::Revealed, &CliticSet::default());
        assert_eq!(view.text(), "Minäkin");
        assert_eq!(view.segments[1].kind, SegmentKind::Clitic);
        assert_eq!(view.index, 2);
    }

    #[test]
    fn plain_word_is_one_stem_segment() {
        let view = word_view("talo.", 1, WordState::Current, &CliticSet::default());
        assert_eq!(view.segments.len(), 1);
        assert_eq!(view.segments[0].text, "xUxU.");
    }
}
