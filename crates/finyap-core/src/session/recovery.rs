//! Recovery passes: replay what failed until a pass is clean.

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::{Sentence, SentenceId};

use super::SessionQueue;

/// Outcome of the end-of-pass check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPass {
    /// Replay these failed sentences.
    Replay(SessionQueue),
    /// Nothing failed; the session is mastered.
    Done,
}

/// Decide what follows a finished pass.
///
/// Failed ids are resolved against the sentences of the pass that just
/// ended, one sentence per id, and shuffled into a recovery queue. Ids
/// that no longer resolve are dropped.
pub fn next_pass<R: Rng + ?Sized>(
    failures: &BTreeSet<SentenceId>,
    played: &[Sentence],
    rng: &mut R,
) -> NextPass {
    if failures.is_empty() {
        return NextPass::Done;
    }

    let mut seen = HashSet::new();
    let mut replay: Vec<Sentence> = played
        .iter()
        .filter(|s| failures.contains(&s.id()) && seen.insert(s.id()))
        .cloned()
        .collect();
    if replay.is_empty() {
        tracing::warn!(failed = failures.len(), "failed sentences missing from pass");
        return NextPass::Done;
    }
    replay.shuffle(rng);
    NextPass::Replay(SessionQueue::recovery(replay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn catalog() -> Vec<Sentence> {
        (1..=4)
            .map(|i| Sentence::new(i, "s", format!("Lause {i}"), "Sentence").unwrap())
            .collect()
    }

    #[test]
    fn no_failures_means_done() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert_eq!(next_pass(&BTreeSet::new(), &catalog(), &mut rng), NextPass::Done);
    }

    #[test]
    fn failures_become_recovery_queue() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let failures: BTreeSet<_> = [2, 4].into_iter().collect();
        let NextPass::Replay(queue) = next_pass(&failures, &catalog(), &mut rng) else {
            panic!("expected a replay");
        };
        assert!(queue.is_recovery());
        let mut ids: Vec<_> = queue.sentences().iter().map(Sentence::id).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn shared_id_replays_once() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let played = vec![
            Sentence::new(1, "a.tsv", "Kiitos paljon.", "Thanks a lot.").unwrap(),
            Sentence::new(1, "b.tsv", "Kiitos paljon.", "Many thanks.").unwrap(),
        ];
        let failures: BTreeSet<_> = [1].into_iter().collect();
        let NextPass::Replay(queue) = next_pass(&failures, &played, &mut rng) else {
            panic!("expected a replay");
        };
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.sentences()[0].scenario(), "a.tsv");
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let failures: BTreeSet<_> = [99].into_iter().collect();
        assert_eq!(next_pass(&failures, &catalog(), &mut rng), NextPass::Done);
    }
}
