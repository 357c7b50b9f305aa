use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use super::search_results::Score;
use super::secondary::{
    Bucket,
    Secondary,
    TopTwo,
};

/// Highest total first, then the more significant intensity component, then name.
fn rank(a: &Score, b: &Score) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then(a.intensity_score.total_cmp(&b.intensity_score))
        .then_with(|| a.name.cmp(&b.name))
}

fn bucket_of(score: &Score) -> Bucket {
    Bucket::of(score.class, score.adduct)
}

/// Sorts and keeps the leading score of every bucket.
fn keep_bucket_leaders(scores: &mut Vec<Score>) {
    scores.sort_by(rank);
    let mut seen = [false; Bucket::COUNT];
    scores.retain(|s| !std::mem::replace(&mut seen[bucket_of(s).index()], true));
}

/// Everything retained for one spectrum.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpectrumResults {
    /// At most one score per bucket, best first.
    pub scores: Vec<Score>,
    pub top: TopTwo,
    pub secondary: Secondary,
    pub decoys: Vec<Score>,
}

impl SpectrumResults {
    pub fn best(&self) -> Option<&Score> {
        self.scores.first()
    }

    pub fn best_decoy(&self) -> Option<&Score> {
        self.decoys.first()
    }
}

/// Owns all mutable search state. Scores must be recorded in enumeration
/// order for a run to be reproducible.
#[derive(Debug, Clone, Default)]
pub struct ScoringSession {
    spectra: BTreeMap<usize, SpectrumResults>,
    recorded: u64,
}

impl ScoringSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: Score) {
        self.recorded += 1;
        let entry = self.spectra.entry(score.spectrum_index).or_default();
        if score.is_decoy() {
            entry.decoys.push(score);
            keep_bucket_leaders(&mut entry.decoys);
            return;
        }
        trace!(
            "spectrum {} <- {} ({:.3})",
            score.spectrum_index,
            score.name,
            score.total_score
        );
        entry.top.offer(score.total_score);
        entry.secondary.update(bucket_of(&score), score.total_score);
        entry.scores.push(score);
        keep_bucket_leaders(&mut entry.scores);
    }

    pub fn record_all(&mut self, scores: impl IntoIterator<Item = Score>) {
        for score in scores {
            self.record(score);
        }
    }

    pub fn get(&self, spectrum_index: usize) -> Option<&SpectrumResults> {
        self.spectra.get(&spectrum_index)
    }

    /// Spectra with at least one recorded score, by ascending spectrum index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SpectrumResults)> {
        self.spectra.iter().map(|(k, v)| (*k, v))
    }

    /// Number of scores handed to [`ScoringSession::record`].
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn retained(&self) -> usize {
        self.spectra.values().map(|s| s.scores.len()).sum()
    }

    pub fn retained_decoys(&self) -> usize {
        self.spectra.values().map(|s| s.decoys.len()).sum()
    }
}
