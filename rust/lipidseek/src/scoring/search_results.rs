use serde::Serialize;

use crate::chemistry::{
    AdductKind,
    AdductType,
    LipidClass,
};
use crate::data_sources::Peak;
use crate::models::{
    DecoyMarking,
    FragmentKind,
};

/// Outcome of one retained theoretical fragment against the prepared peaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub fragment_mz: f64,
    pub description: String,
    pub kind: FragmentKind,
    pub matched: bool,
    /// Position in [`Score::peaks`] of the awarded peak.
    pub peak_index: Option<usize>,
    pub peak_mz: Option<f64>,
    /// Normalized intensity of the awarded peak, 0 when unmatched.
    pub intensity: f64,
}

/// One scored (spectrum, candidate precursor) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub spectrum_index: usize,
    pub title: Option<String>,
    pub retention_time: Option<f64>,
    pub experimental_mz: f64,

    pub name: String,
    pub formula: String,
    pub class: LipidClass,
    pub modification: &'static str,
    pub adduct: AdductKind,
    pub adduct_type: AdductType,
    pub calculated_mz: f64,
    pub charge: u8,
    pub decoy: DecoyMarking,

    pub total_score: f64,
    /// Natural log of the hypergeometric tail probability.
    pub ln_peak_score: f64,
    /// `log10` of the intensity rank fraction.
    pub intensity_score: f64,

    pub n_bins: u64,
    pub n_peaks: usize,
    pub n_fragments: usize,
    pub n_matched: usize,

    pub peaks: Vec<Peak>,
    pub matches: Vec<Match>,
}

impl Score {
    pub fn is_decoy(&self) -> bool {
        self.decoy.is_decoy()
    }

    /// Peak score as a probability. Underflows to 0 for very strong matches.
    pub fn peak_score(&self) -> f64 {
        self.ln_peak_score.exp()
    }

    pub fn matched(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.matched)
    }
}
