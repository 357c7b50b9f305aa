use tracing::debug;

use super::matching::{
    match_fragments,
    restrict_fragments,
};
use super::peaks::prepare_peaks;
use super::search_results::{
    Match,
    Score,
};
use super::statistics::{
    intensity_score,
    ln_hypergeometric_upper_tail,
    total_score,
};
use crate::data_sources::{
    Peak,
    SpectraHolder,
    SpectraIndex,
    SpectrumSource,
};
use crate::models::{
    Lipid,
    MzTolerance,
    PreCursor,
};
use crate::parameters::SearchParameters;

#[derive(Debug, Clone, Copy)]
struct ScoringSettings {
    fragment_tolerance: MzTolerance,
    use_intensity: bool,
}

/// Peaks of an indexed spectrum after exclusion, top-N and normalization.
#[derive(Debug, Clone)]
struct PreparedSpectrum {
    title: Option<String>,
    peaks: Vec<Peak>,
}

/// Scores candidates against a read-only spectra index.
///
/// Peaks are prepared once per indexed spectrum on construction; scoring a
/// pair afterwards only reads shared state.
#[derive(Debug)]
pub struct Scorer<'a> {
    index: &'a SpectraIndex,
    prepared: Vec<PreparedSpectrum>,
    settings: ScoringSettings,
}

/// What scoring one candidate produced.
#[derive(Debug, Default)]
pub struct CandidateScores {
    pub precursors: usize,
    pub pairs: usize,
    pub scores: Vec<Score>,
}

impl<'a> Scorer<'a> {
    pub fn new<S: SpectrumSource + ?Sized>(
        source: &S,
        index: &'a SpectraIndex,
        params: &SearchParameters,
    ) -> Self {
        let prepared: Vec<PreparedSpectrum> = index
            .holders()
            .iter()
            .map(|h| PreparedSpectrum {
                title: source.title(h.spectrum_index).map(|t| t.to_string()),
                peaks: prepare_peaks(
                    &source.peaks(h.spectrum_index),
                    h.precursor_mz,
                    params.precursor_exclusion,
                    params.peak_number,
                ),
            })
            .collect();
        let empty = prepared.iter().filter(|p| p.peaks.is_empty()).count();
        if empty > 0 {
            debug!("{} indexed spectra have no peaks left after preparation", empty);
        }
        Self {
            index,
            prepared,
            settings: ScoringSettings {
                fragment_tolerance: params.fragment_tolerance,
                use_intensity: params.intensity_score,
            },
        }
    }

    pub fn index(&self) -> &SpectraIndex {
        self.index
    }

    /// Scores every precursor of `lipid` against every spectrum whose
    /// precursor window contains it.
    pub fn score_candidate(&self, lipid: &Lipid) -> CandidateScores {
        let mut out = CandidateScores {
            precursors: lipid.precursors.len(),
            ..Default::default()
        };
        for precursor in lipid.precursors.iter() {
            for position in self.index.overlapping(precursor.mz) {
                out.pairs += 1;
                if let Some(score) = self.score_pair(lipid, precursor, position) {
                    out.scores.push(score);
                }
            }
        }
        out
    }

    /// Scores one precursor against the indexed spectrum at `position`.
    ///
    /// Returns `None` when nothing matched or the spectrum has no usable peaks.
    #[cfg_attr(
        feature = "instrumentation",
        tracing::instrument(skip_all, level = "trace")
    )]
    pub fn score_pair(
        &self,
        lipid: &Lipid,
        precursor: &PreCursor,
        position: usize,
    ) -> Option<Score> {
        let holder = self.index.get(position)?;
        let prepared = self.prepared.get(position)?;
        let peaks = &prepared.peaks;
        if peaks.is_empty() {
            return None;
        }

        let fragments = restrict_fragments(&precursor.fragments, holder.scan_range);
        let matches = match_fragments(&fragments, peaks, &self.settings.fragment_tolerance);
        let n_matched = matches.iter().filter(|m| m.matched).count();
        if n_matched == 0 {
            return None;
        }

        let n_peaks = peaks.len();
        let n_fragments = matches.len();
        let n_bins = self
            .settings
            .fragment_tolerance
            .effective_bins(holder.scan_range)
            .max(n_peaks as u64)
            .max(n_fragments as u64);
        let ln_peak_score = ln_hypergeometric_upper_tail(
            n_bins,
            n_peaks as u64,
            n_fragments as u64,
            n_matched as u64,
        );
        let intensities: Vec<f64> = peaks.iter().map(|p| p.intensity).collect();
        let matched_intensity: f64 = matches.iter().map(|m| m.intensity).sum();
        let intensity_score = intensity_score(&intensities, n_matched, matched_intensity);
        let total_score = total_score(ln_peak_score, intensity_score, self.settings.use_intensity);

        let stats = Stats {
            total_score,
            ln_peak_score,
            intensity_score,
            n_bins,
            n_fragments,
            n_matched,
        };
        Some(self.assemble(lipid, precursor, holder, prepared, stats, matches))
    }

    fn assemble(
        &self,
        lipid: &Lipid,
        precursor: &PreCursor,
        holder: &SpectraHolder,
        prepared: &PreparedSpectrum,
        stats: Stats,
        matches: Vec<Match>,
    ) -> Score {
        Score {
            spectrum_index: holder.spectrum_index,
            title: prepared.title.clone(),
            retention_time: holder.retention_time,
            experimental_mz: holder.precursor_mz,
            name: lipid.name.clone(),
            formula: lipid.formula.to_string(),
            class: lipid.class(),
            modification: precursor.modification(),
            adduct: precursor.adduct.kind,
            adduct_type: precursor.adduct.adduct_type,
            calculated_mz: precursor.mz,
            charge: precursor.charge,
            decoy: lipid.decoy,
            total_score: stats.total_score,
            ln_peak_score: stats.ln_peak_score,
            intensity_score: stats.intensity_score,
            n_bins: stats.n_bins,
            n_peaks: prepared.peaks.len(),
            n_fragments: stats.n_fragments,
            n_matched: stats.n_matched,
            peaks: prepared.peaks.clone(),
            matches,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Stats {
    total_score: f64,
    ln_peak_score: f64,
    intensity_score: f64,
    n_bins: u64,
    n_fragments: usize,
    n_matched: usize,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrayvec::ArrayVec;

    use super::*;
    use crate::chemistry::{
        AdductCatalogue,
        AdductKind,
        BackBone,
        HeadGroup,
        LipidClass,
    };
    use crate::data_sources::{
        Spectrum,
        SpectrumCollection,
    };
    use crate::fragment_mass::FragmentMassBuilder;
    use crate::models::Chain;
    use crate::parameters::ParameterMap;
    use crate::utils::TupleRange;

    fn pc() -> Lipid {
        let chains: ArrayVec<Chain, 4> = [Chain::acyl(16, 0).unwrap(), Chain::acyl(18, 1).unwrap()]
            .into_iter()
            .collect();
        let lipid = Lipid::new(
            Arc::new(BackBone::glycerophosphate(1.0)),
            Arc::new(HeadGroup::new(LipidClass::PC, 1.0)),
            chains,
        );
        FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[AdductKind::Protonated]))
            .with_precursors(lipid)
    }

    fn collection(precursor_mz: f64, peaks: Vec<Peak>) -> SpectrumCollection {
        vec![Spectrum {
            title: Some("scan=1".into()),
            precursor_mz: Some(precursor_mz),
            retention_time: Some(600.0),
            scan_window: Some(TupleRange::try_new(100.0, 1000.0).unwrap()),
            peaks,
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_scores_matching_spectrum() {
        let lipid = pc();
        let precursor = &lipid.precursors[0];
        let wanted = ["phosphocholine ion", "loss of FA 16:0 as ketene"];
        let peaks: Vec<Peak> = precursor
            .fragments
            .iter()
            .filter(|f| wanted.contains(&f.description.as_str()))
            .map(|f| Peak {
                mz: f.mz,
                intensity: 100.0,
            })
            .collect();
        assert_eq!(peaks.len(), 2);

        let spectra = collection(precursor.mz, peaks);
        let params = SearchParameters::from_map(&ParameterMap::new());
        let index = SpectraIndex::build(&spectra, &params.precursor_tolerance).unwrap();
        let scorer = Scorer::new(&spectra, &index, &params);
        let out = scorer.score_candidate(&lipid);
        assert_eq!(out.precursors, 1);
        assert_eq!(out.pairs, 1);
        assert_eq!(out.scores.len(), 1);

        let score = &out.scores[0];
        assert_eq!(score.n_matched, 2);
        assert_eq!(score.n_peaks, 2);
        assert_eq!(score.title.as_deref(), Some("scan=1"));
        assert!(score.total_score > 0.0);
        // Both peaks matched, so the intensity component is uninformative
        assert_eq!(score.intensity_score, 0.0);
        assert!(score.matched().all(|m| m.intensity == 500.0));
    }

    #[test]
    fn test_no_match_no_score() {
        let lipid = pc();
        let spectra = collection(
            lipid.precursors[0].mz,
            vec![Peak {
                mz: 333.333,
                intensity: 10.0,
            }],
        );
        let params = SearchParameters::from_map(&ParameterMap::new());
        let index = SpectraIndex::build(&spectra, &params.precursor_tolerance).unwrap();
        let scorer = Scorer::new(&spectra, &index, &params);
        let out = scorer.score_candidate(&lipid);
        assert_eq!(out.pairs, 1);
        assert!(out.scores.is_empty());
    }
}
