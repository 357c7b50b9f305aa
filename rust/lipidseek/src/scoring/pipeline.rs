use std::time::{
    Duration,
    Instant,
};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{
    debug,
    info,
};

use super::scorer::{
    CandidateScores,
    Scorer,
};
use super::session::ScoringSession;
use crate::fragment_mass::FragmentMassBuilder;
use crate::models::{
    DecoyStrategy,
    Lipid,
};
use crate::parameters::SearchParameters;

/// Counters of one search run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub candidates: u64,
    pub precursors: u64,
    pub pairs_scored: u64,
    pub scores_recorded: u64,
    pub scores_retained: u64,
    pub decoy_scores_retained: u64,
    pub spectra_with_scores: u64,
    pub elapsed: Duration,
}

impl Serialize for RunSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RunSummary", 8)?;
        state.serialize_field("candidates", &self.candidates)?;
        state.serialize_field("precursors", &self.precursors)?;
        state.serialize_field("pairs_scored", &self.pairs_scored)?;
        state.serialize_field("scores_recorded", &self.scores_recorded)?;
        state.serialize_field("scores_retained", &self.scores_retained)?;
        state.serialize_field("decoy_scores_retained", &self.decoy_scores_retained)?;
        state.serialize_field("spectra_with_scores", &self.spectra_with_scores)?;
        state.serialize_field("elapsed_ms", &self.elapsed.as_millis())?;
        state.end()
    }
}

/// Streams candidates through derivation and scoring.
///
/// Candidates are pulled in chunks of `chunk_size`. The chunk is derived and
/// scored on the rayon pool, then its scores are applied to the session in
/// enumeration order, so the outcome does not depend on the thread count.
pub struct SearchPipeline<'a> {
    builder: FragmentMassBuilder,
    scorer: Scorer<'a>,
    chunk_size: usize,
    decoy_strategy: DecoyStrategy,
}

struct ChunkItem {
    target: CandidateScores,
    decoy: Option<CandidateScores>,
}

impl<'a> SearchPipeline<'a> {
    pub fn new(
        builder: FragmentMassBuilder,
        scorer: Scorer<'a>,
        params: &SearchParameters,
    ) -> Self {
        Self {
            builder,
            scorer,
            chunk_size: params.chunk_size.max(1),
            decoy_strategy: params.decoy_strategy,
        }
    }

    pub fn scorer(&self) -> &Scorer<'a> {
        &self.scorer
    }

    fn process(&self, lipid: Lipid) -> ChunkItem {
        let lipid = self.builder.with_precursors(lipid);
        let target = self.scorer.score_candidate(&lipid);
        let decoy = self
            .decoy_strategy
            .scores_decoys()
            .then(|| self.scorer.score_candidate(&lipid.as_decoy()));
        ChunkItem { target, decoy }
    }

    /// Runs every candidate of `candidates`, reporting the number of
    /// candidates finished after each chunk.
    pub fn run<I>(
        &self,
        candidates: I,
        mut on_progress: impl FnMut(u64),
    ) -> (ScoringSession, RunSummary)
    where
        I: IntoIterator<Item = Lipid>,
    {
        let start = Instant::now();
        let mut session = ScoringSession::new();
        let mut summary = RunSummary::default();
        let mut candidates = candidates.into_iter();

        loop {
            let chunk: Vec<Lipid> = candidates.by_ref().take(self.chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let chunk_len = chunk.len() as u64;
            let items: Vec<ChunkItem> = chunk
                .into_par_iter()
                .map(|lipid| self.process(lipid))
                .collect();
            for item in items {
                summary.candidates += 1;
                summary.precursors += item.target.precursors as u64;
                summary.pairs_scored += item.target.pairs as u64;
                session.record_all(item.target.scores);
                if let Some(decoy) = item.decoy {
                    summary.pairs_scored += decoy.pairs as u64;
                    session.record_all(decoy.scores);
                }
            }
            debug!("Finished chunk of {} candidates", chunk_len);
            on_progress(chunk_len);
        }

        summary.scores_recorded = session.recorded();
        summary.scores_retained = session.retained() as u64;
        summary.decoy_scores_retained = session.retained_decoys() as u64;
        summary.spectra_with_scores = session.iter().count() as u64;
        summary.elapsed = start.elapsed();

        let per_second = summary.candidates as f64 / summary.elapsed.as_secs_f64().max(1e-9);
        info!(
            "Scored {} candidates ({} precursors, {} pairs) in {:?} ({:.1} candidates/s)",
            summary.candidates,
            summary.precursors,
            summary.pairs_scored,
            summary.elapsed,
            per_second
        );
        info!(
            "Retained {} scores over {} spectra",
            summary.scores_retained, summary.spectra_with_scores
        );
        (session, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::{
        AdductCatalogue,
        BuildingBlocks,
    };
    use crate::data_sources::{
        Peak,
        SpectraIndex,
        Spectrum,
        SpectrumCollection,
    };
    use crate::enumeration::CandidateSpace;
    use crate::parameters::ParameterMap;

    fn parameters(chunk_size: f64, decoy: f64) -> ParameterMap {
        ParameterMap::new()
            .with("ESI.Negative", 0.0)
            .with("Adduct.H", 1.0)
            .with("Adduct.Na", 1.0)
            .with("HG.PC", 1.0)
            .with("HG.PE", 1.0)
            .with("BB.Sphingosine", 0.0)
            .with("BB.Cardiolipin", 0.0)
            .with("GP.LowerLengthLim", 16.0)
            .with("GP.UpperLengthLim", 18.0)
            .with("GP.LowerDoubleBondLim", 0.0)
            .with("GP.UpperDoubleBondLim", 1.0)
            .with("ChunkSize", chunk_size)
            .with("Decoy", decoy)
    }

    fn spectra(builder: &FragmentMassBuilder, space: &CandidateSpace) -> SpectrumCollection {
        // One spectrum built from the first four fragments of every fifth candidate
        space
            .iter()
            .step_by(5)
            .map(|lipid| {
                let lipid = builder.with_precursors(lipid);
                let precursor = &lipid.precursors[0];
                Spectrum {
                    title: Some(lipid.name.clone()),
                    precursor_mz: Some(precursor.mz),
                    retention_time: None,
                    scan_window: None,
                    peaks: precursor
                        .fragments
                        .iter()
                        .take(4)
                        .enumerate()
                        .map(|(i, f)| Peak {
                            mz: f.mz,
                            intensity: 10.0 * (i + 1) as f64,
                        })
                        .collect(),
                }
            })
            .collect()
    }

    fn run(map: &ParameterMap) -> (ScoringSession, RunSummary) {
        let params = SearchParameters::from_map(map);
        let blocks = BuildingBlocks::from_parameters(map, params.sl_base_length);
        let space = CandidateSpace::new(blocks, &params);
        let builder = FragmentMassBuilder::new(AdductCatalogue::from_parameters(
            map,
            params.positive_mode,
            params.negative_mode,
        ));
        let collection = spectra(&builder, &space);
        let index = SpectraIndex::build(&collection, &params.precursor_tolerance).unwrap();
        let scorer = Scorer::new(&collection, &index, &params);
        let pipeline = SearchPipeline::new(builder, scorer, &params);
        let mut progressed = 0;
        let out = pipeline.run(space.iter(), |n| progressed += n);
        assert_eq!(progressed, space.count());
        assert_eq!(out.1.candidates, space.count());
        out
    }

    #[test]
    fn test_chunking_does_not_change_results() {
        let (serial, serial_summary) = run(&parameters(1.0, 0.0));
        let (chunked, chunked_summary) = run(&parameters(7.0, 0.0));
        assert!(serial_summary.scores_retained > 0);
        assert_eq!(serial_summary.pairs_scored, chunked_summary.pairs_scored);
        assert_eq!(serial_summary.scores_retained, chunked_summary.scores_retained);
        assert_eq!(serial.iter().count(), chunked.iter().count());
        for ((a_idx, a), (b_idx, b)) in serial.iter().zip(chunked.iter()) {
            assert_eq!(a_idx, b_idx);
            assert_eq!(a.scores, b.scores);
            assert_eq!(a.top, b.top);
        }
    }

    #[test]
    fn test_decoys_are_opt_in() {
        let (_, without) = run(&parameters(16.0, 0.0));
        let (session, with) = run(&parameters(16.0, 1.0));
        assert_eq!(without.decoy_scores_retained, 0);
        assert_eq!(without.scores_retained, with.scores_retained);
        assert!(with.pairs_scored > without.pairs_scored);
        assert!(session
            .iter()
            .flat_map(|(_, r)| r.decoys.iter())
            .all(|s| s.name.starts_with("DECOY_")));
    }
}
