use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use lipidseek::chemistry::AdductCatalogue;
use lipidseek::scoring::{
    RunSummary,
    Score,
    ScoringSession,
};

use crate::errors::CliError;

/// Written in place of a missing retention time.
const UNKNOWN_RETENTION_TIME: f64 = 100000.0;

pub const RESULTS_FILE: &str = "results.txt";
pub const SCORES_FILE: &str = "scores.jsonl";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Line oriented results: the best candidate of every spectrum, then the
/// per-bucket best and second-best scores, then the enabled modifications.
pub fn write_results<W: Write>(
    mut out: W,
    location: &str,
    session: &ScoringSession,
    adducts: &AdductCatalogue,
) -> std::io::Result<()> {
    writeln!(out, "{}", location)?;
    for (spectrum_index, results) in session.iter() {
        let best = match results.best() {
            Some(x) => x,
            None => continue,
        };
        writeln!(out, "---")?;
        writeln!(out, "{}", spectrum_index)?;
        writeln!(out, "{}", best.name)?;
        writeln!(out, "{}", best.formula)?;
        writeln!(out, "{:.6}", best.experimental_mz)?;
        writeln!(out, "{:.6}", best.calculated_mz)?;
        writeln!(out, "{}", best.charge)?;
        writeln!(
            out,
            "{}",
            best.retention_time.unwrap_or(UNKNOWN_RETENTION_TIME)
        )?;
        writeln!(out, "{}", best.modification)?;
        writeln!(out, "{:.6}", best.total_score)?;
    }

    writeln!(out, "SECONDHIGHESTSCORES")?;
    for (_, results) in session.iter() {
        for (bucket, top) in results.secondary.filled() {
            writeln!(
                out,
                "{} {:.6} {:.6}",
                bucket.key(),
                top.best.unwrap_or(0.0),
                top.second.unwrap_or(0.0)
            )?;
        }
    }

    writeln!(out, "MODIFICATIONS")?;
    for adduct in adducts.iter() {
        writeln!(out, "{}", adduct.description)?;
    }
    out.flush()
}

#[derive(Serialize)]
struct SpectrumRecord<'a> {
    spectrum_index: usize,
    best_score: Option<f64>,
    second_best_score: Option<f64>,
    scores: &'a [Score],
    best_decoy: Option<&'a Score>,
}

/// One JSON object per spectrum with its retained scores.
pub fn write_scores<W: Write>(mut out: W, session: &ScoringSession) -> Result<(), CliError> {
    for (spectrum_index, results) in session.iter() {
        let record = SpectrumRecord {
            spectrum_index,
            best_score: results.top.best,
            second_best_score: results.top.second,
            scores: &results.scores,
            best_decoy: results.best_decoy(),
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out).map_err(|e| CliError::Io {
            source: e.to_string(),
            path: None,
        })?;
    }
    out.flush().map_err(|e| CliError::Io {
        source: e.to_string(),
        path: None,
    })
}

fn create(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CliError::io(e, path))
}

pub fn write_all(
    directory: &Path,
    location: &str,
    session: &ScoringSession,
    adducts: &AdductCatalogue,
    summary: &RunSummary,
    write_scores_file: bool,
) -> Result<(), CliError> {
    let results_path = directory.join(RESULTS_FILE);
    write_results(create(&results_path)?, location, session, adducts)
        .map_err(|e| CliError::io(e, &results_path))?;
    info!("Wrote results to {}", results_path.display());

    if write_scores_file {
        let scores_path = directory.join(SCORES_FILE);
        write_scores(create(&scores_path)?, session)?;
        info!("Wrote retained scores to {}", scores_path.display());
    }

    let summary_path = directory.join(SUMMARY_FILE);
    serde_json::to_writer_pretty(create(&summary_path)?, summary)?;
    info!("Wrote run summary to {}", summary_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipidseek::chemistry::{
        AdductKind,
        AdductType,
        LipidClass,
    };
    use lipidseek::DecoyMarking;

    fn score(
        spectrum_index: usize,
        class: LipidClass,
        adduct_type: AdductType,
        total: f64,
    ) -> Score {
        Score {
            spectrum_index,
            title: None,
            retention_time: None,
            experimental_mz: 760.5851,
            name: format!("{}(16:0/18:1)", class.prefix()),
            formula: "C42H82NO8P".into(),
            class,
            modification: "+H",
            adduct: match adduct_type {
                AdductType::Metal => AdductKind::Sodiated,
                AdductType::NonMetal => AdductKind::Protonated,
            },
            adduct_type,
            calculated_mz: 760.5851,
            charge: 1,
            decoy: DecoyMarking::Target,
            total_score: total,
            ln_peak_score: -total / 2.0,
            intensity_score: 0.0,
            n_bins: 22500,
            n_peaks: 2,
            n_fragments: 12,
            n_matched: 2,
            peaks: Vec::new(),
            matches: Vec::new(),
        }
    }

    #[test]
    fn test_results_layout() {
        let mut session = ScoringSession::new();
        session.record(score(4, LipidClass::PC, AdductType::NonMetal, 20.0));
        session.record(score(4, LipidClass::PC, AdductType::NonMetal, 10.0));
        session.record(score(4, LipidClass::PC, AdductType::Metal, 5.0));
        let adducts = AdductCatalogue::from_kinds(&[AdductKind::Protonated, AdductKind::Sodiated]);

        let mut buf = Vec::new();
        write_results(&mut buf, "/data/run.mgf", &session, &adducts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "/data/run.mgf",
                "---",
                "4",
                "PC(16:0/18:1)",
                "C42H82NO8P",
                "760.585100",
                "760.585100",
                "1",
                "100000",
                "+H",
                "20.000000",
                "SECONDHIGHESTSCORES",
                "PC 20.000000 10.000000",
                "MPC 5.000000 0.000000",
                "MODIFICATIONS",
                "+H",
                "+Na",
            ]
        );
    }

    #[test]
    fn test_scores_are_json_lines() {
        let mut session = ScoringSession::new();
        session.record(score(1, LipidClass::PE, AdductType::NonMetal, 7.5));
        session.record(score(2, LipidClass::PG, AdductType::NonMetal, 3.0));
        let mut buf = Vec::new();
        write_scores(&mut buf, &session).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let records: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["spectrum_index"], 1);
        assert_eq!(records[0]["best_score"], 7.5);
        assert_eq!(records[1]["scores"][0]["name"], "PG(16:0/18:1)");
        assert!(records[1]["best_decoy"].is_null());
    }
}
