use std::collections::HashSet;

use super::search_results::Match;
use crate::data_sources::Peak;
use crate::models::{
    FragmentIon,
    MzTolerance,
};
use crate::utils::{
    round_mass,
    TupleRange,
};

/// Fragments inside the scanned range, masses rounded to the 1e-6 grid.
pub fn restrict_fragments(
    fragments: &[FragmentIon],
    scan_range: TupleRange<f64>,
) -> Vec<FragmentIon> {
    fragments
        .iter()
        .filter_map(|f| {
            let mz = round_mass(f.mz);
            scan_range.contains(mz).then(|| FragmentIon {
                kind: f.kind,
                description: f.description.clone(),
                mz,
            })
        })
        .collect()
}

/// Awards each peak to at most one fragment.
///
/// Every fragment claims its closest in-tolerance peak. A claimed peak goes to
/// the closest claimant, exact ties going to the earliest fragment; losers are
/// left unmatched rather than falling back to another peak.
pub fn assign_peaks(
    fragments: &[FragmentIon],
    peaks: &[Peak],
    tolerance: &MzTolerance,
) -> Vec<Option<usize>> {
    let claims: Vec<Option<(usize, f64)>> = fragments
        .iter()
        .map(|f| {
            let mut best: Option<(usize, f64)> = None;
            for (j, peak) in peaks.iter().enumerate() {
                if !tolerance.matches(peak.mz, f.mz) {
                    continue;
                }
                let dist = (peak.mz - f.mz).abs();
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((j, dist));
                }
            }
            best
        })
        .collect();

    let mut winner: Vec<Option<(usize, f64)>> = vec![None; peaks.len()];
    for (i, claim) in claims.iter().enumerate() {
        if let Some((j, dist)) = claim {
            if winner[*j].map_or(true, |(_, d)| *dist < d) {
                winner[*j] = Some((i, *dist));
            }
        }
    }

    claims
        .iter()
        .enumerate()
        .map(|(i, claim)| {
            let (j, _) = (*claim)?;
            match winner[j] {
                Some((w, _)) if w == i => Some(j),
                _ => None,
            }
        })
        .collect()
}

/// Assigns peaks, then collapses fragments sharing a rounded mass to their
/// first occurrence.
pub fn match_fragments(
    fragments: &[FragmentIon],
    peaks: &[Peak],
    tolerance: &MzTolerance,
) -> Vec<Match> {
    let assignment = assign_peaks(fragments, peaks, tolerance);
    let mut seen = HashSet::with_capacity(fragments.len());
    fragments
        .iter()
        .zip(assignment)
        .filter(|(f, _)| seen.insert(f.mz.to_bits()))
        .map(|(f, peak_index)| {
            let peak = peak_index.map(|j| peaks[j]);
            Match {
                fragment_mz: f.mz,
                description: f.description.clone(),
                kind: f.kind,
                matched: peak.is_some(),
                peak_index,
                peak_mz: peak.map(|p| p.mz),
                intensity: peak.map(|p| p.intensity).unwrap_or(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FragmentKind;

    fn frag(mz: f64) -> FragmentIon {
        FragmentIon {
            kind: FragmentKind::ChainLoss,
            description: format!("f{}", mz),
            mz,
        }
    }

    fn peak(mz: f64) -> Peak {
        Peak {
            mz,
            intensity: 100.0,
        }
    }

    #[test]
    fn test_restrict_rounds_and_filters() {
        let range = TupleRange::try_new(100.0, 500.0).unwrap();
        let kept = restrict_fragments(&[frag(99.9), frag(184.07331234), frag(500.1)], range);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mz, 184.073312);
    }

    #[test]
    fn test_peak_awarded_once() {
        let tol = MzTolerance::Absolute(0.05);
        let peaks = [peak(200.00), peak(300.0)];
        // Both claim the 200 peak, the second is closer
        let frags = [frag(200.03), frag(199.99), frag(300.02)];
        let assignment = assign_peaks(&frags, &peaks, &tol);
        assert_eq!(assignment, vec![None, Some(0), Some(1)]);

        let mut awarded: Vec<usize> = assignment.iter().flatten().copied().collect();
        awarded.sort();
        awarded.dedup();
        assert_eq!(awarded.len(), assignment.iter().flatten().count());
    }

    #[test]
    fn test_exact_tie_goes_to_first_fragment() {
        let tol = MzTolerance::Absolute(0.5);
        let peaks = [peak(200.0)];
        let frags = [frag(200.25), frag(199.75)];
        assert_eq!(assign_peaks(&frags, &peaks, &tol), vec![Some(0), None]);
    }

    #[test]
    fn test_duplicate_masses_collapse() {
        let tol = MzTolerance::Absolute(0.05);
        let peaks = [peak(200.0)];
        let frags = [frag(250.0), frag(200.0), frag(250.0), frag(200.0)];
        let matches = match_fragments(&frags, &peaks, &tol);
        assert_eq!(matches.len(), 2);
        assert!(!matches[0].matched);
        assert!(matches[1].matched);
        assert_eq!(matches[1].peak_index, Some(0));
        assert_eq!(matches[1].intensity, 100.0);
    }
}
