use crate::data_sources::Peak;

/// Summed intensity of a prepared peak list.
pub const NORMALIZED_TOTAL: f64 = 1000.0;

/// Drops the precursor region, keeps the `peak_number` most intense peaks and
/// rescales them to sum to [`NORMALIZED_TOTAL`].
///
/// The returned peaks are ordered by intensity, most intense first. Peaks
/// without positive finite intensity never survive.
///
/// ```
/// use lipidseek::data_sources::Peak;
/// use lipidseek::scoring::prepare_peaks;
///
/// let peaks = [
///     Peak { mz: 184.07, intensity: 30.0 },
///     Peak { mz: 760.58, intensity: 500.0 },
///     Peak { mz: 522.36, intensity: 10.0 },
/// ];
/// let kept = prepare_peaks(&peaks, 760.585, 1.5, 40);
/// assert_eq!(kept.len(), 2);
/// assert_eq!(kept[0].intensity, 750.0);
/// ```
pub fn prepare_peaks(
    peaks: &[Peak],
    precursor_mz: f64,
    exclusion: f64,
    peak_number: usize,
) -> Vec<Peak> {
    let mut kept: Vec<Peak> = peaks
        .iter()
        .filter(|p| (p.mz - precursor_mz).abs() > exclusion)
        .filter(|p| p.intensity.is_finite() && p.intensity > 0.0 && p.mz.is_finite())
        .copied()
        .collect();
    kept.sort_by(|a, b| {
        b.intensity
            .total_cmp(&a.intensity)
            .then(a.mz.total_cmp(&b.mz))
    });
    kept.truncate(peak_number);

    let total: f64 = kept.iter().map(|p| p.intensity).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let scale = NORMALIZED_TOTAL / total;
    for p in kept.iter_mut() {
        p.intensity *= scale;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(mz: f64, intensity: f64) -> Peak {
        Peak { mz, intensity }
    }

    #[test]
    fn test_keeps_most_intense() {
        let peaks: Vec<Peak> = (0..10).map(|i| peak(100.0 + i as f64, i as f64 + 1.0)).collect();
        let kept = prepare_peaks(&peaks, 900.0, 1.5, 3);
        assert_eq!(kept.len(), 3);
        assert_eq!(
            kept.iter().map(|p| p.mz).collect::<Vec<_>>(),
            vec![109.0, 108.0, 107.0]
        );
        let sum: f64 = kept.iter().map(|p| p.intensity).sum();
        assert!((sum - NORMALIZED_TOTAL).abs() < 1e-9);
    }

    #[test]
    fn test_exclusion_window_is_inclusive() {
        let peaks = [peak(498.5, 1.0), peak(501.5, 1.0), peak(501.6, 1.0), peak(200.0, 0.0)];
        let kept = prepare_peaks(&peaks, 500.0, 1.5, 40);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mz, 501.6);
        assert_eq!(kept[0].intensity, NORMALIZED_TOTAL);
    }

    #[test]
    fn test_nothing_left() {
        assert!(prepare_peaks(&[peak(500.0, 10.0)], 500.0, 1.5, 40).is_empty());
        assert!(prepare_peaks(&[], 500.0, 1.5, 40).is_empty());
    }
}
