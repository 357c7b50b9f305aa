//! Significance of a spectrum/candidate match.
//!
//! Two independent components are combined Fisher-style into the total score:
//! the hypergeometric tail of the number of matched peaks and the rank of the
//! matched intensity among all equally sized peak subsets.

use std::f64::consts::LN_10;

use statrs::function::factorial::binomial;
use statrs::function::gamma::ln_gamma;

/// Tolerance applied to the summed matched intensity before counting subsets.
const INTENSITY_EPSILON: f64 = 1e-12;

/// Natural log of the binomial coefficient, `-inf` when `k > n`.
///
/// ```
/// use lipidseek::scoring::statistics::ln_choose;
///
/// assert!((ln_choose(5.0, 2.0) - 10f64.ln()).abs() < 1e-9);
/// assert_eq!(ln_choose(3.0, 4.0), f64::NEG_INFINITY);
/// ```
pub fn ln_choose(n: f64, k: f64) -> f64 {
    if k < 0.0 || k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0.0 || k == n {
        return 0.0;
    }
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// `ln P(X >= x)` for X hypergeometric with population `n_bins`, `n_peaks`
/// successes and `n_fragments` draws.
///
/// The result is clamped to `<= 0`; a zero threshold gives exactly 0.
pub fn ln_hypergeometric_upper_tail(n_bins: u64, n_peaks: u64, n_fragments: u64, x: u64) -> f64 {
    let upper = n_peaks.min(n_fragments);
    if x > upper {
        return f64::NEG_INFINITY;
    }
    let lower = (n_peaks + n_fragments).saturating_sub(n_bins);
    if x <= lower {
        return 0.0;
    }
    let (n, k, m) = (n_bins as f64, n_peaks as f64, n_fragments as f64);
    let ln_total = ln_choose(n, m);
    let terms: Vec<f64> = (x..=upper)
        .map(|i| {
            let i = i as f64;
            ln_choose(k, i) + ln_choose(n - k, m - i) - ln_total
        })
        .collect();
    log_sum_exp(&terms).min(0.0)
}

/// Subset spaces up to this size are counted exactly.
const EXACT_SUBSET_LIMIT: f64 = 1e5;

/// Number of cells the summed intensity is quantized into for larger spaces.
const INTENSITY_GRID_CELLS: f64 = 10_000.0;

/// Number of `size`-element subsets of `values` whose sum reaches `threshold`.
///
/// Exact when there are at most [`EXACT_SUBSET_LIMIT`] subsets. Larger spaces
/// are counted on a grid of [`INTENSITY_GRID_CELLS`] cells spanning the total
/// intensity, so each subset sum is off by at most `size / 2` cells.
///
/// ```
/// use lipidseek::scoring::statistics::count_subsets_at_least;
///
/// assert_eq!(count_subsets_at_least(&[3.0, 2.0, 1.0], 2, 4.0), 2.0);
/// ```
pub fn count_subsets_at_least(values: &[f64], size: usize, threshold: f64) -> f64 {
    let n = values.len();
    if size > n {
        return 0.0;
    }
    if binomial(n as u64, size as u64) <= EXACT_SUBSET_LIMIT {
        count_subsets_exact(values, size, threshold)
    } else {
        count_subsets_on_grid(values, size, threshold)
    }
}

/// Branch and bound over the values sorted descending: a branch is dropped as
/// soon as its largest achievable sum falls short and counted in closed form as
/// soon as its smallest achievable sum already suffices.
fn count_subsets_exact(values: &[f64], size: usize, threshold: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let n = sorted.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in sorted.iter() {
        prefix.push(prefix[prefix.len() - 1] + v);
    }

    let mut count = 0.0;
    let mut stack = vec![(0usize, size, threshold)];
    while let Some((i, r, t)) = stack.pop() {
        let left = n - i;
        if r == 0 {
            if t <= 0.0 {
                count += 1.0;
            }
        } else if left < r || prefix[i + r] - prefix[i] < t {
            continue;
        } else if prefix[n] - prefix[n - r] >= t {
            count += binomial(left as u64, r as u64);
        } else {
            stack.push((i + 1, r - 1, t - sorted[i]));
            stack.push((i + 1, r, t));
        }
    }
    count
}

/// Knapsack style count over quantized intensities.
///
/// `counts[j][s]` holds the number of `j`-subsets of the values seen so far
/// whose quantized sum is `s`; sums at or above the target collapse into the
/// last cell, so the table never grows past `(size + 1) x (target + 1)`.
fn count_subsets_on_grid(values: &[f64], size: usize, threshold: f64) -> f64 {
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if threshold <= 0.0 {
        return binomial(values.len() as u64, size as u64);
    }
    if total <= 0.0 {
        return 0.0;
    }
    let quantum = total / INTENSITY_GRID_CELLS;
    let target = (threshold / quantum).round() as usize;
    let width = target + 1;

    let mut counts = vec![0.0f64; (size + 1) * width];
    counts[0] = 1.0;
    for v in values.iter() {
        let cells = (v.max(0.0) / quantum).round() as usize;
        // Descending so row j - 1 still excludes the current value
        for j in (1..=size).rev() {
            let (lower, upper) = counts.split_at_mut(j * width);
            let from = &lower[(j - 1) * width..];
            let to = &mut upper[..width];
            for (s, c) in from.iter().enumerate() {
                if *c != 0.0 {
                    to[(s + cells).min(target)] += c;
                }
            }
        }
    }
    counts[size * width + target]
}

/// `log10` of the fraction of `matched`-sized peak subsets whose intensity is
/// at least the observed matched intensity. Always `<= 0`.
pub fn intensity_score(intensities: &[f64], matched: usize, matched_intensity: f64) -> f64 {
    let count = count_subsets_at_least(intensities, matched, matched_intensity - INTENSITY_EPSILON);
    let total = binomial(intensities.len() as u64, matched as u64);
    (count.max(1.0).log10() - total.log10()).min(0.0)
}

/// Fisher combination of both components, `-2 ln(p_peaks * p_intensity)`.
pub fn total_score(ln_peak_score: f64, intensity_score: f64, use_intensity: bool) -> f64 {
    let ln_p = if use_intensity {
        ln_peak_score + intensity_score * LN_10
    } else {
        ln_peak_score
    };
    let total = -2.0 * ln_p;
    // -0.0 when both components are exactly zero
    if total == 0.0 { 0.0 } else { total }
}
