use std::borrow::Cow;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
};

use crate::errors::DataReadingError;
use crate::models::MzTolerance;
use crate::utils::TupleRange;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// Read access to a collection of MS/MS spectra, addressed by index.
///
/// Peaks are handed out as `Cow` so that sources backed by a file can
/// materialize them lazily while in-memory sources just borrow.
pub trait SpectrumSource: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn precursor_mz(&self, index: usize) -> Option<f64>;
    fn scan_window(&self, index: usize) -> Option<TupleRange<f64>>;
    fn retention_time(&self, index: usize) -> Option<f64>;
    fn peaks(&self, index: usize) -> Cow<'_, [Peak]>;

    fn title(&self, _index: usize) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub title: Option<String>,
    pub precursor_mz: Option<f64>,
    /// Seconds.
    pub retention_time: Option<f64>,
    pub scan_window: Option<TupleRange<f64>>,
    pub peaks: Vec<Peak>,
}

#[derive(Debug, Clone, Default)]
pub struct SpectrumCollection {
    pub location: String,
    spectra: Vec<Spectrum>,
}

impl SpectrumCollection {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            spectra: Vec::new(),
        }
    }

    pub fn push(&mut self, spectrum: Spectrum) {
        self.spectra.push(spectrum);
    }

    pub fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }
}

impl FromIterator<Spectrum> for SpectrumCollection {
    fn from_iter<T: IntoIterator<Item = Spectrum>>(iter: T) -> Self {
        Self {
            location: String::new(),
            spectra: iter.into_iter().collect(),
        }
    }
}

impl SpectrumSource for SpectrumCollection {
    fn len(&self) -> usize {
        self.spectra.len()
    }

    fn precursor_mz(&self, index: usize) -> Option<f64> {
        self.spectra.get(index)?.precursor_mz
    }

    fn scan_window(&self, index: usize) -> Option<TupleRange<f64>> {
        self.spectra.get(index)?.scan_window
    }

    fn retention_time(&self, index: usize) -> Option<f64> {
        self.spectra.get(index)?.retention_time
    }

    fn peaks(&self, index: usize) -> Cow<'_, [Peak]> {
        match self.spectra.get(index) {
            Some(s) => Cow::Borrowed(&s.peaks),
            None => Cow::Owned(Vec::new()),
        }
    }

    fn title(&self, index: usize) -> Option<&str> {
        self.spectra.get(index)?.title.as_deref()
    }
}

/// One searchable spectrum: where it came from and which precursor masses it accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectraHolder {
    pub spectrum_index: usize,
    pub precursor_mz: f64,
    pub retention_time: Option<f64>,
    pub window: TupleRange<f64>,
    /// Declared scan window, or the observed peak range when none was recorded.
    pub scan_range: TupleRange<f64>,
}

/// Spectra sorted by the lower bound of their precursor window.
///
/// Alongside the holders it keeps the running maximum of the window upper
/// bounds, which lets a lookup stop walking backwards as soon as no earlier
/// window can still reach the queried mass.
#[derive(Debug, Clone)]
pub struct SpectraIndex {
    holders: Vec<SpectraHolder>,
    max_upper: Vec<f64>,
}

fn observed_range(peaks: &[Peak]) -> Option<TupleRange<f64>> {
    let lo = peaks.iter().map(|p| p.mz).reduce(f64::min)?;
    let hi = peaks.iter().map(|p| p.mz).reduce(f64::max)?;
    TupleRange::try_new(lo, hi).ok()
}

impl SpectraIndex {
    pub fn build<S: SpectrumSource + ?Sized>(
        source: &S,
        precursor_tolerance: &MzTolerance,
    ) -> Result<Self, DataReadingError> {
        let mut holders = Vec::with_capacity(source.len());
        for spectrum_index in 0..source.len() {
            let precursor_mz = match source.precursor_mz(spectrum_index) {
                Some(x) if x > 0.0 && x.is_finite() => x,
                _ => {
                    debug!("Skipping spectrum {} without precursor", spectrum_index);
                    continue;
                }
            };
            let scan_range = match source
                .scan_window(spectrum_index)
                .or_else(|| observed_range(&source.peaks(spectrum_index)))
            {
                Some(x) => x,
                None => {
                    debug!(
                        "Skipping spectrum {} without scan window or peaks",
                        spectrum_index
                    );
                    continue;
                }
            };
            holders.push(SpectraHolder {
                spectrum_index,
                precursor_mz,
                retention_time: source.retention_time(spectrum_index),
                window: precursor_tolerance.mz_range(precursor_mz),
                scan_range,
            });
        }
        if holders.is_empty() {
            return Err(DataReadingError::NoUsableSpectra {
                total: source.len(),
            });
        }
        holders.sort_by(|a, b| {
            a.window
                .start()
                .total_cmp(&b.window.start())
                .then(a.spectrum_index.cmp(&b.spectrum_index))
        });
        let max_upper = holders
            .iter()
            .scan(f64::NEG_INFINITY, |acc, h| {
                *acc = acc.max(h.window.end());
                Some(*acc)
            })
            .collect();
        info!(
            "Indexed {} of {} spectra by precursor window",
            holders.len(),
            source.len()
        );
        Ok(Self { holders, max_upper })
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn holders(&self) -> &[SpectraHolder] {
        &self.holders
    }

    pub fn get(&self, position: usize) -> Option<&SpectraHolder> {
        self.holders.get(position)
    }

    /// Positions of every holder whose window contains `mass`, ascending.
    pub fn overlapping(&self, mass: f64) -> Vec<usize> {
        let end = self.holders.partition_point(|h| h.window.start() <= mass);
        let mut out = Vec::new();
        for i in (0..end).rev() {
            if self.max_upper[i] < mass {
                break;
            }
            if self.holders[i].window.end() >= mass {
                out.push(i);
            }
        }
        out.reverse();
        out
    }
}
