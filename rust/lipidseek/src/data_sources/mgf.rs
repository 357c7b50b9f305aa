use std::io::Read;
use std::path::Path;

use mzdata::io::MGFReader;
use mzdata::params::ParamDescribed;
use mzdata::prelude::{
    IonProperties,
    SpectrumLike,
};
use mzdata::spectrum::MultiLayerSpectrum;
use tracing::{
    debug,
    info,
};

use super::spectra::{
    Peak,
    Spectrum,
    SpectrumCollection,
};
use crate::errors::DataReadingError;
use crate::utils::TupleRange;

/// Reads a Mascot generic format file.
///
/// `TITLE`, `PEPMASS` and `RTINSECONDS` come through the mzdata reader. A
/// `SCANWINDOW=lo-hi` header is picked up from the acquisition or, failing
/// that, from the spectrum's free-form params.
pub fn read_mgf(path: &Path) -> Result<SpectrumCollection, DataReadingError> {
    let file = std::fs::File::open(path).map_err(|source| DataReadingError::FileReadingError {
        source,
        context: "Unable to open MGF file",
        path: path.to_path_buf(),
    })?;
    let mut collection = parse_mgf(file);
    collection.location = path.display().to_string();
    info!(
        "Read {} spectra from {}",
        collection.spectra().len(),
        path.display()
    );
    Ok(collection)
}

pub fn parse_mgf<R: Read>(reader: R) -> SpectrumCollection {
    MGFReader::new(reader).map(into_spectrum).collect()
}

fn into_spectrum(mut spectrum: MultiLayerSpectrum) -> Spectrum {
    let precursor_mz = spectrum.precursor().map(|p| p.mz());
    // mzdata keeps start times in minutes, zero when the header was absent
    let start_time = spectrum.start_time();
    let retention_time = (start_time > 0.0).then_some(start_time * 60.0);
    let scan_window = scan_window_of(&spectrum);
    let title = Some(spectrum.description().id.clone()).filter(|x| !x.is_empty());

    let peaks = match spectrum.try_build_centroids() {
        Ok(centroids) => centroids
            .iter()
            .map(|p| Peak {
                mz: p.mz,
                intensity: p.intensity as f64,
            })
            .collect(),
        Err(e) => {
            debug!("Spectrum {:?} has no centroid data: {}", title, e);
            Vec::new()
        }
    };

    Spectrum {
        title,
        precursor_mz,
        retention_time,
        scan_window,
        peaks,
    }
}

fn scan_window_of(spectrum: &MultiLayerSpectrum) -> Option<TupleRange<f64>> {
    let from_acquisition = spectrum
        .acquisition()
        .first_scan()
        .and_then(|scan| scan.scan_windows.first())
        .and_then(|w| TupleRange::try_new(w.lower_bound as f64, w.upper_bound as f64).ok());
    if from_acquisition.is_some() {
        return from_acquisition;
    }

    let param = spectrum
        .description()
        .params()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case("SCANWINDOW"))?;
    let value = param.value.to_string();
    let parsed = value.split_once('-').and_then(|(lo, hi)| {
        let lo: f64 = lo.trim().parse().ok()?;
        let hi: f64 = hi.trim().parse().ok()?;
        TupleRange::try_new(lo, hi).ok()
    });
    if parsed.is_none() {
        debug!("Ignoring unparseable scan window '{}'", value);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::SpectrumSource;

    const MGF: &str = "\
BEGIN IONS
TITLE=scan=1
PEPMASS=760.5851 12345.0
RTINSECONDS=612.5
SCANWINDOW=100-1000
184.0733 500
522.3554 300
END IONS

BEGIN IONS
TITLE=scan=2
PEPMASS=500.25
END IONS
";

    #[test]
    fn test_parse_mgf() {
        let collection = parse_mgf(MGF.as_bytes());
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.title(0), Some("scan=1"));
        assert!((collection.precursor_mz(0).unwrap() - 760.5851).abs() < 1e-6);
        assert!((collection.retention_time(0).unwrap() - 612.5).abs() < 1e-3);
        assert_eq!(
            collection.scan_window(0).map(|x| x.as_tuple()),
            Some((100.0, 1000.0))
        );
        let peaks = collection.peaks(0);
        assert_eq!(peaks.len(), 2);
        assert!((peaks[0].mz - 184.0733).abs() < 1e-6);
        assert_eq!(peaks[1].intensity, 300.0);
    }

    #[test]
    fn test_missing_headers_stay_empty() {
        let collection = parse_mgf(MGF.as_bytes());
        assert_eq!(collection.title(1), Some("scan=2"));
        assert_eq!(collection.retention_time(1), None);
        assert_eq!(collection.scan_window(1), None);
        assert!(collection.peaks(1).is_empty());
    }

    #[test]
    fn test_missing_file_is_a_reading_error() {
        let path = Path::new("/nonexistent/lipidseek/spectra.mgf");
        assert!(matches!(
            read_mgf(path),
            Err(DataReadingError::FileReadingError { .. })
        ));
    }
}
