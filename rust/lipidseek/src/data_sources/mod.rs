mod mgf;
mod spectra;

pub use mgf::{
    parse_mgf,
    read_mgf,
};
pub use spectra::{
    Peak,
    SpectraHolder,
    SpectraIndex,
    Spectrum,
    SpectrumCollection,
    SpectrumSource,
};
