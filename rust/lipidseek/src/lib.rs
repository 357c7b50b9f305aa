pub mod chemistry;
pub mod data_sources;
pub mod enumeration;
pub mod errors;
pub mod fragment_mass;
pub mod models;
pub mod parameters;
pub mod scoring;
pub mod utils;

pub use chemistry::{
    Adduct,
    AdductType,
    BackBone,
    Family,
    Formula,
    HeadGroup,
    LipidClass,
    Polarity,
};
pub use data_sources::{
    Peak,
    SpectraHolder,
    SpectraIndex,
    SpectrumCollection,
    SpectrumSource,
};
pub use enumeration::{
    CandidateIter,
    CandidateSpace,
};
pub use errors::{
    LipidSeekError,
    Result,
};
pub use fragment_mass::FragmentMassBuilder;
pub use models::{
    BondType,
    Chain,
    DecoyMarking,
    DecoyStrategy,
    FragmentIon,
    FragmentKind,
    Lipid,
    PreCursor,
};
pub use parameters::{
    ParameterMap,
    SearchParameters,
};
pub use scoring::{
    RunSummary,
    Score,
    Scorer,
    ScoringSession,
    SearchPipeline,
};
