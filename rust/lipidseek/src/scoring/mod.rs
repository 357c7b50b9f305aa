mod matching;
mod peaks;
mod pipeline;
mod scorer;
mod search_results;
mod secondary;
mod session;
pub mod statistics;

pub use matching::{
    assign_peaks,
    match_fragments,
    restrict_fragments,
};
pub use peaks::{
    prepare_peaks,
    NORMALIZED_TOTAL,
};
pub use pipeline::{
    RunSummary,
    SearchPipeline,
};
pub use scorer::{
    CandidateScores,
    Scorer,
};
pub use search_results::{
    Match,
    Score,
};
pub use secondary::{
    AdductCommonality,
    Bucket,
    BucketForm,
    Secondary,
    TopTwo,
};
pub use session::{
    ScoringSession,
    SpectrumResults,
};
