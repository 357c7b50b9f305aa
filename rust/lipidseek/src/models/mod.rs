mod chain;
mod decoy;
mod decoy_strategy;
mod lipid;
mod precursor;
mod tolerance;

pub use chain::{
    BondType,
    Chain,
};
pub use decoy::DecoyMarking;
pub use decoy_strategy::DecoyStrategy;
pub use lipid::{
    Lipid,
    MAX_CHAINS,
};
pub use precursor::{
    FragmentIon,
    FragmentKind,
    PreCursor,
};
pub use tolerance::MzTolerance;
