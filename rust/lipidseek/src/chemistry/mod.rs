mod adducts;
mod building_blocks;
pub mod constants;
mod formula;

pub use adducts::{
    Adduct,
    AdductCatalogue,
    AdductKind,
    AdductType,
    Polarity,
};
pub use building_blocks::{
    BackBone,
    BuildingBlocks,
    Family,
    HeadGroup,
    LipidClass,
    SphingoidBase,
    SphingoidKind,
};
pub use formula::Formula;
