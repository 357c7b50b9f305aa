use serde::Serialize;

use crate::chemistry::{
    Adduct,
    Polarity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FragmentKind {
    HeadGroupIon,
    HeadGroupLoss,
    ChainIon,
    ChainLoss,
    BackboneIon,
    WaterLoss,
    LongChainBase,
}

impl FragmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::HeadGroupIon => "head group ion",
            FragmentKind::HeadGroupLoss => "head group loss",
            FragmentKind::ChainIon => "chain ion",
            FragmentKind::ChainLoss => "chain loss",
            FragmentKind::BackboneIon => "backbone ion",
            FragmentKind::WaterLoss => "water loss",
            FragmentKind::LongChainBase => "long chain base",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentIon {
    pub kind: FragmentKind,
    pub description: String,
    pub mz: f64,
}

/// One charged form of a candidate and the fragments it should produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreCursor {
    pub adduct: Adduct,
    pub mz: f64,
    pub charge: u8,
    pub fragments: Vec<FragmentIon>,
}

impl PreCursor {
    pub fn polarity(&self) -> Polarity {
        self.adduct.polarity
    }

    pub fn modification(&self) -> &'static str {
        self.adduct.description
    }
}
