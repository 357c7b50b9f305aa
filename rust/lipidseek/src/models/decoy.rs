use serde::Serialize;

/// Whether a candidate carries its real theoretical fragments or the
/// mirrored decoy set.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub enum DecoyMarking {
    Target,
    MirroredDecoy,
}

impl DecoyMarking {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecoyMarking::Target => "Target",
            DecoyMarking::MirroredDecoy => "Decoy",
        }
    }

    pub fn is_decoy(&self) -> bool {
        match self {
            DecoyMarking::Target => false,
            DecoyMarking::MirroredDecoy => true,
        }
    }

    pub fn is_target(&self) -> bool {
        !self.is_decoy()
    }
}

pub(crate) const DECOY_PREFIX: &str = "DECOY_";

/// Helper function to convert a lipid name into its decoy form
pub(crate) fn as_decoy_name(name: &str) -> String {
    format!("{}{}", DECOY_PREFIX, name)
}
