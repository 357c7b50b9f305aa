use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecoyStrategy {
    /// Score targets only (default)
    #[default]
    Never,

    /// Score every candidate's mirrored twin alongside it, in a separate list
    Append,
}

impl DecoyStrategy {
    /// Parameter files carry the strategy as the numeric `Decoy` flag.
    pub fn from_flag(value: f64) -> Self {
        if value == 0.0 {
            DecoyStrategy::Never
        } else {
            DecoyStrategy::Append
        }
    }

    pub fn scores_decoys(&self) -> bool {
        matches!(self, DecoyStrategy::Append)
    }
}

impl std::fmt::Display for DecoyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoyStrategy::Never => write!(f, "never"),
            DecoyStrategy::Append => write!(f, "append"),
        }
    }
}

impl std::str::FromStr for DecoyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" | "none" | "0" => Ok(DecoyStrategy::Never),
            "append" | "1" => Ok(DecoyStrategy::Append),
            _ => Err(format!(
                "Invalid decoy strategy: '{}'. Valid options: never, append",
                s
            )),
        }
    }
}
