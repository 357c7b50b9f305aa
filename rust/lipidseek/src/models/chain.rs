use serde::{
    Deserialize,
    Serialize,
};

use crate::chemistry::Formula;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BondType {
    Acyl,
    Ether,
    Lyso,
}

/// One fatty chain as it sits on the backbone (the acyl residue RCO, the alkyl
/// residue R, or the hydrogen left behind on a lyso position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chain {
    pub formula: Formula,
    pub mass: f64,
    pub length: u8,
    pub double_bonds: u8,
    pub bond: BondType,
}

impl Chain {
    /// Largest double bond count a chain can physically carry.
    ///
    /// ```
    /// use lipidseek::models::{BondType, Chain};
    ///
    /// assert_eq!(Chain::max_double_bonds(18, BondType::Acyl), Some(8));
    /// assert_eq!(Chain::max_double_bonds(18, BondType::Ether), Some(9));
    /// assert_eq!(Chain::max_double_bonds(1, BondType::Acyl), None);
    /// ```
    pub fn max_double_bonds(length: i64, bond: BondType) -> Option<i64> {
        if length < 2 {
            return None;
        }
        match bond {
            BondType::Acyl => Some((length - 1) / 2),
            BondType::Ether => Some(length / 2),
            BondType::Lyso => None,
        }
    }

    pub fn admits(length: i64, double_bonds: i64, bond: BondType) -> bool {
        match Self::max_double_bonds(length, bond) {
            Some(max) => double_bonds >= 0 && double_bonds <= max && length <= u8::MAX as i64,
            None => false,
        }
    }

    pub fn acyl(length: u8, double_bonds: u8) -> Option<Self> {
        if !Self::admits(length as i64, double_bonds as i64, BondType::Acyl) {
            return None;
        }
        let n = length as i32;
        let d = double_bonds as i32;
        Some(Self::from_formula(
            Formula::new(n, 2 * n - 1 - 2 * d, 0, 1, 0),
            length,
            double_bonds,
            BondType::Acyl,
        ))
    }

    pub fn ether(length: u8, double_bonds: u8) -> Option<Self> {
        if !Self::admits(length as i64, double_bonds as i64, BondType::Ether) {
            return None;
        }
        let n = length as i32;
        let d = double_bonds as i32;
        Some(Self::from_formula(
            Formula::new(n, 2 * n + 1 - 2 * d, 0, 0, 0),
            length,
            double_bonds,
            BondType::Ether,
        ))
    }

    pub fn lyso() -> Self {
        Self::from_formula(Formula::new(0, 1, 0, 0, 0), 0, 0, BondType::Lyso)
    }

    fn from_formula(formula: Formula, length: u8, double_bonds: u8, bond: BondType) -> Self {
        Self {
            formula,
            mass: formula.monoisotopic_mass(),
            length,
            double_bonds,
            bond,
        }
    }

    pub fn is_lyso(&self) -> bool {
        self.bond == BondType::Lyso
    }

    /// Length and double bonds, the key that defines chain identity for deduplication.
    pub fn descriptor(&self) -> (u8, u8) {
        (self.length, self.double_bonds)
    }

    pub fn name(&self) -> String {
        match self.bond {
            BondType::Acyl => format!("{}:{}", self.length, self.double_bonds),
            BondType::Ether => format!("O-{}:{}", self.length, self.double_bonds),
            BondType::Lyso => "0:0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formulas() {
        let palmitoyl = Chain::acyl(16, 0).unwrap();
        assert_eq!(palmitoyl.formula.to_string(), "C16H31O");
        let oleoyl = Chain::acyl(18, 1).unwrap();
        assert_eq!(oleoyl.formula.to_string(), "C18H33O");
        let alkyl = Chain::ether(16, 0).unwrap();
        assert_eq!(alkyl.formula.to_string(), "C16H33");
        assert_eq!(alkyl.name(), "O-16:0");
        assert_eq!(Chain::lyso().name(), "0:0");
    }

    #[test]
    fn test_pruning_bounds() {
        // acyl: floor((L-1)/2)
        assert!(Chain::acyl(5, 2).is_some());
        assert!(Chain::acyl(5, 3).is_none());
        assert!(Chain::acyl(4, 1).is_some());
        assert!(Chain::acyl(4, 2).is_none());
        // ether: floor(L/2)
        assert!(Chain::ether(4, 2).is_some());
        assert!(Chain::ether(4, 3).is_none());
        // too short
        assert!(Chain::acyl(1, 0).is_none());
        assert!(Chain::ether(1, 0).is_none());
    }
}
