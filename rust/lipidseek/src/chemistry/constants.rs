//! Monoisotopic masses and the composite neutral masses that the fragmentation
//! rules refer to by name.

pub const MASS_PROTON: f64 = 1.007276466621;
pub const MASS_ELECTRON: f64 = 0.00054857990946;

pub const MASS_C: f64 = 12.0;
pub const MASS_H: f64 = 1.00782503207;
pub const MASS_N: f64 = 14.0030740048;
pub const MASS_O: f64 = 15.99491461956;
pub const MASS_P: f64 = 30.97376163;
pub const MASS_NA: f64 = 22.9897692809;
pub const MASS_K: f64 = 38.96370668;
pub const MASS_LI: f64 = 7.01600455;

pub const MASS_WATER: f64 = 2.0 * MASS_H + MASS_O;
pub const MASS_AMMONIA: f64 = MASS_N + 3.0 * MASS_H;
pub const MASS_METHYL: f64 = MASS_C + 3.0 * MASS_H;

// Neutral losses, named after the molecule that leaves.
/// C3H9N
pub const TRIMETHYLAMINE: f64 = 3.0 * MASS_C + 9.0 * MASS_H + MASS_N;
/// C5H14NO4P
pub const PHOSPHOCHOLINE: f64 = 5.0 * MASS_C + 14.0 * MASS_H + MASS_N + 4.0 * MASS_O + MASS_P;
/// C2H5N
pub const AZIRIDINE: f64 = 2.0 * MASS_C + 5.0 * MASS_H + MASS_N;
/// C2H8NO4P
pub const PHOSPHOETHANOLAMINE: f64 = 2.0 * MASS_C + 8.0 * MASS_H + MASS_N + 4.0 * MASS_O + MASS_P;
/// C3H5NO2
pub const SERINE_RESIDUE: f64 = 3.0 * MASS_C + 5.0 * MASS_H + MASS_N + 2.0 * MASS_O;
/// C3H8NO6P
pub const PHOSPHOSERINE: f64 = 3.0 * MASS_C + 8.0 * MASS_H + MASS_N + 6.0 * MASS_O + MASS_P;
/// C3H9O6P
pub const GLYCEROPHOSPHATE: f64 = 3.0 * MASS_C + 9.0 * MASS_H + 6.0 * MASS_O + MASS_P;
/// H3PO4
pub const PHOSPHORIC_ACID: f64 = 3.0 * MASS_H + MASS_P + 4.0 * MASS_O;
/// C6H13O9P
pub const INOSITOL_PHOSPHATE: f64 = 6.0 * MASS_C + 13.0 * MASS_H + 9.0 * MASS_O + MASS_P;
/// C6H14O12P2
pub const INOSITOL_BISPHOSPHATE: f64 =
    6.0 * MASS_C + 14.0 * MASS_H + 12.0 * MASS_O + 2.0 * MASS_P;
/// C6H15O15P3
pub const INOSITOL_TRISPHOSPHATE: f64 =
    6.0 * MASS_C + 15.0 * MASS_H + 15.0 * MASS_O + 3.0 * MASS_P;
/// C6H10O5
pub const INOSITOL_RESIDUE: f64 = 6.0 * MASS_C + 10.0 * MASS_H + 5.0 * MASS_O;
/// C6H12O6
pub const INOSITOL: f64 = 6.0 * MASS_C + 12.0 * MASS_H + 6.0 * MASS_O;
/// C3H4O, the glycerol bridge carried over onto cardiolipin half ions.
pub const GLYCEROL_BRIDGE: f64 = 3.0 * MASS_C + 4.0 * MASS_H + MASS_O;
/// C3H7O6P, phosphatidic acid without its two acyl residues.
pub const PHOSPHATIDIC_CORE: f64 = 3.0 * MASS_C + 7.0 * MASS_H + 6.0 * MASS_O + MASS_P;
/// C3H5O2, diglyceride-like cation without its two acyl residues.
pub const DIGLYCERIDE_CORE: f64 = 3.0 * MASS_C + 5.0 * MASS_H + 2.0 * MASS_O;
/// C3H6O2, monoacylglycerol-like cation without its acyl residue.
pub const MONOACYLGLYCEROL_CORE: f64 = 3.0 * MASS_C + 6.0 * MASS_H + 2.0 * MASS_O;

// Charged head-group ions, electron accounted for.
/// C5H15NO4P+
pub const PHOSPHOCHOLINE_ION: f64 =
    5.0 * MASS_C + 15.0 * MASS_H + MASS_N + 4.0 * MASS_O + MASS_P - MASS_ELECTRON;
/// C5H14NO+
pub const CHOLINE_ION: f64 = 5.0 * MASS_C + 14.0 * MASS_H + MASS_N + MASS_O - MASS_ELECTRON;
/// C4H11NO4P-
pub const DEMETHYL_PHOSPHOCHOLINE_ION: f64 =
    4.0 * MASS_C + 11.0 * MASS_H + MASS_N + 4.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C2H7NO4P-
pub const PHOSPHOETHANOLAMINE_ION: f64 =
    2.0 * MASS_C + 7.0 * MASS_H + MASS_N + 4.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C5H11NO5P-
pub const GLYCEROPHOSPHOETHANOLAMINE_ION: f64 =
    5.0 * MASS_C + 11.0 * MASS_H + MASS_N + 5.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C3H6O5P-
pub const GLYCEROPHOSPHATE_DEHYDRATED_ION: f64 =
    3.0 * MASS_C + 6.0 * MASS_H + 5.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C3H8O6P-
pub const GLYCEROPHOSPHATE_ION: f64 =
    3.0 * MASS_C + 8.0 * MASS_H + 6.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C6H12O7P-
pub const GLYCEROPHOSPHOGLYCEROL_ION: f64 =
    6.0 * MASS_C + 12.0 * MASS_H + 7.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// PO3-
pub const METAPHOSPHATE_ION: f64 = MASS_P + 3.0 * MASS_O + MASS_ELECTRON;
/// H2PO4-
pub const DIHYDROGEN_PHOSPHATE_ION: f64 = 2.0 * MASS_H + MASS_P + 4.0 * MASS_O + MASS_ELECTRON;
/// C6H8O7P-
pub const INOSITOL_PHOSPHATE_DIDEHYDRATED_ION: f64 =
    6.0 * MASS_C + 8.0 * MASS_H + 7.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C6H10O8P-
pub const INOSITOL_PHOSPHATE_DEHYDRATED_ION: f64 =
    6.0 * MASS_C + 10.0 * MASS_H + 8.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C6H12O9P-
pub const INOSITOL_PHOSPHATE_ION: f64 =
    6.0 * MASS_C + 12.0 * MASS_H + 9.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C9H16O10P-
pub const GLYCEROPHOSPHOINOSITOL_ION: f64 =
    9.0 * MASS_C + 16.0 * MASS_H + 10.0 * MASS_O + MASS_P + MASS_ELECTRON;
/// C6H9O10P2-
pub const INOSITOL_BISPHOSPHATE_DEHYDRATED_ION: f64 =
    6.0 * MASS_C + 9.0 * MASS_H + 10.0 * MASS_O + 2.0 * MASS_P + MASS_ELECTRON;
/// C6H11O11P2-
pub const INOSITOL_BISPHOSPHATE_ION: f64 =
    6.0 * MASS_C + 11.0 * MASS_H + 11.0 * MASS_O + 2.0 * MASS_P + MASS_ELECTRON;
/// C6H10O13P3-
pub const INOSITOL_TRISPHOSPHATE_DEHYDRATED_ION: f64 =
    6.0 * MASS_C + 10.0 * MASS_H + 13.0 * MASS_O + 3.0 * MASS_P + MASS_ELECTRON;
/// C6H12O14P3-
pub const INOSITOL_TRISPHOSPHATE_ION: f64 =
    6.0 * MASS_C + 12.0 * MASS_H + 14.0 * MASS_O + 3.0 * MASS_P + MASS_ELECTRON;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_group_ions_match_literature() {
        assert!((PHOSPHOCHOLINE_ION - 184.0733).abs() < 1e-3);
        assert!((CHOLINE_ION - 104.1070).abs() < 1e-3);
        assert!((PHOSPHOETHANOLAMINE_ION - 140.0118).abs() < 1e-3);
        assert!((GLYCEROPHOSPHOETHANOLAMINE_ION - 196.0380).abs() < 1e-3);
        assert!((GLYCEROPHOSPHATE_DEHYDRATED_ION - 152.9958).abs() < 1e-3);
        assert!((INOSITOL_PHOSPHATE_DEHYDRATED_ION - 241.0119).abs() < 1e-3);
        assert!((DEMETHYL_PHOSPHOCHOLINE_ION - 168.0431).abs() < 1e-3);
    }

    #[test]
    fn test_neutral_losses() {
        assert!((PHOSPHOCHOLINE - 183.0660).abs() < 1e-3);
        assert!((PHOSPHOETHANOLAMINE - 141.0191).abs() < 1e-3);
        assert!((PHOSPHOSERINE - 185.0089).abs() < 1e-3);
        assert!((GLYCEROPHOSPHATE - 172.0137).abs() < 1e-3);
        assert!((INOSITOL_PHOSPHATE - 260.0297).abs() < 1e-3);
        assert!((TRIMETHYLAMINE - 59.0735).abs() < 1e-3);
    }
}
