use serde::Serialize;

use crate::chemistry::{
    AdductKind,
    AdductType,
    LipidClass,
};

/// Whether a precursor was formed by a commonly observed adduct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdductCommonality {
    Common,
    /// Metal adducts.
    Other,
}

impl AdductCommonality {
    pub fn of(adduct_type: AdductType) -> Self {
        match adduct_type {
            AdductType::Metal => AdductCommonality::Other,
            AdductType::NonMetal => AdductCommonality::Common,
        }
    }

    fn index(&self) -> usize {
        match self {
            AdductCommonality::Common => 0,
            AdductCommonality::Other => 1,
        }
    }
}

/// Cardiolipin precursors are further split by charge state and metal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BucketForm {
    Standard,
    /// Non-metal, doubly charged.
    DoublyCharged,
    /// More than one metal cation.
    MultiMetal,
}

/// A (lipid class, adduct commonality) pair, with cardiolipin split by form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bucket {
    pub class: LipidClass,
    pub commonality: AdductCommonality,
    pub form: BucketForm,
}

impl Bucket {
    const PAIRS: usize = 2 * LipidClass::ALL.len();
    pub const COUNT: usize = Self::PAIRS + 2;

    pub fn new(class: LipidClass, adduct_type: AdductType) -> Self {
        Self {
            class,
            commonality: AdductCommonality::of(adduct_type),
            form: BucketForm::Standard,
        }
    }

    /// Bucket of a precursor formed by `kind`.
    ///
    /// ```
    /// use lipidseek::chemistry::{AdductKind, LipidClass};
    /// use lipidseek::scoring::Bucket;
    ///
    /// assert_eq!(Bucket::of(LipidClass::CL, AdductKind::Deprotonated).key(), "CL");
    /// assert_eq!(Bucket::of(LipidClass::CL, AdductKind::DoublyDeprotonated).key(), "CL2");
    /// assert_eq!(Bucket::of(LipidClass::CL, AdductKind::DoublyDeprotonatedSodiated).key(), "MCL");
    /// assert_eq!(Bucket::of(LipidClass::CL, AdductKind::DeprotonatedDisodiated).key(), "M3CL");
    /// assert_eq!(Bucket::of(LipidClass::PIP, AdductKind::DoublyDeprotonated).key(), "PIP");
    /// ```
    pub fn of(class: LipidClass, kind: AdductKind) -> Self {
        let adduct = kind.adduct();
        let mut bucket = Self::new(class, adduct.adduct_type);
        if class == LipidClass::CL {
            bucket.form = match bucket.commonality {
                AdductCommonality::Common if adduct.charge > 1 => BucketForm::DoublyCharged,
                AdductCommonality::Other if kind.metal_count() > 1 => BucketForm::MultiMetal,
                _ => BucketForm::Standard,
            };
        }
        bucket
    }

    pub fn index(&self) -> usize {
        match self.form {
            BucketForm::Standard => {
                self.commonality.index() * LipidClass::ALL.len() + self.class.index()
            }
            BucketForm::DoublyCharged => Self::PAIRS,
            BucketForm::MultiMetal => Self::PAIRS + 1,
        }
    }

    /// Key written to results files, `M`-prefixed for metal adducts.
    ///
    /// ```
    /// use lipidseek::chemistry::{AdductType, LipidClass};
    /// use lipidseek::scoring::Bucket;
    ///
    /// assert_eq!(Bucket::new(LipidClass::PECer, AdductType::NonMetal).key(), "PEC");
    /// assert_eq!(Bucket::new(LipidClass::PC, AdductType::Metal).key(), "MPC");
    /// ```
    pub fn key(&self) -> String {
        let class = self.class.class_key();
        match (self.form, self.commonality) {
            (BucketForm::DoublyCharged, _) => format!("{}2", class),
            (BucketForm::MultiMetal, _) => format!("M3{}", class),
            (BucketForm::Standard, AdductCommonality::Common) => class.to_string(),
            (BucketForm::Standard, AdductCommonality::Other) => format!("M{}", class),
        }
    }

    fn from_index(index: usize) -> Self {
        let n = LipidClass::ALL.len();
        match index {
            i if i == Self::PAIRS => Self {
                class: LipidClass::CL,
                commonality: AdductCommonality::Common,
                form: BucketForm::DoublyCharged,
            },
            i if i == Self::PAIRS + 1 => Self {
                class: LipidClass::CL,
                commonality: AdductCommonality::Other,
                form: BucketForm::MultiMetal,
            },
            i => Self::new(
                LipidClass::ALL[i % n],
                if i < n {
                    AdductType::NonMetal
                } else {
                    AdductType::Metal
                },
            ),
        }
    }
}

/// Best and second-best score seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TopTwo {
    pub best: Option<f64>,
    pub second: Option<f64>,
}

impl TopTwo {
    pub fn offer(&mut self, score: f64) {
        match self.best {
            Some(best) if score <= best => {
                if self.second.map_or(true, |s| score > s) {
                    self.second = Some(score);
                }
            }
            _ => {
                self.second = self.best;
                self.best = Some(score);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }
}

/// Per-spectrum best/second-best total score of every bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Secondary {
    buckets: [TopTwo; Bucket::COUNT],
}

impl Default for Secondary {
    fn default() -> Self {
        Self {
            buckets: [TopTwo::default(); Bucket::COUNT],
        }
    }
}

impl Secondary {
    pub fn update(&mut self, bucket: Bucket, score: f64) {
        self.buckets[bucket.index()].offer(score);
    }

    pub fn get(&self, bucket: Bucket) -> TopTwo {
        self.buckets[bucket.index()]
    }

    /// Non-empty buckets, common adducts first, classes in canonical order.
    pub fn filled(&self) -> impl Iterator<Item = (Bucket, TopTwo)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(i, t)| (Bucket::from_index(i), *t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_indices_are_distinct() {
        let mut seen = [false; Bucket::COUNT];
        for class in LipidClass::ALL {
            for kind in AdductKind::ALL {
                let b = Bucket::of(class, kind);
                seen[b.index()] = true;
                assert_eq!(Bucket::from_index(b.index()), b);
            }
        }
        assert!(seen.iter().all(|x| *x));
        let keys: std::collections::HashSet<String> =
            (0..Bucket::COUNT).map(|i| Bucket::from_index(i).key()).collect();
        assert_eq!(keys.len(), Bucket::COUNT);
    }

    #[test]
    fn test_cardiolipin_forms_are_kept_apart() {
        let mut s = Secondary::default();
        let single = Bucket::of(LipidClass::CL, AdductKind::Deprotonated);
        let double = Bucket::of(LipidClass::CL, AdductKind::DoublyDeprotonated);
        let one_metal = Bucket::of(LipidClass::CL, AdductKind::DoublyDeprotonatedLithiated);
        let two_metals = Bucket::of(LipidClass::CL, AdductKind::DeprotonatedDipotassiated);
        s.update(single, 4.0);
        s.update(double, 9.0);
        s.update(one_metal, 3.0);
        s.update(two_metals, 6.0);
        s.update(double, 8.0);
        assert_eq!(s.get(single).best, Some(4.0));
        assert_eq!((s.get(double).best, s.get(double).second), (Some(9.0), Some(8.0)));
        assert_eq!(s.get(one_metal).second, None);
        let keys: Vec<String> = s.filled().map(|(b, _)| b.key()).collect();
        assert_eq!(keys, vec!["CL", "MCL", "CL2", "M3CL"]);
    }

    #[test]
    fn test_top_two() {
        let mut t = TopTwo::default();
        t.offer(5.0);
        assert_eq!((t.best, t.second), (Some(5.0), None));
        t.offer(3.0);
        t.offer(4.0);
        assert_eq!((t.best, t.second), (Some(5.0), Some(4.0)));
        t.offer(9.0);
        assert_eq!((t.best, t.second), (Some(9.0), Some(5.0)));
        t.offer(9.0);
        assert_eq!((t.best, t.second), (Some(9.0), Some(9.0)));
    }

    #[test]
    fn test_secondary_keeps_buckets_apart() {
        let mut s = Secondary::default();
        let pc = Bucket::new(LipidClass::PC, AdductType::NonMetal);
        let mpc = Bucket::new(LipidClass::PC, AdductType::Metal);
        s.update(pc, 10.0);
        s.update(mpc, 20.0);
        s.update(pc, 7.0);
        assert_eq!(s.get(pc).second, Some(7.0));
        assert_eq!(s.get(mpc).best, Some(20.0));
        let keys: Vec<String> = s.filled().map(|(b, _)| b.key()).collect();
        assert_eq!(keys, vec!["PC", "MPC"]);
    }
}
