use std::fmt::Display;
use std::ops::{
    Add,
    AddAssign,
    Sub,
};
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use super::constants::{
    MASS_C,
    MASS_H,
    MASS_N,
    MASS_O,
    MASS_P,
};
use crate::errors::LipidSeekError;

/// Elemental composition of a neutral lipid or one of its building blocks.
///
/// Counts are signed so that building blocks can express removals
/// (for example a sphingoid base losing two hydrogens when the phosphate attaches).
/// A complete molecule always ends up with non-negative counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formula {
    pub c: i32,
    pub h: i32,
    pub n: i32,
    pub o: i32,
    pub p: i32,
}

impl Formula {
    pub const fn new(c: i32, h: i32, n: i32, o: i32, p: i32) -> Self {
        Self { c, h, n, o, p }
    }

    pub fn monoisotopic_mass(&self) -> f64 {
        self.c as f64 * MASS_C
            + self.h as f64 * MASS_H
            + self.n as f64 * MASS_N
            + self.o as f64 * MASS_O
            + self.p as f64 * MASS_P
    }
}

impl Add for Formula {
    type Output = Formula;

    fn add(self, rhs: Self) -> Self::Output {
        Formula {
            c: self.c + rhs.c,
            h: self.h + rhs.h,
            n: self.n + rhs.n,
            o: self.o + rhs.o,
            p: self.p + rhs.p,
        }
    }
}

impl AddAssign for Formula {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Formula {
    type Output = Formula;

    fn sub(self, rhs: Self) -> Self::Output {
        Formula {
            c: self.c - rhs.c,
            h: self.h - rhs.h,
            n: self.n - rhs.n,
            o: self.o - rhs.o,
            p: self.p - rhs.p,
        }
    }
}

/// Hill order: carbon, hydrogen, then the rest alphabetically.
/// Zero counts are omitted and a count of one is written without a number.
impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (symbol, count) in [
            ("C", self.c),
            ("H", self.h),
            ("N", self.n),
            ("O", self.o),
            ("P", self.p),
        ] {
            match count {
                0 => {}
                1 => write!(f, "{}", symbol)?,
                x => write!(f, "{}{}", symbol, x)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = LipidSeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Formula::default();
        let mut chars = s.trim().chars().peekable();
        while let Some(symbol) = chars.next() {
            let mut digits = String::new();
            while let Some(d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                digits.push(*d);
                chars.next();
            }
            let count: i32 = if digits.is_empty() {
                1
            } else {
                digits.parse().map_err(|_| LipidSeekError::ParseError {
                    msg: format!("Invalid element count in formula '{}'", s),
                })?
            };
            match symbol {
                'C' => out.c += count,
                'H' => out.h += count,
                'N' => out.n += count,
                'O' => out.o += count,
                'P' => out.p += count,
                other => {
                    return Err(LipidSeekError::ParseError {
                        msg: format!("Unsupported element '{}' in formula '{}'", other, s),
                    })
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_hill_ordered() {
        let pc = Formula::new(42, 82, 1, 8, 1);
        assert_eq!(pc.to_string(), "C42H82NO8P");
        assert_eq!(Formula::new(0, 1, 0, 0, 0).to_string(), "H");
    }

    #[test]
    fn test_parse_and_mass() {
        let pc: Formula = "C42H82NO8P".parse().unwrap();
        assert_eq!(pc, Formula::new(42, 82, 1, 8, 1));
        assert!((pc.monoisotopic_mass() - 759.5778).abs() < 1e-3);
        assert!("C42Xe".parse::<Formula>().is_err());
    }
}
