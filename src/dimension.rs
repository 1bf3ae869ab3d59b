//! Physical dimensions for unit validation.
//!
//! Unlike a fixed SI dimension system, emissions accounting needs an
//! open-ended set of dimensions: every chemical species (and every gas
//! mixture) introduces its own dimension tag, e.g. `[carbon]`, `[methane]`
//! or `[HFC407a]`, alongside the structural `[mass]` and `[time]`
//! dimensions. Keeping species dimensionally distinct is what prevents
//! silent conversions like CH4 mass → CO2 mass outside an explicit
//! context.
//!
//! A [`Dimensionality`] is a map from dimension tag to integer exponent.
//! Multiplying quantities adds exponents, dividing subtracts them, and two
//! units are inter-convertible (without a context) exactly when their
//! dimensionalities are equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, Mul};

/// Structural dimension tag for mass (`[mass]`).
pub const MASS: &str = "mass";
/// Structural dimension tag for time (`[time]`).
pub const TIME: &str = "time";
/// Dimension tag for atmospheric concentrations (`[concentrations]`).
pub const CONCENTRATIONS: &str = "concentrations";
/// Dimension tag of the reference species for metric conversions.
pub const CARBON: &str = "carbon";

/// The physical dimension of a quantity, as tag → exponent pairs.
///
/// Stored in a `BTreeMap` for deterministic ordering (display, hashing and
/// graph keys all rely on it). Zero exponents are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensionality {
    exponents: BTreeMap<String, i32>,
}

impl Dimensionality {
    /// Creates a dimensionless dimensionality (no tags).
    #[must_use]
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// Creates a dimensionality with a single tag at exponent 1.
    #[must_use]
    pub fn base(tag: &str) -> Self {
        let mut exponents = BTreeMap::new();
        exponents.insert(tag.to_string(), 1);
        Self { exponents }
    }

    /// Returns true if no tags are present.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Returns the exponent of `tag`, zero if absent.
    #[must_use]
    pub fn exponent(&self, tag: &str) -> i32 {
        self.exponents.get(tag).copied().unwrap_or(0)
    }

    /// Iterates over (tag, exponent) pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.exponents.iter().map(|(tag, exp)| (tag.as_str(), *exp))
    }

    /// If exactly one tag is present, returns it with its exponent.
    #[must_use]
    pub fn single(&self) -> Option<(&str, i32)> {
        if self.exponents.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Merges a tag into this dimensionality, dropping zero results.
    pub fn insert(&mut self, tag: &str, exp: i32) {
        let entry = self.exponents.entry(tag.to_string()).or_insert(0);
        *entry += exp;
        if *entry == 0 {
            self.exponents.remove(tag);
        }
    }

    /// Raises this dimensionality to an integer power.
    #[must_use]
    pub fn pow(&self, exp: i32) -> Self {
        if exp == 0 {
            return Self::dimensionless();
        }
        let exponents = self
            .exponents
            .iter()
            .map(|(tag, e)| (tag.clone(), e * exp))
            .collect();
        Self { exponents }
    }

    /// Returns the reciprocal dimensionality.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.pow(-1)
    }
}

impl Mul for Dimensionality {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = self;
        for (tag, exp) in &rhs.exponents {
            out.insert(tag, *exp);
        }
        out
    }
}

impl Div for Dimensionality {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let mut out = self;
        for (tag, exp) in &rhs.exponents {
            out.insert(tag, -exp);
        }
        out
    }
}

impl fmt::Display for Dimensionality {
    /// Formats as bracketed tags, numerator then denominator, e.g.
    /// `[mass] * [methane] / [time]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }

        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for (tag, exp) in self.iter() {
            let part = if exp.abs() == 1 {
                format!("[{tag}]")
            } else {
                format!("[{tag}]^{}", exp.abs())
            };
            if exp > 0 {
                numerator.push(part);
            } else {
                denominator.push(part);
            }
        }

        let num = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(" * ")
        };
        if denominator.is_empty() {
            write!(f, "{num}")
        } else {
            write!(f, "{num} / {}", denominator.join(" / "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensionless() {
        let dim = Dimensionality::dimensionless();
        assert!(dim.is_dimensionless());
        assert_eq!(format!("{dim}"), "dimensionless");
    }

    #[test]
    fn test_base_tag() {
        let dim = Dimensionality::base(CARBON);
        assert_eq!(dim.exponent("carbon"), 1);
        assert_eq!(dim.exponent("mass"), 0);
        assert_eq!(format!("{dim}"), "[carbon]");
    }

    #[test]
    fn test_multiplication_adds_exponents() {
        let emissions = Dimensionality::base(MASS) * Dimensionality::base("methane");
        assert_eq!(emissions.exponent("mass"), 1);
        assert_eq!(emissions.exponent("methane"), 1);
    }

    #[test]
    fn test_division_cancels() {
        let dim = Dimensionality::base("methane") / Dimensionality::base("methane");
        assert!(dim.is_dimensionless());
    }

    #[test]
    fn test_flux_display() {
        let flux = Dimensionality::base(MASS) * Dimensionality::base("methane")
            / Dimensionality::base(TIME);
        assert_eq!(format!("{flux}"), "[mass] * [methane] / [time]");
    }

    #[test]
    fn test_pow() {
        let squared = Dimensionality::base("CFC400").pow(2);
        assert_eq!(squared.exponent("CFC400"), 2);
        assert_eq!(format!("{squared}"), "[CFC400]^2");
        assert!(squared.pow(0).is_dimensionless());
    }

    #[test]
    fn test_inverse() {
        let per_time = Dimensionality::base(TIME).inverse();
        assert_eq!(per_time.exponent("time"), -1);
        assert_eq!(format!("{per_time}"), "1 / [time]");
    }

    #[test]
    fn test_single() {
        assert_eq!(Dimensionality::base("carbon").single(), Some(("carbon", 1)));
        let two = Dimensionality::base(MASS) * Dimensionality::base("carbon");
        assert_eq!(two.single(), None);
        assert_eq!(Dimensionality::dimensionless().single(), None);
    }
}
