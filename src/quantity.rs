//! Quantities: a magnitude with a parsed unit.
//!
//! [`Quantity`] is the value type handed out by the registry. Arithmetic
//! (multiplication, division, powers, scalar scaling) is pure data
//! manipulation; conversions need the registry's unit table and live on
//! [`ScmUnitRegistry`](crate::registry::ScmUnitRegistry) and the context
//! activation handles.
//!
//! # Example
//!
//! ```
//! use scm_units::unit_registry;
//!
//! let reg = unit_registry();
//! let emissions = reg.quantity(0.34, "Gt C / yr").unwrap();
//! let out = reg.convert(&emissions, "Mt CO2 / yr").unwrap();
//! assert!((out.magnitude() - 0.34 * 1000.0 * 44.0 / 12.0).abs() < 0.1);
//! ```

use crate::parser::ParsedUnit;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// A magnitude paired with a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    magnitude: f64,
    units: ParsedUnit,
}

impl Quantity {
    /// Creates a quantity from a magnitude and parsed unit.
    #[must_use]
    pub fn new(magnitude: f64, units: ParsedUnit) -> Self {
        Self { magnitude, units }
    }

    /// The numeric magnitude.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// The unit expression.
    #[must_use]
    pub fn units(&self) -> &ParsedUnit {
        &self.units
    }

    /// Raises the quantity to an integer power.
    #[must_use]
    pub fn powi(&self, exp: i32) -> Self {
        Self {
            magnitude: self.magnitude.powi(exp),
            units: self.units.pow(exp),
        }
    }
}

impl Mul for Quantity {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            magnitude: self.magnitude * rhs.magnitude,
            units: self.units.multiply(&rhs.units),
        }
    }
}

impl Mul<&Quantity> for Quantity {
    type Output = Self;

    fn mul(self, rhs: &Quantity) -> Self::Output {
        Self {
            magnitude: self.magnitude * rhs.magnitude,
            units: self.units.multiply(&rhs.units),
        }
    }
}

impl Div for Quantity {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self {
            magnitude: self.magnitude / rhs.magnitude,
            units: self.units.divide(&rhs.units),
        }
    }
}

impl Div<&Quantity> for Quantity {
    type Output = Self;

    fn div(self, rhs: &Quantity) -> Self::Output {
        Self {
            magnitude: self.magnitude / rhs.magnitude,
            units: self.units.divide(&rhs.units),
        }
    }
}

impl Mul<f64> for Quantity {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            magnitude: self.magnitude * rhs,
            units: self.units,
        }
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Self::Output {
        Quantity {
            magnitude: self * rhs.magnitude,
            units: rhs.units,
        }
    }
}

impl Div<f64> for Quantity {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            magnitude: self.magnitude / rhs,
            units: self.units,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimensionality;
    use crate::table::UnitTable;

    fn table() -> UnitTable {
        let mut table = UnitTable::new();
        table
            .define("CH4", Dimensionality::base("methane"), 1.0)
            .unwrap();
        table
            .define("C", Dimensionality::base("carbon"), 1.0)
            .unwrap();
        table
    }

    fn quantity(mag: f64, unit: &str, table: &UnitTable) -> Quantity {
        Quantity::new(mag, ParsedUnit::parse(unit, table).unwrap())
    }

    #[test]
    fn test_scalar_multiplication() {
        let table = table();
        let q = 2.0 * quantity(3.0, "CH4", &table);
        assert_eq!(q.magnitude(), 6.0);
        assert_eq!(q.units().single_symbol(), Some("CH4"));
    }

    #[test]
    fn test_quantity_multiplication_merges_units() {
        let table = table();
        let q = quantity(2.0, "kg", &table) * quantity(3.0, "CH4", &table);
        assert_eq!(q.magnitude(), 6.0);
        assert_eq!(q.units().normalized(), "CH4 kg");
    }

    #[test]
    fn test_division_cancels_units() {
        let table = table();
        let q = quantity(6.0, "CH4", &table) / quantity(3.0, "CH4", &table);
        assert_eq!(q.magnitude(), 2.0);
        assert!(q.units().components().is_empty());
    }

    #[test]
    fn test_powi() {
        let table = table();
        let q = quantity(3.0, "CH4", &table).powi(2);
        assert_eq!(q.magnitude(), 9.0);
        assert_eq!(q.units().components().get("CH4"), Some(&2));
    }

    #[test]
    fn test_display() {
        let table = table();
        let q = quantity(1.5, "kg CH4 / yr", &table);
        assert_eq!(format!("{q}"), "1.5 CH4 kg / yr");
    }
}
