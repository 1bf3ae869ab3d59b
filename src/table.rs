//! Unit table: named units with dimensionalities and base-unit scales.
//!
//! Every unit is stored with its [`Dimensionality`] and a scale factor to
//! the base units of its dimensions (kg for mass, s for time, the base
//! species unit for each species dimension). Lookup handles SI prefixes as
//! a fallback, so `Gt`, `MtCO2` or `ktCH4` resolve without being defined
//! one by one.
//!
//! # Scale convention
//!
//! The scale is the multiplier to convert FROM the unit TO base units:
//! `t` has scale 1e3 (1 t = 1e3 kg), `CO2` has scale 12/44 (1 kg CO2 is
//! 12/44 kg of carbon-equivalent in the `[carbon]` dimension).

use crate::dimension::{Dimensionality, MASS, TIME};
use crate::errors::{UnitsError, UnitsResult};

use std::collections::HashMap;

/// A named unit: dimensionality plus scale to base units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    /// Symbol this unit is registered under.
    pub name: String,
    /// The physical dimension of this unit.
    pub dimensionality: Dimensionality,
    /// Conversion factor to base units.
    pub scale: f64,
}

impl UnitDef {
    pub fn new(name: &str, dimensionality: Dimensionality, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            dimensionality,
            scale,
        }
    }
}

/// SI prefix multipliers.
#[derive(Debug, Clone, Copy)]
pub struct SiPrefix {
    pub symbol: &'static str,
    pub factor: f64,
}

/// All SI prefixes from yocto to yotta ('u' stands in for micro).
pub static SI_PREFIXES: &[SiPrefix] = &[
    SiPrefix {
        symbol: "Y",
        factor: 1e24,
    },
    SiPrefix {
        symbol: "Z",
        factor: 1e21,
    },
    SiPrefix {
        symbol: "E",
        factor: 1e18,
    },
    SiPrefix {
        symbol: "P",
        factor: 1e15,
    },
    SiPrefix {
        symbol: "T",
        factor: 1e12,
    },
    SiPrefix {
        symbol: "G",
        factor: 1e9,
    },
    SiPrefix {
        symbol: "M",
        factor: 1e6,
    },
    SiPrefix {
        symbol: "k",
        factor: 1e3,
    },
    SiPrefix {
        symbol: "h",
        factor: 1e2,
    },
    SiPrefix {
        symbol: "da",
        factor: 1e1,
    },
    SiPrefix {
        symbol: "d",
        factor: 1e-1,
    },
    SiPrefix {
        symbol: "c",
        factor: 1e-2,
    },
    SiPrefix {
        symbol: "m",
        factor: 1e-3,
    },
    SiPrefix {
        symbol: "u",
        factor: 1e-6,
    },
    SiPrefix {
        symbol: "n",
        factor: 1e-9,
    },
    SiPrefix {
        symbol: "p",
        factor: 1e-12,
    },
    SiPrefix {
        symbol: "f",
        factor: 1e-15,
    },
    SiPrefix {
        symbol: "a",
        factor: 1e-18,
    },
    SiPrefix {
        symbol: "z",
        factor: 1e-21,
    },
    SiPrefix {
        symbol: "y",
        factor: 1e-24,
    },
];

// Constants for time conversions
/// Seconds per year (365.25 days, astronomical year).
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;
/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;
/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;
/// Seconds per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Table of known units.
#[derive(Debug, Clone)]
pub struct UnitTable {
    units: HashMap<String, UnitDef>,
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTable {
    /// Creates a table populated with the engine defaults (mass and time).
    pub fn new() -> Self {
        let mut table = Self {
            units: HashMap::new(),
        };
        table.register_mass_units();
        table.register_time_units();
        table
    }

    /// Inserts an engine-default unit, replacing any existing entry.
    fn insert(&mut self, name: &str, dimensionality: Dimensionality, scale: f64) {
        self.units
            .insert(name.to_string(), UnitDef::new(name, dimensionality, scale));
    }

    /// Defines a unit, rejecting redefinition.
    pub fn define(
        &mut self,
        name: &str,
        dimensionality: Dimensionality,
        scale: f64,
    ) -> UnitsResult<()> {
        if self.units.contains_key(name) {
            return Err(UnitsError::Redefinition(name.to_string()));
        }
        self.insert(name, dimensionality, scale);
        Ok(())
    }

    /// Defines a unit unless the symbol is already taken.
    ///
    /// Needed for auto-generated upper-case spellings: two species may
    /// share one (`NOx` and its lower-case alias symbol `nox` both map to
    /// `NOX`), and the first definition wins.
    pub fn define_if_absent(&mut self, name: &str, dimensionality: Dimensionality, scale: f64) {
        if !self.units.contains_key(name) {
            self.insert(name, dimensionality, scale);
        }
    }

    /// Looks up a unit by symbol, handling SI prefixes as a fallback.
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<UnitDef> {
        if let Some(def) = self.units.get(symbol) {
            return Some(def.clone());
        }
        self.lookup_prefixed(symbol)
    }

    /// Attempts to resolve a symbol as prefix + known unit.
    fn lookup_prefixed(&self, symbol: &str) -> Option<UnitDef> {
        // Longer prefixes must match first ("da" before "d")
        let mut prefixes: Vec<_> = SI_PREFIXES.iter().collect();
        prefixes.sort_by(|a, b| b.symbol.len().cmp(&a.symbol.len()));

        for prefix in prefixes {
            if let Some(base_symbol) = symbol.strip_prefix(prefix.symbol) {
                if let Some(base) = self.units.get(base_symbol) {
                    return Some(UnitDef::new(
                        symbol,
                        base.dimensionality.clone(),
                        base.scale * prefix.factor,
                    ));
                }
            }
        }
        None
    }

    /// Registers mass units (base: kg).
    fn register_mass_units(&mut self) {
        self.insert("kg", Dimensionality::base(MASS), 1.0);
        self.insert("g", Dimensionality::base(MASS), 1e-3);
        self.insert("t", Dimensionality::base(MASS), 1e3); // metric tonne
    }

    /// Registers time units (base: second).
    fn register_time_units(&mut self) {
        self.insert("s", Dimensionality::base(TIME), 1.0);
        self.insert("sec", Dimensionality::base(TIME), 1.0);
        self.insert("second", Dimensionality::base(TIME), 1.0);
        self.insert("min", Dimensionality::base(TIME), SECONDS_PER_MINUTE);
        self.insert("minute", Dimensionality::base(TIME), SECONDS_PER_MINUTE);
        self.insert("h", Dimensionality::base(TIME), SECONDS_PER_HOUR);
        self.insert("hr", Dimensionality::base(TIME), SECONDS_PER_HOUR);
        self.insert("hour", Dimensionality::base(TIME), SECONDS_PER_HOUR);
        self.insert("day", Dimensionality::base(TIME), SECONDS_PER_DAY);
        self.insert("d", Dimensionality::base(TIME), SECONDS_PER_DAY);
        self.insert("yr", Dimensionality::base(TIME), SECONDS_PER_YEAR);
        self.insert("year", Dimensionality::base(TIME), SECONDS_PER_YEAR);
        self.insert("a", Dimensionality::base(TIME), SECONDS_PER_YEAR); // annum
        self.insert("annum", Dimensionality::base(TIME), SECONDS_PER_YEAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_lookup() {
        let table = UnitTable::new();

        let kg = table.lookup("kg").expect("kg should exist");
        assert_eq!(kg.dimensionality, Dimensionality::base(MASS));
        assert!((kg.scale - 1.0).abs() < f64::EPSILON);

        let t = table.lookup("t").expect("t should exist");
        assert!((t.scale - 1e3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prefixed_unit_lookup() {
        let table = UnitTable::new();

        let gt = table.lookup("Gt").expect("Gt should resolve");
        assert_eq!(gt.dimensionality, Dimensionality::base(MASS));
        assert!((gt.scale - 1e12).abs() < 1.0);

        let kt = table.lookup("kt").expect("kt should resolve");
        assert!((kt.scale - 1e6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_match_wins_over_prefix() {
        let mut table = UnitTable::new();
        // "da" prefix could otherwise shadow an explicit "day"
        assert_eq!(table.lookup("day").unwrap().scale, SECONDS_PER_DAY);

        // species starting with a prefix letter stay themselves
        table
            .define("cC4F8", Dimensionality::base("cC4F8"), 1.0)
            .unwrap();
        let def = table.lookup("cC4F8").unwrap();
        assert_eq!(def.dimensionality, Dimensionality::base("cC4F8"));
    }

    #[test]
    fn test_time_units() {
        let table = UnitTable::new();
        let yr = table.lookup("yr").unwrap();
        assert!((yr.scale - SECONDS_PER_YEAR).abs() < f64::EPSILON);
        assert_eq!(table.lookup("a").unwrap().scale, SECONDS_PER_YEAR);
        assert_eq!(table.lookup("hr").unwrap().scale, SECONDS_PER_HOUR);
    }

    #[test]
    fn test_define_rejects_redefinition() {
        let mut table = UnitTable::new();
        table
            .define("CH4", Dimensionality::base("methane"), 1.0)
            .unwrap();
        let err = table
            .define("CH4", Dimensionality::base("methane"), 1.0)
            .unwrap_err();
        assert_eq!(err, UnitsError::Redefinition("CH4".to_string()));
    }

    #[test]
    fn test_define_if_absent_keeps_first() {
        let mut table = UnitTable::new();
        table.define_if_absent("NOX", Dimensionality::base("NOx"), 1.0);
        table.define_if_absent("NOX", Dimensionality::base("other"), 2.0);
        let def = table.lookup("NOX").unwrap();
        assert_eq!(def.dimensionality, Dimensionality::base("NOx"));
        assert_eq!(def.scale, 1.0);
    }

    #[test]
    fn test_unknown_unit() {
        let table = UnitTable::new();
        assert!(table.lookup("unknown_unit").is_none());
    }

    #[test]
    fn test_joint_unit_prefix_chain() {
        let mut table = UnitTable::new();
        table.define("C", Dimensionality::base("carbon"), 1.0).unwrap();
        let joint_dim = Dimensionality::base(MASS) * Dimensionality::base("carbon");
        table.define("tC", joint_dim.clone(), 1e3).unwrap();
        table.define("gC", joint_dim, 1e-3).unwrap();

        // GtC resolves as G + tC, PgC as P + gC, both 1e12 kg of carbon
        let gtc = table.lookup("GtC").expect("GtC should resolve");
        assert!((gtc.scale - 1e12).abs() < 1.0);
        let pgc = table.lookup("PgC").expect("PgC should resolve");
        assert!((pgc.scale - 1e12).abs() < 1.0);
    }
}
