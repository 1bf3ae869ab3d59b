//! Gas mixture compositions.
//!
//! Refrigerant blends (the ASHRAE R-400/R-500 series) are traded and
//! reported as single species, but their warming impact is the weighted
//! impact of their constituents. This module carries the bundled
//! composition table: for each mixture, an ordered list of constituent
//! species with mass-fraction percentages.
//!
//! Fractions for a mixture are expected to sum to 100. This is asserted
//! by the data tests, not enforced at load time: a malformed table
//! produces constituent lists whose magnitudes do not sum to 1 when
//! split, rather than an error.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// One constituent of a mixture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MixtureConstituent {
    /// Species symbol, as defined in the standard gas table.
    pub species: String,
    /// Mass fraction, in percent.
    pub fraction_pct: f64,
}

#[derive(Debug, Deserialize)]
struct MixtureEntry {
    name: String,
    constituents: Vec<MixtureConstituent>,
}

#[derive(Debug, Deserialize)]
struct MixturesFile {
    mixture: Vec<MixtureEntry>,
}

/// The bundled mixture table: mixture symbol → ordered constituents.
pub static MIXTURES: LazyLock<BTreeMap<String, Vec<MixtureConstituent>>> = LazyLock::new(|| {
    let file: MixturesFile = toml::from_str(include_str!("data/mixtures.toml"))
        .expect("bundled mixtures.toml is valid");
    file.mixture
        .into_iter()
        .map(|entry| (entry.name, entry.constituents))
        .collect()
});

/// Returns true if `name` is a known gas mixture.
#[must_use]
pub fn is_mixture(name: &str) -> bool {
    MIXTURES.contains_key(name)
}

/// Returns the ordered constituent table for a mixture.
#[must_use]
pub fn constituents(name: &str) -> Option<&'static [MixtureConstituent]> {
    MIXTURES.get(name).map(|c| c.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixtures_load() {
        assert!(is_mixture("CFC400"));
        assert!(is_mixture("HFC407a"));
        assert!(!is_mixture("CO2"));
    }

    #[test]
    fn test_fractions_sum_to_100() {
        for (name, constituents) in MIXTURES.iter() {
            let total: f64 = constituents.iter().map(|c| c.fraction_pct).sum();
            assert!(
                (total - 100.0).abs() < 1e-9,
                "fractions of {name} sum to {total}"
            );
        }
    }

    #[test]
    fn test_constituent_order_preserved() {
        let hfc407a = constituents("HFC407a").unwrap();
        let species: Vec<&str> = hfc407a.iter().map(|c| c.species.as_str()).collect();
        assert_eq!(species, vec!["HFC32", "HFC125", "HFC134a"]);
    }

    #[test]
    fn test_known_composition() {
        let cfc400 = constituents("CFC400").unwrap();
        assert_eq!(cfc400.len(), 2);
        assert_eq!(cfc400[0].species, "CFC12");
        assert_eq!(cfc400[0].fraction_pct, 50.0);
    }
}
