//! The species-aware unit registry.
//!
//! [`ScmUnitRegistry`] owns the unit table, the metric conversion table
//! and the lazily-built context table. Usage follows a two-step
//! initialisation: construct, then call [`add_standards`] exactly once to
//! load the species, mixture and concentration units. Calling it a second
//! time fails with a redefinition error.
//!
//! ```
//! use scm_units::ScmUnitRegistry;
//!
//! let mut registry = ScmUnitRegistry::new();
//! registry.add_standards().unwrap();
//!
//! let q = registry.get("CO2").unwrap();
//! let c = registry.convert(&q, "C").unwrap();
//! assert!((c.magnitude() - 12.0 / 44.0).abs() < 1e-12);
//! ```
//!
//! A process-wide default instance is available through
//! [`unit_registry`]; construct isolated instances for anything beyond
//! convenience use.

use crate::context::{ActiveContexts, Context};
use crate::dimension::{Dimensionality, CARBON, CONCENTRATIONS, MASS};
use crate::errors::{UnitsError, UnitsResult};
use crate::metrics::MetricConversions;
use crate::mixtures::{self, MIXTURES};
use crate::parser::ParsedUnit;
use crate::quantity::Quantity;
use crate::standard_gases::{GasDef, STANDARD_GASES};
use crate::table::UnitTable;

use log::debug;
use std::collections::HashMap;
use std::sync::{LazyLock, OnceLock};

/// Molecular-mass ratio of methane to carbon.
const CH4_TO_C: f64 = 12.0 / 16.0;
/// Molecular-mass ratio of nitrous oxide to atomic nitrogen.
const N2O_TO_N: f64 = 14.0 / 44.0;
/// Molecular-mass ratio of atomic nitrogen to NOx (counted as NO2).
const N_TO_NOX: f64 = 46.0 / 14.0;
/// Molecular-mass ratio of atomic nitrogen to ammonia.
const N_TO_NH3: f64 = 17.0 / 14.0;

static UNIT_REGISTRY: LazyLock<ScmUnitRegistry> = LazyLock::new(|| {
    let mut registry = ScmUnitRegistry::new();
    registry
        .add_standards()
        .expect("standard unit definitions are consistent");
    registry
});

/// The process-wide default registry, with standards loaded.
///
/// Convenience wrapper only; tests and libraries that need isolation
/// should construct their own [`ScmUnitRegistry`].
#[must_use]
pub fn unit_registry() -> &'static ScmUnitRegistry {
    &UNIT_REGISTRY
}

/// Unit registry for simple climate model emissions data.
#[derive(Debug, Clone)]
pub struct ScmUnitRegistry {
    table: UnitTable,
    metric_conversions: MetricConversions,
    contexts: OnceLock<HashMap<String, Context>>,
}

impl Default for ScmUnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScmUnitRegistry {
    /// Creates a registry using the bundled metric conversion table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_metric_conversions(MetricConversions::bundled())
    }

    /// Creates a registry with a custom metric conversion table.
    #[must_use]
    pub fn with_metric_conversions(metric_conversions: MetricConversions) -> Self {
        Self {
            table: UnitTable::new(),
            metric_conversions,
            contexts: OnceLock::new(),
        }
    }

    /// Registers the standard species, mixtures and concentration units.
    ///
    /// Must be called exactly once after construction. A second call
    /// fails with [`UnitsError::Redefinition`].
    pub fn add_standards(&mut self) -> UnitsResult<()> {
        for (symbol, def) in STANDARD_GASES {
            match def {
                GasDef::Base(tag) => self.add_base_species(symbol, tag)?,
                GasDef::Derived {
                    factor,
                    base,
                    aliases,
                } => self.add_derived_species(symbol, *factor, base, aliases)?,
            }
        }
        for name in MIXTURES.keys() {
            self.add_base_species(name, name)?;
        }
        self.add_concentration_units()
    }

    /// The metric conversion table in use.
    #[must_use]
    pub fn metric_conversions(&self) -> &MetricConversions {
        &self.metric_conversions
    }

    pub(crate) fn table(&self) -> &UnitTable {
        &self.table
    }

    /// Parses a unit expression into a quantity of magnitude 1.
    pub fn get(&self, unit: &str) -> UnitsResult<Quantity> {
        self.quantity(1.0, unit)
    }

    /// Creates a quantity from a magnitude and a unit expression.
    pub fn quantity(&self, magnitude: f64, unit: &str) -> UnitsResult<Quantity> {
        Ok(Quantity::new(magnitude, ParsedUnit::parse(unit, &self.table)?))
    }

    /// The dimensionality of a quantity.
    pub fn dimensionality(&self, quantity: &Quantity) -> UnitsResult<Dimensionality> {
        quantity.units().dimensionality(&self.table)
    }

    /// The magnitude of a quantity expressed in base units.
    pub fn base_magnitude(&self, quantity: &Quantity) -> UnitsResult<f64> {
        Ok(quantity.magnitude() * quantity.units().base_scale(&self.table)?)
    }

    /// Converts a quantity to `target` without any context active.
    ///
    /// Fails with a dimensionality error when the dimensions differ; use
    /// [`context`](Self::context) or [`convert_in`](Self::convert_in) for
    /// cross-species conversions.
    pub fn convert(&self, quantity: &Quantity, target: &str) -> UnitsResult<Quantity> {
        let dst = ParsedUnit::parse(target, &self.table)?;
        let src_dim = quantity.units().dimensionality(&self.table)?;
        let dst_dim = dst.dimensionality(&self.table)?;
        if src_dim != dst_dim {
            return Err(UnitsError::Dimensionality {
                from_unit: quantity.units().normalized(),
                to_unit: dst.normalized(),
                from_dim: src_dim.to_string(),
                to_dim: dst_dim.to_string(),
                contexts: Vec::new(),
            });
        }
        let factor =
            quantity.units().base_scale(&self.table)? / dst.base_scale(&self.table)?;
        Ok(Quantity::new(quantity.magnitude() * factor, dst))
    }

    /// Converts a quantity under a single named context.
    ///
    /// Shorthand for `registry.context(name)?.convert(quantity, target)`,
    /// mirroring the `to(unit, metric)` call of the original interface.
    pub fn convert_in(
        &self,
        quantity: &Quantity,
        target: &str,
        context: &str,
    ) -> UnitsResult<Quantity> {
        self.context(context)?.convert(quantity, target)
    }

    /// Activates a named context for the lifetime of the returned handle.
    ///
    /// The first activation of any context builds the full context table.
    pub fn context(&self, name: &str) -> UnitsResult<ActiveContexts<'_>> {
        self.contexts(&[name])
    }

    /// Activates several contexts at once.
    pub fn contexts(&self, names: &[&str]) -> UnitsResult<ActiveContexts<'_>> {
        let built = self.ensure_contexts();
        let mut active = Vec::with_capacity(names.len());
        for name in names {
            let context = built
                .get(*name)
                .ok_or_else(|| UnitsError::UnknownContext((*name).to_string()))?;
            active.push(context);
        }
        Ok(ActiveContexts::new(self, active))
    }

    /// Splits a gas-mixture quantity into its constituents.
    ///
    /// Returns one quantity per constituent, in composition-table order.
    /// For an input of `1 <mixture>` the magnitudes are the mass
    /// fractions and sum to 1.
    pub fn split_gas_mixture(&self, quantity: &Quantity) -> UnitsResult<Vec<Quantity>> {
        let dims = quantity.units().dimensionality(&self.table)?;
        let mixture_dims: Vec<(&str, i32)> = dims
            .iter()
            .filter(|(tag, _)| mixtures::is_mixture(tag))
            .collect();

        let (tag, exp) = match mixture_dims.as_slice() {
            [] => return Err(UnitsError::NoMixtureDimension),
            [only] => *only,
            _ => return Err(UnitsError::MultipleMixtureDimensions),
        };
        if exp != 1 {
            return Err(UnitsError::MixturePower(exp));
        }

        let constituents =
            mixtures::constituents(tag).ok_or(UnitsError::NoMixtureDimension)?;
        let mixture_unit = self.get(tag)?;

        let mut out = Vec::with_capacity(constituents.len());
        for constituent in constituents {
            let constituent_unit = self.get(&constituent.species)?;
            out.push(
                quantity.clone() / &mixture_unit * (constituent.fraction_pct / 100.0)
                    * constituent_unit,
            );
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // species registration
    // ------------------------------------------------------------------

    fn add_base_species(&mut self, symbol: &str, tag: &str) -> UnitsResult<()> {
        let dim = Dimensionality::base(tag);
        self.table.define(symbol, dim.clone(), 1.0)?;
        if tag != symbol {
            self.table.define(tag, dim.clone(), 1.0)?;
        }
        self.add_case_and_joint_versions(symbol, &dim, 1.0)
    }

    fn add_derived_species(
        &mut self,
        symbol: &str,
        factor: f64,
        base: &str,
        aliases: &[&str],
    ) -> UnitsResult<()> {
        let base_def = self
            .table
            .lookup(base)
            .ok_or_else(|| UnitsError::UnknownUnit(base.to_string()))?;
        let dim = base_def.dimensionality;
        let scale = factor * base_def.scale;
        self.table.define(symbol, dim.clone(), scale)?;
        for alias in aliases {
            self.table.define(alias, dim.clone(), scale)?;
        }
        self.add_case_and_joint_versions(symbol, &dim, scale)
    }

    /// Adds the joint mass units for a symbol and, when the upper-case
    /// spelling differs, the upper-case unit with its own joint units.
    fn add_case_and_joint_versions(
        &mut self,
        symbol: &str,
        dim: &Dimensionality,
        scale: f64,
    ) -> UnitsResult<()> {
        self.add_joint_mass_versions(symbol, dim, scale, true)?;

        let upper = symbol.to_uppercase();
        if upper != symbol {
            // Two species may share an upper-case spelling; first wins
            self.table.define_if_absent(&upper, dim.clone(), scale);
            self.add_joint_mass_versions(&upper, dim, scale, false)?;
        }
        Ok(())
    }

    /// Adds `g<symbol>` and `t<symbol>`, the joint mass + species units.
    fn add_joint_mass_versions(
        &mut self,
        symbol: &str,
        dim: &Dimensionality,
        scale: f64,
        strict: bool,
    ) -> UnitsResult<()> {
        let joint_dim = Dimensionality::base(MASS) * dim.clone();
        let gram = format!("g{symbol}");
        let tonne = format!("t{symbol}");
        if strict {
            self.table.define(&gram, joint_dim.clone(), scale * 1e-3)?;
            self.table.define(&tonne, joint_dim, scale * 1e3)?;
        } else {
            self.table
                .define_if_absent(&gram, joint_dim.clone(), scale * 1e-3);
            self.table.define_if_absent(&tonne, joint_dim, scale * 1e3);
        }
        Ok(())
    }

    fn add_concentration_units(&mut self) -> UnitsResult<()> {
        let dim = Dimensionality::base(CONCENTRATIONS);
        self.table.define("ppm", dim.clone(), 1.0)?;
        self.table.define("ppb", dim.clone(), 1e-3)?;
        self.table.define("ppt", dim, 1e-6)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // context construction
    // ------------------------------------------------------------------

    /// Builds the context table on first use.
    fn ensure_contexts(&self) -> &HashMap<String, Context> {
        self.contexts.get_or_init(|| self.build_contexts())
    }

    fn build_contexts(&self) -> HashMap<String, Context> {
        let mut contexts = HashMap::new();

        let mut ch4 = Context::new("CH4_conversions");
        ch4.add_bidirectional("methane", "CH4", CARBON, "C", CH4_TO_C);
        contexts.insert(ch4.name().to_string(), ch4);

        let mut n2o = Context::new("N2O_conversions");
        n2o.add_bidirectional("nitrous_oxide", "N2O", "nitrogen", "N", N2O_TO_N);
        contexts.insert(n2o.name().to_string(), n2o);

        let mut nox = Context::new("NOx_conversions");
        nox.add_bidirectional("nitrogen", "N", "NOx", "NOx", N_TO_NOX);
        // NOx ↔ N2O stays reachable under this context alone
        nox.add_bidirectional("nitrous_oxide", "N2O", "nitrogen", "N", N2O_TO_N);
        contexts.insert(nox.name().to_string(), nox);

        let mut nh3 = Context::new("NH3_conversions");
        nh3.add_bidirectional("nitrogen", "N", "NH3", "NH3", N_TO_NH3);
        contexts.insert(nh3.name().to_string(), nh3);

        for metric in self.metric_conversions.metrics() {
            let context = self.build_metric_context(metric);
            debug!(
                "built metric context {metric} with {} transformations",
                context.len()
            );
            contexts.insert(metric.clone(), context);
        }

        contexts
    }

    /// Builds one metric context: a transformation to the carbon
    /// dimension for every tabulated species, plus synthesized factors
    /// for mixtures covered by the table through their constituents.
    fn build_metric_context(&self, metric: &str) -> Context {
        let mut context = Context::new(metric);

        for species in self.metric_conversions.species() {
            let Some(factor) = self.metric_conversions.get(species, metric) else {
                continue;
            };
            self.add_gwp_transformations(&mut context, species, factor);
        }

        for mixture in MIXTURES.keys() {
            if self.metric_conversions.get(mixture, metric).is_some() {
                continue;
            }
            let Some(factor) = self.derive_mixture_factor(mixture, metric) else {
                debug!("no {metric} factor for all constituents of {mixture}, skipping");
                continue;
            };
            if factor.is_nan() {
                debug!("derived {metric} factor for {mixture} is NaN, skipping");
                continue;
            }
            self.add_gwp_transformations(&mut context, mixture, factor);
        }

        context
    }

    /// Derives a metric factor for a mixture as the fraction-weighted sum
    /// of its constituents' factors. `None` when any constituent has no
    /// tabulated factor.
    fn derive_mixture_factor(&self, mixture: &str, metric: &str) -> Option<f64> {
        let one = self.get(mixture).ok()?;
        let constituents = self.split_gas_mixture(&one).ok()?;

        let mut total = 0.0;
        for constituent in &constituents {
            let species = constituent.units().single_symbol()?;
            let factor = self.metric_conversions.get(species, metric)?;
            total += constituent.magnitude() * factor;
        }
        Some(total)
    }

    /// Registers the carbon-equivalence transformations for one species.
    fn add_gwp_transformations(&self, context: &mut Context, species: &str, factor: f64) {
        let Some(species_def) = self.table.lookup(species) else {
            debug!("species {species} is not a defined unit, skipping");
            return;
        };
        let Some((tag, 1)) = species_def.dimensionality.single() else {
            debug!("species {species} does not have a single base dimension, skipping");
            return;
        };
        if self.table.lookup(tag).is_none() {
            debug!("dimension tag {tag} has no unit, skipping {species}");
            return;
        }
        let Some(co2) = self.table.lookup("CO2") else {
            debug!("CO2 is not defined, skipping {species}");
            return;
        };

        let conv_val = factor * co2.scale / species_def.scale;
        context.add_bidirectional(tag, tag, CARBON, CARBON, conv_val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn registry() -> ScmUnitRegistry {
        let mut registry = ScmUnitRegistry::new();
        registry.add_standards().unwrap();
        registry
    }

    #[test]
    fn test_base_and_derived_species() {
        let reg = registry();
        let co2 = reg.get("CO2").unwrap();
        let c = reg.convert(&co2, "C").unwrap();
        assert!(is_close!(c.magnitude(), 12.0 / 44.0));

        // alias spellings resolve to the same unit
        let via_alias = reg.get("carbon_dioxide").unwrap();
        assert!(is_close!(
            reg.convert(&via_alias, "C").unwrap().magnitude(),
            12.0 / 44.0
        ));
    }

    #[test]
    fn test_add_standards_twice_fails() {
        let mut reg = registry();
        let err = reg.add_standards().unwrap_err();
        assert!(matches!(err, UnitsError::Redefinition(_)));
    }

    #[test]
    fn test_uppercase_alias() {
        let reg = registry();
        let upper = reg.get("HFC4310MEE").unwrap();
        let one = reg.convert(&upper, "HFC4310mee").unwrap();
        assert!(is_close!(one.magnitude(), 1.0));
    }

    #[test]
    fn test_joint_units() {
        let reg = registry();
        let tc = reg.get("tC").unwrap();
        assert!(is_close!(
            reg.convert(&tc, "gC").unwrap().magnitude(),
            1e6
        ));
        assert!(is_close!(
            reg.convert(&tc, "tCO2").unwrap().magnitude(),
            44.0 / 12.0
        ));
    }

    #[test]
    fn test_concentrations() {
        let reg = registry();
        let ppm = reg.get("ppm").unwrap();
        assert!(is_close!(
            reg.convert(&ppm, "ppb").unwrap().magnitude(),
            1000.0
        ));
        // concentrations are their own dimension, not bare numbers
        assert!(reg.convert(&ppm, "1").is_err());
    }

    #[test]
    fn test_forbidden_without_context() {
        let reg = registry();
        let ch4 = reg.get("CH4").unwrap();
        let err = reg.convert(&ch4, "C").unwrap_err();
        assert!(matches!(err, UnitsError::Dimensionality { .. }));
    }

    #[test]
    fn test_pairwise_context() {
        let reg = registry();
        let ch4 = reg.get("CH4").unwrap();
        let active = reg.context("CH4_conversions").unwrap();
        assert!(is_close!(
            active.convert(&ch4, "C").unwrap().magnitude(),
            12.0 / 16.0
        ));
        let c = reg.get("C").unwrap();
        assert!(is_close!(
            active.convert(&c, "CH4").unwrap().magnitude(),
            16.0 / 12.0
        ));
    }

    #[test]
    fn test_unknown_context() {
        let reg = registry();
        assert!(matches!(
            reg.context("AR99GWP100").unwrap_err(),
            UnitsError::UnknownContext(_)
        ));
    }

    #[test]
    fn test_metric_context_species() {
        let reg = registry();
        let ch4 = reg.get("CH4").unwrap();
        let co2 = reg.convert_in(&ch4, "CO2", "AR4GWP100").unwrap();
        assert!(is_close!(co2.magnitude(), 25.0));
    }

    #[test]
    fn test_metric_context_synthesized_mixture() {
        let reg = registry();
        let mixture = reg.get("HFC407a").unwrap();
        let co2 = reg.convert_in(&mixture, "CO2", "AR4GWP100").unwrap();
        assert!((co2.magnitude() - 2107.0).abs() <= 0.5);
    }

    #[test]
    fn test_split_gas_mixture() {
        let reg = registry();
        let one = reg.get("CFC400").unwrap();
        let constituents = reg.split_gas_mixture(&one).unwrap();
        assert_eq!(constituents.len(), 2);
        let total: f64 = constituents.iter().map(Quantity::magnitude).sum();
        assert!(is_close!(total, 1.0));
    }

    #[test]
    fn test_split_errors() {
        let reg = registry();
        let co2 = reg.get("CO2").unwrap();
        assert_eq!(
            reg.split_gas_mixture(&co2).unwrap_err(),
            UnitsError::NoMixtureDimension
        );

        let two = reg.get("CFC400").unwrap() * reg.get("HFC423a").unwrap();
        assert_eq!(
            reg.split_gas_mixture(&two).unwrap_err(),
            UnitsError::MultipleMixtureDimensions
        );

        let squared = reg.get("CFC400").unwrap().powi(2);
        assert_eq!(
            reg.split_gas_mixture(&squared).unwrap_err(),
            UnitsError::MixturePower(2)
        );
    }

    #[test]
    fn test_default_registry() {
        let reg = unit_registry();
        let kt = reg.get("kt").unwrap();
        assert!(is_close!(reg.convert(&kt, "t").unwrap().magnitude(), 1000.0));
    }
}
