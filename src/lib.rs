//! Unit handling for simple climate model emissions data.
//!
//! This crate provides a registry of chemical-species units for
//! emissions accounting: every species (CO2, CH4, NOx, each refrigerant
//! blend, ...) is its own physical dimension, so quantities of different
//! gases cannot be mixed up by accident. Conversions that ARE meaningful
//! are available in two ways:
//!
//! - **Always**: within a dimension (`tC` → `tCO2`, `Gt CO2/yr` →
//!   `Mt CO2/yr`), via molecular-mass and SI-prefix scales.
//! - **Opt-in**: across dimensions, under a named conversion context —
//!   molecular contexts like `CH4_conversions`, or global-warming-
//!   potential metrics like `AR4GWP100` that convert any tabulated
//!   species to CO2-equivalent.
//!
//! Gas mixtures (the R-400/R-500 refrigerant blends) are first-class:
//! they can be split into their weighted constituents, and metric
//! contexts synthesize CO2-equivalence factors for every mixture whose
//! constituents are all tabulated.
//!
//! # Quick start
//!
//! ```
//! use scm_units::unit_registry;
//!
//! let registry = unit_registry();
//!
//! // In-dimension conversions just work
//! let emissions = registry.quantity(0.34, "Gt C / yr").unwrap();
//! let co2 = registry.convert(&emissions, "Mt CO2 / yr").unwrap();
//! assert!((co2.magnitude() - 1246.67).abs() < 0.01);
//!
//! // Cross-species conversions need an explicit context
//! let ch4 = registry.quantity(100.0, "Mt CH4 / yr").unwrap();
//! assert!(registry.convert(&ch4, "Mt CO2 / yr").is_err());
//!
//! let gwp = registry.context("AR4GWP100").unwrap();
//! let co2e = gwp.convert(&ch4, "Mt CO2 / yr").unwrap();
//! assert!((co2e.magnitude() - 2500.0).abs() < 1e-6);
//! ```
//!
//! # Splitting mixtures
//!
//! ```
//! use scm_units::unit_registry;
//!
//! let registry = unit_registry();
//! let blend = registry.get("HFC410a").unwrap();
//! let parts = registry.split_gas_mixture(&blend).unwrap();
//! let total: f64 = parts.iter().map(|q| q.magnitude()).sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! ```
//!
//! # Registry lifecycle
//!
//! The default instance from [`unit_registry`] is ready to use. Isolated
//! instances are built in two steps — construct, then load the standard
//! units once:
//!
//! ```
//! use scm_units::ScmUnitRegistry;
//!
//! let mut registry = ScmUnitRegistry::new();
//! registry.add_standards().unwrap();
//! assert!(registry.add_standards().is_err()); // second call redefines
//! ```
//!
//! # Module structure
//!
//! - [`dimension`]: dynamic dimension tags and arithmetic
//! - [`table`]: the unit table with SI-prefix lookup
//! - [`parser`]: unit expression parsing and normalization
//! - [`quantity`]: the [`Quantity`] value type
//! - [`registry`]: the [`ScmUnitRegistry`] itself
//! - [`context`]: conversion contexts and their transformation rules
//! - [`metrics`]: metric (GWP) conversion tables, CSV loading
//! - [`mixtures`]: gas mixture compositions
//! - [`standard_gases`]: the standard species table

pub mod context;
pub mod dimension;
pub mod errors;
pub mod metrics;
pub mod mixtures;
pub mod parser;
pub mod quantity;
pub mod registry;
pub mod standard_gases;
pub mod table;

pub use context::{ActiveContexts, Context, ShapeTemplate, Transformation};
pub use dimension::Dimensionality;
pub use errors::{UnitsError, UnitsResult};
pub use metrics::MetricConversions;
pub use mixtures::{MixtureConstituent, MIXTURES};
pub use parser::ParsedUnit;
pub use quantity::Quantity;
pub use registry::{unit_registry, ScmUnitRegistry};
pub use table::{UnitDef, UnitTable};
