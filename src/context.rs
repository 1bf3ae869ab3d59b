//! Conversion contexts: opt-in bundles of cross-dimension transformations.
//!
//! Species units are deliberately dimension-incompatible: CH4 mass cannot
//! be converted to carbon mass by accident. A [`Context`] overlays
//! transformation rules that make specific cross-dimension conversions
//! legal while it is active, e.g. `CH4_conversions` (molecular-mass
//! methane ↔ carbon) or a GWP metric context like `AR4GWP100`.
//!
//! # Shapes
//!
//! Transformation lookup is exact-match on the dimensionality of the
//! converted quantity. A rule registered for the bare `[methane]`
//! dimension does not apply to a `[mass] * [methane] / [time]` flux, so
//! every rule is registered at all four shapes callers actually use, via
//! [`ShapeTemplate`]:
//!
//! | template | dimensionality |
//! |----------|----------------|
//! | `Bare` | `[x]` |
//! | `MassPerTime` | `[mass] * [x] / [time]` |
//! | `Mass` | `[mass] * [x]` |
//! | `PerTime` | `[x] / [time]` |
//!
//! # Transitive conversions
//!
//! Conversion under active contexts is resolved as a shortest path over
//! the transformation graph, followed by an ordinary in-dimension
//! conversion. A consequence (inherited behavior, not a bug): activating
//! a context permits conversion between ANY units whose dimensionalities
//! participate in its rules — `CH4_conversions` also allows CH4 → CO2,
//! because CO2 lives in the `[carbon]` dimension the context connects to.

use crate::dimension::{Dimensionality, MASS, TIME};
use crate::errors::{UnitsError, UnitsResult};
use crate::parser::ParsedUnit;
use crate::quantity::Quantity;
use crate::registry::ScmUnitRegistry;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// The four structural templates a transformation is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeTemplate {
    /// `[x]`
    Bare,
    /// `[mass] * [x] / [time]`
    MassPerTime,
    /// `[mass] * [x]`
    Mass,
    /// `[x] / [time]`
    PerTime,
}

impl ShapeTemplate {
    /// All templates, in registration order.
    pub const ALL: [ShapeTemplate; 4] = [
        ShapeTemplate::Bare,
        ShapeTemplate::MassPerTime,
        ShapeTemplate::Mass,
        ShapeTemplate::PerTime,
    ];

    /// Builds the structural dimensionality for a base dimension tag.
    #[must_use]
    pub fn apply(&self, tag: &str) -> Dimensionality {
        let base = Dimensionality::base(tag);
        match self {
            ShapeTemplate::Bare => base,
            ShapeTemplate::MassPerTime => {
                Dimensionality::base(MASS) * base / Dimensionality::base(TIME)
            }
            ShapeTemplate::Mass => Dimensionality::base(MASS) * base,
            ShapeTemplate::PerTime => base / Dimensionality::base(TIME),
        }
    }
}

/// A single directed transformation rule.
///
/// Applying the rule multiplies the quantity by
/// `numerator_unit / denominator_unit * factor`, which swaps the species
/// part of the units while scaling the magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub numerator: String,
    pub denominator: String,
    pub factor: f64,
}

impl Transformation {
    pub(crate) fn apply(&self, q: Quantity, registry: &ScmUnitRegistry) -> UnitsResult<Quantity> {
        let numerator = registry.get(&self.numerator)?;
        let denominator = registry.get(&self.denominator)?;
        Ok(q * numerator / denominator * self.factor)
    }
}

/// A named bundle of transformation rules.
#[derive(Debug, Clone, Default)]
pub struct Context {
    name: String,
    transformations: HashMap<(Dimensionality, Dimensionality), Transformation>,
}

impl Context {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transformations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a single directed rule, replacing any existing rule for
    /// the same (from, to) pair.
    pub fn add_transformation(
        &mut self,
        from: Dimensionality,
        to: Dimensionality,
        transformation: Transformation,
    ) {
        self.transformations.insert((from, to), transformation);
    }

    /// Registers both directions of a scalar conversion between two base
    /// dimension tags, at all four shapes.
    ///
    /// Forward (`dim_a` → `dim_b`) multiplies by
    /// `unit_b / unit_a * conv_val`; backward divides by `conv_val`.
    pub fn add_bidirectional(
        &mut self,
        dim_a: &str,
        unit_a: &str,
        dim_b: &str,
        unit_b: &str,
        conv_val: f64,
    ) {
        for shape in ShapeTemplate::ALL {
            let from = shape.apply(dim_a);
            let to = shape.apply(dim_b);
            self.add_transformation(
                from.clone(),
                to.clone(),
                Transformation {
                    numerator: unit_b.to_string(),
                    denominator: unit_a.to_string(),
                    factor: conv_val,
                },
            );
            self.add_transformation(
                to,
                from,
                Transformation {
                    numerator: unit_a.to_string(),
                    denominator: unit_b.to_string(),
                    factor: 1.0 / conv_val,
                },
            );
        }
    }

    /// Looks up the rule for an exact (from, to) dimensionality pair.
    #[must_use]
    pub fn transformation(
        &self,
        from: &Dimensionality,
        to: &Dimensionality,
    ) -> Option<&Transformation> {
        self.transformations
            .get(&(from.clone(), to.clone()))
    }

    /// Iterates over the registered (from, to) pairs.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = &(Dimensionality, Dimensionality)> {
        self.transformations.keys()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}

/// Scoped activation of one or more contexts.
///
/// Obtained from [`ScmUnitRegistry::context`] or
/// [`ScmUnitRegistry::contexts`]; the overlay applies to conversions made
/// through this handle and ends when the handle goes out of scope.
#[derive(Debug, Clone)]
pub struct ActiveContexts<'a> {
    registry: &'a ScmUnitRegistry,
    active: Vec<&'a Context>,
}

impl<'a> ActiveContexts<'a> {
    pub(crate) fn new(registry: &'a ScmUnitRegistry, active: Vec<&'a Context>) -> Self {
        Self { registry, active }
    }

    /// Names of the active contexts, in activation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.active.iter().map(|c| c.name().to_string()).collect()
    }

    /// Converts a quantity to `target`, using the active transformation
    /// rules where dimensions differ.
    pub fn convert(&self, q: &Quantity, target: &str) -> UnitsResult<Quantity> {
        let table = self.registry.table();
        let dst = ParsedUnit::parse(target, table)?;
        let src_dim = q.units().dimensionality(table)?;
        let dst_dim = dst.dimensionality(table)?;

        if src_dim == dst_dim {
            return self.registry.convert(q, target);
        }

        let Some(path) = self.find_path(&src_dim, &dst_dim) else {
            return Err(UnitsError::Dimensionality {
                from_unit: q.units().normalized(),
                to_unit: dst.normalized(),
                from_dim: src_dim.to_string(),
                to_dim: dst_dim.to_string(),
                contexts: self.names(),
            });
        };

        let mut current = q.clone();
        for transformation in path {
            current = transformation.apply(current, self.registry)?;
        }
        self.registry.convert(&current, target)
    }

    /// Finds the transformations along a shortest path from `src` to
    /// `dst` in the union graph of the active contexts.
    fn find_path(&self, src: &Dimensionality, dst: &Dimensionality) -> Option<Vec<&Transformation>> {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let mut indices: HashMap<&Dimensionality, NodeIndex> = HashMap::new();
        let mut dims: Vec<&Dimensionality> = Vec::new();

        for context in &self.active {
            for (from, to) in context.pairs() {
                let from_idx = match indices.get(from) {
                    Some(idx) => *idx,
                    None => {
                        let idx = graph.add_node(());
                        indices.insert(from, idx);
                        dims.push(from);
                        idx
                    }
                };
                let to_idx = match indices.get(to) {
                    Some(idx) => *idx,
                    None => {
                        let idx = graph.add_node(());
                        indices.insert(to, idx);
                        dims.push(to);
                        idx
                    }
                };
                graph.update_edge(from_idx, to_idx, ());
            }
        }

        let src_idx = *indices.get(src)?;
        let dst_idx = *indices.get(dst)?;
        let (_, path) = astar(&graph, src_idx, |n| n == dst_idx, |_| 1, |_| 0)?;

        let mut transformations = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            let from = dims[pair[0].index()];
            let to = dims[pair[1].index()];
            let transformation = self
                .active
                .iter()
                .find_map(|c| c.transformation(from, to))?;
            transformations.push(transformation);
        }
        Some(transformations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_templates() {
        let bare = ShapeTemplate::Bare.apply("methane");
        assert_eq!(format!("{bare}"), "[methane]");

        let flux = ShapeTemplate::MassPerTime.apply("methane");
        assert_eq!(format!("{flux}"), "[mass] * [methane] / [time]");

        let mass = ShapeTemplate::Mass.apply("methane");
        assert_eq!(format!("{mass}"), "[mass] * [methane]");

        let per_time = ShapeTemplate::PerTime.apply("methane");
        assert_eq!(format!("{per_time}"), "[methane] / [time]");
    }

    #[test]
    fn test_bidirectional_registers_eight_rules() {
        let mut context = Context::new("CH4_conversions");
        context.add_bidirectional("methane", "CH4", "carbon", "C", 12.0 / 16.0);
        assert_eq!(context.len(), 8);
    }

    #[test]
    fn test_forward_and_backward_are_inverses() {
        let mut context = Context::new("CH4_conversions");
        context.add_bidirectional("methane", "CH4", "carbon", "C", 12.0 / 16.0);

        let from = ShapeTemplate::Bare.apply("methane");
        let to = ShapeTemplate::Bare.apply("carbon");
        let forward = context.transformation(&from, &to).unwrap();
        let backward = context.transformation(&to, &from).unwrap();

        assert_eq!(forward.numerator, "C");
        assert_eq!(forward.denominator, "CH4");
        assert!((forward.factor - 12.0 / 16.0).abs() < 1e-15);
        assert!((backward.factor - 16.0 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let mut context = Context::new("CH4_conversions");
        context.add_bidirectional("methane", "CH4", "carbon", "C", 12.0 / 16.0);

        // a squared methane dimension has no rule
        let squared = Dimensionality::base("methane").pow(2);
        let carbon = Dimensionality::base("carbon");
        assert!(context.transformation(&squared, &carbon).is_none());
    }
}
