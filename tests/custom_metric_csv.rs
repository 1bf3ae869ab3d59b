//! A registry built from a custom metric-conversion CSV.

use is_close::is_close;
use scm_units::{MetricConversions, ScmUnitRegistry, UnitsError};

#[test]
fn test_custom_context_csv() {
    let table = MetricConversions::from_csv_path("tests/data/custom-context.csv").unwrap();
    let mut registry = ScmUnitRegistry::with_metric_conversions(table);
    registry.add_standards().unwrap();

    let nitrous_oxide = registry.get("N2O").unwrap();
    let methane = registry.get("CH4").unwrap();

    let custom = registry.context("TestCustomContext").unwrap();
    assert!(is_close!(
        custom.convert(&nitrous_oxide, "CO2").unwrap().magnitude(),
        345.0
    ));
    assert!(is_close!(
        custom.convert(&methane, "CO2").unwrap().magnitude(),
        22.0
    ));

    let sar = registry.context("SARGWP100").unwrap();
    assert!(is_close!(
        sar.convert(&nitrous_oxide, "CO2").unwrap().magnitude(),
        310.0
    ));
    assert!(is_close!(
        sar.convert(&methane, "CO2").unwrap().magnitude(),
        21.0
    ));

    // the custom table replaces the bundled one
    assert!(matches!(
        registry.context("AR4GWP100").unwrap_err(),
        UnitsError::UnknownContext(_)
    ));
}
