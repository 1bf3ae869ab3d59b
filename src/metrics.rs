//! Metric conversion tables (global warming potentials).
//!
//! A [`MetricConversions`] table maps (species, metric) to the
//! dimensionless mass-equivalence factor relative to CO2. Tables are
//! loaded from CSV: a `Species` column followed by one column per metric
//! (the column header is the metric name, e.g. `AR4GWP100`). Empty cells
//! and NaN are "no data", never 1.
//!
//! A bundled reference table (the IPCC assessment-report 100-year GWPs)
//! is used when no custom table is supplied.

use crate::errors::{UnitsError, UnitsResult};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static BUNDLED: LazyLock<MetricConversions> = LazyLock::new(|| {
    MetricConversions::from_csv_str(include_str!("data/metric_conversions.csv"))
        .expect("bundled metric conversion table is valid")
});

/// A read-only species × metric factor table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricConversions {
    /// Metric names, in column order.
    metrics: Vec<String>,
    /// Species → per-metric factors (NaN marks missing cells).
    rows: BTreeMap<String, Vec<f64>>,
}

impl MetricConversions {
    /// Parses a table from CSV text.
    pub fn from_csv_str(text: &str) -> UnitsResult<Self> {
        let reader = csv::Reader::from_reader(text.as_bytes());
        Self::from_reader(reader)
    }

    /// Parses a table from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> UnitsResult<Self> {
        let reader = csv::Reader::from_path(path.as_ref())
            .map_err(|e| UnitsError::MetricTable(e.to_string()))?;
        Self::from_reader(reader)
    }

    /// The bundled reference table.
    #[must_use]
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> UnitsResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| UnitsError::MetricTable(e.to_string()))?
            .clone();
        let mut columns = headers.iter();
        match columns.next() {
            Some("Species") => {}
            other => {
                return Err(UnitsError::MetricTable(format!(
                    "first column must be 'Species', got {other:?}"
                )))
            }
        }
        let metrics: Vec<String> = columns.map(str::to_string).collect();
        if metrics.is_empty() {
            return Err(UnitsError::MetricTable("no metric columns".to_string()));
        }

        let mut rows = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| UnitsError::MetricTable(e.to_string()))?;
            let mut cells = record.iter();
            let species = cells
                .next()
                .ok_or_else(|| UnitsError::MetricTable("empty row".to_string()))?
                .trim()
                .to_string();
            let mut factors = Vec::with_capacity(metrics.len());
            for cell in cells {
                factors.push(parse_cell(cell)?);
            }
            if factors.len() != metrics.len() {
                return Err(UnitsError::MetricTable(format!(
                    "row for '{species}' has {} cells, expected {}",
                    factors.len(),
                    metrics.len()
                )));
            }
            rows.insert(species, factors);
        }

        Ok(Self { metrics, rows })
    }

    /// Metric names, in column order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Species names, in row order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// The factor for (species, metric); `None` for absent or NaN cells.
    #[must_use]
    pub fn get(&self, species: &str, metric: &str) -> Option<f64> {
        let column = self.metrics.iter().position(|m| m == metric)?;
        let value = *self.rows.get(species)?.get(column)?;
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }
}

impl Default for MetricConversions {
    fn default() -> Self {
        Self::bundled()
    }
}

fn parse_cell(cell: &str) -> UnitsResult<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse()
        .map_err(|_| UnitsError::MetricTable(format!("invalid factor '{cell}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table() {
        let table = MetricConversions::bundled();
        assert!(table.metrics().contains(&"AR4GWP100".to_string()));
        assert_eq!(table.get("CH4", "AR4GWP100"), Some(25.0));
        assert_eq!(table.get("CH4", "SARGWP100"), Some(21.0));
        assert_eq!(table.get("N2O", "AR4GWP100"), Some(298.0));
        assert_eq!(table.get("CO2", "AR5GWP100"), Some(1.0));
    }

    #[test]
    fn test_missing_cells_are_no_data() {
        let table = MetricConversions::bundled();
        // CFC114 has no SAR value
        assert_eq!(table.get("CFC114", "SARGWP100"), None);
        assert_eq!(table.get("CFC114", "AR4GWP100"), Some(10000.0));
        // unknown species and metrics
        assert_eq!(table.get("unobtainium", "AR4GWP100"), None);
        assert_eq!(table.get("CH4", "AR99GWP100"), None);
    }

    #[test]
    fn test_custom_csv() {
        let table = MetricConversions::from_csv_str(
            "Species,TestMetric\nCO2,1\nCH4,22\nN2O,nan\n",
        )
        .unwrap();
        assert_eq!(table.metrics(), &["TestMetric".to_string()]);
        assert_eq!(table.get("CH4", "TestMetric"), Some(22.0));
        assert_eq!(table.get("N2O", "TestMetric"), None);
    }

    #[test]
    fn test_rejects_bad_header() {
        let err = MetricConversions::from_csv_str("Gas,TestMetric\nCO2,1\n").unwrap_err();
        assert!(matches!(err, UnitsError::MetricTable(_)));
    }

    #[test]
    fn test_rejects_bad_cell() {
        let err =
            MetricConversions::from_csv_str("Species,TestMetric\nCO2,one\n").unwrap_err();
        assert!(matches!(err, UnitsError::MetricTable(_)));
    }
}
