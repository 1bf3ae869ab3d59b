use thiserror::Error;

fn context_suffix(contexts: &[String]) -> String {
    if contexts.is_empty() {
        String::new()
    } else {
        format!(" using context '{}'", contexts.join("', '"))
    }
}

/// Error type for invalid unit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    #[error("empty unit string")]
    EmptyUnit,
    #[error("unknown unit: '{0}'")]
    UnknownUnit(String),
    #[error("invalid exponent: '{0}'")]
    InvalidExponent(String),
    #[error("unit parse failed: {0}")]
    Syntax(String),
    #[error("unit '{0}' is already defined")]
    Redefinition(String),
    #[error("unknown context: '{0}'")]
    UnknownContext(String),
    #[error(
        "cannot convert from '{from_unit}' ({from_dim}) to '{to_unit}' ({to_dim}){}",
        context_suffix(.contexts)
    )]
    Dimensionality {
        from_unit: String,
        to_unit: String,
        from_dim: String,
        to_dim: String,
        /// Names of the contexts that were active, if any.
        contexts: Vec<String>,
    },
    #[error("dimensions don't contain a gas mixture")]
    NoMixtureDimension,
    #[error("more than one gas mixture in dimensions is not supported")]
    MultipleMixtureDimensions,
    #[error("mixture has dimensionality {0} != 1, which is not supported")]
    MixturePower(i32),
    #[error("invalid metric conversions table: {0}")]
    MetricTable(String),
}

/// Convenience type for `Result<T, UnitsError>`.
pub type UnitsResult<T> = Result<T, UnitsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensionality_message_without_context() {
        let err = UnitsError::Dimensionality {
            from_unit: "CH4".to_string(),
            to_unit: "C".to_string(),
            from_dim: "[methane]".to_string(),
            to_dim: "[carbon]".to_string(),
            contexts: vec![],
        };
        assert_eq!(
            err.to_string(),
            "cannot convert from 'CH4' ([methane]) to 'C' ([carbon])"
        );
    }

    #[test]
    fn test_dimensionality_message_with_context() {
        let err = UnitsError::Dimensionality {
            from_unit: "HCFC402a".to_string(),
            to_unit: "CO2".to_string(),
            from_dim: "[HCFC402a]".to_string(),
            to_dim: "[carbon]".to_string(),
            contexts: vec!["AR4GWP100".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("HCFC402a"));
        assert!(msg.contains("using context 'AR4GWP100'"));
    }

    #[test]
    fn test_mixture_power_message_names_exponent() {
        let err = UnitsError::MixturePower(2);
        assert!(err.to_string().contains('2'));
    }
}
