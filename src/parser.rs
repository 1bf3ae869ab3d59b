//! Unit expression parser with normalization.
//!
//! Parses unit strings into a structured representation, handling the
//! notations that show up in emissions datasets:
//!
//! - Exponents: `m^2`, `m**2`
//! - Multiplication: `kg CH4`, `kg*CH4`, `kg·CH4`
//! - Division: `kg CO2/yr`, `kg CO2 per yr`, `kg CO2 yr^-1`
//! - In-name hyphens: `HFC-134a` is read as `HFC134a`
//!
//! Symbols are resolved against a [`UnitTable`] while parsing, which is
//! also what disambiguates trailing digits: `CO2` is a known unit and
//! stays whole, while an unknown `x2` would be read as `x^2`.
//!
//! # Grammar
//!
//! ```text
//! unit_expr  = term (('/' | 'per') term)*
//! term       = factor (('*' | '·' | ' ') factor)*
//! factor     = base_unit ('^' | '**')? exponent?
//! base_unit  = [a-zA-Z_] [a-zA-Z0-9_]*
//! exponent   = '-'? [0-9]+
//! ```

use crate::dimension::Dimensionality;
use crate::errors::{UnitsError, UnitsResult};
use crate::table::UnitTable;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed unit expression.
///
/// Represents a unit as a product of named units with integer exponents:
/// `kg CO2 / yr` becomes `{CO2: 1, kg: 1, yr: -1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Map from unit symbol to exponent. BTreeMap for deterministic order.
    components: BTreeMap<String, i32>,
}

impl ParsedUnit {
    /// Creates an empty (dimensionless) parsed unit.
    #[must_use]
    pub fn dimensionless() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Creates a parsed unit from components, dropping zero exponents.
    #[must_use]
    pub fn from_components(components: BTreeMap<String, i32>) -> Self {
        let components = components.into_iter().filter(|(_, exp)| *exp != 0).collect();
        Self { components }
    }

    /// Parses a unit string, resolving symbols against `table`.
    pub fn parse(input: &str, table: &UnitTable) -> UnitsResult<Self> {
        let input = strip_inner_hyphens(input.trim());
        if input.is_empty() {
            return Err(UnitsError::EmptyUnit);
        }
        if input == "1" || input.eq_ignore_ascii_case("dimensionless") {
            return Ok(Self::dimensionless());
        }

        let mut parser = UnitParser::new(&input, table);
        let parsed = parser.parse_expression()?;
        parser.skip_whitespace();
        if let Some(c) = parser.peek() {
            return Err(UnitsError::Syntax(format!("unexpected character '{c}'")));
        }
        Ok(parsed)
    }

    /// Returns the components of this unit.
    #[must_use]
    pub fn components(&self) -> &BTreeMap<String, i32> {
        &self.components
    }

    /// If this unit is a single symbol at exponent 1, returns it.
    #[must_use]
    pub fn single_symbol(&self) -> Option<&str> {
        if self.components.len() == 1 {
            self.components
                .iter()
                .next()
                .filter(|(_, exp)| **exp == 1)
                .map(|(sym, _)| sym.as_str())
        } else {
            None
        }
    }

    /// Computes the overall dimensionality of this unit.
    pub fn dimensionality(&self, table: &UnitTable) -> UnitsResult<Dimensionality> {
        let mut result = Dimensionality::dimensionless();
        for (symbol, &exp) in &self.components {
            let def = table
                .lookup(symbol)
                .ok_or_else(|| UnitsError::UnknownUnit(symbol.clone()))?;
            result = result * def.dimensionality.pow(exp);
        }
        Ok(result)
    }

    /// Computes the scale factor from this unit to base units.
    pub fn base_scale(&self, table: &UnitTable) -> UnitsResult<f64> {
        let mut scale = 1.0;
        for (symbol, &exp) in &self.components {
            let def = table
                .lookup(symbol)
                .ok_or_else(|| UnitsError::UnknownUnit(symbol.clone()))?;
            scale *= def.scale.powi(exp);
        }
        Ok(scale)
    }

    /// Multiplies this unit by another unit.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut components = self.components.clone();
        for (symbol, exp) in &other.components {
            *components.entry(symbol.clone()).or_insert(0) += exp;
        }
        Self::from_components(components)
    }

    /// Divides this unit by another unit.
    #[must_use]
    pub fn divide(&self, other: &Self) -> Self {
        let mut components = self.components.clone();
        for (symbol, exp) in &other.components {
            *components.entry(symbol.clone()).or_insert(0) -= exp;
        }
        Self::from_components(components)
    }

    /// Raises this unit to a power.
    #[must_use]
    pub fn pow(&self, exp: i32) -> Self {
        let components = self
            .components
            .iter()
            .map(|(k, v)| (k.clone(), v * exp))
            .collect();
        Self::from_components(components)
    }

    /// Returns a normalized string representation.
    ///
    /// Canonical form: positive-exponent symbols (alphabetical), then `/`,
    /// then negative-exponent symbols.
    #[must_use]
    pub fn normalized(&self) -> String {
        if self.components.is_empty() {
            return "1".to_string();
        }

        let mut numerator: Vec<(&str, i32)> = Vec::new();
        let mut denominator: Vec<(&str, i32)> = Vec::new();
        for (symbol, &exp) in &self.components {
            if exp > 0 {
                numerator.push((symbol, exp));
            } else {
                denominator.push((symbol, -exp));
            }
        }

        let format_part = |parts: &[(&str, i32)]| -> String {
            parts
                .iter()
                .map(|(s, e)| {
                    if *e == 1 {
                        (*s).to_string()
                    } else {
                        format!("{s}^{e}")
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        let num = format_part(&numerator);
        let den = format_part(&denominator);
        match (num.is_empty(), den.is_empty()) {
            (true, true) => "1".to_string(),
            (false, true) => num,
            (true, false) => format!("1 / {den}"),
            (false, false) => format!("{num} / {den}"),
        }
    }
}

impl fmt::Display for ParsedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

/// Removes hyphens sitting inside a name (`HFC-134a`), keeping the minus
/// sign of exponents (`m^-2`) intact.
fn strip_inner_hyphens(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '-'
            && i > 0
            && chars[i - 1].is_ascii_alphanumeric()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_alphanumeric())
            && !chars[i - 1].is_ascii_digit()
        {
            continue;
        }
        out.push(c);
    }
    out
}

/// Internal parser for unit strings.
struct UnitParser<'a> {
    input: &'a str,
    pos: usize,
    table: &'a UnitTable,
}

impl<'a> UnitParser<'a> {
    fn new(input: &'a str, table: &'a UnitTable) -> Self {
        Self {
            input,
            pos: 0,
            table,
        }
    }

    fn parse_expression(&mut self) -> UnitsResult<ParsedUnit> {
        self.skip_whitespace();
        let mut result = self.parse_term()?;

        loop {
            self.skip_whitespace();
            if self.peek() == Some('/') || self.check_keyword("per") {
                if self.peek() == Some('/') {
                    self.advance();
                } else {
                    self.skip_keyword("per");
                }
                self.skip_whitespace();
                let divisor = self.parse_term()?;
                result = result.divide(&divisor);
            } else {
                break;
            }
        }

        Ok(result)
    }

    fn parse_term(&mut self) -> UnitsResult<ParsedUnit> {
        let mut result = self.parse_factor()?;

        loop {
            self.skip_whitespace();
            let next = self.peek();
            if next == Some('*') || next == Some('\u{00B7}') {
                self.advance();
                self.skip_whitespace();
                let factor = self.parse_factor()?;
                result = result.multiply(&factor);
            } else if next.is_some()
                && next != Some('/')
                && !self.check_keyword("per")
                && self.is_unit_start(next.unwrap())
            {
                // Implicit multiplication (space-separated)
                let factor = self.parse_factor()?;
                result = result.multiply(&factor);
            } else {
                break;
            }
        }

        Ok(result)
    }

    fn parse_factor(&mut self) -> UnitsResult<ParsedUnit> {
        self.skip_whitespace();

        if self.peek() == Some('(') {
            self.advance();
            let inner = self.parse_expression()?;
            self.skip_whitespace();
            if self.peek() != Some(')') {
                return Err(UnitsError::Syntax("missing closing parenthesis".into()));
            }
            self.advance();
            let exp = self.parse_optional_exponent()?;
            return Ok(inner.pow(exp));
        }

        let symbol = self.parse_symbol()?;
        let exp = self.parse_optional_exponent()?;

        if self.table.lookup(&symbol).is_none() {
            return Err(UnitsError::UnknownUnit(symbol));
        }

        let mut components = BTreeMap::new();
        components.insert(symbol, exp);
        Ok(ParsedUnit::from_components(components))
    }

    fn parse_symbol(&mut self) -> UnitsResult<String> {
        self.skip_whitespace();
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(UnitsError::Syntax("expected unit symbol".into()));
        }

        let full_symbol = &self.input[start..self.pos];

        // Trailing digits are either part of a known symbol (CO2, CFC400)
        // or an implicit exponent (x2 == x^2)
        if let Some(last_letter_idx) = full_symbol.rfind(|c: char| c.is_ascii_alphabetic()) {
            let base = &full_symbol[..=last_letter_idx];
            let trailing = &full_symbol[last_letter_idx + 1..];

            if !trailing.is_empty() && trailing.chars().all(|c| c.is_ascii_digit()) {
                if self.table.lookup(full_symbol).is_some() {
                    return Ok(full_symbol.to_string());
                }
                // Trailing digits act as the exponent - rewind position
                self.pos = start + last_letter_idx + 1;
                return Ok(base.to_string());
            }
        }

        Ok(full_symbol.to_string())
    }

    fn parse_optional_exponent(&mut self) -> UnitsResult<i32> {
        self.skip_whitespace();

        let has_marker = if self.peek() == Some('^') {
            self.advance();
            if self.peek() == Some('*') {
                self.advance();
            }
            true
        } else if self.input[self.pos..].starts_with("**") {
            self.pos += 2;
            true
        } else {
            false
        };

        self.skip_whitespace();

        if let Some(c) = self.peek() {
            if c == '-' || c.is_ascii_digit() {
                return self.parse_exponent();
            }
        }

        if has_marker {
            return Err(UnitsError::Syntax("expected exponent after ^".into()));
        }

        Ok(1)
    }

    fn parse_exponent(&mut self) -> UnitsResult<i32> {
        let start = self.pos;
        let negative = if self.peek() == Some('-') {
            self.advance();
            true
        } else {
            false
        };

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start || (negative && self.pos == start + 1) {
            return Err(UnitsError::InvalidExponent(
                self.input[start..self.pos].to_string(),
            ));
        }

        let exp_str = &self.input[start..self.pos];
        exp_str
            .parse()
            .map_err(|_| UnitsError::InvalidExponent(exp_str.to_string()))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_unit_start(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || c == '('
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.input[self.pos..].to_lowercase().starts_with(keyword)
            && self.input[self.pos + keyword.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_ascii_alphanumeric())
    }

    fn skip_keyword(&mut self, keyword: &str) {
        if self.check_keyword(keyword) {
            self.pos += keyword.len();
        }
    }
}
