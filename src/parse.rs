//! Conversion of raw data file rows into typed [`Record`]s
//!
//! Real-world data files contain the occasional malformed row, so rejecting a
//! row never aborts the batch. Rejected rows are reported as [`ParseError`]s
//! alongside the records that could be parsed.

use crate::{config::InputConfig, Population, Record, Year};
use serde::Serialize;
use std::{borrow::Borrow, collections::HashMap, fmt};
use thiserror::Error;

/// Row from a data file, mapping column names to raw field values
///
/// Columns other than the ones named by [`Field`] and `continent` are ignored.
pub type RawRow = HashMap<Box<str>, Box<str>>;

/// Name of the optional continent column
pub const CONTINENT_COLUMN: &str = "continent";

/// Mandatory column of the data file
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Country,
    Year,
    GiniIndex,
    Gdp,
    Population,
}
//
impl Field {
    /// Column name in the data file
    pub fn column(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Year => "year",
            Self::GiniIndex => "gini_index",
            Self::Gdp => "gdp",
            Self::Population => "population",
        }
    }
}
//
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Reasons why a row can be rejected
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ParseErrorKind {
    /// Field is missing or is not a non-negative finite number (an integer in
    /// the case of years and populations)
    NotANumber,

    /// Field that identifies the observation is missing or blank
    MissingKey,
}
//
impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotANumber => "not a valid number",
            Self::MissingKey => "missing or blank",
        })
    }
}

/// Rejected row
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
#[error("row {row}: column {field} is {kind} (found {value:?})")]
pub struct ParseError {
    /// Index of the row within the input, starting at 0 for the first row
    /// after the header
    pub row: usize,

    /// First field that could not be parsed
    pub field: Field,

    /// What is wrong with it
    pub kind: ParseErrorKind,

    /// Raw value of the field, empty if the column is absent
    pub value: Box<str>,
}

/// Outcome of parsing a batch of rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRows {
    /// Successfully parsed records, in input order
    pub records: Vec<Record>,

    /// One error per rejected row, in input order
    pub errors: Vec<ParseError>,

    /// Number of well-formed rows that fell outside of the configured year
    /// window and were dropped
    pub filtered: usize,
}

/// Parse a batch of rows with the default input configuration
pub fn parse_rows<I>(rows: I) -> ParsedRows
where
    I: IntoIterator,
    I::Item: Borrow<RawRow>,
{
    let mut parser = RowParser::new(InputConfig::default());
    for row in rows {
        parser.add_row(row.borrow());
    }
    parser.finish()
}

/// Incremental row parser, for rows that arrive one at a time
#[derive(Debug)]
pub struct RowParser {
    /// Which rows should be kept
    input: InputConfig,

    /// Index of the next row
    next_row: usize,

    /// Results accumulated so far
    parsed: ParsedRows,
}
//
impl RowParser {
    /// Set up the parser
    pub fn new(input: InputConfig) -> Self {
        Self {
            input,
            next_row: 0,
            parsed: ParsedRows::default(),
        }
    }

    /// Parse the next row
    pub fn add_row(&mut self, row: &RawRow) {
        let row_idx = self.next_row;
        self.next_row += 1;
        match parse_record(row) {
            Ok(record) if self.input.accepts(record.year) => self.parsed.records.push(record),
            Ok(record) => {
                log::trace!(
                    "Dropped row {row_idx} ({record:?}) because it's outside of the requested year window"
                );
                self.parsed.filtered += 1;
            }
            Err((field, kind)) => {
                let value = row.get(field.column()).cloned().unwrap_or_default();
                let error = ParseError {
                    row: row_idx,
                    field,
                    kind,
                    value,
                };
                log::warn!("Rejected {error}");
                self.parsed.errors.push(error);
            }
        }
    }

    /// Number of rows seen so far
    pub fn rows_seen(&self) -> usize {
        self.next_row
    }

    /// Export the parsing results
    pub fn finish(self) -> ParsedRows {
        log::debug!(
            "Parsed {} rows into {} records, rejected {} and filtered out {}",
            self.next_row,
            self.parsed.records.len(),
            self.parsed.errors.len(),
            self.parsed.filtered
        );
        self.parsed
    }
}

/// Turn a row into a record, or tell which field is wrong with it
///
/// Fields are checked in column order, so only the first error is reported.
fn parse_record(row: &RawRow) -> Result<Record, (Field, ParseErrorKind)> {
    let field = |field: Field| row.get(field.column()).map(|value| value.trim());
    let not_a_number = |f| (f, ParseErrorKind::NotANumber);

    let country = field(Field::Country)
        .filter(|country| !country.is_empty())
        .ok_or((Field::Country, ParseErrorKind::MissingKey))?;
    let year = field(Field::Year)
        .and_then(|year| year.parse::<Year>().ok())
        .ok_or(not_a_number(Field::Year))?;
    let gini_index = field(Field::GiniIndex)
        .and_then(parse_amount)
        .ok_or(not_a_number(Field::GiniIndex))?;
    let gdp = field(Field::Gdp)
        .and_then(parse_amount)
        .ok_or(not_a_number(Field::Gdp))?;
    let population = field(Field::Population)
        .and_then(parse_count)
        .ok_or(not_a_number(Field::Population))?;
    let continent = row
        .get(CONTINENT_COLUMN)
        .map(|continent| continent.trim())
        .filter(|continent| !continent.is_empty())
        .map(Into::into);

    Ok(Record {
        country: country.into(),
        year,
        gini_index,
        gdp,
        population,
        continent,
    })
}

/// Parse a non-negative finite real number
fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite() && *x >= 0.0)
        // Normalize negative zero
        .map(|x| x + 0.0)
}

/// Parse a non-negative integer, which some exporters spell as a float
fn parse_count(text: &str) -> Option<Population> {
    text.parse::<Population>().ok().or_else(|| {
        let x = parse_amount(text)?;
        (x.fract() == 0.0 && x < Population::MAX as f64).then_some(x as Population)
    })
}
