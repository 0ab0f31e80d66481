//! Year-indexed queries over Gini index, GDP and population observations
//!
//! Source data is a table of per-country, per-year observations such as the
//! World Income Inequality dataset. Rows go through the [`parse`] module, which
//! turns them into typed [`Record`]s, then into a [`dataset::DatasetIndex`]
//! which answers the queries that map, scatter, trend and bar chart views need.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod load;
pub mod parse;
pub mod progress;
pub mod report;
pub mod stats;
pub mod years;

use serde::Serialize;

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Year of Gregorian Calendar
pub type Year = i16;

/// Country name, as spelled in the source data
pub type Country = Box<str>;

/// Continent name, as spelled in the source data
pub type Continent = Box<str>;

/// Number of inhabitants of a country on a given year
pub type Population = u64;

/// One observation about a country on a given year
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    /// Observed country
    pub country: Country,

    /// Year on which the observation was made
    pub year: Year,

    /// Gini index, either on a 0-100 or a 0-1 scale depending on the source
    pub gini_index: f64,

    /// Gross domestic product, in the unit used by the source
    pub gdp: f64,

    /// Number of inhabitants
    pub population: Population,

    /// Continent the country belongs to, if the source says so
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<Continent>,
}
