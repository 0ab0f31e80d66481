//! Processing pipeline configuration

use crate::{
    cli::{Args, Command},
    load::DataSource,
    Year,
};
use clap::ValueEnum;
use std::sync::Arc;

/// Final process configuration
///
/// This is the result of digesting [`Args`]. Please refer to [`Args`] to know
/// more about individual fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub source: DataSource,

    /// Field delimiter, as expected by the CSV decoder
    pub delimiter: u8,

    /// Subset of the configuration that affects which data is loaded/kept
    pub input: InputConfig,

    pub format: OutputFormat,
    pub strict: bool,
}
//
impl Config {
    /// Determine process configuration from checked CLI arguments, setting the
    /// requested query aside
    pub fn new(args: Args) -> (Arc<Self>, Command) {
        let Args {
            data,
            delimiter,
            min_year,
            max_year,
            format,
            strict,
            command,
        } = args;
        let config = Arc::new(Self {
            source: data,
            delimiter: u8::try_from(delimiter)
                .expect("delimiter should have been checked to be ASCII by Args::check"),
            input: InputConfig { min_year, max_year },
            format,
            strict,
        });
        (config, command)
    }
}

/// Subset of the configuration that affects which data is loaded/kept
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct InputConfig {
    /// Observations made before this year are ignored
    pub min_year: Option<Year>,

    /// Observations made after this year are ignored
    pub max_year: Option<Year>,
}
//
impl InputConfig {
    /// Truth that observations from a certain year should be kept
    pub fn accepts(&self, year: Year) -> bool {
        self.min_year.map_or(true, |min| year >= min)
            && self.max_year.map_or(true, |max| year <= max)
    }
}

/// How query results are printed
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tab-separated table
    Table,

    /// JSON document, for consumption by other programs
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn year_window() {
        let all = InputConfig::default();
        assert!(all.accepts(Year::MIN) && all.accepts(Year::MAX));

        let window = InputConfig {
            min_year: Some(2000),
            max_year: Some(2010),
        };
        assert!(!window.accepts(1999));
        assert!(window.accepts(2000));
        assert!(window.accepts(2010));
        assert!(!window.accepts(2011));

        let open_ended = InputConfig {
            min_year: Some(2005),
            max_year: None,
        };
        assert!(!open_ended.accepts(2004));
        assert!(open_ended.accepts(2020));
    }

    #[test]
    fn from_args() {
        let args = Args::try_parse_from([
            "gini-atlas",
            "--data",
            "data.tsv",
            "--delimiter",
            "\t",
            "--min-year",
            "2001",
            "--strict",
            "years",
        ])
        .expect("arguments should be accepted");
        let (config, command) = Config::new(args);
        assert_eq!(command, Command::Years);
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(
            config.input,
            InputConfig {
                min_year: Some(2001),
                max_year: None
            }
        );
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Table);
    }
}
