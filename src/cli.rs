//! Command-line interface

use crate::{config::OutputFormat, load::DataSource, Result, Year};
use clap::{Parser, Subcommand};

/// Query Gini index, GDP and population data by year, country and continent
///
/// Loads a CSV table with columns `country`, `year`, `gini_index`, `gdp`,
/// `population` and optionally `continent`, then answers the same questions as
/// the map, scatter plot, trend chart and continent bar chart views.
#[derive(Parser, Debug)]
#[command(version, author)]
pub struct Args {
    /// Path or http(s) URL of the data file
    ///
    /// Files whose name ends with ".gz" are decompressed on the fly.
    #[arg(short, long)]
    pub data: DataSource,

    /// Field delimiter of the data file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Ignore observations made before this year
    #[arg(long)]
    pub min_year: Option<Year>,

    /// Ignore observations made after this year
    #[arg(long)]
    pub max_year: Option<Year>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Fail if any row of the data file had to be rejected
    ///
    /// By default, malformed rows are skipped with a warning, since real-world
    /// data files commonly contain a few of them.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Query to be performed
    #[command(subcommand)]
    pub command: Command,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        let args = Args::parse();
        args.check()?;
        Ok(args)
    }

    /// Check CLI arguments for basic sanity
    pub fn check(&self) -> Result<()> {
        anyhow::ensure!(
            self.delimiter.is_ascii(),
            "field delimiter must be a single ASCII character"
        );
        if let (Some(min_year), Some(max_year)) = (self.min_year, self.max_year) {
            anyhow::ensure!(
                min_year <= max_year,
                "requested year window {min_year}..={max_year} excludes all observations"
            );
        }
        Ok(())
    }
}

/// Query to be performed on the dataset
#[derive(Subcommand, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// List the years for which data is available
    Years,

    /// Show every observation from one year, along with summary statistics
    Year {
        /// Year of interest
        ///
        /// Will interactively prompt for one of the available years if not
        /// specified.
        year: Option<Year>,
    },

    /// Show how a country's indicators evolved over time
    Country {
        /// Country name (case-insensitive)
        name: String,

        /// Only show the observation from this year
        #[arg(short, long)]
        year: Option<Year>,
    },

    /// Show average GDP and Gini index per continent for one year
    Continents {
        /// Year of interest, defaults to the first available year
        year: Option<Year>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gini-atlas").chain(args.iter().copied()))
            .expect("arguments should be accepted")
    }

    #[test]
    fn defaults() {
        let args = parse(&["--data", "wii_data.csv", "years"]);
        assert_eq!(args.data, DataSource::File("wii_data.csv".into()));
        assert_eq!(args.delimiter, ',');
        assert_eq!(args.format, OutputFormat::Table);
        assert!(!args.strict);
        assert_eq!(args.command, Command::Years);
        args.check().expect("default arguments are sane");
    }

    #[test]
    fn subcommands() {
        let args = parse(&["-d", "x.csv", "country", "France", "--year", "2010"]);
        assert_eq!(
            args.command,
            Command::Country {
                name: "France".into(),
                year: Some(2010)
            }
        );
        let args = parse(&["-d", "x.csv", "-f", "json", "continents"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.command, Command::Continents { year: None });
    }

    #[test]
    fn url_source() {
        let args = parse(&["-d", "https://example.org/wii.csv.gz", "year", "2001"]);
        assert_eq!(
            args.data,
            DataSource::Url("https://example.org/wii.csv.gz".into())
        );
        assert_eq!(args.command, Command::Year { year: Some(2001) });
    }

    #[test]
    fn rejects_empty_year_window() {
        let args = parse(&["-d", "x.csv", "--min-year", "2010", "--max-year", "2000", "years"]);
        assert!(args.check().is_err());
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let args = parse(&["-d", "x.csv", "--delimiter", "é", "years"]);
        assert!(args.check().is_err());
    }
}
