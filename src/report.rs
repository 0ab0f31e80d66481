//! Answers to user queries, and their presentation

use crate::{
    cli::Command,
    config::OutputFormat,
    dataset::DatasetIndex,
    stats::{ContinentAggregate, IndicatorStats},
    years, Record, Result, Year,
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// Answer to a query
///
/// Empty answers are valid and are displayed as "no data" rather than
/// treated as errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer<'index> {
    /// Years for which there is data
    Years(&'index [Year]),

    /// Observations from one year, as shown by the map and scatter plot
    Year {
        year: Option<Year>,
        stats: Option<IndicatorStats>,
        records: &'index [Record],
    },

    /// Observations about one country, as shown by the trend chart
    Country {
        country: &'index str,
        stats: Option<IndicatorStats>,
        records: Vec<&'index Record>,
    },

    /// Continent means for one year, as shown by the bar charts
    Continents {
        year: Option<Year>,
        continents: BTreeMap<&'index str, ContinentAggregate>,
    },
}
//
impl<'index> Answer<'index> {
    /// Answer a query
    pub fn new(index: &'index DatasetIndex, command: &'index Command) -> Result<Self> {
        Ok(match command {
            Command::Years => Self::Years(index.years_available()),
            Command::Year { year } => {
                let year = years::pick(index, *year)?;
                Self::Year {
                    year,
                    stats: year.and_then(|year| index.year_stats(year)),
                    records: year.map_or(&[][..], |year| index.records_for_year(year)),
                }
            }
            Command::Country { name, year } => {
                let country = index.resolve_country(name).unwrap_or(name);
                if country != name {
                    log::info!("Interpreted country name {name:?} as {country:?}");
                }
                let records = match year {
                    Some(year) => (index.record_for_country_year(country, *year))
                        .into_iter()
                        .collect(),
                    None => index.time_series_for_country(country),
                };
                Self::Country {
                    country,
                    stats: IndicatorStats::from_records(records.iter().copied()),
                    records,
                }
            }
            Command::Continents { year } => {
                let year = year.or(index.first_year());
                Self::Continents {
                    year,
                    continents: year
                        .map(|year| index.continent_averages_for_year(year))
                        .unwrap_or_default(),
                }
            }
        })
    }

    /// Render the answer in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Table => self.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(self)? + "\n",
        })
    }
}
//
impl Display for Answer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(years) => {
                if years.is_empty() {
                    return writeln!(f, "no data");
                }
                for year in years.iter() {
                    writeln!(f, "{year}")?;
                }
            }
            Self::Year {
                year: Some(year),
                stats: Some(stats),
                records,
            } => {
                writeln!(f, "country\tcontinent\tgini_index\tgdp\tpopulation")?;
                for record in records.iter() {
                    writeln!(
                        f,
                        "{}\t{}\t{}\t{}\t{}",
                        record.country,
                        record.continent.as_deref().unwrap_or("-"),
                        record.gini_index,
                        record.gdp,
                        record.population
                    )?;
                }
                writeln!(
                    f,
                    "# {year}: {} countries, Gini index {}..{}, GDP {}..{}, population {}",
                    stats.count,
                    stats.min_gini,
                    stats.max_gini,
                    stats.min_gdp,
                    stats.max_gdp,
                    stats.total_population
                )?;
            }
            Self::Year { year, .. } => writeln!(f, "no data for year {}", OrAny(*year))?,
            Self::Country {
                country,
                stats: Some(stats),
                records,
            } => {
                writeln!(f, "year\tgini_index\tgdp\tpopulation")?;
                for record in records {
                    writeln!(
                        f,
                        "{}\t{}\t{}\t{}",
                        record.year, record.gini_index, record.gdp, record.population
                    )?;
                }
                writeln!(
                    f,
                    "# {country}: {}..{}, Gini index {}..{}, GDP {}..{}",
                    stats.first_year,
                    stats.last_year,
                    stats.min_gini,
                    stats.max_gini,
                    stats.min_gdp,
                    stats.max_gdp
                )?;
            }
            Self::Country { country, .. } => writeln!(f, "no data for country {country}")?,
            Self::Continents { year, continents } => {
                if continents.is_empty() {
                    return writeln!(f, "no continent data for year {}", OrAny(*year));
                }
                writeln!(f, "continent\taverage_gdp\taverage_gini\tcountries")?;
                for (continent, aggregate) in continents {
                    writeln!(
                        f,
                        "{continent}\t{}\t{}\t{}",
                        aggregate.average_gdp, aggregate.average_gini, aggregate.count
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Year display that accounts for the absence of a year
struct OrAny(Option<Year>);
//
impl Display for OrAny {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(year) => write!(f, "{year}"),
            None => f.write_str("(none available)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DatasetIndex {
        let record = |country: &str, year, gini_index, gdp, continent: Option<&str>| Record {
            country: country.into(),
            year,
            gini_index,
            gdp,
            population: 100,
            continent: continent.map(Into::into),
        };
        DatasetIndex::build([
            record("Chile", 2003, 51.5, 12.0, Some("South America")),
            record("Chile", 2009, 49.0, 15.5, Some("South America")),
            record("Peru", 2009, 45.0, 8.5, Some("South America")),
            record("Tonga", 2009, 37.0, 4.0, None),
        ])
    }

    #[test]
    fn years() {
        let index = index();
        let answer = Answer::new(&index, &Command::Years).unwrap();
        assert_eq!(answer.render(OutputFormat::Table).unwrap(), "2003\n2009\n");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&answer.render(OutputFormat::Json).unwrap())
                .unwrap(),
            serde_json::json!([2003, 2009])
        );
    }

    #[test]
    fn year_table() {
        let index = index();
        let command = Command::Year { year: Some(2009) };
        let table = Answer::new(&index, &command)
            .unwrap()
            .render(OutputFormat::Table)
            .unwrap();
        assert_eq!(
            table,
            "country\tcontinent\tgini_index\tgdp\tpopulation\n\
             Chile\tSouth America\t49\t15.5\t100\n\
             Peru\tSouth America\t45\t8.5\t100\n\
             Tonga\t-\t37\t4\t100\n\
             # 2009: 3 countries, Gini index 37..49, GDP 4..15.5, population 300\n"
        );
    }

    #[test]
    fn missing_year() {
        let index = index();
        let command = Command::Year { year: Some(1990) };
        let answer = Answer::new(&index, &command).unwrap();
        assert_eq!(
            answer.render(OutputFormat::Table).unwrap(),
            "no data for year 1990\n"
        );
        let json = serde_json::from_str::<serde_json::Value>(&answer.render(OutputFormat::Json).unwrap())
            .unwrap();
        assert_eq!(json["records"], serde_json::json!([]));
        assert!(json["stats"].is_null());
    }

    #[test]
    fn country_series() {
        let index = index();
        let command = Command::Country {
            name: "chile".into(),
            year: None,
        };
        let answer = Answer::new(&index, &command).unwrap();
        let Answer::Country {
            country, records, ..
        } = &answer
        else {
            panic!("expected a country answer, got {answer:?}");
        };
        assert_eq!(*country, "Chile");
        assert_eq!(records.iter().map(|r| r.year).collect::<Vec<_>>(), [2003, 2009]);
        assert!(answer
            .render(OutputFormat::Table)
            .unwrap()
            .ends_with("# Chile: 2003..2009, Gini index 49..51.5, GDP 12..15.5\n"));
    }

    #[test]
    fn country_single_year() {
        let index = index();
        let command = Command::Country {
            name: "Peru".into(),
            year: Some(2003),
        };
        let answer = Answer::new(&index, &command).unwrap();
        assert_eq!(
            answer.render(OutputFormat::Table).unwrap(),
            "no data for country Peru\n"
        );
    }

    #[test]
    fn continents() {
        let index = index();
        let command = Command::Continents { year: Some(2009) };
        let json = Answer::new(&index, &command)
            .unwrap()
            .render(OutputFormat::Json)
            .unwrap();
        let json = serde_json::from_str::<serde_json::Value>(&json).unwrap();
        assert_eq!(json["year"], 2009);
        let south_america = &json["continents"]["South America"];
        assert_eq!(south_america["average_gdp"], 12.0);
        assert_eq!(south_america["average_gini"], 47.0);
        assert_eq!(south_america["count"], 2);

        // Defaults to the first year
        let command = Command::Continents { year: None };
        let table = Answer::new(&index, &command)
            .unwrap()
            .render(OutputFormat::Table)
            .unwrap();
        assert_eq!(
            table,
            "continent\taverage_gdp\taverage_gini\tcountries\nSouth America\t12\t51.5\t1\n"
        );
    }

    #[test]
    fn empty_dataset() {
        let index = DatasetIndex::default();
        for command in [
            Command::Years,
            Command::Year { year: None },
            Command::Continents { year: None },
        ] {
            let answer = Answer::new(&index, &command).unwrap();
            assert!(answer.render(OutputFormat::Table).unwrap().starts_with("no "));
            answer.render(OutputFormat::Json).unwrap();
        }
    }
}
