//! Summary statistics over groups of records

use crate::{Population, Record, Year};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Extent of the indicators over a group of records
///
/// Over a year, this provides the domain of the choropleth color scale and of
/// the scatter plot axes. Over a country's history, it provides the domain of
/// the trend chart axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IndicatorStats {
    /// Year of first observation
    pub first_year: Year,

    /// Year of last observation
    pub last_year: Year,

    /// Number of observations
    pub count: NonZeroUsize,

    /// Smallest Gini index
    pub min_gini: f64,

    /// Largest Gini index
    pub max_gini: f64,

    /// Smallest GDP
    pub min_gdp: f64,

    /// Largest GDP
    pub max_gdp: f64,

    /// Sum of populations
    ///
    /// Only meaningful over a single year, where it is the population covered
    /// by the dataset.
    pub total_population: Population,
}
//
impl IndicatorStats {
    /// Set up statistics from a single record
    pub fn new(record: &Record) -> Self {
        Self {
            first_year: record.year,
            last_year: record.year,
            count: NonZeroUsize::MIN,
            min_gini: record.gini_index,
            max_gini: record.gini_index,
            min_gdp: record.gdp,
            max_gdp: record.gdp,
            total_population: record.population,
        }
    }

    /// Update statistics with a new record
    pub fn add_record(&mut self, record: &Record) {
        self.merge(Self::new(record));
    }

    /// Merge statistics from two disjoint groups of records
    fn merge(&mut self, rhs: Self) {
        debug_assert!(
            self.first_year <= self.last_year,
            "Violated first <= last year type invariant"
        );
        self.first_year = self.first_year.min(rhs.first_year);
        self.last_year = self.last_year.max(rhs.last_year);
        self.count = self.count.saturating_add(rhs.count.get());
        self.min_gini = self.min_gini.min(rhs.min_gini);
        self.max_gini = self.max_gini.max(rhs.max_gini);
        self.min_gdp = self.min_gdp.min(rhs.min_gdp);
        self.max_gdp = self.max_gdp.max(rhs.max_gdp);
        self.total_population = self.total_population.saturating_add(rhs.total_population);
    }

    /// Compute statistics over a group of records, if it isn't empty
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<Self> {
        records.into_iter().fold(None, |acc, record| {
            if let Some(mut acc) = acc {
                acc.add_record(record);
                Some(acc)
            } else {
                Some(Self::new(record))
            }
        })
    }
}

/// Average indicators of the countries of a continent on a given year
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ContinentAggregate {
    /// Mean GDP
    pub average_gdp: f64,

    /// Mean Gini index
    pub average_gini: f64,

    /// Number of countries that contributed to the means
    pub count: NonZeroUsize,
}

/// Running sums from which a [`ContinentAggregate`] is computed
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ContinentAccumulator {
    gdp_sum: f64,
    gini_sum: f64,
    count: NonZeroUsize,
}
//
impl ContinentAccumulator {
    /// Start accumulating from a first contribution
    pub fn new(record: &Record) -> Self {
        Self {
            gdp_sum: record.gdp,
            gini_sum: record.gini_index,
            count: NonZeroUsize::MIN,
        }
    }

    /// Add another contribution
    pub fn add_record(&mut self, record: &Record) {
        self.gdp_sum += record.gdp;
        self.gini_sum += record.gini_index;
        self.count = self.count.saturating_add(1);
    }

    /// Compute the means
    pub fn finish(self) -> ContinentAggregate {
        let count = self.count.get() as f64;
        ContinentAggregate {
            average_gdp: self.gdp_sum / count,
            average_gini: self.gini_sum / count,
            count: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Year, gini_index: f64, gdp: f64, population: Population) -> Record {
        Record {
            country: "Norway".into(),
            year,
            gini_index,
            gdp,
            population,
            continent: Some("Europe".into()),
        }
    }

    #[test]
    fn extents() {
        let records = [
            record(2005, 27.0, 300.0, 10),
            record(2001, 25.5, 150.0, 20),
            record(2010, 26.0, 450.0, 30),
        ];
        let stats = IndicatorStats::from_records(&records).expect("there are records");
        assert_eq!(stats.first_year, 2001);
        assert_eq!(stats.last_year, 2010);
        assert_eq!(stats.count.get(), 3);
        assert_eq!((stats.min_gini, stats.max_gini), (25.5, 27.0));
        assert_eq!((stats.min_gdp, stats.max_gdp), (150.0, 450.0));
        assert_eq!(stats.total_population, 60);
    }

    #[test]
    fn no_records_no_stats() {
        assert_eq!(IndicatorStats::from_records(&[] as &[Record]), None);
    }

    #[test]
    fn merge_matches_sequential_accumulation() {
        let records = [
            record(2003, 40.0, 10.0, 1),
            record(2004, 20.0, 30.0, 2),
            record(2008, 30.0, 20.0, 3),
        ];
        let mut left = IndicatorStats::new(&records[0]);
        left.add_record(&records[1]);
        let right = IndicatorStats::new(&records[2]);
        left.merge(right);
        let sequential = IndicatorStats::from_records(&records);
        assert_eq!(Some(left), sequential);
    }

    #[test]
    fn continent_means() {
        let mut acc = ContinentAccumulator::new(&record(2010, 30.0, 10.0, 0));
        acc.add_record(&record(2010, 32.0, 20.0, 0));
        acc.add_record(&record(2010, 34.0, 30.0, 0));
        let aggregate = acc.finish();
        assert_eq!(aggregate.average_gdp, 20.0);
        assert_eq!(aggregate.average_gini, 32.0);
        assert_eq!(aggregate.count.get(), 3);
    }
}
