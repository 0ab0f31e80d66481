//! Immutable, queryable index of the observations
//!
//! - Records are stored once, year after year, with one record per country
//!   and year. Queries by year return contiguous slices.
//! - Lookups by country go through a per-country year map.
//! - Continent means and per-year statistics are precomputed at build time.
//!
//! Queries never fail: asking about a year or country that isn't in the
//! dataset yields empty results, which consumers should display as "no data".

pub mod builder;

use crate::{
    stats::{ContinentAggregate, IndicatorStats},
    Continent, Country, Record, Year,
};
use std::{
    collections::{BTreeMap, HashMap},
    ops::Range,
};
use unicase::UniCase;

pub use builder::DatasetBuilder;

/// Index of Gini index, GDP and population observations
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetIndex {
    /// Deduplicated records, grouped by increasing year, in order of first
    /// appearance within each year
    records: Box<[Record]>,

    /// Distinct years, in increasing order
    years: Box<[Year]>,

    /// Offsets that mark the end of each year's data in the "records" array
    year_ends: Box<[usize]>,

    /// Statistics over each year from the "years" array
    year_stats: Box<[IndicatorStats]>,

    /// Continent means for each year with continent data
    continents: HashMap<Year, BTreeMap<Continent, ContinentAggregate>>,

    /// Offset of each country's records in the "records" array, by year
    by_country: HashMap<Country, BTreeMap<Year, usize>>,

    /// Case-insensitive country name lookup
    ///
    /// If some country names only differ by case, the one seen on the earliest
    /// year wins.
    country_names: HashMap<UniCase<Country>, Country>,
}
//
impl DatasetIndex {
    /// Index a batch of records
    ///
    /// When several records are about the same country and year, the last one
    /// wins. Building never fails, an empty batch yields an empty index.
    pub fn build(records: impl IntoIterator<Item = Record>) -> Self {
        records.into_iter().collect()
    }

    /// Number of distinct (country, year) observations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Truth that the index holds no observation
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Years for which there is data, in increasing order
    pub fn years_available(&self) -> &[Year] {
        &self.years[..]
    }

    /// Earliest year for which there is data, a good default selection
    pub fn first_year(&self) -> Option<Year> {
        self.years.first().copied()
    }

    /// Observations from a given year, in order of first appearance
    pub fn records_for_year(&self, year: Year) -> &[Record] {
        self.year_idx(year)
            .map_or(&[][..], |idx| &self.records[self.year_range(idx)])
    }

    /// Observation about a given country on a given year
    pub fn record_for_country_year(&self, country: &str, year: Year) -> Option<&Record> {
        let offset = self.by_country.get(country)?.get(&year)?;
        Some(&self.records[*offset])
    }

    /// Average GDP and Gini index per continent on a given year
    ///
    /// Records without a continent do not contribute. The result is empty if
    /// there is no continent data for this year.
    pub fn continent_averages_for_year(&self, year: Year) -> BTreeMap<&str, ContinentAggregate> {
        self.continents
            .get(&year)
            .map(|continents| {
                (continents.iter())
                    .map(|(continent, aggregate)| (&**continent, *aggregate))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every observation about a country, by increasing year
    pub fn time_series_for_country(&self, country: &str) -> Vec<&Record> {
        self.by_country
            .get(country)
            .map(|years| years.values().map(|&offset| &self.records[offset]).collect())
            .unwrap_or_default()
    }

    /// Statistics over the observations from a given year
    pub fn year_stats(&self, year: Year) -> Option<IndicatorStats> {
        self.year_idx(year).map(|idx| self.year_stats[idx])
    }

    /// Statistics over the observations about a given country
    pub fn country_stats(&self, country: &str) -> Option<IndicatorStats> {
        IndicatorStats::from_records(self.time_series_for_country(country))
    }

    /// Names of the countries for which there is data, in lexicographic order
    pub fn countries(&self) -> Vec<&str> {
        let mut countries = self.by_country.keys().map(|c| &**c).collect::<Vec<_>>();
        countries.sort_unstable();
        countries
    }

    /// Find how a country name is spelled in the dataset
    ///
    /// Names coming from user input or map features may not use the same case
    /// as the dataset. An exact match is preferred, otherwise the name is
    /// matched case-insensitively.
    pub fn resolve_country(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if let Some((country, _)) = self.by_country.get_key_value(name) {
            return Some(&**country);
        }
        self.country_names
            .get(&UniCase::new(Country::from(name)))
            .map(|country| &**country)
    }

    /// Position of a year within the "years" array
    fn year_idx(&self, year: Year) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    /// Range of a year's data within the "records" array
    fn year_range(&self, year_idx: usize) -> Range<usize> {
        let start = year_idx
            .checked_sub(1)
            .map_or(0, |prev_idx| self.year_ends[prev_idx]);
        start..self.year_ends[year_idx]
    }
}
//
impl Default for DatasetIndex {
    fn default() -> Self {
        DatasetBuilder::new().finish()
    }
}
//
impl FromIterator<Record> for DatasetIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut builder = DatasetBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.finish()
    }
}
