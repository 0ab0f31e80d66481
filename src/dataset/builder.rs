//! Construction of a [`DatasetIndex`] from parsed records

use super::DatasetIndex;
use crate::{
    stats::{ContinentAccumulator, IndicatorStats},
    Continent, Country, Record, Year,
};
use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use unicase::UniCase;

/// Accumulator for records that will go into a [`DatasetIndex`]
///
/// When several records are about the same country and year, the last one
/// wins, but it keeps the position of the first one within its year.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    /// Records grouped by year
    years: BTreeMap<Year, YearBuilder>,

    /// Number of records added so far, including superseded ones
    num_added: usize,
}
//
impl DatasetBuilder {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate a new record
    pub fn add_record(&mut self, record: Record) {
        self.num_added += 1;
        match self.years.entry(record.year) {
            btree_map::Entry::Occupied(o) => o.into_mut().add_record(record),
            btree_map::Entry::Vacant(v) => {
                v.insert(YearBuilder::new(record));
            }
        }
    }

    /// Build the index
    pub fn finish(self) -> DatasetIndex {
        let mut records = Vec::new();
        let mut years = Vec::with_capacity(self.years.len());
        let mut year_ends = Vec::with_capacity(self.years.len());
        let mut year_stats = Vec::with_capacity(self.years.len());
        let mut continents = HashMap::new();
        let mut by_country = HashMap::<Country, BTreeMap<Year, usize>>::new();
        let mut country_names = HashMap::new();
        for (year, year_data) in self.years {
            let stats = IndicatorStats::from_records(&year_data.records)
                .expect("years are only created along with a first record");

            // Continent means are computed over the deduplicated records
            let mut year_continents = BTreeMap::<Continent, ContinentAccumulator>::new();
            for record in &year_data.records {
                let Some(continent) = &record.continent else {
                    continue;
                };
                match year_continents.entry(continent.clone()) {
                    btree_map::Entry::Occupied(o) => o.into_mut().add_record(record),
                    btree_map::Entry::Vacant(v) => {
                        v.insert(ContinentAccumulator::new(record));
                    }
                }
            }
            if !year_continents.is_empty() {
                continents.insert(
                    year,
                    (year_continents.into_iter())
                        .map(|(continent, acc)| (continent, acc.finish()))
                        .collect(),
                );
            }

            // Records are laid out year after year
            for record in year_data.records {
                by_country
                    .entry(record.country.clone())
                    .or_default()
                    .insert(year, records.len());
                if let hash_map::Entry::Vacant(v) =
                    country_names.entry(UniCase::new(record.country.clone()))
                {
                    v.insert(record.country.clone());
                }
                records.push(record);
            }
            years.push(year);
            year_ends.push(records.len());
            year_stats.push(stats);
        }
        log::debug!(
            "Indexed {} records ({} superseded) spanning {} years and {} countries",
            records.len(),
            self.num_added - records.len(),
            years.len(),
            by_country.len()
        );
        DatasetIndex {
            records: records.into(),
            years: years.into(),
            year_ends: year_ends.into(),
            year_stats: year_stats.into(),
            continents,
            by_country,
            country_names,
        }
    }
}

/// Records from a single year
#[derive(Debug)]
struct YearBuilder {
    /// One record per country, in order of first appearance
    records: Vec<Record>,

    /// Position of each country's record in "records"
    slots: HashMap<Country, usize>,
}
//
impl YearBuilder {
    /// Start a year with its first record
    fn new(record: Record) -> Self {
        Self {
            slots: std::iter::once((record.country.clone(), 0)).collect(),
            records: vec![record],
        }
    }

    /// Add a record, superseding any previous record about the same country
    fn add_record(&mut self, record: Record) {
        match self.slots.entry(record.country.clone()) {
            hash_map::Entry::Occupied(o) => {
                let slot = &mut self.records[*o.get()];
                log::trace!("Record {record:?} supersedes {slot:?}");
                *slot = record;
            }
            hash_map::Entry::Vacant(v) => {
                v.insert(self.records.len());
                self.records.push(record);
            }
        }
    }
}
