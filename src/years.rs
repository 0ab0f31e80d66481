//! Selection of the year of interest

use crate::{dataset::DatasetIndex, Result, Year};
use dialoguer::FuzzySelect;

/// Pick the year of interest
///
/// If the user did not request a specific year, they are prompted to pick one
/// of the available years. Returns `None` if the dataset has no year at all.
pub fn pick(index: &DatasetIndex, requested: Option<Year>) -> Result<Option<Year>> {
    if requested.is_some() || index.is_empty() {
        return Ok(requested);
    }
    prompt(index).map(Some)
}

/// Ask the user to select one of the available years
fn prompt(index: &DatasetIndex) -> Result<Year> {
    let years = index.years_available();
    let year_names = years
        .iter()
        .map(|&year| format!("{year} ({} countries)", index.records_for_year(year).len()))
        .collect::<Vec<_>>();
    let year_idx = FuzzySelect::new()
        .with_prompt("Which year should I show?")
        .items(&year_names)
        .default(0)
        .max_length(usize::MAX)
        .interact()?;
    Ok(years[year_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_year_is_kept() {
        let index = DatasetIndex::default();
        assert_eq!(pick(&index, Some(2010)).unwrap(), Some(2010));
    }

    #[test]
    fn nothing_to_pick_from() {
        let index = DatasetIndex::default();
        assert_eq!(pick(&index, None).unwrap(), None);
    }
}
