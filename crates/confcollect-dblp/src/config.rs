//! Catalog run configuration

use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Datelike;

use crate::endpoint::Endpoint;
use crate::venues::{Venue, load_venue_list};

/// Earliest year accepted for a catalog range (exclusive).
const YEAR_FLOOR: u32 = 1900;

/// CLI-facing arguments for the catalog command (plain struct, no clap derive).
#[derive(Debug, Clone)]
pub struct CatalogArgs {
    pub root: PathBuf,
    pub venue_list: PathBuf,
    pub min_year: u32,
    pub max_year: u32,
    pub endpoint: String,
    pub page_size: u32,
    pub archive_raw: bool,
}

/// Runtime configuration for a catalog build
#[derive(Debug)]
pub struct Config {
    pub root: PathBuf,
    pub venues: Vec<Venue>,
    pub years: RangeInclusive<u32>,
    pub endpoint: Endpoint,
    pub archive_raw: bool,
}

impl TryFrom<CatalogArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CatalogArgs) -> Result<Self, Self::Error> {
        let years = validate_years(args.min_year, args.max_year, current_year())?;
        anyhow::ensure!(args.page_size > 0, "page_size must be positive");
        let endpoint = Endpoint::new(&args.endpoint, args.page_size)
            .with_context(|| format!("Invalid endpoint URL: {}", args.endpoint))?;
        let venues = load_venue_list(&args.venue_list).context("Cannot load venue list")?;
        anyhow::ensure!(
            !venues.is_empty(),
            "No venues in {}",
            args.venue_list.display()
        );

        Ok(Self {
            root: args.root,
            venues,
            years,
            endpoint,
            archive_raw: args.archive_raw,
        })
    }
}

pub fn current_year() -> u32 {
    u32::try_from(chrono::Local::now().year()).unwrap_or(YEAR_FLOOR)
}

/// `1900 < min <= max <= current`
pub fn validate_years(min: u32, max: u32, current: u32) -> anyhow::Result<RangeInclusive<u32>> {
    anyhow::ensure!(min > YEAR_FLOOR, "min_year {min} must be after {YEAR_FLOOR}");
    anyhow::ensure!(min <= max, "min_year {min} is after max_year {max}");
    anyhow::ensure!(max <= current, "max_year {max} is in the future");
    Ok(min..=max)
}
