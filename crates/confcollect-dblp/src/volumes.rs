//! Journal volume discovery from the newest-first publication stream

use serde_json::Value;

use crate::discovery::{DiscoveryClient, HttpSource};
use crate::response::{QueryOutcome, hit_info, info_u32};

/// Distinct volumes in first-seen order, stopping at the first hit whose
/// year is at or below `min_year`. That hit's volume is included.
///
/// Hits without info, year or volume are skipped and never trigger the stop.
pub fn collect_volumes(hits: &[Value], min_year: u32, label: &str) -> Vec<u32> {
    let mut volumes = Vec::new();
    for hit in hits {
        let Some(info) = hit_info(hit) else {
            log::warn!("{label}: stream hit without info skipped");
            continue;
        };
        let Some(year) = info_u32(info, "year") else {
            log::warn!("{label}: stream hit without a numeric year skipped");
            continue;
        };
        let Some(volume) = info_u32(info, "volume") else {
            log::warn!("{label}: stream hit without a numeric volume skipped");
            continue;
        };
        if !volumes.contains(&volume) {
            volumes.push(volume);
        }
        if year <= min_year {
            break;
        }
    }
    volumes
}

pub struct VolumeEnumerator<'a, H> {
    client: &'a DiscoveryClient<H>,
}

impl<'a, H: HttpSource> VolumeEnumerator<'a, H> {
    pub fn new(client: &'a DiscoveryClient<H>) -> Self {
        Self { client }
    }

    /// `None` when the stream query is invalid (unknown journal, transport failure).
    pub fn enumerate(&self, symbol: &str, min_year: u32) -> Option<Vec<u32>> {
        let url = self.client.endpoint().stream_url(symbol);
        let list = match self.client.raw_query(url.as_str()) {
            QueryOutcome::Valid(list) => list,
            QueryOutcome::Invalid(reason) => {
                log::warn!("{symbol}: journal stream not found ({reason})");
                return None;
            }
        };
        let volumes = collect_volumes(&list.hits, min_year, symbol);
        if volumes.is_empty() {
            log::warn!("{symbol}: no volumes since {min_year}");
        } else {
            log::debug!("{symbol}: volumes {volumes:?}");
        }
        Some(volumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(year: &str, volume: &str) -> Value {
        json!({"info": {"year": year, "volume": volume}})
    }

    #[test]
    fn stops_at_floor_year() {
        let hits = [
            hit("2024", "40"),
            hit("2023", "39"),
            hit("2021", "37"),
            hit("2019", "35"),
        ];
        assert_eq!(collect_volumes(&hits, 2021, "j"), vec![40, 39, 37]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let hits = [hit("2024", "40"), hit("2024", "40"), hit("2023", "39")];
        assert_eq!(collect_volumes(&hits, 2000, "j"), vec![40, 39]);
    }

    #[test]
    fn skipped_hits_never_stop() {
        let hits = [
            json!({"noinfo": true}),
            json!({"info": {"year": "2010"}}),
            json!({"info": {"year": "2010", "volume": "12/3"}}),
            hit("2024", "40"),
            hit("2020", "36"),
            hit("2018", "34"),
        ];
        assert_eq!(collect_volumes(&hits, 2020, "j"), vec![40, 36]);
    }

    #[test]
    fn empty_stream() {
        assert!(collect_volumes(&[], 2020, "j").is_empty());
    }
}
