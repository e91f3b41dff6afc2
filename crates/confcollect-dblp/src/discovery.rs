//! Discovery client: one query per work unit

use confcollect_core::{FetchError, get_with_retry};
use confcollect_store::{RecordStore, VenueKind};

use crate::endpoint::Endpoint;
use crate::response::{HitList, InvalidReason, QueryOutcome, hit_to_record, parse_response};

/// Blocking GET returning the response body.
pub trait HttpSource {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Shared reqwest client with retry/backoff from the process HTTP config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedHttp;

impl HttpSource for SharedHttp {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        get_with_retry("dblp", url)
    }
}

pub struct DiscoveryClient<H> {
    http: H,
    endpoint: Endpoint,
}

impl<H: HttpSource> DiscoveryClient<H> {
    pub fn new(http: H, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Query the table of contents of `symbol` for one year or volume.
    pub fn query(&self, symbol: &str, period: u32, kind: VenueKind) -> QueryOutcome {
        let url = self.endpoint.toc_url(symbol, period, kind);
        self.raw_query(url.as_str())
    }

    /// Issue one request and validate it. Transport failures become `Invalid`.
    pub fn raw_query(&self, url: &str) -> QueryOutcome {
        match self.http.get(url) {
            Ok(body) => parse_response(&body),
            Err(e) => {
                log::warn!("query failed: {e}");
                QueryOutcome::Invalid(InvalidReason::Transport)
            }
        }
    }
}

impl HitList {
    /// Records in hit order. Hits without a usable title are dropped; repeated
    /// titles keep the first occurrence.
    pub fn to_record_store(&self, label: &str) -> RecordStore {
        let mut store = RecordStore::new();
        for record in self.hits.iter().filter_map(|hit| hit_to_record(hit, label)) {
            let title = record.title.clone();
            if !store.push(record) {
                log::debug!("{label}: duplicate title {title:?} dropped");
            }
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        body: Result<String, u16>,
        seen: RefCell<Vec<String>>,
    }

    impl HttpSource for Canned {
        fn get(&self, url: &str) -> Result<String, FetchError> {
            self.seen.borrow_mut().push(url.to_string());
            self.body.clone().map_err(|status| FetchError::Http {
                status: Some(status),
                message: "canned".into(),
            })
        }
    }

    fn client(body: Result<&str, u16>) -> DiscoveryClient<Canned> {
        DiscoveryClient::new(
            Canned {
                body: body.map(String::from),
                seen: RefCell::new(Vec::new()),
            },
            Endpoint::default(),
        )
    }

    #[test]
    fn transport_failure_is_invalid() {
        let c = client(Err(503));
        assert!(matches!(
            c.query("isca", 2019, VenueKind::Conference),
            QueryOutcome::Invalid(InvalidReason::Transport)
        ));
    }

    #[test]
    fn query_uses_toc_url() {
        let c = client(Ok(r#"{"result":{"hits":{"@total":"1","hit":[{"info":{"title":"T"}}]}}}"#));
        assert!(c.query("isca", 2019, VenueKind::Conference).is_valid());
        let seen = c.http.seen.borrow();
        assert!(seen[0].contains("isca2019.bht"));
    }

    #[test]
    fn record_store_keeps_order_and_skips_untitled() {
        let body = r#"{"result":{"hits":{"@total":"4","hit":[
            {"info":{"title":"B","doi":"10.1/b"}},
            {"info":{"authors":{"author":{"text":"X"}}}},
            {"info":{"title":"A"}},
            {"info":{"title":"B","doi":"10.1/dup"}}
        ]}}}"#;
        let QueryOutcome::Valid(list) = parse_response(body) else {
            panic!("expected valid");
        };
        let store = list.to_record_store("t");
        let titles: Vec<_> = store.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["B", "A"]);
        assert_eq!(store.records()[0].identifier, "10.1/b");
    }
}
