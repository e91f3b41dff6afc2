//! dblp search API query URLs

use confcollect_store::VenueKind;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://dblp.uni-trier.de/search/publ/api";
/// Maximum hits per response accepted by dblp
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Base URL plus page size; builds table-of-contents and stream queries.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    page_size: u32,
}

impl Endpoint {
    pub fn new(base: &str, page_size: u32) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base)?,
            page_size,
        })
    }

    /// Table of contents of one proceedings year or journal volume:
    /// `q=toc:db/{conf|journals}/{sym}/{sym}{period}.bht:`
    pub fn toc_url(&self, symbol: &str, period: u32, kind: VenueKind) -> Url {
        let query = format!(
            "toc:db/{}/{symbol}/{symbol}{period}.bht:",
            kind.path_segment()
        );
        self.search(&query)
    }

    /// Whole publication stream of a journal, newest first.
    pub fn stream_url(&self, symbol: &str) -> Url {
        self.search(&format!("stream:streams/journals/{symbol}:"))
    }

    fn search(&self, query: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("q", query)
            .append_pair("h", &self.page_size.to_string())
            .append_pair("format", "json");
        url
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_ENDPOINT).expect("valid default endpoint"),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
