use poll_promise::Promise;
use serde::Deserialize;

use crate::{
    api::ApiClient,
    paging::{record::de_entries, RawVideoEntry},
    FeedConfig, Result,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

/// One page of the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageResponse {
    #[serde(default, deserialize_with = "de_entries")]
    pub records: Vec<RawVideoEntry>,

    #[serde(default)]
    pub total: Option<u64>,
}

pub type PageFetch = Promise<Result<PageResponse>>;

/// Where pages of raw video entries come from.
pub trait VideoSource {
    fn fetch_page(&mut self, request: PageRequest) -> PageFetch;
}

/// Pages the list endpoint over HTTP.
pub struct HttpVideoSource {
    client: ApiClient,
    list_path: String,
}

impl HttpVideoSource {
    pub fn new(client: ApiClient, list_path: impl Into<String>) -> Self {
        Self {
            client,
            list_path: list_path.into(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_base, config.lang.clone())?;
        Ok(Self::new(client, config.list_path.clone()))
    }

    pub fn query(request: PageRequest) -> [(&'static str, String); 2] {
        [
            ("pageNo", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
        ]
    }
}

impl VideoSource for HttpVideoSource {
    fn fetch_page(&mut self, request: PageRequest) -> PageFetch {
        self.client.get(&self.list_path, &Self::query(request))
    }
}
