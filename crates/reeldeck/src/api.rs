use poll_promise::Promise;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error};
use url::Url;

use crate::{Error, Result};

const SUCCESS_CODE: i64 = 200;

/// Envelope every endpoint of the backend wraps its payload in.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    code: Option<i64>,

    result: Option<T>,

    #[serde(default)]
    message: Option<String>,
}

/// Unwraps the `result` of a response body, turning application level
/// failures into errors.
pub fn parse_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(bytes)?;

    if let Some(code) = envelope.code {
        if code != SUCCESS_CODE {
            return Err(Error::Api {
                code,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_owned()),
            });
        }
    }

    envelope
        .result
        .ok_or_else(|| Error::Generic("response is missing its result".to_owned()))
}

/// Thin GET client over `ehttp`. Every request carries the `lang` header and
/// completes into a [`Promise`] that the UI loop polls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    lang: String,
}

impl ApiClient {
    pub fn new(base: &str, lang: impl Into<String>) -> Result<Self> {
        // a trailing slash keeps the last path segment when joining
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };

        Ok(Self {
            base,
            lang: lang.into(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.join(path.trim_start_matches('/'))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Promise<Result<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = match self.url(path, params) {
            Ok(url) => url,
            Err(err) => return Promise::from_ready(Err(err)),
        };

        let (sender, promise) = Promise::new();

        let mut request = ehttp::Request::get(url.as_str());
        request.headers.insert("lang", self.lang.clone());

        debug!("GET {url}");
        ehttp::fetch(request, move |response: std::result::Result<ehttp::Response, String>| {
            let result = response.map_err(Error::Http).and_then(|resp| {
                if !resp.ok {
                    return Err(Error::Http(format!(
                        "bad http response {}: {}",
                        resp.status, resp.status_text
                    )));
                }

                parse_envelope(&resp.bytes)
            });

            if let Err(err) = &result {
                error!("request to {url} failed: {err}");
            }

            sender.send(result);
        });

        promise
    }
}
