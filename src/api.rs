/// Loader for the static publications feed (`{ "items": [...] }`).
///
/// The feed is retrieved once per session, from an `http(s)://` URL or a local file, and always
/// bypasses caches. Callers that only want to draw charts use [`load_records_or_empty`]: a
/// failed load is logged and becomes an empty collection, so the charts render their empty
/// state instead of failing.
///
/// Typical usage:
/// ```no_run
/// # use pubcharts::api::Client;
/// let client = Client::default();
/// let doc = client.load("https://example.org/data/publications.json")?;
/// println!("{} records", doc.items.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::models::{PublicationsDocument, Record};
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::redirect::Policy;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .default_headers(headers)
            .user_agent(concat!("pubcharts/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self { http }
    }
}

/// Whether `source` names a remote document.
pub fn is_remote(source: &str) -> bool {
    let s = source.trim_start().to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://")
}

/// Decode a feed document from JSON text.
pub fn parse_document(text: &str) -> Result<PublicationsDocument> {
    serde_json::from_str(text).context("parse publications document")
}

impl Client {
    /// Load from a URL or a file path.
    pub fn load(&self, source: &str) -> Result<PublicationsDocument> {
        if is_remote(source) {
            self.fetch(source)
        } else {
            load_file(source)
        }
    }

    /// GET the document. Transient failures (5xx, network errors) are retried with backoff.
    pub fn fetch(&self, url: &str) -> Result<PublicationsDocument> {
        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    let text = r.text().context("read response body")?;
                    return parse_document(&text).with_context(|| format!("GET {}", url));
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(anyhow::anyhow!("HTTP {}", r.status()));
                }
                Ok(r) => bail!("GET {} failed with HTTP {}", url, r.status()),
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        bail!("GET {}: network error: {:?}", url, last_err);
    }
}

/// Read a document from disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<PublicationsDocument> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_document(&text).with_context(|| format!("in {}", path.display()))
}

/// Load records for charting; any failure is logged and yields an empty collection.
pub fn load_records_or_empty(client: &Client, source: &str) -> Vec<Record> {
    match client.load(source) {
        Ok(doc) => {
            log::info!("loaded {} records from {}", doc.items.len(), source);
            doc.items
        }
        Err(e) => {
            log::warn!("could not load {}: {:#}; drawing empty charts", source, e);
            Vec::new()
        }
    }
}
