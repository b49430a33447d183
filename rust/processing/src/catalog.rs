// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Board catalog: which reference codes denote boards.

use std::future::Future;
use std::time::Duration;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{Error, Result};

/// Source of board reference codes.
pub trait BoardCatalog: Send + Sync {
    /// The subset of `codes` that are board codes.
    fn board_codes(
        &self,
        codes: &[String],
    ) -> impl Future<Output = Result<FxHashSet<String>>> + Send;
}

/// A fixed, in-memory list of board codes.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    codes: FxHashSet<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON array of codes.
    pub fn from_json(json: &str) -> Result<Self> {
        let codes: Vec<String> = serde_json::from_str(json)
            .map_err(|e| Error::Catalog(format!("malformed catalog: {}", e)))?;
        Ok(Self::new(codes))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn intersect(known: &FxHashSet<String>, codes: &[String]) -> FxHashSet<String> {
    codes.iter().filter(|c| known.contains(*c)).cloned().collect()
}

impl BoardCatalog for StaticCatalog {
    async fn board_codes(&self, codes: &[String]) -> Result<FxHashSet<String>> {
        Ok(intersect(&self.codes, codes))
    }
}

/// Catalog served over HTTP as a JSON array of every board code.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    url: String,
    http: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.trim().to_string(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_all(&self) -> Result<FxHashSet<String>> {
        let resp = self.http.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Catalog(format!(
                "GET {} failed with status {}",
                self.url,
                resp.status()
            )));
        }
        let codes: Vec<String> = resp.json().await?;
        debug!(url = %self.url, codes = codes.len(), "board catalog fetched");
        Ok(codes.into_iter().collect())
    }
}

impl BoardCatalog for HttpCatalog {
    async fn board_codes(&self, codes: &[String]) -> Result<FxHashSet<String>> {
        let all = self.fetch_all().await?;
        Ok(intersect(&all, codes))
    }
}

/// Either catalog, picked at runtime.
#[derive(Debug, Clone)]
pub enum AnyCatalog {
    Static(StaticCatalog),
    Http(HttpCatalog),
}

impl BoardCatalog for AnyCatalog {
    async fn board_codes(&self, codes: &[String]) -> Result<FxHashSet<String>> {
        match self {
            AnyCatalog::Static(c) => c.board_codes(codes).await,
            AnyCatalog::Http(c) => c.board_codes(codes).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn static_catalog_intersects() {
        let catalog = StaticCatalog::from_json(r#"["KuCB", "KuSBT"]"#).unwrap();
        assert_eq!(catalog.len(), 2);
        let found = catalog.board_codes(&codes(&["KuCB", "Hinge", "KuCB"])).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains("KuCB"));
    }

    #[tokio::test]
    async fn empty_catalog_matches_nothing() {
        let found = StaticCatalog::default().board_codes(&codes(&["KuCB"])).await.unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn malformed_catalog_json() {
        let err = StaticCatalog::from_json("{}").unwrap_err();
        assert!(matches!(err, Error::Catalog(ref msg) if msg.starts_with("malformed catalog")));
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn unreachable_http_catalog_fails() {
        let catalog =
            HttpCatalog::new("http://127.0.0.1:9/boards", Duration::from_millis(500)).unwrap();
        assert!(matches!(catalog.board_codes(&codes(&["KuCB"])).await, Err(Error::Catalog(_))));
    }
}
