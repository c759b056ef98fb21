// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Elasticsearch client over the REST API

use crate::config::SearchConfig;
use crate::{ConnectError, Result};
use diagnostics::*;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Deserialize, Debug, Clone)]
pub struct ClusterInfo {
    pub name: String,
    pub cluster_name: String,
    pub version: ClusterVersion,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ClusterVersion {
    pub number: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
}

#[derive(Debug, Clone)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct SearchReply {
    hits: HitsReply,
}

#[derive(Deserialize)]
struct HitsReply {
    total: Total,
    hits: Vec<Hit>,
}

/// 7.x reports `{"value": n, ...}`, 6.x a bare number
#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

#[derive(Deserialize)]
struct IndexReply {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Deserialize)]
struct GetReply {
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

pub struct SearchClient {
    http: Client,
    base: Url,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let base = Url::parse(&config.url)?;
        let http = Client::builder().timeout(config.timeout()).build()?;
        let url = &config.url;
        info!("Elasticsearch client for {url}", url);
        Ok(Self { http, base })
    }

    /// GET `/`: cluster name and version
    pub fn info(&self) -> Result<ClusterInfo> {
        let url = self.endpoint(&[])?;
        Ok(self.send(self.http.get(url.clone()), &url)?.json()?)
    }

    /// Index a document, letting the cluster pick the id when `id` is None
    pub fn index_document(&self, index: &str, id: Option<&str>, doc: &Value) -> Result<String> {
        let req = match id {
            Some(id) => {
                let url = self.endpoint(&[index, "_doc", id])?;
                (self.http.put(url.clone()), url)
            }
            None => {
                let url = self.endpoint(&[index, "_doc"])?;
                (self.http.post(url.clone()), url)
            }
        };
        let (builder, url) = req;
        let reply: IndexReply = self.send(builder.json(doc), &url)?.json()?;
        Ok(reply.id)
    }

    /// Fetch a document's source, `None` when it does not exist
    pub fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let url = self.endpoint(&[index, "_doc", id])?;
        let resp = self.http.get(url.clone()).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let reply: GetReply = check(resp, &url)?.json()?;
        Ok(if reply.found { reply.source } else { None })
    }

    /// Run a query DSL body against `index`
    pub fn search(&self, index: &str, query: &Value) -> Result<SearchHits> {
        let url = self.endpoint(&[index, "_search"])?;
        let reply: SearchReply = self.send(self.http.post(url.clone()).json(query), &url)?.json()?;
        let total = match reply.hits.total {
            Total::Count(n) | Total::Object { value: n } => n,
        };
        Ok(SearchHits {
            total,
            hits: reply.hits.hits,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ConnectError::Configuration(format!("{} cannot be a base URL", self.base)))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn send(&self, req: RequestBuilder, url: &Url) -> Result<Response> {
        check(req.send()?, url)
    }
}

fn check(resp: Response, url: &Url) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ConnectError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body: resp.text().unwrap_or_default(),
    })
}
