// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for connection helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Failover error: {0}")]
    Failover(#[from] failover::FailoverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Arrow conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    #[error("WebHDFS {exception}: {message}")]
    Hdfs { exception: String, message: String },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Token request failed: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Query engine error: {0}")]
    Engine(#[from] anyhow::Error),
}

impl ConnectError {
    /// True when the failure came from exhausting every failover candidate
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ConnectError::Failover(_))
    }
}
