// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Explicit connection parameters, optionally loaded from YAML
//!
//! Every helper in this crate takes the section it needs as an argument;
//! nothing is read from the process environment.

use crate::{ConnectError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// All service sections; any of them may be omitted
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConnectConfig {
    pub hdfs: Option<HdfsConfig>,
    pub query: Option<QueryConfig>,
    pub sql: Option<SqlConfig>,
    pub search: Option<SearchConfig>,
    pub sharepoint: Option<SharePointConfig>,
}

/// NameNode candidates for WebHDFS
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HdfsConfig {
    /// Base addresses in preference order, e.g. `http://nn1`
    pub namenodes: Vec<String>,
    /// Appended to each NameNode address when set (usually 50070)
    pub port: Option<u16>,
    pub user: Option<String>,
    #[serde(default = "default_hdfs_timeout_ms")]
    pub timeout_ms: u64,
}

impl HdfsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryEngineKind {
    #[default]
    Impala,
    Hive,
}

impl QueryEngineKind {
    pub fn default_port(self) -> u16 {
        match self {
            QueryEngineKind::Impala => 21050,
            QueryEngineKind::Hive => 10000,
        }
    }
}

/// Compute hosts for Impala or Hive
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryConfig {
    #[serde(default)]
    pub engine: QueryEngineKind,
    pub datanodes: Vec<String>,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    #[serde(default = "default_auth_mechanism")]
    pub auth_mechanism: String,
    #[serde(default)]
    pub ssl: bool,
    /// Per-host connect timeout; kept short so failover stays fast
    #[serde(default = "default_query_timeout_ms")]
    pub timeout_ms: u64,
}

impl QueryConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.engine.default_port())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    Mysql,
    Postgres,
}

impl SqlDialect {
    pub fn default_port(self) -> u16 {
        match self {
            SqlDialect::Mysql => 3306,
            SqlDialect::Postgres => 5432,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SqlConfig {
    pub dialect: SqlDialect,
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl SqlConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.dialect.default_port())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// e.g. `http://es-host:9200`
    pub url: String,
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SharePointConfig {
    /// e.g. `https://contoso.sharepoint.com/sites/data`
    pub site_url: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Overrides the Azure ACS token endpoint
    pub token_url: Option<String>,
    /// `$top` for list item pages
    pub page_size: Option<u32>,
}

fn default_hdfs_timeout_ms() -> u64 {
    5000
}

fn default_query_timeout_ms() -> u64 {
    500
}

fn default_auth_mechanism() -> String {
    "PLAIN".to_string()
}

fn default_search_timeout_secs() -> u64 {
    10
}

/// Load configuration from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConnectConfig> {
    let content = std::fs::read_to_string(&path)?;
    let config: ConnectConfig = serde_yaml_ng::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate every section that is present
pub fn validate_config(config: &ConnectConfig) -> Result<()> {
    if let Some(hdfs) = &config.hdfs {
        if hdfs.namenodes.is_empty() {
            return Err(invalid("At least one NameNode must be configured"));
        }
    }
    if let Some(query) = &config.query {
        if query.datanodes.is_empty() {
            return Err(invalid("At least one DataNode must be configured"));
        }
        validate_query(query)?;
    }
    if let Some(sql) = &config.sql {
        if sql.host.is_empty() {
            return Err(invalid("sql.host cannot be empty"));
        }
        if sql.user.is_empty() {
            return Err(invalid("sql.user cannot be empty"));
        }
    }
    if let Some(search) = &config.search {
        require_http("search.url", &search.url)?;
    }
    if let Some(sp) = &config.sharepoint {
        require_http("sharepoint.site_url", &sp.site_url)?;
        if sp.tenant_id.is_empty() || sp.client_id.is_empty() {
            return Err(invalid("sharepoint.tenant_id and sharepoint.client_id are required"));
        }
    }
    Ok(())
}

/// Checks that hold for every call; an empty DataNode list is left to
/// host selection, which reports it as `NoAvailableHost`
pub(crate) fn validate_query(query: &QueryConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for node in &query.datanodes {
        if !seen.insert(node.as_str()) {
            return Err(invalid(&format!("DataNode {node} is listed twice")));
        }
    }
    if query.user.is_empty() {
        return Err(invalid("query.user cannot be empty"));
    }
    Ok(())
}

fn require_http(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(&format!("{field} must be http or https, got {other}"))),
    }
}

fn invalid(msg: &str) -> ConnectError {
    ConnectError::Configuration(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
hdfs:
  namenodes: ["http://nn1", "http://nn2"]
  port: 50070
  user: analyst
query:
  engine: hive
  datanodes: [dn1, dn2, dn3]
  user: analyst
  password: secret
  ssl: true
search:
  url: http://es:9200
"#;

    #[test]
    fn test_load_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        let hdfs = config.hdfs.unwrap();
        assert_eq!(hdfs.namenodes, vec!["http://nn1", "http://nn2"]);
        assert_eq!(hdfs.timeout(), Duration::from_secs(5));

        let query = config.query.unwrap();
        assert_eq!(query.engine, QueryEngineKind::Hive);
        assert_eq!(query.port(), 10000);
        assert_eq!(query.auth_mechanism, "PLAIN");
        assert_eq!(query.timeout(), Duration::from_millis(500));
        assert!(query.ssl);

        assert_eq!(config.search.unwrap().timeout_secs, 10);
        assert!(config.sql.is_none());
        assert!(config.sharepoint.is_none());
    }

    #[test]
    fn test_duplicate_datanodes_rejected() {
        let config: ConnectConfig = serde_yaml_ng::from_str(
            "query: {datanodes: [dn1, dn1], user: u, password: p}",
        )
        .unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("dn1 is listed twice"));
    }

    #[test]
    fn test_empty_namenodes_rejected() {
        let config: ConnectConfig = serde_yaml_ng::from_str("hdfs: {namenodes: []}").unwrap();
        assert!(matches!(validate_config(&config), Err(ConnectError::Configuration(_))));
    }

    #[test]
    fn test_empty_datanodes_rejected() {
        let config: ConnectConfig =
            serde_yaml_ng::from_str("query: {datanodes: [], user: u, password: p}").unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("At least one DataNode"));
    }

    #[test]
    fn test_search_url_scheme_checked() {
        let config: ConnectConfig =
            serde_yaml_ng::from_str("search: {url: 'ftp://es:9200'}").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_sql_default_ports() {
        let config: ConnectConfig = serde_yaml_ng::from_str(
            "sql: {dialect: postgres, host: db, user: u, password: p, database: d}",
        )
        .unwrap();
        assert_eq!(config.sql.unwrap().port(), 5432);
    }
}
