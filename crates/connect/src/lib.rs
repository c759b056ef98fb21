// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Connection helpers for a Hadoop-based datalake
//!
//! Builds clients for the services a datalake job usually needs:
//!
//! - **HDFS** over WebHDFS, on whichever NameNode of an HA pair is active
//! - **Impala / Hive** sessions on a random live DataNode
//! - **MySQL / PostgreSQL** attached to an in-memory DuckDB
//! - **Elasticsearch** over its REST API
//! - **SharePoint** document libraries and lists
//!
//! Every helper takes its parameters explicitly, typically one section of
//! [`ConnectConfig`].
//!
//! # Usage
//!
//! ```no_run
//! # fn example() -> connect::Result<()> {
//! use connect::{HdfsConfig, return_client_hdfs};
//!
//! let config = HdfsConfig {
//!     namenodes: vec!["http://nn1".into(), "http://nn2".into()],
//!     port: Some(50070),
//!     user: Some("analyst".into()),
//!     timeout_ms: 5000,
//! };
//! let hdfs = return_client_hdfs(&config)?;
//! for status in hdfs.list("/user/analyst")? {
//!     println!("{}", status.path_suffix);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod hdfs;
pub mod query;
pub mod search;
pub mod sharepoint;
pub mod sql;
pub mod webhdfs;

pub use config::{
    ConnectConfig, HdfsConfig, QueryConfig, QueryEngineKind, SearchConfig, SharePointConfig,
    SqlConfig, SqlDialect, load_config, validate_config,
};
pub use error::ConnectError;
pub use hdfs::{get_url_active_namenode, hdfs_connect, return_client_hdfs};
pub use query::{ComputeTarget, QueryClient, QueryConnector, QuerySession, return_query_client};
pub use search::SearchClient;
pub use sharepoint::{FileEntry, ListItems, ListPage, SharePointClient};
pub use sql::{SqlConnection, SqlTarget, connect_sql};
pub use webhdfs::{FileStatus, FileType, WebHdfsClient};

/// Result type for connection helpers
pub type Result<T> = std::result::Result<T, ConnectError>;
