// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Impala / Hive client construction
//!
//! The query engine runs on every DataNode, so any of them can serve a
//! session. A session is built in two steps: resolve the active NameNode
//! (the engine needs a WebHDFS handle for file-backed tables), then draw
//! DataNodes at random until one accepts a connection and answers
//! `list_databases`. A daemon that accepts the socket but cannot list
//! databases is treated as down.
//!
//! The HiveServer2 wire protocol is not implemented here. Callers plug in
//! a [`QueryConnector`] for the driver they use.

use crate::config::{HdfsConfig, QueryConfig, validate_query};
use crate::hdfs::get_url_active_namenode;
use crate::webhdfs::WebHdfsClient;
use crate::Result;
use arrow_array::RecordBatch;
use diagnostics::*;
use std::time::Duration;

/// Everything a driver needs to open one session on one host
pub struct ComputeTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub hdfs: &'a WebHdfsClient,
    pub user: &'a str,
    pub password: &'a str,
    pub auth_mechanism: &'a str,
    pub use_ssl: bool,
    pub timeout: Duration,
}

/// An open session on a query engine daemon
pub trait QuerySession {
    fn list_databases(&mut self) -> anyhow::Result<Vec<String>>;

    fn execute(&mut self, sql: &str) -> anyhow::Result<Vec<RecordBatch>>;

    fn exists_database(&mut self, name: &str) -> anyhow::Result<bool> {
        Ok(self.list_databases()?.iter().any(|db| db == name))
    }
}

/// Opens sessions for a particular driver
pub trait QueryConnector {
    type Session: QuerySession;

    /// Open a session. Must give up once `target.timeout` has elapsed.
    fn connect(&self, target: &ComputeTarget<'_>) -> anyhow::Result<Self::Session>;
}

/// A working session together with where it was opened
pub struct QueryClient<S> {
    host: String,
    hdfs: WebHdfsClient,
    session: S,
}

impl<S: QuerySession> QueryClient<S> {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn hdfs(&self) -> &WebHdfsClient {
        &self.hdfs
    }

    pub fn session(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn list_databases(&mut self) -> anyhow::Result<Vec<String>> {
        self.session.list_databases()
    }

    pub fn exists_database(&mut self, name: &str) -> anyhow::Result<bool> {
        self.session.exists_database(name)
    }

    pub fn execute(&mut self, sql: &str) -> anyhow::Result<Vec<RecordBatch>> {
        self.session.execute(sql)
    }

    pub fn into_session(self) -> S {
        self.session
    }
}

/// Query engine session on a random live DataNode, bound to the active NameNode
pub fn return_query_client<C: QueryConnector>(
    hdfs: &HdfsConfig,
    query: &QueryConfig,
    connector: &C,
) -> Result<QueryClient<C::Session>> {
    validate_query(query)?;

    let namenode = get_url_active_namenode(&hdfs.namenodes, hdfs.port, hdfs.timeout())?;
    let hdfs_client = WebHdfsClient::new(&namenode, Some(&query.user), hdfs.timeout())?;

    // This call owns the pool; failed hosts are dropped from it as we go
    let mut pool = query.datanodes.clone();
    let port = query.port();

    let (host, session) = failover::select_working_host(&mut pool, |host: &String| {
        let target = ComputeTarget {
            host,
            port,
            hdfs: &hdfs_client,
            user: &query.user,
            password: &query.password,
            auth_mechanism: &query.auth_mechanism,
            use_ssl: query.ssl,
            timeout: query.timeout(),
        };
        let mut session = connector.connect(&target)?;
        let databases = session.list_databases()?;
        let count = databases.len();
        debug!("Host {host} lists {count} databases", host, count);
        Ok::<_, anyhow::Error>((host.clone(), session))
    })?;

    Ok(QueryClient {
        host,
        hdfs: hdfs_client,
        session,
    })
}
