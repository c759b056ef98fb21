// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! HDFS client construction with NameNode high-availability failover
//!
//! With HA enabled two NameNodes run and only one of them is active at a
//! time; the standby answers every WebHDFS call with a StandbyException.
//! Before handing out a client we ask each configured NameNode for the
//! status of `/` and keep the first one that answers.

use crate::config::HdfsConfig;
use crate::webhdfs::{WebHdfsClient, namenode_url};
use crate::Result;
use diagnostics::*;
use std::time::Duration;

/// WebHDFS port used when connecting to a single host directly
pub const DEFAULT_WEBHDFS_PORT: u16 = 50070;

/// URL (with port) of the first NameNode that answers GETFILESTATUS on `/`
pub fn get_url_active_namenode(
    namenodes: &[String],
    port: Option<u16>,
    timeout: Duration,
) -> Result<String> {
    let candidates: Vec<String> = namenodes.iter().map(|n| namenode_url(n, port)).collect();

    let active = failover::find_active(&candidates, |url: &String| -> Result<()> {
        let probe = WebHdfsClient::new(url, None, timeout)?;
        probe.status("/").map(|_| ())
    })?;

    Ok(active.clone())
}

/// WebHDFS client on the active NameNode, acting as `config.user`
pub fn return_client_hdfs(config: &HdfsConfig) -> Result<WebHdfsClient> {
    let url = get_url_active_namenode(&config.namenodes, config.port, config.timeout())?;
    let user = config.user.clone().unwrap_or_default();
    info!("Connecting to HDFS at {url} as {user}", url, user);
    WebHdfsClient::new(&url, config.user.as_deref(), config.timeout())
}

/// WebHDFS client on a single known host, without failover
pub fn hdfs_connect(host: &str, user: &str) -> Result<WebHdfsClient> {
    let url = format!("http://{host}:{DEFAULT_WEBHDFS_PORT}");
    info!("Connecting to HDFS at {url} as {user}", url, user);
    WebHdfsClient::new(&url, Some(user), Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdfs_connect_uses_default_port() {
        let client = hdfs_connect("10.0.0.5", "analyst").unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:50070");
        assert_eq!(client.user(), Some("analyst"));
    }

    #[test]
    fn test_return_client_hdfs_without_namenodes() {
        let config = HdfsConfig {
            namenodes: vec![],
            port: Some(50070),
            user: None,
            timeout_ms: 100,
        };
        let err = return_client_hdfs(&config).err().unwrap();
        assert!(matches!(
            err,
            crate::ConnectError::Failover(failover::FailoverError::NoActiveEndpoint { .. })
        ));
    }
}
