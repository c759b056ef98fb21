// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::Result;
use connect::search::ClusterInfo;
use connect::{ConnectConfig, SearchClient};

use super::section;

fn format_info(info: &ClusterInfo) -> String {
    format!(
        "cluster: {}\nnode:    {}\nversion: {}",
        info.cluster_name, info.name, info.version.number
    )
}

pub fn search_info_command(config: &ConnectConfig, out: &mut impl Write) -> Result<()> {
    let search = section(&config.search, "search")?;
    let client = SearchClient::new(search)?;
    let info = client.info()?;
    writeln!(out, "{}", format_info(&info))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect::search::ClusterVersion;

    #[test]
    fn test_format_info() {
        let info = ClusterInfo {
            name: "node-1".to_string(),
            cluster_name: "datalake".to_string(),
            version: ClusterVersion {
                number: "7.17.9".to_string(),
            },
        };
        let text = format_info(&info);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("cluster: datalake"));
        assert!(text.contains("version: 7.17.9"));
    }
}
