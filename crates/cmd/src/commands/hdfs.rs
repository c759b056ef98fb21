// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::Result;
use connect::{ConnectConfig, FileStatus, return_client_hdfs};

use super::section;

/// Format a byte count for listings
fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 * 1024 {
        format!("{:.1}G", size as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if size >= 1024 * 1024 {
        format!("{:.1}M", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}K", size as f64 / 1024.0)
    } else {
        format!("{}B", size)
    }
}

/// One `ls` line: type, permission, owner, size, name
fn format_status(status: &FileStatus) -> String {
    let kind = if status.is_dir() { 'd' } else { '-' };
    let name = if status.is_dir() {
        format!("{}/", status.path_suffix)
    } else {
        status.path_suffix.clone()
    };
    format!(
        "{}{:>4} {:<12} {:>8} {}",
        kind,
        status.permission,
        status.owner,
        format_file_size(status.length),
        name
    )
}

pub fn namenode_command(config: &ConnectConfig, out: &mut impl Write) -> Result<()> {
    let hdfs = section(&config.hdfs, "hdfs")?;
    let client = return_client_hdfs(hdfs)?;
    writeln!(out, "{}", client.base_url())?;
    Ok(())
}

pub fn ls_command(config: &ConnectConfig, path: &str, out: &mut impl Write) -> Result<()> {
    let hdfs = section(&config.hdfs, "hdfs")?;
    let client = return_client_hdfs(hdfs)?;

    let mut entries = client.list(path)?;
    entries.sort_by(|a, b| a.path_suffix.cmp(&b.path_suffix));

    for status in &entries {
        writeln!(out, "{}", format_status(status))?;
    }
    let count = entries.len();
    diagnostics::debug!("Listed {count} entries under {path}", count, path);
    Ok(())
}

pub fn cat_command(config: &ConnectConfig, path: &str, out: &mut impl Write) -> Result<()> {
    let hdfs = section(&config.hdfs, "hdfs")?;
    let client = return_client_hdfs(hdfs)?;
    let data = client.read(path)?;
    out.write_all(&data)?;
    Ok(())
}
