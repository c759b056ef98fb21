// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use connect::{ConnectConfig, FileEntry, ListPage, SharePointClient};

use super::section;

fn client(config: &ConnectConfig) -> Result<SharePointClient> {
    let sharepoint = section(&config.sharepoint, "sharepoint")?;
    Ok(SharePointClient::new(sharepoint)?)
}

fn format_entry(entry: &FileEntry) -> String {
    format!(
        "{:>10}  {}  {}",
        entry.length, entry.time_last_modified, entry.name
    )
}

/// Each row as one line of JSON, metadata keys included
fn write_page(page: &ListPage, out: &mut impl Write) -> Result<()> {
    for row in &page.rows {
        serde_json::to_writer(&mut *out, row)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn sharepoint_files_command(
    config: &ConnectConfig,
    folder: &str,
    out: &mut impl Write,
) -> Result<()> {
    let client = client(config)?;
    for entry in client.list_files(folder)? {
        writeln!(out, "{}", format_entry(&entry))?;
    }
    Ok(())
}

pub fn sharepoint_download_command(
    config: &ConnectConfig,
    folder: &str,
    dest: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let client = client(config)?;
    for path in client.download_folder(folder, dest)? {
        writeln!(out, "{}", path.display())?;
    }
    Ok(())
}

pub fn sharepoint_items_command(
    config: &ConnectConfig,
    list: &str,
    out: &mut impl Write,
) -> Result<()> {
    let client = client(config)?;
    let mut pages = 0usize;
    for page in client.list_items(list)? {
        write_page(&page?, out)?;
        pages += 1;
    }
    diagnostics::debug!("Read {pages} pages from list {list}", pages, list);
    Ok(())
}
