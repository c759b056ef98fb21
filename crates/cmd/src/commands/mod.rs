// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod hdfs;
pub mod search;
pub mod sharepoint;
pub mod sql;

pub use hdfs::{cat_command, ls_command, namenode_command};
pub use search::search_info_command;
pub use sharepoint::{sharepoint_download_command, sharepoint_files_command, sharepoint_items_command};
pub use sql::sql_command;

use anyhow::{Result, anyhow};

/// Require an optional configuration section
pub(crate) fn section<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| anyhow!("No `{}` section in configuration", name))
}
