// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use connect::{ConnectConfig, connect_sql};

use super::section;

fn write_batches(batches: &[RecordBatch], out: &mut impl Write) -> Result<usize> {
    let rows = batches.iter().map(|b| b.num_rows()).sum();
    if rows > 0 {
        writeln!(out, "{}", pretty_format_batches(batches)?)?;
    }
    Ok(rows)
}

pub fn sql_command(config: &ConnectConfig, query: &str, out: &mut impl Write) -> Result<()> {
    let sql = section(&config.sql, "sql")?;
    let conn = connect_sql(sql)?;
    let batches = conn.query(query)?;
    let rows = write_batches(&batches, out)?;
    writeln!(out, "({} rows)", rows)?;
    Ok(())
}
