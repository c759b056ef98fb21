// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "dlconnect")]
#[command(about = "Connect to datalake services described by a YAML configuration")]
struct Cli {
    /// Connection configuration file
    #[arg(short, long, global = true, default_value = "dlconnect.yaml")]
    config: PathBuf,

    /// Log level (off, error, warn, info, debug); overrides DLCONNECT_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL of the active NameNode
    Namenode,
    /// List an HDFS directory
    Ls {
        /// Absolute HDFS path
        path: String,
    },
    /// Print an HDFS file to stdout
    Cat {
        /// Absolute HDFS path
        path: String,
    },
    /// Show Elasticsearch cluster information
    SearchInfo,
    /// Run a query against the attached MySQL/PostgreSQL database
    Sql {
        /// Query text; tables live in the `remote` catalog
        query: String,
    },
    /// SharePoint document libraries and lists
    #[command(subcommand)]
    Sharepoint(SharePointCommands),
}

#[derive(Subcommand)]
enum SharePointCommands {
    /// List the files in a folder
    Files {
        /// Folder path relative to the site
        folder: String,
    },
    /// Download every file of a folder
    Download {
        /// Folder path relative to the site
        folder: String,
        /// Local destination directory
        dest: PathBuf,
    },
    /// Print list items as JSON lines
    Items {
        /// List title
        list: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_with_level(cli.log.as_deref());

    let config = connect::load_config(&cli.config)?;
    let config_path = cli.config.display().to_string();
    diagnostics::debug!("Loaded configuration {config_path}", config_path);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Namenode => commands::namenode_command(&config, &mut out)?,
        Commands::Ls { path } => commands::ls_command(&config, &path, &mut out)?,
        Commands::Cat { path } => commands::cat_command(&config, &path, &mut out)?,
        Commands::SearchInfo => commands::search_info_command(&config, &mut out)?,
        Commands::Sql { query } => commands::sql_command(&config, &query, &mut out)?,
        Commands::Sharepoint(sp) => match sp {
            SharePointCommands::Files { folder } => {
                commands::sharepoint_files_command(&config, &folder, &mut out)?
            }
            SharePointCommands::Download { folder, dest } => {
                commands::sharepoint_download_command(&config, &folder, &dest, &mut out)?
            }
            SharePointCommands::Items { list } => {
                commands::sharepoint_items_command(&config, &list, &mut out)?
            }
        },
    }

    out.flush()?;
    Ok(())
}
