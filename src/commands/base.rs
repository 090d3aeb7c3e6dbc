/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::*;
use crate::config::*;
use crate::input::*;
use crate::store::JsonCache;
use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use connector::{EntityId, RequestConfig, Resource};
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "Roster",
    display_name = "Roster",
    bin_name = "roster",
    author = "Wavelens",
    version,
    about,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<MainCommands>,
    /// Server URL, overrides the configured one
    #[arg(long, global = true, env = "ROSTER_SERVER")]
    server: Option<String>,
    /// Bearer token, overrides the configured one
    #[arg(long, global = true, env = "ROSTER_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, value_enum)]
    generate_completions: Option<Shell>,
}

#[derive(Subcommand, Debug)]
enum MainCommands {
    Config {
        key: String,
        value: Option<String>,
    },
    Status,
    Developer {
        #[command(subcommand)]
        cmd: developer::Commands,
    },
    Project {
        #[command(subcommand)]
        cmd: project::Commands,
    },
}

/// Settings shared by every entity command.
pub struct Context {
    config: Config,
    server: Option<String>,
    token: Option<String>,
}

impl Context {
    fn load(server: Option<String>, token: Option<String>) -> Result<Self> {
        Ok(Self {
            config: Config::load().context("Failed to load configuration")?,
            server,
            token,
        })
    }

    pub fn request_config(&self) -> Result<RequestConfig> {
        get_request_config(&self.config, self.server.clone(), self.token.clone())
    }

    pub fn developer_cache(&self) -> Result<JsonCache> {
        Ok(JsonCache::new(self.config.developer_cache_file()?))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("warn,roster_cli={level},connector={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.generate_completions {
        let mut app = Cli::command();
        let bin_name = app.get_name().to_string();
        generate(shell, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match cmd {
        MainCommands::Config { key, value } => {
            set_get_value(&key, value, false)?;
        }

        MainCommands::Status => {
            let ctx = Context::load(cli.server, cli.token)?;
            connector::health(&ctx.request_config()?).await?;
            println!("Server Online.");
        }

        MainCommands::Developer { cmd } => {
            developer::handle(cmd, &Context::load(cli.server, cli.token)?).await?
        }

        MainCommands::Project { cmd } => {
            project::handle(cmd, &Context::load(cli.server, cli.token)?).await?
        }
    }

    Ok(())
}

/// Sets the active flag through the server. `None` flips the current state.
pub async fn change_status<R: Resource>(
    config: &RequestConfig,
    id: EntityId,
    active: Option<bool>,
) -> Result<R> {
    let active = match active {
        Some(active) => active,
        None => !connector::get_by_id::<R>(config, id).await?.is_active(),
    };

    let entity = if active {
        connector::reactivate::<R>(config, id).await?
    } else {
        connector::delete::<R>(config, id).await?
    };

    info!(id, active = entity.is_active(), "status changed");
    Ok(entity)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn format_status(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

/// Prints rows as left-aligned columns under a header.
pub fn print_table<const N: usize>(header: [&str; N], rows: &[[String; N]]) {
    let mut widths = header.map(|column| column.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(header.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}
