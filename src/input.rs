/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::config::*;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use connector::RequestConfig;
use std::io::{self, Write};
use std::str::FromStr;

pub fn ask_for_input(prompt: &str) -> Result<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut inp = String::new();
    io::stdin()
        .read_line(&mut inp)
        .with_context(|| format!("Failed to read {}.", prompt))?;
    let inp = inp.trim().to_string();

    if inp.is_empty() {
        bail!("{} cannot be empty.", prompt);
    }

    Ok(inp)
}

/// Returns the given value or prompts for it until it parses.
pub fn value_or_ask<T>(
    value: Option<T>,
    prompt: &str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<T> {
    if let Some(value) = value {
        return Ok(value);
    }

    loop {
        match parse(&ask_for_input(prompt)?) {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("{}", e),
        }
    }
}

pub fn parse_text(s: &str) -> Result<String, String> {
    Ok(s.trim().to_string())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    connector::date::parse_date(s).map_err(|_| format!("`{}` is not a date (YYYY-MM-DD)", s))
}

pub fn parse_number<T: FromStr>(s: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))
}

pub fn get_request_config(
    config: &Config,
    server: Option<String>,
    token: Option<String>,
) -> Result<RequestConfig> {
    let server_url = match server.or_else(|| config.server.clone()) {
        Some(server_url) => server_url,
        None => bail!("Server URL not set. Use `roster config server <url>` to set it."),
    };

    let token = token.or_else(|| config.authtoken.clone());

    Ok(RequestConfig::new(server_url, token))
}
