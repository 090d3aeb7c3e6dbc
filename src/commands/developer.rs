/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::base::*;
use crate::filter::{self, DeveloperFilter, StatusFilter};
use crate::input::*;
use crate::store::{EntityStore, JsonCache, StoreError};
use anyhow::{Context as _, Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use connector::developers::{self, Developer, DeveloperPatch, NewDeveloper};
use connector::projects::Project;
use connector::{EntityId, Resource};
use tracing::{debug, info};

#[derive(Subcommand, Debug)]
pub enum Commands {
    List {
        #[arg(short, long)]
        status: Option<StatusFilter>,
        #[arg(short, long)]
        min_experience: Option<u32>,
        #[arg(short, long)]
        name: Option<String>,
        /// Fetch from the server even when a cached list exists
        #[arg(short, long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },
    Show {
        id: EntityId,
    },
    /// Projects the developer is assigned to
    Projects {
        id: EntityId,
    },
    Create {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 'r', long = "rut")]
        national_id: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short = 'd', long, value_parser = parse_date)]
        hire_date: Option<NaiveDate>,
        #[arg(short = 'y', long = "years")]
        years_experience: Option<u32>,
    },
    Edit {
        id: EntityId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 'r', long = "rut")]
        national_id: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short = 'd', long, value_parser = parse_date)]
        hire_date: Option<NaiveDate>,
        #[arg(short = 'y', long = "years")]
        years_experience: Option<u32>,
    },
    Toggle {
        id: EntityId,
    },
    Deactivate {
        id: EntityId,
    },
    Reactivate {
        id: EntityId,
    },
    Delete {
        id: EntityId,
    },
}

pub async fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::List {
            status,
            min_experience,
            name,
            refresh,
            json,
        } => {
            let store = load_developers(ctx.developer_cache()?, refresh, move || async move {
                let config = ctx.request_config()?;
                Ok::<_, anyhow::Error>(connector::list_all::<Developer>(&config).await?)
            })
            .await?;

            let filter = DeveloperFilter {
                status: status.unwrap_or_default(),
                min_experience,
                name,
            };
            let shown = filter::project(store.entities(), &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else if shown.is_empty() {
                println!("No developers found.");
            } else {
                print_table(
                    ["ID", "NAME", "RUT", "EMAIL", "HIRED", "YEARS", "STATUS"],
                    &rows(&shown),
                );
            }
        }

        Commands::Show { id } => {
            let developer = connector::get_by_id::<Developer>(&ctx.request_config()?, id).await?;
            update_cache(ctx.developer_cache()?, |store| {
                if store.get(id).is_some_and(|cached| cached != &developer) {
                    store.replace(developer.clone())?;
                }
                Ok(())
            })?;

            println!("===== Developer =====");
            println!("ID: {}", developer.id);
            println!("Name: {}", developer.name);
            println!("RUT: {}", developer.national_id);
            println!("Email: {}", developer.email);
            println!("Hire Date: {}", format_date(developer.hire_date));
            println!("Years of Experience: {}", developer.years_experience);
            println!("Status: {}", format_status(developer.active));
        }

        Commands::Projects { id } => {
            let config = ctx.request_config()?;
            let project_ids = developers::projects(&config, id).await?;

            if project_ids.is_empty() {
                println!("Developer {} has no projects.", id);
                return Ok(());
            }

            let projects = connector::list_all::<Project>(&config).await?;
            for project_id in project_ids {
                match projects.iter().find(|project| project.id == project_id) {
                    Some(project) => println!("{}: {}", project.id, project.name),
                    None => println!("{}", project_id),
                }
            }
        }

        Commands::Create {
            name,
            national_id,
            email,
            hire_date,
            years_experience,
        } => {
            let config = ctx.request_config()?;

            let payload = NewDeveloper {
                name: value_or_ask(name, "Name", parse_text)?,
                national_id: value_or_ask(national_id, "RUT", parse_text)?,
                email: value_or_ask(email, "Email", parse_text)?,
                hire_date: value_or_ask(hire_date, "Hire Date (YYYY-MM-DD)", parse_date)?,
                years_experience: value_or_ask(
                    years_experience,
                    "Years of Experience",
                    parse_number,
                )?,
            };

            let developer = connector::create::<Developer>(&config, &payload).await?;
            info!(id = developer.id, "developer created");

            update_cache(ctx.developer_cache()?, |store| {
                store.insert_front(developer.clone())
            })?;
            println!("Developer created with ID {}.", developer.id);
        }

        Commands::Edit {
            id,
            name,
            national_id,
            email,
            hire_date,
            years_experience,
        } => {
            let patch = DeveloperPatch {
                name,
                national_id,
                email,
                hire_date,
                years_experience,
            };

            if patch.is_empty() {
                bail!("Nothing to change. Pass at least one field to edit.");
            }

            let developer =
                connector::update::<Developer>(&ctx.request_config()?, id, &patch).await?;
            info!(id, "developer updated");

            update_cache(ctx.developer_cache()?, |store| {
                fold_server_state(store, developer.clone())
            })?;
            println!("Developer {} updated.", developer.id);
        }

        Commands::Toggle { id } => set_status(ctx, id, None).await?,

        Commands::Deactivate { id } => set_status(ctx, id, Some(false)).await?,

        Commands::Reactivate { id } => set_status(ctx, id, Some(true)).await?,

        Commands::Delete { id } => {
            let developer = connector::delete::<Developer>(&ctx.request_config()?, id).await?;
            info!(id, active = developer.active, "developer deleted");

            let active = developer.active;
            update_cache(ctx.developer_cache()?, |store| {
                fold_server_state(store, developer)
            })?;

            if active {
                println!("Developer {} deleted.", id);
            } else {
                println!("Developer {} deleted; the server keeps it as inactive.", id);
            }
        }
    }

    Ok(())
}

async fn set_status(ctx: &Context, id: EntityId, active: Option<bool>) -> Result<()> {
    let developer = change_status::<Developer>(&ctx.request_config()?, id, active).await?;

    update_cache(ctx.developer_cache()?, |store| {
        fold_server_state(store, developer.clone())
    })?;
    println!(
        "Developer {} is now {}.",
        developer.name(),
        format_status(developer.is_active())
    );

    Ok(())
}

/// The developer list, served from the cache unless `refresh` is set or
/// nothing has been cached yet. A failed fetch leaves the cache untouched.
async fn load_developers<F, Fut>(
    cache: JsonCache,
    refresh: bool,
    fetch: F,
) -> Result<EntityStore<Developer>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Developer>>>,
{
    let mut store = EntityStore::<Developer>::open(cache)?;

    if refresh || !store.is_cached() {
        let developers = fetch().await?;
        debug!(count = developers.len(), "fetched developers");
        store
            .load(developers)
            .context("Failed to update developer cache")?;
    }

    Ok(store)
}

/// Folds a confirmed server change into the cached list. Without a cache the
/// next `list` fetches from the server anyway.
fn update_cache(
    cache: JsonCache,
    apply: impl FnOnce(&mut EntityStore<Developer>) -> Result<(), StoreError>,
) -> Result<()> {
    let mut store = EntityStore::<Developer>::open(cache)?;

    if store.is_cached() {
        apply(&mut store).context("Failed to update developer cache")?;
    }

    Ok(())
}

/// The cached entry takes the record as the server returned it. Deletes are
/// soft on the server, so the entry stays and turns inactive.
fn fold_server_state(
    store: &mut EntityStore<Developer>,
    developer: Developer,
) -> Result<(), StoreError> {
    store.replace(developer).map(|_| ())
}

fn rows(developers: &[&Developer]) -> Vec<[String; 7]> {
    developers
        .iter()
        .map(|developer| {
            [
                developer.id.to_string(),
                developer.name.clone(),
                developer.national_id.clone(),
                developer.email.clone(),
                format_date(developer.hire_date),
                developer.years_experience.to_string(),
                format_status(developer.active).to_string(),
            ]
        })
        .collect()
}
