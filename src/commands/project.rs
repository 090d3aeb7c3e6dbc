/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::base::*;
use crate::coordinator::AssignmentCoordinator;
use crate::filter::{self, ProjectFilter, StatusFilter};
use crate::input::*;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use connector::developers::Developer;
use connector::projects::{NewProject, Project, ProjectPatch};
use connector::{EntityId, RequestConfig, Resource};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Commands {
    List {
        #[arg(short, long)]
        status: Option<StatusFilter>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Project details and its assigned developers
    Show {
        id: EntityId,
    },
    Create {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 's', long, value_parser = parse_date)]
        start_date: Option<NaiveDate>,
        #[arg(short = 'e', long, value_parser = parse_date)]
        end_date: Option<NaiveDate>,
    },
    Edit {
        id: EntityId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 's', long, value_parser = parse_date)]
        start_date: Option<NaiveDate>,
        #[arg(short = 'e', long, value_parser = parse_date, conflicts_with = "ongoing")]
        end_date: Option<NaiveDate>,
        /// Clear the end date
        #[arg(long)]
        ongoing: bool,
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
    /// Assign a developer; asks for one when no id is given
    Assign {
        id: EntityId,
        developer: Option<EntityId>,
    },
    Unassign {
        id: EntityId,
        developer: EntityId,
    },
}

pub async fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::List { status, name, json } => {
            let projects = connector::list_all::<Project>(&ctx.request_config()?).await?;

            let filter = ProjectFilter {
                status: status.unwrap_or_default(),
                name,
            };
            let shown = filter::project(&projects, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else if shown.is_empty() {
                println!("No projects found.");
            } else {
                print_table(["ID", "NAME", "START", "END", "STATUS"], &rows(&shown));
            }
        }

        Commands::Show { id } => {
            let config = ctx.request_config()?;
            let project = connector::get_by_id::<Project>(&config, id).await?;

            println!("===== Project =====");
            println!("ID: {}", project.id);
            println!("Name: {}", project.name);
            println!("Start Date: {}", format_date(project.start_date));
            println!("End Date: {}", format_end_date(project.end_date));
            println!("Status: {}", format_status(project.active));
            println!();

            let mut coordinator = AssignmentCoordinator::new(&config, id);
            coordinator.refresh().await?;
            print_assigned(&coordinator.assigned());
        }

        Commands::Create {
            name,
            start_date,
            end_date,
        } => {
            let config = ctx.request_config()?;

            let payload = NewProject {
                name: value_or_ask(name, "Name", parse_text)?,
                start_date: value_or_ask(start_date, "Start Date (YYYY-MM-DD)", parse_date)?,
                end_date,
            };

            let project = connector::create::<Project>(&config, &payload).await?;
            info!(id = project.id, "project created");
            println!("Project created with ID {}.", project.id);
        }

        Commands::Edit {
            id,
            name,
            start_date,
            end_date,
            ongoing,
        } => {
            let patch = ProjectPatch {
                name,
                start_date,
                end_date: if ongoing { Some(None) } else { end_date.map(Some) },
            };

            if patch.is_empty() {
                bail!("Nothing to change. Pass at least one field to edit.");
            }

            let project = connector::update::<Project>(&ctx.request_config()?, id, &patch).await?;
            info!(id, "project updated");
            println!("Project {} updated.", project.id);
        }

        Commands::Toggle { id } => set_status(&ctx.request_config()?, id, None).await?,

        Commands::Deactivate { id } => set_status(&ctx.request_config()?, id, Some(false)).await?,

        Commands::Reactivate { id } => set_status(&ctx.request_config()?, id, Some(true)).await?,

        Commands::Delete { id } => {
            connector::delete::<Project>(&ctx.request_config()?, id).await?;
            info!(id, "project deleted");
            println!("Project {} deleted.", id);
        }

        Commands::Assign { id, developer } => {
            let config = ctx.request_config()?;
            let mut coordinator = AssignmentCoordinator::new(&config, id);

            let developer = match developer {
                Some(developer) => developer,
                None => {
                    coordinator.refresh().await?;
                    let assignable = coordinator.assignable();

                    if assignable.is_empty() {
                        println!("Every developer is already assigned to project {}.", id);
                        return Ok(());
                    }

                    for developer in assignable {
                        println!("{}: {}", developer.id, developer.name);
                    }

                    value_or_ask(None, "Developer ID", parse_number)?
                }
            };

            coordinator.assign(developer).await?;
            println!("Developer {} assigned to project {}.", developer, id);
            print_assigned(&coordinator.assigned());
        }

        Commands::Unassign { id, developer } => {
            let config = ctx.request_config()?;
            let mut coordinator = AssignmentCoordinator::new(&config, id);

            coordinator.unassign(developer).await?;
            println!("Developer {} unassigned from project {}.", developer, id);
            print_assigned(&coordinator.assigned());
        }
    }

    Ok(())
}

async fn set_status(config: &RequestConfig, id: EntityId, active: Option<bool>) -> Result<()> {
    let project = change_status::<Project>(config, id, active).await?;
    println!(
        "Project {} is now {}.",
        project.name(),
        format_status(project.is_active())
    );

    Ok(())
}

fn print_assigned(developers: &[&Developer]) {
    if developers.is_empty() {
        println!("No developers assigned.");
        return;
    }

    println!("===== Developers =====");
    for developer in developers {
        println!("{}: {} <{}>", developer.id, developer.name, developer.email);
    }
}

fn format_end_date(end_date: Option<NaiveDate>) -> String {
    end_date.map_or_else(|| "ongoing".to_string(), format_date)
}

fn rows(projects: &[&Project]) -> Vec<[String; 5]> {
    projects
        .iter()
        .map(|project| {
            [
                project.id.to_string(),
                project.name.clone(),
                format_date(project.start_date),
                format_end_date(project.end_date),
                format_status(project.active).to_string(),
            ]
        })
        .collect()
}
