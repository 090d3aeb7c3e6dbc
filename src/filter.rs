/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! List projections. Filters never touch the entities they are applied to.

use connector::Resource;
use connector::developers::Developer;
use connector::projects::Project;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Unset,
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(self, active: bool) -> bool {
        match self {
            StatusFilter::Unset | StatusFilter::All => true,
            StatusFilter::Active => active,
            StatusFilter::Inactive => !active,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(StatusFilter::Unset),
            "all" | "todos" => Ok(StatusFilter::All),
            "active" | "activo" => Ok(StatusFilter::Active),
            "inactive" | "inactivo" => Ok(StatusFilter::Inactive),
            other => Err(format!(
                "`{}` is not a status (all, active, inactive)",
                other
            )),
        }
    }
}

/// A set of predicates over one entity type; unset predicates always pass.
pub trait Predicate<R> {
    fn matches(&self, entity: &R) -> bool;
}

fn name_matches(name: &str, query: Option<&str>) -> bool {
    match query.filter(|query| !query.is_empty()) {
        Some(query) => name.to_lowercase().contains(&query.to_lowercase()),
        None => true,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeveloperFilter {
    pub status: StatusFilter,
    pub min_experience: Option<u32>,
    pub name: Option<String>,
}

impl Predicate<Developer> for DeveloperFilter {
    fn matches(&self, developer: &Developer) -> bool {
        self.status.matches(developer.is_active())
            && self
                .min_experience
                .is_none_or(|min| developer.years_experience >= min)
            && name_matches(&developer.name, self.name.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: StatusFilter,
    pub name: Option<String>,
}

impl Predicate<Project> for ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        self.status.matches(project.is_active())
            && name_matches(&project.name, self.name.as_deref())
    }
}

/// The entities passing every predicate, in input order.
pub fn project<'a, R, P: Predicate<R>>(entities: &'a [R], filter: &P) -> Vec<&'a R> {
    entities
        .iter()
        .filter(|entity| filter.matches(entity))
        .collect()
}
