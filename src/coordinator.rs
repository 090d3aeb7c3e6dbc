/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Developer assignments of a single project.
//!
//! The server owns the assignment set. Every successful change is followed by
//! a full re-fetch of the developer roster and the project's assigned ids, and
//! the view is only replaced once both have been read.

use async_trait::async_trait;
use connector::developers::Developer;
use connector::{EntityId, RequestConfig};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[async_trait]
pub trait AssignmentApi: Send + Sync {
    async fn list_developers(&self) -> connector::Result<Vec<Developer>>;

    async fn list_assigned(&self, project_id: EntityId) -> connector::Result<BTreeSet<EntityId>>;

    async fn assign(&self, project_id: EntityId, developer_id: EntityId) -> connector::Result<()>;

    async fn unassign(&self, project_id: EntityId, developer_id: EntityId)
    -> connector::Result<()>;
}

#[async_trait]
impl AssignmentApi for RequestConfig {
    async fn list_developers(&self) -> connector::Result<Vec<Developer>> {
        connector::list_all::<Developer>(self).await
    }

    async fn list_assigned(&self, project_id: EntityId) -> connector::Result<BTreeSet<EntityId>> {
        let ids = connector::projects::developers(self, project_id).await?;
        Ok(ids.into_iter().collect())
    }

    async fn assign(&self, project_id: EntityId, developer_id: EntityId) -> connector::Result<()> {
        connector::projects::assign_developer(self, project_id, developer_id).await
    }

    async fn unassign(
        &self,
        project_id: EntityId,
        developer_id: EntityId,
    ) -> connector::Result<()> {
        connector::projects::unassign_developer(self, project_id, developer_id).await
    }
}

pub struct AssignmentCoordinator<'a, A: ?Sized> {
    api: &'a A,
    project_id: EntityId,
    roster: Vec<Developer>,
    assigned_ids: BTreeSet<EntityId>,
}

impl<'a, A: AssignmentApi + ?Sized> AssignmentCoordinator<'a, A> {
    /// Starts with an empty view; call [`refresh`](Self::refresh) to load it.
    pub fn new(api: &'a A, project_id: EntityId) -> Self {
        Self {
            api,
            project_id,
            roster: Vec::new(),
            assigned_ids: BTreeSet::new(),
        }
    }

    /// Re-reads the roster and the assigned ids. On failure the previous view
    /// is kept.
    pub async fn refresh(&mut self) -> connector::Result<()> {
        let roster = self.api.list_developers().await?;
        let assigned_ids = self.api.list_assigned(self.project_id).await?;

        for id in &assigned_ids {
            if !roster.iter().any(|developer| developer.id == *id) {
                warn!(
                    project_id = self.project_id,
                    developer_id = id,
                    "assigned developer is not in the roster"
                );
            }
        }

        self.roster = roster;
        self.assigned_ids = assigned_ids;
        Ok(())
    }

    /// Assigned developers in roster order.
    pub fn assigned(&self) -> Vec<&Developer> {
        self.roster
            .iter()
            .filter(|developer| self.assigned_ids.contains(&developer.id))
            .collect()
    }

    /// Developers that can still be picked for the project.
    pub fn assignable(&self) -> Vec<&Developer> {
        self.roster
            .iter()
            .filter(|developer| !self.assigned_ids.contains(&developer.id))
            .collect()
    }

    pub async fn assign(&mut self, developer_id: EntityId) -> connector::Result<()> {
        self.api.assign(self.project_id, developer_id).await?;
        info!(project_id = self.project_id, developer_id, "developer assigned");
        self.refresh().await
    }

    pub async fn unassign(&mut self, developer_id: EntityId) -> connector::Result<()> {
        self.api.unassign(self.project_id, developer_id).await?;
        info!(project_id = self.project_id, developer_id, "developer unassigned");
        self.refresh().await
    }
}
