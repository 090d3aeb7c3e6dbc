/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::wire::Reference;
use crate::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    #[serde(rename = "codigoProyecto")]
    pub id: EntityId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fechaInicio", with = "crate::date::midnight")]
    pub start_date: NaiveDate,
    /// `None` while the project is ongoing.
    #[serde(
        rename = "fechaTermino",
        with = "crate::date::midnight_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "registroActivo")]
    pub active: bool,
    #[serde(
        rename = "desarrolladores",
        deserialize_with = "crate::wire::ids",
        default
    )]
    pub assigned_developer_ids: Vec<EntityId>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fechaInicio", with = "crate::date::midnight")]
    pub start_date: NaiveDate,
    #[serde(
        rename = "fechaTermino",
        with = "crate::date::midnight_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "fechaInicio",
        with = "crate::date::midnight_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` marks the project as ongoing again.
    #[serde(
        rename = "fechaTermino",
        serialize_with = "crate::date::midnight_patch::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self == &ProjectPatch::default()
    }
}

fn check_dates(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

impl Validate for NewProject {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }

        check_dates(self.start_date, self.end_date)
    }
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ValidationError::NameRequired);
        }

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => check_dates(start, end),
            _ => Ok(()),
        }
    }
}

impl Resource for Project {
    type New = NewProject;
    type Patch = ProjectPatch;

    const COLLECTION: &'static str = endpoints::PROJECTS;
    const MESSAGES: Messages = Messages {
        list: "Error al obtener proyectos",
        get: "Error al obtener proyecto",
        create: "Error al crear proyecto",
        update: "Error al actualizar proyecto",
        delete: "Error al eliminar proyecto",
        reactivate: "Error al reactivar proyecto",
    };

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Ids of the developers currently assigned to the project, as the server
/// sees them.
pub async fn developers(config: &RequestConfig, project_id: EntityId) -> Result<Vec<EntityId>> {
    let refs: Vec<Reference> = fetch(
        config,
        &endpoints::project_developers(project_id),
        "Error al obtener desarrolladores del proyecto",
    )
    .await?;

    Ok(refs.iter().map(Reference::id).collect())
}

async fn change_assignment(
    config: &RequestConfig,
    project_id: EntityId,
    developer_id: EntityId,
    request_type: RequestType,
    message: &'static str,
) -> Result<()> {
    let res = send::<()>(
        config,
        &endpoints::assignment(project_id, developer_id),
        request_type,
        None,
    )
    .await?;

    let status = res.status();
    if status.is_success() {
        return Ok(());
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(
                project_id,
                developer_id,
                status = %status,
                error = %e,
                "failed to read assignment response body"
            );
            String::new()
        }
    };
    warn!(project_id, developer_id, status = %status, body = %body, "assignment rejected");

    Err(AssignmentError {
        message,
        status: status.as_u16(),
        body,
    }
    .into())
}

pub async fn assign_developer(
    config: &RequestConfig,
    project_id: EntityId,
    developer_id: EntityId,
) -> Result<()> {
    change_assignment(
        config,
        project_id,
        developer_id,
        RequestType::POST,
        "Error al asignar desarrollador",
    )
    .await
}

pub async fn unassign_developer(
    config: &RequestConfig,
    project_id: EntityId,
    developer_id: EntityId,
) -> Result<()> {
    change_assignment(
        config,
        project_id,
        developer_id,
        RequestType::DELETE,
        "Error al desasignar desarrollador del proyecto",
    )
    .await
}
