/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::wire::Reference;
use crate::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 200;
pub const NATIONAL_ID_MAX_LEN: usize = 10;
pub const EMAIL_MAX_LEN: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    #[serde(rename = "codigoDesarrollador")]
    pub id: EntityId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "rut")]
    pub national_id: String,
    #[serde(rename = "correoElectronico")]
    pub email: String,
    #[serde(rename = "fechaContratacion", with = "crate::date::midnight")]
    pub hire_date: NaiveDate,
    #[serde(rename = "aniosExperiencia")]
    pub years_experience: u32,
    #[serde(rename = "registroActivo")]
    pub active: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewDeveloper {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "rut")]
    pub national_id: String,
    #[serde(rename = "correoElectronico")]
    pub email: String,
    #[serde(rename = "fechaContratacion", with = "crate::date::midnight")]
    pub hire_date: NaiveDate,
    #[serde(rename = "aniosExperiencia")]
    pub years_experience: u32,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DeveloperPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "rut", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(rename = "correoElectronico", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "fechaContratacion",
        with = "crate::date::midnight_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub hire_date: Option<NaiveDate>,
    #[serde(rename = "aniosExperiencia", skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
}

impl DeveloperPatch {
    pub fn is_empty(&self) -> bool {
        self == &DeveloperPatch::default()
    }
}

fn check_lengths(
    name: Option<&str>,
    national_id: Option<&str>,
    email: Option<&str>,
) -> Result<(), ValidationError> {
    let too_long = |value: Option<&str>, max: usize| {
        value.is_some_and(|value| value.chars().count() > max)
    };

    if too_long(name, NAME_MAX_LEN) {
        return Err(ValidationError::NameTooLong { max: NAME_MAX_LEN });
    }

    if too_long(national_id, NATIONAL_ID_MAX_LEN) {
        return Err(ValidationError::NationalIdTooLong {
            max: NATIONAL_ID_MAX_LEN,
        });
    }

    if too_long(email, EMAIL_MAX_LEN) {
        return Err(ValidationError::EmailTooLong { max: EMAIL_MAX_LEN });
    }

    Ok(())
}

impl Validate for NewDeveloper {
    fn validate(&self) -> Result<(), ValidationError> {
        check_lengths(
            Some(&self.name),
            Some(&self.national_id),
            Some(&self.email),
        )
    }
}

impl Validate for DeveloperPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        check_lengths(
            self.name.as_deref(),
            self.national_id.as_deref(),
            self.email.as_deref(),
        )
    }
}

impl Resource for Developer {
    type New = NewDeveloper;
    type Patch = DeveloperPatch;

    const COLLECTION: &'static str = endpoints::DEVELOPERS;
    const MESSAGES: Messages = Messages {
        list: "Error al obtener desarrolladores",
        get: "Error al obtener desarrollador",
        create: "Error al crear desarrollador",
        update: "Error al actualizar desarrollador",
        delete: "Error al eliminar desarrollador",
        reactivate: "Error al reactivar desarrollador",
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

/// Ids of the projects the developer is assigned to.
pub async fn projects(config: &RequestConfig, developer_id: EntityId) -> Result<Vec<EntityId>> {
    let refs: Vec<Reference> = fetch(
        config,
        &endpoints::developer_projects(developer_id),
        "Error al obtener proyectos del desarrollador",
    )
    .await?;

    Ok(refs.iter().map(Reference::id).collect())
}
