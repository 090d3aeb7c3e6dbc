/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::EntityId;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(EntityId),
    Text(String),
}

/// Entity id sent either as a JSON number or as a numeric string.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawId")]
pub(crate) struct WireId(pub EntityId);

impl TryFrom<RawId> for WireId {
    type Error = String;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        match raw {
            RawId::Number(id) => Ok(WireId(id)),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map(WireId)
                .map_err(|_| format!("`{}` is not a valid id", text)),
        }
    }
}

/// Entry of a relationship listing: a bare id or the related record.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum Reference {
    Id(WireId),
    Developer {
        #[serde(rename = "codigoDesarrollador")]
        id: WireId,
    },
    Project {
        #[serde(rename = "codigoProyecto")]
        id: WireId,
    },
}

impl Reference {
    pub fn id(&self) -> EntityId {
        match self {
            Reference::Id(id) | Reference::Developer { id } | Reference::Project { id } => id.0,
        }
    }
}

/// Id list where `null` or a missing field means empty.
pub(crate) fn ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<EntityId>, D::Error> {
    let refs = Option::<Vec<Reference>>::deserialize(deserializer)?;
    Ok(refs.unwrap_or_default().iter().map(Reference::id).collect())
}
