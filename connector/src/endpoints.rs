/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::EntityId;

pub const TEST_CONNECTION: &str = "/api/test-connection";
pub const DEVELOPERS: &str = "/api/desarrolladores";
pub const PROJECTS: &str = "/api/proyectos";

pub fn by_id(collection: &str, id: EntityId) -> String {
    format!("{}/{}", collection, id)
}

pub fn reactivate(collection: &str, id: EntityId) -> String {
    format!("{}/{}/reactivar", collection, id)
}

pub fn developer_projects(developer_id: EntityId) -> String {
    format!("{}/{}/proyectos", DEVELOPERS, developer_id)
}

pub fn project_developers(project_id: EntityId) -> String {
    format!("{}/{}/desarrolladores", PROJECTS, project_id)
}

/// Same path for assigning (POST) and unassigning (DELETE).
pub fn assignment(project_id: EntityId, developer_id: EntityId) -> String {
    format!("{}/{}/desarrolladores/{}", PROJECTS, project_id, developer_id)
}
