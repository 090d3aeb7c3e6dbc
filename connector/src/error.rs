/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use thiserror::Error;

/// Non-success status from an entity call. The message is fixed per
/// operation; the server body is not inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    pub message: &'static str,
    pub status: u16,
}

impl RequestError {
    pub fn new(message: &'static str, status: u16) -> Self {
        Self { message, status }
    }
}

/// Non-success status from assigning or unassigning a developer, carrying the
/// raw server text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}: {body}")]
pub struct AssignmentError {
    pub message: &'static str,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El nombre excede {max} caracteres")]
    NameTooLong { max: usize },
    #[error("El RUT excede {max} caracteres")]
    NationalIdTooLong { max: usize },
    #[error("El correo excede {max} caracteres")]
    EmailTooLong { max: usize },
    #[error("El nombre es obligatorio")]
    NameRequired,
    #[error("La fecha de término es anterior a la fecha de inicio")]
    EndBeforeStart,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "Token not set. Use `roster config authtoken <token>` or set ROSTER_TOKEN."
    )]
    MissingToken,
    #[error("Failed to reach server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
