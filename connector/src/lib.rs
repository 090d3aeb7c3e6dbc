/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Typed client for the developer / project REST API.
//!
//! Both entity collections share the same request shape, so the CRUD calls
//! are generic over [`Resource`]; [`developers`] and [`projects`] provide the
//! record types and the relationship endpoints.

pub mod date;
pub mod developers;
pub mod endpoints;
pub mod error;
pub mod projects;
mod wire;

pub use error::{AssignmentError, Error, RequestError, ValidationError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type RequestType = reqwest::Method;
pub type EntityId = i64;

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub server_url: String,
    pub token: Option<String>,
    client: reqwest::Client,
}

impl RequestConfig {
    pub fn new(server_url: impl Into<String>, token: Option<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        let token = token.filter(|token| !token.is_empty());

        Self {
            server_url,
            token,
            client: reqwest::Client::new(),
        }
    }
}

/// Fixed failure messages for the six CRUD calls of one entity.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub list: &'static str,
    pub get: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub reactivate: &'static str,
}

/// Local checks run before a payload leaves the client.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// An entity collection exposed by the API with server-assigned ids and a
/// soft-delete flag.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync {
    /// Create payload, without id and active flag.
    type New: Serialize + Validate + Sync;
    /// Partial update payload; unset fields are left out of the body.
    type Patch: Serialize + Validate + Sync;

    const COLLECTION: &'static str;
    const MESSAGES: Messages;

    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
}

fn get_client(
    config: &RequestConfig,
    endpoint: &str,
    request_type: RequestType,
    login: bool,
) -> Result<reqwest::RequestBuilder> {
    let mut client = config
        .client
        .request(request_type, format!("{}{}", config.server_url, endpoint))
        .header("Content-Type", "application/json");

    match &config.token {
        Some(token) => client = client.header("Authorization", format!("Bearer {}", token)),
        None if login => return Err(Error::MissingToken),
        None => {}
    }

    Ok(client)
}

async fn send<B: Serialize + ?Sized>(
    config: &RequestConfig,
    endpoint: &str,
    request_type: RequestType,
    body: Option<&B>,
) -> Result<reqwest::Response> {
    debug!(method = %request_type, endpoint, "sending request");

    let mut client = get_client(config, endpoint, request_type, true)?;
    if let Some(body) = body {
        client = client.json(body);
    }

    let res = client.send().await?;
    debug!(status = %res.status(), endpoint, "received response");
    Ok(res)
}

fn check_status(res: reqwest::Response, message: &'static str) -> Result<reqwest::Response> {
    let status = res.status();

    if status.is_success() {
        Ok(res)
    } else {
        Err(RequestError::new(message, status.as_u16()).into())
    }
}

async fn parse_response<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
    let url = res.url().to_string();
    let bytes = res.bytes().await?;

    serde_json::from_slice(&bytes).map_err(|source| Error::Decode { url, source })
}

async fn fetch<R: DeserializeOwned>(
    config: &RequestConfig,
    endpoint: &str,
    message: &'static str,
) -> Result<R> {
    let res = send::<()>(config, endpoint, RequestType::GET, None).await?;
    parse_response(check_status(res, message)?).await
}

pub async fn list_all<R: Resource>(config: &RequestConfig) -> Result<Vec<R>> {
    fetch(config, R::COLLECTION, R::MESSAGES.list).await
}

pub async fn get_by_id<R: Resource>(config: &RequestConfig, id: EntityId) -> Result<R> {
    fetch(config, &endpoints::by_id(R::COLLECTION, id), R::MESSAGES.get).await
}

pub async fn create<R: Resource>(config: &RequestConfig, payload: &R::New) -> Result<R> {
    payload.validate()?;

    let res = send(config, R::COLLECTION, RequestType::POST, Some(payload)).await?;
    parse_response(check_status(res, R::MESSAGES.create)?).await
}

pub async fn update<R: Resource>(
    config: &RequestConfig,
    id: EntityId,
    patch: &R::Patch,
) -> Result<R> {
    patch.validate()?;

    let res = send(
        config,
        &endpoints::by_id(R::COLLECTION, id),
        RequestType::PUT,
        Some(patch),
    )
    .await?;
    parse_response(check_status(res, R::MESSAGES.update)?).await
}

pub async fn delete<R: Resource>(config: &RequestConfig, id: EntityId) -> Result<R> {
    let res = send::<()>(
        config,
        &endpoints::by_id(R::COLLECTION, id),
        RequestType::DELETE,
        None,
    )
    .await?;
    parse_response(check_status(res, R::MESSAGES.delete)?).await
}

pub async fn reactivate<R: Resource>(config: &RequestConfig, id: EntityId) -> Result<R> {
    let res = send::<()>(
        config,
        &endpoints::reactivate(R::COLLECTION, id),
        RequestType::PUT,
        None,
    )
    .await?;
    parse_response(check_status(res, R::MESSAGES.reactivate)?).await
}

pub async fn health(config: &RequestConfig) -> Result<()> {
    let res = get_client(config, endpoints::TEST_CONNECTION, RequestType::GET, false)?
        .send()
        .await?;

    check_status(res, "Error al conectar con el servidor")?;
    Ok(())
}
