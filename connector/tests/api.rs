/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use connector::developers::{Developer, DeveloperPatch, NewDeveloper};
use connector::projects::{NewProject, Project};
use connector::*;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

const TOKEN: &str = "test-token";

#[derive(Debug, Clone, Copy)]
enum Kind {
    Developers,
    Projects,
}

impl Kind {
    fn id_key(self) -> &'static str {
        match self {
            Kind::Developers => "codigoDesarrollador",
            Kind::Projects => "codigoProyecto",
        }
    }
}

#[derive(Default)]
struct FakeServer {
    developers: Vec<Value>,
    projects: Vec<Value>,
    assignments: BTreeSet<(i64, i64)>,
    next_id: i64,
    fail_lists: bool,
    last_body: Option<Value>,
    requests: usize,
}

impl FakeServer {
    fn records(&mut self, kind: Kind) -> &mut Vec<Value> {
        match kind {
            Kind::Developers => &mut self.developers,
            Kind::Projects => &mut self.projects,
        }
    }

    fn find(&mut self, kind: Kind, id: i64) -> Option<&mut Value> {
        self.records(kind)
            .iter_mut()
            .find(|record| record[kind.id_key()] == id)
    }

    fn exists(&mut self, kind: Kind, id: i64) -> bool {
        self.find(kind, id).is_some()
    }
}

type Shared = Arc<Mutex<FakeServer>>;

async fn require_token(State(state): State<Shared>, req: Request, next: Next) -> Response {
    state.lock().unwrap().requests += 1;

    let expected = format!("Bearer {}", TOKEN);
    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    }

    next.run(req).await
}

fn fake_list(state: &Shared, kind: Kind) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_lists {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    Json(state.records(kind).clone()).into_response()
}

fn fake_create(state: &Shared, kind: Kind, body: Value) -> Response {
    let mut state = state.lock().unwrap();
    state.last_body = Some(body.clone());
    state.next_id += 1;

    let mut record = body;
    record[kind.id_key()] = json!(state.next_id);
    record["registroActivo"] = json!(true);
    state.records(kind).push(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

fn with_record(state: &Shared, kind: Kind, id: i64, f: impl FnOnce(&mut Value)) -> Response {
    let mut state = state.lock().unwrap();

    match state.find(kind, id) {
        Some(record) => {
            f(record);
            Json(record.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no existe").into_response(),
    }
}

fn fake_update(state: &Shared, kind: Kind, id: i64, patch: Value) -> Response {
    state.lock().unwrap().last_body = Some(patch.clone());

    with_record(state, kind, id, |record| {
        if let (Some(record), Some(patch)) = (record.as_object_mut(), patch.as_object()) {
            for (key, value) in patch {
                record.insert(key.clone(), value.clone());
            }
        }
    })
}

fn collection(base: &str, kind: Kind) -> Router<Shared> {
    Router::new()
        .route(
            base,
            get(move |State(state): State<Shared>| async move { fake_list(&state, kind) }).post(
                move |State(state): State<Shared>, Json(body): Json<Value>| async move {
                    fake_create(&state, kind, body)
                },
            ),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(
                move |State(state): State<Shared>, Path(id): Path<i64>| async move {
                    with_record(&state, kind, id, |_| {})
                },
            )
            .put(
                move |State(state): State<Shared>,
                      Path(id): Path<i64>,
                      Json(patch): Json<Value>| async move {
                    fake_update(&state, kind, id, patch)
                },
            )
            .delete(
                move |State(state): State<Shared>, Path(id): Path<i64>| async move {
                    with_record(&state, kind, id, |record| {
                        record["registroActivo"] = json!(false)
                    })
                },
            ),
        )
        .route(
            &format!("{}/{{id}}/reactivar", base),
            put(
                move |State(state): State<Shared>, Path(id): Path<i64>| async move {
                    with_record(&state, kind, id, |record| {
                        record["registroActivo"] = json!(true)
                    })
                },
            ),
        )
}

async fn project_developers(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    let ids: Vec<i64> = state
        .assignments
        .iter()
        .filter(|(project, _)| *project == id)
        .map(|(_, developer)| *developer)
        .collect();

    Json(ids).into_response()
}

async fn developer_projects(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    let projects: Vec<Value> = state
        .assignments
        .iter()
        .filter(|(_, developer)| *developer == id)
        .map(|(project, _)| json!({ "codigoProyecto": project }))
        .collect();

    Json(projects).into_response()
}

async fn assign(
    State(state): State<Shared>,
    Path((project, developer)): Path<(i64, i64)>,
) -> Response {
    let mut state = state.lock().unwrap();

    if !state.exists(Kind::Projects, project) || !state.exists(Kind::Developers, developer) {
        return (StatusCode::NOT_FOUND, "Proyecto o desarrollador no existe").into_response();
    }

    if !state.assignments.insert((project, developer)) {
        return (
            StatusCode::CONFLICT,
            "El desarrollador ya está asignado al proyecto",
        )
            .into_response();
    }

    StatusCode::OK.into_response()
}

async fn unassign(
    State(state): State<Shared>,
    Path((project, developer)): Path<(i64, i64)>,
) -> Response {
    let mut state = state.lock().unwrap();

    if !state.assignments.remove(&(project, developer)) {
        return (StatusCode::NOT_FOUND, "El desarrollador no está asignado").into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn start_server(state: FakeServer) -> (RequestConfig, Shared) {
    let state = Arc::new(Mutex::new(state));

    let app = Router::new()
        .route("/api/test-connection", get(|| async { "ok" }))
        .merge(collection(endpoints::DEVELOPERS, Kind::Developers))
        .merge(collection(endpoints::PROJECTS, Kind::Projects))
        .route("/api/desarrolladores/{id}/proyectos", get(developer_projects))
        .route("/api/proyectos/{id}/desarrolladores", get(project_developers))
        .route(
            "/api/proyectos/{id}/desarrolladores/{developer}",
            post(assign).delete(unassign),
        )
        .layer(middleware::from_fn_with_state(Arc::clone(&state), require_token))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = RequestConfig::new(format!("http://{}", addr), Some(TOKEN.to_string()));
    (config, state)
}

fn developer_record(id: i64, name: &str, active: bool) -> Value {
    json!({
        "codigoDesarrollador": id,
        "nombre": name,
        "rut": "11111111-1",
        "correoElectronico": format!("{}@x.cl", name.to_lowercase()),
        "fechaContratacion": "2022-05-02T00:00:00",
        "aniosExperiencia": 5,
        "registroActivo": active,
    })
}

fn project_record(id: i64, name: &str) -> Value {
    json!({
        "codigoProyecto": id,
        "nombre": name,
        "fechaInicio": "2024-03-01T00:00:00",
        "registroActivo": true,
    })
}

fn seeded() -> FakeServer {
    FakeServer {
        developers: vec![
            developer_record(7, "Ana", true),
            developer_record(8, "Beto", false),
        ],
        projects: vec![project_record(3, "Portal")],
        next_id: 100,
        ..Default::default()
    }
}

fn ana_perez() -> NewDeveloper {
    NewDeveloper {
        name: "Ana Pérez".to_string(),
        national_id: "12345678-9".to_string(),
        email: "ana@x.cl".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        years_experience: 3,
    }
}

#[tokio::test]
async fn test_health() {
    let (config, _) = start_server(FakeServer::default()).await;
    health(&config).await.unwrap();

    let unauthorized = RequestConfig::new(config.server_url.clone(), None);
    let err = health(&unauthorized).await.unwrap_err();
    assert!(matches!(err, Error::Request(RequestError { status: 401, .. })));
}

#[tokio::test]
async fn test_list_and_get_developers() {
    let (config, _) = start_server(seeded()).await;

    let developers = list_all::<Developer>(&config).await.unwrap();
    let names: Vec<&str> = developers.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Beto"]);
    assert!(!developers[1].active);

    let developer = get_by_id::<Developer>(&config, 8).await.unwrap();
    assert_eq!(developer.name, "Beto");
    assert_eq!(
        developer.hire_date,
        NaiveDate::from_ymd_opt(2022, 5, 2).unwrap()
    );

    let err = get_by_id::<Developer>(&config, 99).await.unwrap_err();
    match err {
        Error::Request(err) => {
            assert_eq!(err.message, "Error al obtener desarrollador");
            assert_eq!(err.status, 404);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_developer_assigns_id_and_active() {
    let (config, state) = start_server(seeded()).await;

    let created = create::<Developer>(&config, &ana_perez()).await.unwrap();
    assert_eq!(created.id, 101);
    assert!(created.active);
    assert_eq!(created.name, "Ana Pérez");

    let body = state.lock().unwrap().last_body.clone().unwrap();
    assert_eq!(body["fechaContratacion"], "2023-01-10T00:00:00");
    assert!(body.get("codigoDesarrollador").is_none());
    assert!(body.get("registroActivo").is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_payload_locally() {
    let (config, state) = start_server(seeded()).await;

    let mut payload = ana_perez();
    payload.national_id = "12345678-90".to_string();

    let err = create::<Developer>(&config, &payload).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NationalIdTooLong { max: 10 })
    ));
    assert_eq!(err.to_string(), "El RUT excede 10 caracteres");
    assert_eq!(state.lock().unwrap().requests, 0);
}

#[tokio::test]
async fn test_list_failure_is_request_error() {
    let (config, _) = start_server(FakeServer {
        fail_lists: true,
        ..seeded()
    })
    .await;

    let err = list_all::<Developer>(&config).await.unwrap_err();
    assert_eq!(err.to_string(), "Error al obtener desarrolladores");
    assert!(matches!(
        err,
        Error::Request(RequestError {
            message: "Error al obtener desarrolladores",
            status: 500,
        })
    ));

    let err = list_all::<Project>(&config).await.unwrap_err();
    assert_eq!(err.to_string(), "Error al obtener proyectos");
}

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let (config, state) = start_server(seeded()).await;

    let patch = DeveloperPatch {
        years_experience: Some(6),
        ..Default::default()
    };
    let updated = update::<Developer>(&config, 7, &patch).await.unwrap();
    assert_eq!(updated.years_experience, 6);
    assert_eq!(updated.name, "Ana");

    let body = state.lock().unwrap().last_body.clone().unwrap();
    assert_eq!(body, json!({ "aniosExperiencia": 6 }));

    let err = update::<Developer>(&config, 99, &patch).await.unwrap_err();
    assert_eq!(err.to_string(), "Error al actualizar desarrollador");
}

#[tokio::test]
async fn test_delete_and_reactivate() {
    let (config, _) = start_server(seeded()).await;

    let deleted = delete::<Developer>(&config, 7).await.unwrap();
    assert!(!deleted.active);

    let first = reactivate::<Developer>(&config, 7).await.unwrap();
    assert!(first.active);
    let second = reactivate::<Developer>(&config, 7).await.unwrap();
    assert!(second.active);

    let err = reactivate::<Project>(&config, 42).await.unwrap_err();
    assert_eq!(err.to_string(), "Error al reactivar proyecto");
    let err = delete::<Project>(&config, 42).await.unwrap_err();
    assert_eq!(err.to_string(), "Error al eliminar proyecto");
}

#[tokio::test]
async fn test_create_and_list_projects() {
    let (config, _) = start_server(seeded()).await;

    let created = create::<Project>(
        &config,
        &NewProject {
            name: "Intranet".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: None,
        },
    )
    .await
    .unwrap();
    assert!(created.active);
    assert!(created.end_date.is_none());

    let projects = list_all::<Project>(&config).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].id, created.id);
}

#[tokio::test]
async fn test_assignment_round_trip() {
    let (config, _) = start_server(seeded()).await;

    projects::assign_developer(&config, 3, 7).await.unwrap();
    assert_eq!(projects::developers(&config, 3).await.unwrap(), vec![7]);
    assert_eq!(developers::projects(&config, 7).await.unwrap(), vec![3]);

    projects::unassign_developer(&config, 3, 7).await.unwrap();
    assert!(projects::developers(&config, 3).await.unwrap().is_empty());
    assert!(developers::projects(&config, 7).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_assignment_is_rejected() {
    let (config, _) = start_server(seeded()).await;

    projects::assign_developer(&config, 3, 7).await.unwrap();

    let err = projects::assign_developer(&config, 3, 7).await.unwrap_err();
    match &err {
        Error::Assignment(err) => {
            assert_eq!(err.status, 409);
            assert_eq!(err.body, "El desarrollador ya está asignado al proyecto");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Error al asignar desarrollador: El desarrollador ya está asignado al proyecto"
    );

    assert_eq!(projects::developers(&config, 3).await.unwrap(), vec![7]);
}

#[tokio::test]
async fn test_unassign_unknown_is_rejected() {
    let (config, _) = start_server(seeded()).await;

    let err = projects::unassign_developer(&config, 3, 8).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error al desasignar desarrollador del proyecto: El desarrollador no está asignado"
    );
}

#[tokio::test]
async fn test_wrong_token_is_request_error() {
    let (config, _) = start_server(seeded()).await;
    let config = RequestConfig::new(config.server_url, Some("nope".to_string()));

    let err = list_all::<Developer>(&config).await.unwrap_err();
    assert!(matches!(err, Error::Request(RequestError { status: 401, .. })));
}

#[tokio::test]
async fn test_missing_token_fails_before_request() {
    let (config, state) = start_server(seeded()).await;
    let config = RequestConfig::new(config.server_url, None);

    let err = list_all::<Developer>(&config).await.unwrap_err();
    assert!(matches!(err, Error::MissingToken));
    assert_eq!(state.lock().unwrap().requests, 0);
}
