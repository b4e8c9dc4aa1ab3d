//! HTTP request handlers for the Incident Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{price_all, session_totals};
use crate::error::EngineError;
use crate::export::{ExportOptions, UnpricedPolicy, export};
use crate::models::Incident;

use super::request::{
    BulkAddRequest, BulkTarget, DeleteSelectedRequest, EmployeeQuery, ExportQuery,
    IncidentRequest, OpenSessionRequest, PageQuery,
};
use super::response::{
    ApiError, ApiErrorResponse, Appended, CentreSummary, EmployeeSummary, HealthResponse,
    IncidentPage, IndexedIncident, MasterReloaded, RowSummary, RowsAffected, SessionCreated,
    SessionSummary,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sessions", post(open_session_handler))
        .route("/sessions/:id", delete(close_session_handler))
        .route(
            "/sessions/:id/incidents",
            get(list_incidents_handler)
                .post(append_incident_handler)
                .delete(clear_incidents_handler),
        )
        .route(
            "/sessions/:id/incidents/:index",
            put(update_incident_handler).delete(remove_incident_handler),
        )
        .route(
            "/sessions/:id/incidents/delete",
            post(remove_selected_handler),
        )
        .route("/sessions/:id/incidents/bulk", post(bulk_add_handler))
        .route("/sessions/:id/summary", get(summary_handler))
        .route("/sessions/:id/export", get(export_handler))
        .route("/master/employees", get(employees_handler))
        .route("/master/supervisors", get(supervisors_handler))
        .route("/master/centres", get(centres_handler))
        .route("/master/reload", post(reload_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    let response = ApiErrorResponse::bad_request(error);
    json_response(response.status, response.error)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            master_loaded: state.master().is_loaded(),
            sessions: state.sessions().len(),
        },
    )
}

/// Handler for POST /sessions.
///
/// An empty body opens a session with no payroll month.
async fn open_session_handler(
    State(state): State<AppState>,
    payload: Result<Json<OpenSessionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => OpenSessionRequest::default(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let id = state
        .sessions()
        .open(request.payroll_month, request.supervisor);
    match state.sessions().with_session(id, |session| {
        Ok(SessionCreated {
            id: session.id,
            created_at: session.created_at,
            payroll_month: session.payroll_month.clone(),
        })
    }) {
        Ok(created) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                payroll_month = %created.payroll_month,
                "Session opened"
            );
            json_response(StatusCode::CREATED, created)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /sessions/:id.
async fn close_session_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.sessions().close(id) {
        Ok(session) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                rows = session.store.len(),
                "Session closed"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /sessions/:id/incidents.
async fn list_incidents_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let per_page = query
        .per_page
        .unwrap_or(state.settings().export.rows_per_page)
        .max(1);
    let page = query.page.unwrap_or(1);

    let result = state.sessions().with_session(id, |session| {
        let page = session.store.page(page, per_page);
        Ok(IncidentPage {
            page: page.page,
            total_pages: page.total_pages,
            per_page,
            total_rows: session.store.len(),
            rows: page
                .rows
                .iter()
                .enumerate()
                .map(|(i, incident)| IndexedIncident {
                    index: page.offset + i,
                    incident: incident.clone(),
                })
                .collect(),
        })
    });

    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /sessions/:id/incidents.
async fn append_incident_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<IncidentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = Incident::try_from(request).and_then(|incident| {
        let employee = incident.employee.clone();
        state
            .sessions()
            .with_session(id, |session| session.store.append(incident))
            .map(|index| (index, employee))
    });

    match result {
        Ok((index, employee)) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                employee = %employee,
                index,
                "Incident appended"
            );
            json_response(StatusCode::CREATED, Appended { index })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PUT /sessions/:id/incidents/:index.
async fn update_incident_handler(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    payload: Result<Json<IncidentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = Incident::try_from(request).and_then(|incident| {
        state.sessions().with_session(id, |session| {
            session.store.update(index, incident.clone())?;
            Ok(incident)
        })
    });

    match result {
        Ok(incident) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                employee = %incident.employee,
                index,
                "Incident updated"
            );
            json_response(StatusCode::OK, IndexedIncident { index, incident })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /sessions/:id/incidents/:index.
async fn remove_incident_handler(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.sessions().with_session(id, |session| {
        let removed = session.store.remove(index)?;
        Ok((removed, session.store.len()))
    });

    match result {
        Ok((removed, total_rows)) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                employee = %removed.employee,
                index,
                "Incident removed"
            );
            json_response(
                StatusCode::OK,
                RowsAffected {
                    affected: 1,
                    total_rows,
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /sessions/:id/incidents/delete.
async fn remove_selected_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DeleteSelectedRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = state.sessions().with_session(id, |session| {
        let affected = session.store.remove_many(&request.indices)?;
        Ok(RowsAffected {
            affected,
            total_rows: session.store.len(),
        })
    });
    rows_affected_response(correlation_id, id, "Selected incidents removed", result)
}

/// Handler for DELETE /sessions/:id/incidents.
async fn clear_incidents_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.sessions().with_session(id, |session| {
        Ok(RowsAffected {
            affected: session.store.clear(),
            total_rows: 0,
        })
    });
    rows_affected_response(correlation_id, id, "Session incidents cleared", result)
}

/// Handler for POST /sessions/:id/incidents/bulk.
async fn bulk_add_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<BulkAddRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let master = match state.master().get() {
        Ok(master) => master,
        Err(err) => return error_response(correlation_id, err),
    };

    let result = request.target().and_then(|target| {
        state.sessions().with_session(id, |session| {
            let destination = request.destination.as_deref();
            let affected = match target {
                BulkTarget::Employee(employee, count) => {
                    session.add_for_employee(&master, employee, request.date, count, destination)?
                }
                BulkTarget::Centre(centre) => {
                    session.add_for_centre(&master, centre, request.date, destination)?
                }
            };
            Ok(RowsAffected {
                affected,
                total_rows: session.store.len(),
            })
        })
    });
    rows_affected_response(correlation_id, id, "Incidents bulk added", result)
}

fn rows_affected_response(
    correlation_id: Uuid,
    id: Uuid,
    message: &str,
    result: Result<RowsAffected, EngineError>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                rows = body.affected,
                total_rows = body.total_rows,
                "{}",
                message
            );
            json_response(StatusCode::OK, body)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn session_rows(state: &AppState, id: Uuid) -> Result<Vec<Incident>, EngineError> {
    state
        .sessions()
        .with_session(id, |session| Ok(session.store.list().to_vec()))
}

/// Handler for GET /sessions/:id/summary.
///
/// Prices every row; rows that cannot be priced carry their error instead
/// of a cost and are left out of the totals.
async fn summary_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();

    let result = session_rows(&state, id).and_then(|rows| {
        let master = state.master().get()?;
        Ok((rows, master))
    });
    let (rows, master) = match result {
        Ok(loaded) => loaded,
        Err(err) => return error_response(correlation_id, err),
    };

    let results = price_all(&rows, &master, &state.settings().pricing);
    let totals = match session_totals(&results) {
        Ok(totals) => totals,
        Err(err) => return error_response(correlation_id, err),
    };
    let row_summaries = results
        .into_iter()
        .zip(&rows)
        .enumerate()
        .map(|(index, (result, incident))| match result {
            Ok(priced) => RowSummary {
                index,
                employee: incident.employee.clone(),
                cost: Some(priced.cost),
                error: None,
            },
            Err(err) => RowSummary {
                index,
                employee: incident.employee.clone(),
                cost: None,
                error: Some(ApiErrorResponse::from(err).error),
            },
        })
        .collect();

    info!(
        correlation_id = %correlation_id,
        session_id = %id,
        rows = rows.len(),
        unpriced = totals.unpriced_rows,
        total_surcharge = %totals.total_surcharge,
        duration_us = start_time.elapsed().as_micros() as u64,
        "Session summary computed"
    );

    json_response(
        StatusCode::OK,
        SessionSummary {
            totals,
            rows: row_summaries,
        },
    )
}

/// Handler for GET /sessions/:id/export.
async fn export_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let settings = state.settings();
    let format = query.format.unwrap_or(settings.export.default_format);
    let policy = if query.skip_unpriced {
        UnpricedPolicy::Skip
    } else {
        UnpricedPolicy::Block
    };
    let options = ExportOptions::new(format, &settings.pricing).with_unpriced(policy);

    let result = session_rows(&state, id).and_then(|rows| {
        let master = state.master().get()?;
        let bytes = export(&rows, &master, &options)?;
        Ok((rows.len(), bytes))
    });

    match result {
        Ok((rows, bytes)) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %id,
                format = %format,
                rows,
                bytes = bytes.len(),
                "Session exported"
            );
            let disposition = format!(
                "attachment; filename=\"{}.{}\"",
                settings.export.file_stem,
                format.extension()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /master/employees.
///
/// Filters by home centre, else by supervisor, else lists everyone.
async fn employees_handler(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let master = match state.master().get() {
        Ok(master) => master,
        Err(err) => return error_response(correlation_id, err),
    };

    let employees: Vec<EmployeeSummary> = match (query.centre, query.supervisor) {
        (Some(centre), _) => master
            .employees_by_centre(&centre)
            .into_iter()
            .map(EmployeeSummary::from)
            .collect(),
        (None, Some(supervisor)) => master
            .employees_by_supervisor(&supervisor)
            .into_iter()
            .map(EmployeeSummary::from)
            .collect(),
        (None, None) => master
            .employee_names()
            .into_iter()
            .filter_map(|name| master.employee(name).ok())
            .map(EmployeeSummary::from)
            .collect(),
    };
    json_response(StatusCode::OK, employees)
}

/// Handler for GET /master/supervisors.
async fn supervisors_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.master().get() {
        Ok(master) => json_response(StatusCode::OK, master.supervisors()),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /master/centres.
async fn centres_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.master().get() {
        Ok(master) => {
            let centres: Vec<CentreSummary> = master.centres().map(CentreSummary::from).collect();
            json_response(StatusCode::OK, centres)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /master/reload.
///
/// A failed reload keeps serving the previous master data.
async fn reload_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.master().reload() {
        Ok(master) => {
            info!(
                correlation_id = %correlation_id,
                employees = master.employee_count(),
                "Master data reloaded"
            );
            json_response(
                StatusCode::OK,
                MasterReloaded {
                    employees: master.employee_count(),
                    centres: master.centres().count(),
                    night_rates: master.night_rate_count(),
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}
