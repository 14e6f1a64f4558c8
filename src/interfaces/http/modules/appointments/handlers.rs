//! Appointment booking handlers
//!
//! Thin wrappers over `AppointmentService`; the scheduling gates
//! (activity resolution, end-time derivation, conflict detection,
//! authorization) all live in the service.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{AppointmentDto, AppointmentRequest};
use crate::application::AppointmentService;
use crate::infrastructure::database::repositories::{
    SeaOrmActivityRepository, SeaOrmAppointmentRepository,
};
use crate::interfaces::http::common::{
    error_response, ApiResponse, ListParams, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Concrete over the SeaORM repositories for Axum state compatibility.
pub type SharedAppointmentService =
    Arc<AppointmentService<SeaOrmAppointmentRepository, SeaOrmActivityRepository>>;

#[derive(Clone)]
pub struct AppointmentHandlerState {
    pub appointment_service: SharedAppointmentService,
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Appointment list", body = PaginatedResponse<AppointmentDto>)
    )
)]
pub async fn list_appointments(
    State(state): State<AppointmentHandlerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<AppointmentDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .appointment_service
        .list(params.page, params.page_size)
        .await
    {
        Ok(page) => Ok(Json(PaginatedResponse::from_page(page, AppointmentDto::from))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment details", body = ApiResponse<AppointmentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_appointment(
    State(state): State<AppointmentHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AppointmentDto>>, (StatusCode, Json<ApiResponse<AppointmentDto>>)> {
    match state.appointment_service.get(id).await {
        Ok(details) => Ok(Json(ApiResponse::success(AppointmentDto::from(details)))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = AppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = ApiResponse<AppointmentDto>),
        (status = 404, description = "Unknown activity"),
        (status = 409, description = "Overlapping appointments")
    )
)]
pub async fn create_appointment(
    State(state): State<AppointmentHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<AppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentDto>>), (StatusCode, Json<ApiResponse<AppointmentDto>>)>
{
    match state
        .appointment_service
        .create(
            request.start_time,
            &request.activity_ids,
            &caller.caller_context(),
        )
        .await
    {
        Ok(details) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(AppointmentDto::from(details))),
        )),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = ApiResponse<AppointmentDto>),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Overlapping appointments")
    )
)]
pub async fn update_appointment(
    State(state): State<AppointmentHandlerState>,
    Path(id): Path<i32>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<AppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentDto>>, (StatusCode, Json<ApiResponse<AppointmentDto>>)> {
    match state
        .appointment_service
        .update(
            id,
            request.start_time,
            &request.activity_ids,
            &caller.caller_context(),
        )
        .await
    {
        Ok(details) => Ok(Json(ApiResponse::success(AppointmentDto::from(details)))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted"),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_appointment(
    State(state): State<AppointmentHandlerState>,
    Path(id): Path<i32>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .appointment_service
        .delete(id, &caller.caller_context())
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err(error_response(&e)),
    }
}
