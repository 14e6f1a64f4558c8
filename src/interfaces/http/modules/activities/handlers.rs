//! Activity catalogue handlers
//!
//! Reads are open to any authenticated user; mutations require the admin
//! role (enforced in `ActivityService`).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Duration;

use super::dto::{ActivityDetailDto, ActivityDto, ActivityRequest};
use crate::application::ActivityService;
use crate::domain::ActivityDraft;
use crate::infrastructure::database::repositories::SeaOrmActivityRepository;
use crate::interfaces::http::common::{
    error_response, ApiResponse, ListParams, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::appointments::{
    AppointmentSummaryDto, SharedAppointmentService,
};

/// Concrete over `SeaOrmActivityRepository` for Axum state compatibility.
pub type SharedActivityService = Arc<ActivityService<SeaOrmActivityRepository>>;

#[derive(Clone)]
pub struct ActivityHandlerState {
    pub activity_service: SharedActivityService,
    /// Needed for the detail view, which embeds the appointments an
    /// activity is booked in.
    pub appointment_service: SharedAppointmentService,
}

fn draft_from(request: ActivityRequest) -> ActivityDraft {
    ActivityDraft {
        name: request.name,
        duration: Duration::minutes(request.duration_minutes),
        price: request.price,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/activities",
    tag = "Activities",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Activity list", body = PaginatedResponse<ActivityDto>)
    )
)]
pub async fn list_activities(
    State(state): State<ActivityHandlerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<ActivityDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .activity_service
        .list(params.page, params.page_size)
        .await
    {
        Ok(page) => Ok(Json(PaginatedResponse::from_page(page, ActivityDto::from))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/activities/{id}",
    tag = "Activities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity with its appointments", body = ApiResponse<ActivityDetailDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_activity(
    State(state): State<ActivityHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ActivityDetailDto>>, (StatusCode, Json<ApiResponse<ActivityDetailDto>>)>
{
    let activity = match state.activity_service.get(id).await {
        Ok(activity) => activity,
        Err(e) => return Err(error_response(&e)),
    };

    match state.appointment_service.list_for_activity(id).await {
        Ok(summaries) => {
            let appointments = summaries
                .into_iter()
                .map(AppointmentSummaryDto::from)
                .collect();
            Ok(Json(ApiResponse::success(ActivityDetailDto::new(
                activity,
                appointments,
            ))))
        }
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/activities",
    tag = "Activities",
    security(("bearer_auth" = [])),
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity created", body = ApiResponse<ActivityDto>),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn create_activity(
    State(state): State<ActivityHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityDto>>), (StatusCode, Json<ApiResponse<ActivityDto>>)>
{
    match state
        .activity_service
        .create(draft_from(request), &caller.caller_context())
        .await
    {
        Ok(activity) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(ActivityDto::from(activity))),
        )),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/activities/{id}",
    tag = "Activities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Activity id")),
    request_body = ActivityRequest,
    responses(
        (status = 200, description = "Activity updated", body = ApiResponse<ActivityDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn update_activity(
    State(state): State<ActivityHandlerState>,
    Path(id): Path<i32>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ActivityRequest>,
) -> Result<Json<ApiResponse<ActivityDto>>, (StatusCode, Json<ApiResponse<ActivityDto>>)> {
    match state
        .activity_service
        .update(id, draft_from(request), &caller.caller_context())
        .await
    {
        Ok(activity) => Ok(Json(ApiResponse::success(ActivityDto::from(activity)))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/activities/{id}",
    tag = "Activities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_activity(
    State(state): State<ActivityHandlerState>,
    Path(id): Path<i32>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .activity_service
        .delete(id, &caller.caller_context())
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err(error_response(&e)),
    }
}
