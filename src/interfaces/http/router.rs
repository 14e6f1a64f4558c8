//! API router with Swagger UI

use axum::{
    middleware,
    routing::get,
    routing::post,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    activities, appointments, auth, health, metrics, users,
};
use crate::interfaces::http::modules::activities::SharedActivityService;
use crate::interfaces::http::modules::appointments::SharedAppointmentService;
use crate::interfaces::http::modules::users::SharedUserService;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Metrics
        metrics::metrics_handler,
        // Auth
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::me,
        // Users
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        // Activities
        activities::handlers::list_activities,
        activities::handlers::get_activity,
        activities::handlers::create_activity,
        activities::handlers::update_activity,
        activities::handlers::delete_activity,
        // Appointments
        appointments::handlers::list_appointments,
        appointments::handlers::get_appointment,
        appointments::handlers::create_appointment,
        appointments::handlers::update_appointment,
        appointments::handlers::delete_appointment,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<activities::ActivityDto>,
            PaginatedResponse<appointments::AppointmentDto>,
            // Health
            health::HealthInfo,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            // Users
            users::UserDto,
            users::UpdateUserRequest,
            // Activities
            activities::ActivityDto,
            activities::ActivityDetailDto,
            activities::ActivityRequest,
            // Appointments
            appointments::AppointmentDto,
            appointments::AppointmentSummaryDto,
            appointments::AppointmentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Monitoring", description = "Prometheus metrics"),
        (name = "Authentication", description = "Login (JWT) and registration"),
        (name = "Users", description = "User account management"),
        (name = "Activities", description = "Bookable activity catalogue (admin-managed)"),
        (name = "Appointments", description = "Appointment booking with conflict detection"),
    ),
    info(
        title = "Rushhour Scheduling API",
        version = "1.0.0",
        description = "REST API for booking appointments composed of activities",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
pub fn create_api_router(
    user_service: SharedUserService,
    activity_service: SharedActivityService,
    appointment_service: SharedAppointmentService,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState { jwt_config };

    // Auth routes (public)
    let auth_handler_state = auth::AuthHandlerState {
        user_service: user_service.clone(),
    };
    let auth_public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_handler_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    // User routes (protected)
    let user_state = users::UserHandlerState { user_service };
    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state);

    // Activity routes (protected; mutations additionally require admin)
    let activity_state = activities::ActivityHandlerState {
        activity_service,
        appointment_service: appointment_service.clone(),
    };
    let activity_routes = Router::new()
        .route(
            "/",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/{id}",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(activity_state);

    // Appointment routes (protected)
    let appointment_state = appointments::AppointmentHandlerState {
        appointment_service,
    };
    let appointment_routes = Router::new()
        .route(
            "/",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/{id}",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(appointment_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route(
            "/metrics",
            get(metrics::metrics_handler).with_state(prometheus_handle),
        )
        .nest("/api/v1/auth", auth_public_routes.merge(auth_protected_routes))
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/activities", activity_routes)
        .nest("/api/v1/appointments", appointment_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
