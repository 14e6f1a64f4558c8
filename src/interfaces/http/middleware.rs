//! JWT authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::CallerContext;
use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig};

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated caller, inserted into request extensions after the token
/// has been verified.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    fn from_claims(claims: Claims) -> Option<Self> {
        // A token carrying an unknown role name is treated as invalid.
        let role = UserRole::parse(&claims.role)?;
        Some(Self {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }

    /// Explicit caller identity handed to the service layer.
    pub fn caller_context(&self) -> CallerContext {
        CallerContext {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Require a valid bearer token on every request passing through.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let Some(user) = AuthenticatedUser::from_claims(claims) else {
                return auth_error_response(AuthError::InvalidToken);
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid authentication token",
        AuthError::ExpiredToken => "Token has expired",
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (StatusCode::UNAUTHORIZED, body).into_response()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::Service;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id
    }

    fn app(config: JwtConfig) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(
                AuthState { jwt_config: config },
                auth_middleware,
            ))
    }

    async fn send(config: JwtConfig, auth: Option<String>) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method("GET").uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let req = builder.body(Body::empty()).unwrap();
        app(config).into_service().call(req).await.unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let resp = send(JwtConfig::default(), None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_identity_through() {
        let config = JwtConfig::default();
        let token = create_token("u1", "ann@example.com", "client", &config).unwrap();
        let resp = send(config, Some(format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_role_in_token_is_rejected() {
        let config = JwtConfig::default();
        let token = create_token("u1", "ann@example.com", "superuser", &config).unwrap();
        let resp = send(config, Some(format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let resp = send(JwtConfig::default(), Some("Basic abc".into())).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
