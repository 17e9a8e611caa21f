// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderName, HeaderValue, Method,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{csrf_protection, CSRF_HEADER},
    config::AppConfig,
    error::{ApiError, ErrorBody},
    models::{
        AuthResponse, Comment, CsrfTokenResponse, LoginRequest, MessageResponse, SignupRequest,
        TextRequest, Tweet,
    },
    rate_limit::rate_limit,
    state::AppState,
};

pub mod auth;
pub mod comments;
pub mod extract;
pub mod health;
pub mod tweets;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health (no auth)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Auth
        .route("/auth/csrf-token", get(auth::csrf_token))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Tweets
        .route("/tweets", get(tweets::list_tweets).post(tweets::create_tweet))
        .route(
            "/tweets/{id}",
            get(tweets::get_tweet)
                .put(tweets::update_tweet)
                .delete(tweets::delete_tweet),
        )
        // Comments
        .route("/tweets/{id}/comments", post(comments::create_comment))
        .route(
            "/tweets/{id}/comments/{comment_id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Innermost first: CSRF runs after the rate limiter and before any
        // handler extractor, so a failed CSRF check wins over a failed login.
        .layer(middleware::from_fn_with_state(state.clone(), csrf_protection))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Browsers may call from the configured origin, with cookies.
///
/// Credentialed CORS cannot use a literal `*`, so the wildcard setting
/// mirrors the caller's origin instead.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match &config.cors_allow_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(CSRF_HEADER),
        ])
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::csrf_token,
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        tweets::list_tweets,
        tweets::get_tweet,
        tweets::create_tweet,
        tweets::update_tweet,
        tweets::delete_tweet,
        comments::create_comment,
        comments::update_comment,
        comments::delete_comment
    ),
    components(
        schemas(
            AuthResponse,
            Comment,
            CsrfTokenResponse,
            ErrorBody,
            LoginRequest,
            MessageResponse,
            SignupRequest,
            TextRequest,
            Tweet,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Signup, login and CSRF tokens"),
        (name = "Tweets", description = "Tweet CRUD"),
        (name = "Comments", description = "Comments on tweets")
    )
)]
struct ApiDoc;
