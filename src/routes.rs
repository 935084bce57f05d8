use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request, header},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{controllers, middlewares::session_auth_middleware, state::AppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

fn header_str<'a>(request: &'a Request<Body>, name: impl header::AsHeaderName) -> &'a str {
    request
        .headers()
        .get(name)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("")
}

fn cors_layer(origin: &str) -> Result<CorsLayer, anyhow::Error> {
    let origin = HeaderValue::from_str(origin).context("Invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

pub fn init_router(app_state: AppState) -> Result<Router, anyhow::Error> {
    let cors = cors_layer(&app_state.config.application.cors_origin)?;
    let state = Arc::new(app_state);

    let app = Router::new().route("/health", get(controllers::home::index));

    let auth_route = Router::new()
        .route("/signup", post(controllers::auth::signup))
        .route("/login", post(controllers::auth::login))
        .route("/logout", post(controllers::auth::logout))
        .route("/me", get(controllers::auth::me));

    let drama_route = Router::new()
        .route("/", get(controllers::dramas::index))
        .route("/{id}", get(controllers::dramas::show))
        .route("/{id}/episodes", get(controllers::dramas::episodes));

    let episode_route = Router::new()
        .route("/{id}", get(controllers::episodes::show))
        .route("/{id}/view", post(controllers::episodes::view));

    let favorite_route = Router::new()
        .route(
            "/",
            get(controllers::favorites::index).post(controllers::favorites::store),
        )
        .route("/check/{drama_id}", get(controllers::favorites::check))
        .route("/{drama_id}", delete(controllers::favorites::destroy))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = header_str(request, REQUEST_ID_HEADER);
                let user_agent = header_str(request, header::USER_AGENT);

                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::info_span!(
                    "http_request",
                    request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    path = matched_path,
                    version = ?request.version(),
                    user_agent,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id_header));

    Ok(app
        .nest("/auth", auth_route)
        .nest("/dramas", drama_route)
        .nest("/episodes", episode_route)
        .nest("/favorites", favorite_route)
        .fallback(controllers::home::fallback)
        .method_not_allowed_fallback(controllers::home::method_not_allowed)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(request_id_middleware)
        .with_state(state))
}
