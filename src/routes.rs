use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    middlewares::{admin_guard_middleware, cleanup_guard_middleware, session_auth_middleware},
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_router(app_state: AppState) -> Router {
    let state = Arc::new(app_state);

    let app = Router::new()
        .route("/", get(crate::controllers::home::index))
        .route("/auth/link", post(crate::controllers::auth::request_link))
        .route(
            "/auth/session",
            post(crate::controllers::auth::create_session),
        );

    let profiles_route = Router::new()
        .route("/{username}", get(crate::controllers::profiles::show))
        .route(
            "/{username}/completions",
            get(crate::controllers::completions::index),
        )
        .route(
            "/{username}/completions/stats",
            get(crate::controllers::completions::with_stats),
        );

    let me_route = Router::new()
        .route("/", get(crate::controllers::me::index))
        .route("/about", put(crate::controllers::me::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    // The cron token opens the cleanup route only; everything else
    // under /admin requires the secret header.
    let admin_route = Router::new()
        .route("/sync", post(crate::controllers::admin::sync::pipeline))
        .route(
            "/sync/mangadex",
            post(crate::controllers::admin::sync::mangadex),
        )
        .route("/sync/tmdb", post(crate::controllers::admin::sync::tmdb))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_guard_middleware,
        ))
        .merge(
            Router::new()
                .route("/cleanup", post(crate::controllers::admin::cleanup::cleanup))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    cleanup_guard_middleware,
                )),
        );

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = match request.headers().get(REQUEST_ID_HEADER) {
                    Some(val) => val.to_str().unwrap_or(""),
                    None => "",
                };
                let user_agent = match request.headers().get(header::USER_AGENT) {
                    Some(val) => val.to_str().unwrap_or(""),
                    None => "",
                };

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

    app.nest("/profiles", profiles_route)
        .nest("/me", me_route)
        .nest("/admin", admin_route)
        .layer(CompressionLayer::new())
        .layer(request_id_middleware)
        .with_state(state)
}
