use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use carlot_auth_types::bearer::authenticate;
use carlot_core::health::{healthz, readyz};
use carlot_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    cars::{create_car, delete_car, get_car, list_cars, update_car},
    login::{request_login, session, verify_login},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Login
        .route("/auth/login", post(request_login))
        .route("/auth/verify", post(verify_login))
        .route("/auth/session", get(session))
        // Cars
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/{id}",
            get(get_car).patch(update_car).delete(delete_car),
        )
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authenticate,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
