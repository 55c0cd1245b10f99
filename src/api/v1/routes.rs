/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - どの route にどの gate を掛けるかをここで決める (route_layer)
 */
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::api::v1::dto::profile::UpdateProfileRequest;
use crate::api::v1::handlers::{
    profile::update_profile,
    session::{me, refresh_check, session_status},
};
use crate::middleware::auth::{
    require_access_token, require_authenticated, require_refresh_token, require_valid_body,
};
use crate::middleware::validation::validate_json;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            get(session_status).route_layer(from_fn(require_access_token)),
        )
        .route(
            "/me",
            get(me).route_layer(from_fn_with_state(state.clone(), require_authenticated)),
        )
        .route(
            "/token/refresh",
            post(refresh_check).route_layer(from_fn_with_state(
                state.clone(),
                require_refresh_token,
            )),
        )
        .route(
            "/profile",
            // ServiceBuilder runs top to bottom: validate → authenticate → relay
            post(update_profile).route_layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_json::<UpdateProfileRequest>))
                    .layer(from_fn_with_state(state, require_authenticated))
                    .layer(from_fn(require_valid_body)),
            ),
        )
}
