//! HTTP router assembly.

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{api_keys, auth, health, merchants, public, transactions},
    state::AppState,
};

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    // Dashboard routes: identity (and usually a merchant profile) required,
    // enforced per handler by the AuthUser / MerchantContext extractors
    let dashboard_routes = Router::new()
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/merchants/me", get(merchants::get_my_merchant))
        .route("/api/merchants", post(merchants::create_merchant))
        .route(
            "/api/keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/api/keys/{id}", delete(api_keys::delete_api_key))
        .route("/api/transactions", get(transactions::list_transactions));

    // Public routes are called from merchant sites and the checkout page
    let public_routes = Router::new()
        .route("/api/public/transactions", post(public::create_transaction))
        .route(
            "/api/public/transactions/quick",
            get(public::quick_transaction),
        )
        .route("/api/public/transactions/{id}", get(public::get_transaction))
        .route(
            "/api/public/transactions/{id}/process",
            post(public::process_transaction),
        )
        .route("/api/public/process/{id}", post(public::process_transaction))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health::health_check))
        .merge(dashboard_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
