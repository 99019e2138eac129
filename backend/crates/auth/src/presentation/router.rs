//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::AuthContext;
use crate::domain::repository::AccountRepository;
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_account;
use crate::presentation::rate_limit::limit_by_ip;

/// Create the router with the PostgreSQL repository
pub fn auth_router(repo: PgAccountRepository, ctx: AuthContext) -> Router {
    auth_router_generic(repo, ctx)
}

/// Create the router for any repository implementation
///
/// - `/auth/{register,login,refresh,logout}` behind the per-address limiter
/// - `/user/profile` behind the bearer guard
/// - `/health`
pub fn auth_router_generic<R>(repo: R, ctx: AuthContext) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, ctx);

    let auth_routes = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_by_ip::<R>));

    let user_routes = Router::new()
        .route("/profile", get(handlers::profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account::<R>,
        ));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes)
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
}
