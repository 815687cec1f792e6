//! Route definitions for the FarmLink Platform

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .merge(auth_routes())
        // Protected routes - user profiles
        .nest("/users", user_routes(state.clone()))
        // Farmland and crop recommendation (public)
        .merge(farmland_routes())
        // Protected routes - crop catalog maintenance
        .merge(crop_routes(state.clone()))
        // Weather (public)
        .route("/weather", get(handlers::get_weather))
        // Irrigation scheduling (public)
        .nest("/irrigation", irrigation_routes())
        // Protected routes - discussion board
        .merge(discussion_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:id", get(handlers::get_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Farmland and recommendation routes (public)
fn farmland_routes() -> Router<AppState> {
    Router::new()
        .route("/add-farmland", post(handlers::add_farmland))
        .route("/farmlands/:id", get(handlers::get_farmland))
        .route("/crops", get(handlers::list_crops))
        .route("/manual-recommendation", post(handlers::manual_recommendation))
        .route("/gpt-recommendation", post(handlers::gpt_recommendation))
}

/// Crop catalog maintenance (protected)
fn crop_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/crops", post(handlers::add_crop))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Irrigation routes (public)
fn irrigation_routes() -> Router<AppState> {
    Router::new()
        .route("/createschedule", post(handlers::create_schedule))
        .route("/getschedules", get(handlers::get_schedules))
}

/// Discussion routes (protected)
fn discussion_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/:id", get(handlers::get_post))
        .route("/posts/:id/like", post(handlers::like_post))
        .route(
            "/comments/:id",
            post(handlers::add_comment).delete(handlers::delete_comment),
        )
        .route("/comments/:id/like", post(handlers::like_comment))
        .route("/replies/:id", post(handlers::add_reply))
        .route("/replies/:id/like", post(handlers::like_reply))
        // `:id` is the comment here
        .route("/replies/:id/:reply_id", delete(handlers::delete_reply))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
