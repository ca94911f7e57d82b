use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has successfully passed the authentication layer.
/// This module implements every ownership-scoped operation: creating and managing
/// blogs, and posting or removing comments.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware being present
/// on the router layer above this module. This guarantees that all handlers receive a
/// validated `AuthUser` struct containing the user's ID, which is then used for all
/// Owner-Only authorization checks (e.g., in `update_blog` and `delete_blog`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me/blogs
        // Lists all blogs owned by the authenticated user.
        .route("/me/blogs", get(handlers::get_my_blogs))
        // --- Blog Management ---
        // POST /blogs
        // Publishes a new blog. The owner is stamped from the validated identity.
        .route("/blogs", post(handlers::create_blog))
        // PUT/DELETE /blogs/{id}
        // Allows the user to modify or remove their own blog.
        // The strict ownership check is fused into the repository statement.
        .route(
            "/blogs/{id}",
            put(handlers::update_blog).delete(handlers::delete_blog),
        )
        // --- Commenting System ---
        // POST /blogs/{id}/comments
        // Posts a new comment on the specified blog. The target blog must exist.
        .route("/blogs/{id}/comments", post(handlers::add_comment))
        // DELETE /comments/{id}
        // Allows a user to delete their own comment. Ownership validation is required.
        .route("/comments/{id}", delete(handlers::delete_comment))
}
