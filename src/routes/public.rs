use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in): the signup/login gateway and the public read surface.
///
/// Security Mandate:
/// Nothing in this module mutates owned resources. Blogs and their comments are
/// publicly readable by design; everything else lives behind the authenticated router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /signup
        // Creates a new account. Username/email uniqueness is ultimately enforced
        // by the database constraints, not just the handler's pre-check.
        .route("/signup", post(handlers::signup))
        // POST /login
        // Exchanges a username/password pair for a signed bearer token.
        .route("/login", post(handlers::login))
        // GET /blogs/{id}
        // Retrieves the detailed view of a single blog. Public read: no token required.
        .route("/blogs/{id}", get(handlers::get_blog_details))
        // GET /blogs/{id}/comments
        // Lists all comments attached to a specific blog.
        .route("/blogs/{id}/comments", get(handlers::get_comments))
}
