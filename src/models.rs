use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents the user's canonical identity record stored in the `users` table.
/// The username is the case-sensitive login key; username and email are both
/// globally unique (enforced by database constraints).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC-format password verifier. Never serialized outward.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
}

/// Blog
///
/// Represents a blog post from the `blogs` table. Every blog has exactly one
/// owner (`author_id`), fixed at creation; only the owner may update or delete it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Optional reference to a cover image (URL or object key).
    pub image_url: Option<String>,
    // FK to users.id (Owner).
    pub author_id: i64,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Comment
///
/// Represents a comment record from the `comments` table. Attached to exactly
/// one blog and authored by exactly one user; both references are immutable.
/// Deleting the parent blog cascades to its comments.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    // FK to blogs.id (parent). The parent must exist at creation time.
    pub blog_id: i64,
    // FK to users.id (Owner).
    pub author_id: i64,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for account creation (POST /signup).
/// The raw password is hashed immediately and never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for the credential exchange endpoint (POST /login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// TokenResponse
///
/// Output schema for a successful login: the signed bearer token the client
/// presents on every subsequent authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// CreateBlogRequest
///
/// Input payload for publishing a new blog (POST /blogs).
/// The owner is taken from the authenticated caller, never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// UpdateBlogRequest
///
/// Full-replace payload for modifying an existing blog (PUT /blogs/{id}).
/// All mutable fields are required; the owner cannot be changed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// CreateCommentRequest
///
/// Input payload for posting a new comment (POST /blogs/{id}/comments).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub content: String,
}
