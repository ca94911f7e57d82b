use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{
        Blog, Comment, CreateBlogRequest, CreateCommentRequest, LoginRequest, SignupRequest,
        TokenResponse, UpdateBlogRequest, User,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// require_non_empty
///
/// Input invariant shared by every content-bearing payload: titles, bodies and
/// comment text must contain at least one non-whitespace character.
fn require_non_empty(value: &str, field: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// --- Auth Handlers ---

/// signup
///
/// [Public Route] Creates a new account. The username pre-check gives the common
/// case a clean conflict response; the unique constraints on `users` close the
/// remaining race window, surfacing a concurrent duplicate as the same `Conflict`.
/// Only the password verifier is stored; the raw password dies in this frame.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<User>, ApiError> {
    require_non_empty(&payload.username, "username")?;
    require_non_empty(&payload.email, "email")?;
    require_non_empty(&payload.password, "password")?;

    if state
        .repo
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict);
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state
        .repo
        .create_user(&payload.username, &payload.email, &password_hash)
        .await?;

    tracing::info!(username = %user.username, "new account created");
    Ok(Json(user))
}

/// login
///
/// [Public Route] Exchanges credentials for a signed bearer token. An unknown
/// username and a wrong password produce byte-identical failures, so the endpoint
/// never reveals whether an account exists.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state.repo.get_user_by_username(&payload.username).await?;

    let verified = match &user {
        Some(user) => auth::verify_password(&payload.password, &user.password_hash),
        None => false,
    };
    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::issue_token(&payload.username, &state.config)?;
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

// --- Blog Handlers ---

/// create_blog
///
/// [Authenticated Route] Publishes a new blog. The owner is stamped from the
/// authenticated caller, never from the payload, fixing ownership at creation.
#[utoipa::path(
    post,
    path = "/blogs",
    request_body = CreateBlogRequest,
    responses((status = 200, description = "Created", body = Blog))
)]
pub async fn create_blog(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<Json<Blog>, ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.content, "content")?;

    let blog = state.repo.create_blog(payload, id).await?;
    Ok(Json(blog))
}

/// get_my_blogs
///
/// [Authenticated Route] Lists all blogs owned by the requesting user. A fresh
/// account simply gets an empty list.
///
/// *Note*: The user identity (`id`) is resolved securely via the `AuthUser` extractor.
#[utoipa::path(
    get,
    path = "/me/blogs",
    responses((status = 200, description = "My Blogs", body = [Blog]))
)]
pub async fn get_my_blogs(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Blog>>, ApiError> {
    let blogs = state.repo.get_blogs_by_author(id).await?;
    Ok(Json(blogs))
}

/// get_blog_details
///
/// [Public Route] Retrieves a single blog by id. Blogs are publicly readable,
/// so existence is the only fact this endpoint reports.
#[utoipa::path(
    get,
    path = "/blogs/{id}",
    params(("id" = i64, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Blog>, ApiError> {
    match state.repo.get_blog(id).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::NotFound),
    }
}

/// update_blog
///
/// [Authenticated Route] Full replace of a blog's mutable fields.
///
/// *Authorization*: The repository statement updates only rows whose author
/// matches the caller, so "missing" and "owned by someone else" collapse into
/// the same `NotPermitted` outcome; a non-owner learns nothing about existence.
#[utoipa::path(
    put,
    path = "/blogs/{id}",
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = Blog),
        (status = 403, description = "Not Owner or Not Found")
    )
)]
pub async fn update_blog(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<Blog>, ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.content, "content")?;

    match state.repo.update_blog(id, user_id, payload).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::NotPermitted),
    }
}

/// delete_blog
///
/// [Authenticated Route] Allows a user to delete their own blog. Comments go
/// with it via the cascading foreign key.
///
/// *Authorization*: Same fused owner/existence gate as `update_blog`.
#[utoipa::path(
    delete,
    path = "/blogs/{id}",
    params(("id" = i64, Path, description = "Blog ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not Owner or Not Found")
    )
)]
pub async fn delete_blog(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_blog(id, user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotPermitted)
    }
}

// --- Comment Handlers ---

/// add_comment
///
/// [Authenticated Route] Posts a new comment on a blog. The insert is guarded by
/// an existence check on the target blog inside the same statement, so a comment
/// can never attach to a blog deleted a moment earlier.
#[utoipa::path(
    post,
    path = "/blogs/{id}/comments",
    params(("id" = i64, Path, description = "Blog ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment Added", body = Comment),
        (status = 404, description = "Blog Not Found")
    )
)]
pub async fn add_comment(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    require_non_empty(&payload.content, "content")?;

    match state
        .repo
        .add_comment(blog_id, user_id, payload.content)
        .await?
    {
        Some(comment) => Ok(Json(comment)),
        // Blogs are publicly readable, so reporting the missing parent leaks nothing.
        None => Err(ApiError::NotFound),
    }
}

/// get_comments
///
/// [Public Route] Retrieves all comments for a given blog, oldest first.
#[utoipa::path(
    get,
    path = "/blogs/{id}/comments",
    params(("id" = i64, Path, description = "Blog ID")),
    responses((status = 200, description = "Comments", body = [Comment]))
)]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.repo.get_comments(blog_id).await?;
    Ok(Json(comments))
}

/// delete_comment
///
/// [Authenticated Route] Allows a user to delete their own comment.
///
/// *Authorization*: Owner-fused delete; a non-author gets `NotPermitted` whether
/// or not the comment ever existed.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not Owner or Not Found")
    )
)]
pub async fn delete_comment(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_comment(id, user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotPermitted)
    }
}
