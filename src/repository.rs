use crate::models::{Blog, Comment, CreateBlogRequest, UpdateBlogRequest, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// Authorization decisions do not live here; the handlers own the allow/deny logic.
/// What this layer does guarantee is that every owner-scoped mutation carries its
/// ownership predicate inside the SQL statement itself, so the existence check and
/// the mutation are a single atomic operation with respect to concurrent writers.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Credentials ---
    // Pure lookup by the case-sensitive login key.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error>;
    // Inserts a new identity record. The unique constraints on username and email
    // are the final arbiter: a violation surfaces as a database error here rather
    // than being masked by the handler's pre-check.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;

    // --- Blogs ---
    async fn create_blog(
        &self,
        req: CreateBlogRequest,
        author_id: i64,
    ) -> Result<Blog, sqlx::Error>;
    // Public single-blog read, no ownership involved.
    async fn get_blog(&self, id: i64) -> Result<Option<Blog>, sqlx::Error>;
    // Owner-filtered listing; an unknown author simply yields an empty vector.
    async fn get_blogs_by_author(&self, author_id: i64) -> Result<Vec<Blog>, sqlx::Error>;
    // Owner-Only: full replace of the mutable fields, applied only when the
    // author_id matches. Returns None when the blog is missing OR not owned.
    async fn update_blog(
        &self,
        id: i64,
        author_id: i64,
        req: UpdateBlogRequest,
    ) -> Result<Option<Blog>, sqlx::Error>;
    // Owner-Only: returns true only if a row was actually deleted.
    async fn delete_blog(&self, id: i64, author_id: i64) -> Result<bool, sqlx::Error>;

    // --- Comments ---
    // Inserts a comment only if the target blog exists; returns None otherwise.
    async fn add_comment(
        &self,
        blog_id: i64,
        author_id: i64,
        content: String,
    ) -> Result<Option<Comment>, sqlx::Error>;
    async fn get_comments(&self, blog_id: i64) -> Result<Vec<Comment>, sqlx::Error>;
    // Owner-Only: returns true only if a row was actually deleted.
    async fn delete_comment(&self, id: i64, author_id: i64) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BLOG_COLUMNS: &str = "id, title, content, image_url, author_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, blog_id, author_id, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    /// get_user_by_username
    ///
    /// Case-sensitive lookup by the login key. Used by login and by the auth
    /// extractor when it re-resolves a token subject to a live record.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// create_user
    ///
    /// Inserts the identity record and returns it with the generated id. Stores
    /// only the password verifier; the raw password never reaches this layer.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, email, password_hash)
               VALUES ($1, $2, $3)
               RETURNING id, username, email, password_hash"#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// create_blog
    ///
    /// Inserts a new blog owned by `author_id`. Ownership is fixed here, at
    /// creation, and no code path ever updates the author column afterwards.
    async fn create_blog(
        &self,
        req: CreateBlogRequest,
        author_id: i64,
    ) -> Result<Blog, sqlx::Error> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"INSERT INTO blogs (title, content, image_url, author_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, NOW(), NOW())
               RETURNING {BLOG_COLUMNS}"#,
        ))
        .bind(req.title)
        .bind(req.content)
        .bind(req.image_url)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
    }

    /// get_blog
    ///
    /// Simple retrieval of any blog by id. Blogs are publicly readable, so there
    /// is no caller parameter here.
    async fn get_blog(&self, id: i64) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// get_blogs_by_author
    ///
    /// Retrieves all blogs owned by the given user, newest first.
    async fn get_blogs_by_author(&self, author_id: i64) -> Result<Vec<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE author_id = $1 ORDER BY created_at DESC",
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
    }

    /// update_blog
    ///
    /// Full replace of the mutable fields, applied only when `author_id` matches
    /// the stored owner. The ownership predicate lives inside the UPDATE itself,
    /// so a concurrent delete cannot slip between a check and the write. A result
    /// of None does not say whether the blog was missing or merely not owned.
    async fn update_blog(
        &self,
        id: i64,
        author_id: i64,
        req: UpdateBlogRequest,
    ) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"UPDATE blogs
               SET title = $3, content = $4, image_url = $5, updated_at = NOW()
               WHERE id = $1 AND author_id = $2
               RETURNING {BLOG_COLUMNS}"#,
        ))
        .bind(id)
        .bind(author_id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.image_url)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_blog
    ///
    /// Deletes a blog only if the provided `author_id` matches the owner. The
    /// ON DELETE CASCADE constraint removes the blog's comments in the same
    /// transaction.
    async fn delete_blog(&self, id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// add_comment
    ///
    /// Inserts a comment guarded by an EXISTS check on the parent blog, all in a
    /// single statement. A vanished blog yields None instead of an orphaned row,
    /// and a blog deleted concurrently cannot acquire a comment mid-flight.
    async fn add_comment(
        &self,
        blog_id: i64,
        author_id: i64,
        content: String,
    ) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"INSERT INTO comments (content, blog_id, author_id, created_at)
               SELECT $3, $1, $2, NOW()
               WHERE EXISTS (SELECT 1 FROM blogs WHERE id = $1)
               RETURNING {COMMENT_COLUMNS}"#,
        ))
        .bind(blog_id)
        .bind(author_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    /// get_comments
    ///
    /// Retrieves all comments for a blog, oldest first.
    async fn get_comments(&self, blog_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE blog_id = $1 ORDER BY created_at ASC",
        ))
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await
    }

    /// delete_comment
    ///
    /// Deletes a comment only if the provided `author_id` matches the comment author.
    /// **Owner-Only** check, fused into the DELETE statement.
    async fn delete_comment(&self, id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
