//! Repository tests against a live Postgres instance.
//!
//! These exercise the parts an in-memory double cannot prove: the unique
//! constraints as the final arbiter of signup conflicts, the owner-fused
//! UPDATE/DELETE statements, the EXISTS guard on comment insertion, and the
//! cascading delete. Run with `cargo test -- --ignored` and a DATABASE_URL.

use blog_portal::{
    error::ApiError,
    models::{CreateBlogRequest, UpdateBlogRequest, User},
    repository::{PostgresRepository, Repository},
};
use serial_test::serial;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::test;

// --- Test Context and Setup ---

/// A simple structure to hold the database pool for testing
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

/// Produces a username unique across test runs so reruns never collide with
/// rows left by a previous invocation.
fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}_{nanos}")
}

async fn create_test_user(repo: &PostgresRepository, prefix: &str) -> User {
    let username = unique_name(prefix);
    let email = format!("{username}@test.com");
    repo.create_user(&username, &email, "$argon2id$test-verifier")
        .await
        .expect("Failed to create test user")
}

// --- Tests ---

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
#[serial]
async fn test_duplicate_username_surfaces_as_conflict() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let user = create_test_user(&repo, "dup").await;

    // Same username, different email: the unique constraint must fire even
    // though no application-level pre-check ran here.
    let err = repo
        .create_user(&user.username, "other@test.com", "$argon2id$test-verifier")
        .await
        .expect_err("second insert should violate the unique constraint");

    let api_err: ApiError = err.into();
    assert!(matches!(api_err, ApiError::Conflict));
}

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
#[serial]
async fn test_update_and_delete_blog_ownership() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let owner = create_test_user(&repo, "owner").await;
    let non_owner = create_test_user(&repo, "nonowner").await;

    let blog = repo
        .create_blog(
            CreateBlogRequest {
                title: "To Update".to_string(),
                content: "Original body".to_string(),
                image_url: None,
            },
            owner.id,
        )
        .await
        .expect("Failed to create test blog");

    let update_req = UpdateBlogRequest {
        title: "New Title".to_string(),
        content: "New body".to_string(),
        image_url: Some("cover.png".to_string()),
    };

    // Test 1: Update by Non-Owner (Should fail)
    let updated_fail = repo
        .update_blog(blog.id, non_owner.id, update_req.clone())
        .await
        .unwrap();
    assert!(updated_fail.is_none(), "Non-owner should not be able to update.");

    // Test 2: Update by Owner (Should succeed)
    let updated = repo
        .update_blog(blog.id, owner.id, update_req)
        .await
        .unwrap();
    assert_eq!(updated.unwrap().title, "New Title");

    // Test 3: Delete by Non-Owner (Should fail)
    let delete_fail = repo.delete_blog(blog.id, non_owner.id).await.unwrap();
    assert!(!delete_fail, "Non-owner should not be able to delete.");

    // Test 4: Delete by Owner (Should succeed)
    let delete_success = repo.delete_blog(blog.id, owner.id).await.unwrap();
    assert!(delete_success, "Owner should be able to delete.");

    // Verify deletion
    let deleted = repo.get_blog(blog.id).await.unwrap();
    assert!(deleted.is_none());
}

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
#[serial]
async fn test_comment_requires_existing_blog_and_cascades() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let author = create_test_user(&repo, "commenter").await;

    let blog = repo
        .create_blog(
            CreateBlogRequest {
                title: "Comment Test".to_string(),
                content: "Body".to_string(),
                image_url: None,
            },
            author.id,
        )
        .await
        .unwrap();

    // 1. Comment against a blog id that does not exist: guarded insert yields None.
    let orphan = repo
        .add_comment(i64::MAX, author.id, "into the void".to_string())
        .await
        .unwrap();
    assert!(orphan.is_none());

    // 2. Comment against the real blog succeeds.
    let comment = repo
        .add_comment(blog.id, author.id, "This is a great post!".to_string())
        .await
        .unwrap()
        .expect("comment should insert");
    assert_eq!(comment.blog_id, blog.id);

    let comments = repo.get_comments(blog.id).await.unwrap();
    assert_eq!(comments.len(), 1);

    // 3. Non-author cannot delete the comment.
    let other = create_test_user(&repo, "other").await;
    let delete_fail = repo.delete_comment(comment.id, other.id).await.unwrap();
    assert!(!delete_fail);

    // 4. Deleting the blog cascades to its comments.
    assert!(repo.delete_blog(blog.id, author.id).await.unwrap());
    let comments_after = repo.get_comments(blog.id).await.unwrap();
    assert!(comments_after.is_empty());
}
