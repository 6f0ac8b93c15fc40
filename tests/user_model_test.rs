mod common;

use testcontainers::clients::Cli;
use warbler::db::Error;
use warbler::models::{UserEdit, DEFAULT_IMAGE_URL};

// Keeps _docker and _container alive for the duration of the test
macro_rules! setup_test {
    ($docker:ident, $container:ident, $db:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());
        let $db = common::connect(&$container).await;
    };
}

// ============================================================================
// basic model
// ============================================================================

#[tokio::test]
async fn test_user_model() {
    setup_test!(_docker, _container, db);

    let user = db
        .signup(Some("testuser"), Some("test@test.com"), Some("HASHED_PASSWORD"), None)
        .await
        .expect("Failed to sign up");

    // User should have no messages, followers, or likes
    assert!(db.user_messages(user.id).await.unwrap().is_empty());
    assert!(db.followers(user.id).await.unwrap().is_empty());
    assert!(db.following(user.id).await.unwrap().is_empty());
    assert!(db.user_likes(user.id).await.unwrap().is_empty());

    let profile = db.user_profile(user.id).await.unwrap().unwrap();
    assert_eq!(profile.message_count, 0);
    assert_eq!(profile.followers_count, 0);
    assert_eq!(profile.following_count, 0);
    assert_eq!(profile.likes_count, 0);
}

#[tokio::test]
async fn test_user_display() {
    setup_test!(_docker, _container, db);

    let user = db
        .signup(Some("testuser"), Some("test@test.com"), Some("HASHED_PASSWORD"), None)
        .await
        .unwrap();

    assert_eq!(
        user.to_string(),
        format!("<User #{}: testuser, test@test.com>", user.id)
    );
}

// ============================================================================
// follows
// ============================================================================

#[tokio::test]
async fn test_user_follows() {
    setup_test!(_docker, _container, db);

    let u1 = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    let u2 = db
        .signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    db.follow(u1.id, u2.id).await.unwrap();

    let u1_following = db.following(u1.id).await.unwrap();
    let u1_followers = db.followers(u1.id).await.unwrap();
    let u2_following = db.following(u2.id).await.unwrap();
    let u2_followers = db.followers(u2.id).await.unwrap();

    assert_eq!(u2_following.len(), 0);
    assert_eq!(u2_followers.len(), 1);
    assert_eq!(u1_following.len(), 1);
    assert_eq!(u1_followers.len(), 0);

    assert_eq!(u2_followers[0].id, u1.id);
    assert_eq!(u1_following[0].id, u2.id);

    let edges = db.follow_edges(u1.id).await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].user_following_id, u1.id);
    assert_eq!(edges[0].user_being_followed_id, u2.id);
}

#[tokio::test]
async fn test_is_following() {
    setup_test!(_docker, _container, db);

    let u1 = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    let u2 = db
        .signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    db.follow(u1.id, u2.id).await.unwrap();

    assert!(db.is_following(u1.id, u2.id).await.unwrap());
    assert!(!db.is_following(u2.id, u1.id).await.unwrap());

    assert!(db.unfollow(u1.id, u2.id).await.unwrap());
    assert!(!db.is_following(u1.id, u2.id).await.unwrap());
    assert!(!db.unfollow(u1.id, u2.id).await.unwrap());
}

#[tokio::test]
async fn test_is_followed_by() {
    setup_test!(_docker, _container, db);

    let u1 = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    let u2 = db
        .signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    db.follow(u1.id, u2.id).await.unwrap();

    assert!(db.is_followed_by(u2.id, u1.id).await.unwrap());
    assert!(!db.is_followed_by(u1.id, u2.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_twice_and_self_follow() {
    setup_test!(_docker, _container, db);

    let u1 = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    let u2 = db
        .signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    db.follow(u1.id, u2.id).await.unwrap();
    db.follow(u1.id, u2.id).await.unwrap();
    assert_eq!(db.followers(u2.id).await.unwrap().len(), 1);

    let err = db.follow(u1.id, u1.id).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

// ============================================================================
// signup
// ============================================================================

#[tokio::test]
async fn test_valid_signup() {
    setup_test!(_docker, _container, db);

    let user = db
        .signup(Some("testtesttest"), Some("testtest@test.com"), Some("password"), None)
        .await
        .unwrap();

    let stored = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "testtesttest");
    assert_eq!(stored.email, "testtest@test.com");
    assert_eq!(stored.image_url, DEFAULT_IMAGE_URL);
    assert_ne!(stored.password, "password");
    // Argon2 PHC strings start with $argon2
    assert!(stored.password.starts_with("$argon2"));
}

#[tokio::test]
async fn test_invalid_username_signup() {
    setup_test!(_docker, _container, db);

    let err = db
        .signup(None, Some("test@test.com"), Some("password"), None)
        .await
        .unwrap_err();
    assert!(err.is_integrity(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_invalid_email_signup() {
    setup_test!(_docker, _container, db);

    let err = db
        .signup(Some("testtest"), None, Some("password"), None)
        .await
        .unwrap_err();
    assert!(err.is_integrity(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_invalid_password_signup() {
    setup_test!(_docker, _container, db);

    let err = db
        .signup(Some("testtest"), Some("email@email.com"), Some(""), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = db
        .signup(Some("testtest"), Some("email@email.com"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_duplicate_username_signup() {
    setup_test!(_docker, _container, db);

    db.signup(Some("taken"), Some("one@email.com"), Some("password"), None)
        .await
        .unwrap();
    let err = db
        .signup(Some("taken"), Some("two@email.com"), Some("password"), None)
        .await
        .unwrap_err();
    assert!(err.is_integrity());
}

// ============================================================================
// authenticate
// ============================================================================

#[tokio::test]
async fn test_valid_authentication() {
    setup_test!(_docker, _container, db);

    let user = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();

    let authed = db.authenticate("test1", "password").await.unwrap().unwrap();
    assert_eq!(authed.id, user.id);
}

#[tokio::test]
async fn test_invalid_username() {
    setup_test!(_docker, _container, db);

    db.signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();

    assert!(db.authenticate("badusername", "password").await.unwrap().is_none());
}

#[tokio::test]
async fn test_wrong_password() {
    setup_test!(_docker, _container, db);

    db.signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();

    assert!(db.authenticate("test1", "badpassword").await.unwrap().is_none());
}

// ============================================================================
// search, update, delete
// ============================================================================

#[tokio::test]
async fn test_search_users() {
    setup_test!(_docker, _container, db);

    for (name, email) in [
        ("alice", "alice@email.com"),
        ("alicia", "alicia@email.com"),
        ("bob", "bob@email.com"),
    ] {
        db.signup(Some(name), Some(email), Some("password"), None)
            .await
            .unwrap();
    }

    assert_eq!(db.search_users(None).await.unwrap().len(), 3);

    let found = db.search_users(Some("ALI")).await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"alice"));
    assert!(names.contains(&"alicia"));

    // LIKE wildcards are matched literally
    assert!(db.search_users(Some("%")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user() {
    setup_test!(_docker, _container, db);

    let user = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    db.signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    let edit = UserEdit {
        bio: Some("Hello there".to_string()),
        location: Some("Nowhere".to_string()),
        ..Default::default()
    };
    let updated = db.update_user(user.id, &edit).await.unwrap();
    assert_eq!(updated.username, "test1");
    assert_eq!(updated.bio.as_deref(), Some("Hello there"));
    assert_eq!(updated.location.as_deref(), Some("Nowhere"));

    let taken = UserEdit {
        username: Some("test2".to_string()),
        ..Default::default()
    };
    assert!(db.update_user(user.id, &taken).await.unwrap_err().is_integrity());
}

#[tokio::test]
async fn test_delete_user_cascades() {
    setup_test!(_docker, _container, db);

    let u1 = db
        .signup(Some("test1"), Some("email1@email.com"), Some("password"), None)
        .await
        .unwrap();
    let u2 = db
        .signup(Some("test2"), Some("email2@email.com"), Some("password"), None)
        .await
        .unwrap();

    let msg = db.create_message(u1.id, "soon gone").await.unwrap();
    db.follow(u2.id, u1.id).await.unwrap();
    db.add_like(u2.id, msg.id).await.unwrap();

    db.delete_user(u1.id).await.unwrap();

    assert!(db.get_user(u1.id).await.unwrap().is_none());
    assert!(db.get_message(msg.id).await.unwrap().is_none());
    assert!(db.following(u2.id).await.unwrap().is_empty());
    assert!(db.user_likes(u2.id).await.unwrap().is_empty());

    assert!(matches!(db.delete_user(u1.id).await, Err(Error::NotFound(_))));
}
