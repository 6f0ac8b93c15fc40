mod common;

use testcontainers::clients::Cli;
use warbler::db::Error;

macro_rules! setup_test {
    ($docker:ident, $container:ident, $db:ident, $user:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());
        let $db = common::connect(&$container).await;
        let $user = $db
            .signup(Some("testing"), Some("testing@test.com"), Some("password"), None)
            .await
            .expect("Failed to sign up");
    };
}

#[tokio::test]
async fn test_message_model() {
    setup_test!(_docker, _container, db, user);

    let msg = db.create_message(user.id, "a warble").await.unwrap();
    assert_eq!(msg.user_id, user.id);

    let messages = db.user_messages(user.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "a warble");
}

#[tokio::test]
async fn test_message_likes() {
    setup_test!(_docker, _container, db, user);

    let m1 = db.create_message(user.id, "a warble").await.unwrap();
    let m2 = db.create_message(user.id, "a very interesting warble").await.unwrap();

    let other = db
        .signup(Some("yetanothertest"), Some("t@email.com"), Some("password"), None)
        .await
        .unwrap();
    let m3 = db.create_message(other.id, "another warble").await.unwrap();

    db.add_like(user.id, m3.id).await.unwrap();

    let likes = db.user_likes(user.id).await.unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].message_id, m3.id);
    assert_eq!(likes[0].user_id, user.id);

    // Liking twice keeps a single row
    db.add_like(user.id, m3.id).await.unwrap();
    assert_eq!(db.user_likes(user.id).await.unwrap().len(), 1);

    assert!(db.user_likes(other.id).await.unwrap().is_empty());
    assert!(!db.liked_message_ids(user.id).await.unwrap().contains(&m1.id));
    assert!(!db.liked_message_ids(user.id).await.unwrap().contains(&m2.id));
}

#[tokio::test]
async fn test_toggle_like() {
    setup_test!(_docker, _container, db, user);

    let other = db
        .signup(Some("other"), Some("other@email.com"), Some("password"), None)
        .await
        .unwrap();
    let msg = db.create_message(other.id, "likeable").await.unwrap();

    assert!(db.toggle_like(user.id, msg.id).await.unwrap());
    assert_eq!(db.liked_message_ids(user.id).await.unwrap(), vec![msg.id]);

    let liked = db.liked_messages(user.id).await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].username, "other");

    assert!(!db.toggle_like(user.id, msg.id).await.unwrap());
    assert!(db.user_likes(user.id).await.unwrap().is_empty());
    assert!(!db.remove_like(user.id, msg.id).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_toggles_alternate() {
    setup_test!(_docker, _container, db, user);

    let other = db
        .signup(Some("other"), Some("other@email.com"), Some("password"), None)
        .await
        .unwrap();
    let msg = db.create_message(other.id, "popular").await.unwrap();

    let (a, b) = tokio::join!(
        db.toggle_like(user.id, msg.id),
        db.toggle_like(user.id, msg.id)
    );
    let mut results = vec![a.unwrap(), b.unwrap()];
    results.sort();

    // One toggle liked, the other undid it
    assert_eq!(results, vec![false, true]);
    assert!(db.user_likes(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_message_validation() {
    setup_test!(_docker, _container, db, user);

    assert!(matches!(
        db.create_message(user.id, "").await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        db.create_message(user.id, &"x".repeat(141)).await,
        Err(Error::Validation(_))
    ));
    assert!(db.create_message(user.id, &"x".repeat(140)).await.is_ok());
}

#[tokio::test]
async fn test_delete_message_removes_likes() {
    setup_test!(_docker, _container, db, user);

    let other = db
        .signup(Some("other"), Some("other@email.com"), Some("password"), None)
        .await
        .unwrap();
    let msg = db.create_message(other.id, "short lived").await.unwrap();
    db.add_like(user.id, msg.id).await.unwrap();

    assert!(db.delete_message(msg.id).await.unwrap());
    assert!(db.get_message(msg.id).await.unwrap().is_none());
    assert!(db.user_likes(user.id).await.unwrap().is_empty());
    assert!(!db.delete_message(msg.id).await.unwrap());
}

#[tokio::test]
async fn test_timeline() {
    setup_test!(_docker, _container, db, user);

    let followed = db
        .signup(Some("followed"), Some("followed@email.com"), Some("password"), None)
        .await
        .unwrap();
    let stranger = db
        .signup(Some("stranger"), Some("stranger@email.com"), Some("password"), None)
        .await
        .unwrap();

    db.follow(user.id, followed.id).await.unwrap();
    db.create_message(user.id, "mine").await.unwrap();
    db.create_message(followed.id, "theirs").await.unwrap();
    db.create_message(stranger.id, "hidden").await.unwrap();

    let timeline = db.timeline(user.id).await.unwrap();
    let texts: Vec<_> = timeline.iter().map(|m| m.message.text.as_str()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"mine"));
    assert!(texts.contains(&"theirs"));
    assert!(!texts.contains(&"hidden"));

    // Newest first
    for pair in timeline.windows(2) {
        assert!(pair[0].message.timestamp >= pair[1].message.timestamp);
    }
}
