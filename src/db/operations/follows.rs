use deadpool_postgres::Pool;

use crate::db::error::{Error, Result};
use crate::models::{Follows, User};

/// Record that `follower_id` follows `followed_id`
///
/// Following someone twice is a no-op. Following yourself is rejected.
pub async fn follow(pool: &Pool, follower_id: i32, followed_id: i32) -> Result<()> {
    if follower_id == followed_id {
        return Err(Error::Validation("Users cannot follow themselves".to_string()));
    }

    let conn = pool.get().await?;
    conn.execute(
        "INSERT INTO follows (user_being_followed_id, user_following_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING",
        &[&followed_id, &follower_id],
    )
    .await?;

    tracing::debug!(follower_id, followed_id, "follow added");
    Ok(())
}

/// Remove a follow edge, returning whether one existed
pub async fn unfollow(pool: &Pool, follower_id: i32, followed_id: i32) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute(
            "DELETE FROM follows WHERE user_being_followed_id = $1 AND user_following_id = $2",
            &[&followed_id, &follower_id],
        )
        .await?;

    tracing::debug!(follower_id, followed_id, "follow removed");
    Ok(deleted > 0)
}

/// Users that `user_id` follows
pub async fn following(pool: &Pool, user_id: i32) -> Result<Vec<User>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT u.id, u.username, u.email, u.password, u.image_url, \
                    u.header_image_url, u.bio, u.location \
             FROM follows f JOIN users u ON u.id = f.user_being_followed_id \
             WHERE f.user_following_id = $1 \
             ORDER BY u.username",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(User::from_row).collect())
}

/// Users following `user_id`
pub async fn followers(pool: &Pool, user_id: i32) -> Result<Vec<User>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT u.id, u.username, u.email, u.password, u.image_url, \
                    u.header_image_url, u.bio, u.location \
             FROM follows f JOIN users u ON u.id = f.user_following_id \
             WHERE f.user_being_followed_id = $1 \
             ORDER BY u.username",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(User::from_row).collect())
}

/// Is `user_id` following `other_id`?
pub async fn is_following(pool: &Pool, user_id: i32, other_id: i32) -> Result<bool> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "SELECT EXISTS ( \
                 SELECT 1 FROM follows \
                 WHERE user_following_id = $1 AND user_being_followed_id = $2 \
             )",
            &[&user_id, &other_id],
        )
        .await?;
    Ok(row.get(0))
}

/// Is `user_id` followed by `other_id`?
pub async fn is_followed_by(pool: &Pool, user_id: i32, other_id: i32) -> Result<bool> {
    is_following(pool, other_id, user_id).await
}

/// Raw follow edges touching a user, in either direction
pub async fn follow_edges(pool: &Pool, user_id: i32) -> Result<Vec<Follows>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT user_being_followed_id, user_following_id FROM follows \
             WHERE user_being_followed_id = $1 OR user_following_id = $1",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(Follows::from_row).collect())
}
