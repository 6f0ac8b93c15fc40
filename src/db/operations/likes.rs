use deadpool_postgres::Pool;

use crate::db::error::Result;
use crate::models::{Likes, TimelineMessage};

pub async fn add_like(pool: &Pool, user_id: i32, message_id: i32) -> Result<()> {
    let conn = pool.get().await?;
    conn.execute(
        "INSERT INTO likes (user_id, message_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        &[&user_id, &message_id],
    )
    .await?;
    Ok(())
}

/// Remove a like, returning whether one existed
pub async fn remove_like(pool: &Pool, user_id: i32, message_id: i32) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute(
            "DELETE FROM likes WHERE user_id = $1 AND message_id = $2",
            &[&user_id, &message_id],
        )
        .await?;
    Ok(deleted > 0)
}

/// Like the message if it isn't liked yet, otherwise unlike it
///
/// Returns `true` when the message ends up liked. Toggles of the same
/// user/message pair are serialized with a transaction-scoped advisory lock.
pub async fn toggle_like(pool: &Pool, user_id: i32, message_id: i32) -> Result<bool> {
    let mut conn = pool.get().await?;
    let tx = conn.transaction().await?;

    tx.execute("SELECT pg_advisory_xact_lock($1, $2)", &[&user_id, &message_id])
        .await?;

    let removed = tx
        .execute(
            "DELETE FROM likes WHERE user_id = $1 AND message_id = $2",
            &[&user_id, &message_id],
        )
        .await?;

    let liked = if removed > 0 {
        false
    } else {
        tx.execute(
            "INSERT INTO likes (user_id, message_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            &[&user_id, &message_id],
        )
        .await?;
        true
    };

    tx.commit().await?;
    tracing::debug!(user_id, message_id, liked, "like toggled");
    Ok(liked)
}

/// Like rows belonging to a user
pub async fn user_likes(pool: &Pool, user_id: i32) -> Result<Vec<Likes>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, user_id, message_id FROM likes WHERE user_id = $1 ORDER BY id",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(Likes::from_row).collect())
}

/// Ids of every message a user likes
pub async fn liked_message_ids(pool: &Pool, user_id: i32) -> Result<Vec<i32>> {
    let conn = pool.get().await?;
    let rows = conn
        .query("SELECT message_id FROM likes WHERE user_id = $1", &[&user_id])
        .await?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Messages a user likes with their authors, newest first
pub async fn liked_messages(pool: &Pool, user_id: i32) -> Result<Vec<TimelineMessage>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT m.id, m.text, m.timestamp, m.user_id, u.username, u.image_url \
             FROM likes l \
             JOIN messages m ON m.id = l.message_id \
             JOIN users u ON u.id = m.user_id \
             WHERE l.user_id = $1 \
             ORDER BY m.timestamp DESC, m.id DESC",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(TimelineMessage::from_row).collect())
}
