use deadpool_postgres::Pool;

use crate::db::error::{Error, Result};
use crate::models::{Message, TimelineMessage};

/// Most messages shown on any single page
pub const MESSAGE_LIMIT: i64 = 100;

/// Longest accepted warble, matching the `VARCHAR(140)` column
pub const MAX_MESSAGE_LENGTH: usize = 140;

pub async fn create_message(pool: &Pool, user_id: i32, text: &str) -> Result<Message> {
    if text.trim().is_empty() {
        return Err(Error::Validation("Message text must be non-empty".to_string()));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(Error::Validation(format!(
            "Message text must be at most {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }

    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO messages (text, user_id) VALUES ($1, $2) \
             RETURNING id, text, timestamp, user_id",
            &[&text, &user_id],
        )
        .await?;

    let message = Message::from_row(&row);
    tracing::debug!(message_id = message.id, user_id, "message created");
    Ok(message)
}

pub async fn get_message(pool: &Pool, message_id: i32) -> Result<Option<Message>> {
    let conn = pool.get().await?;
    let row = conn
        .query_opt(
            "SELECT id, text, timestamp, user_id FROM messages WHERE id = $1",
            &[&message_id],
        )
        .await?;
    Ok(row.map(|row| Message::from_row(&row)))
}

/// Delete a message, returning whether a row was removed
pub async fn delete_message(pool: &Pool, message_id: i32) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute("DELETE FROM messages WHERE id = $1", &[&message_id])
        .await?;
    Ok(deleted > 0)
}

/// A user's own messages, newest first
pub async fn user_messages(pool: &Pool, user_id: i32) -> Result<Vec<Message>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, text, timestamp, user_id FROM messages \
             WHERE user_id = $1 \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $2",
            &[&user_id, &MESSAGE_LIMIT],
        )
        .await?;
    Ok(rows.iter().map(Message::from_row).collect())
}

/// Messages by the user and everyone they follow, newest first
pub async fn timeline(pool: &Pool, user_id: i32) -> Result<Vec<TimelineMessage>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT m.id, m.text, m.timestamp, m.user_id, u.username, u.image_url \
             FROM messages m \
             JOIN users u ON u.id = m.user_id \
             WHERE m.user_id = $1 \
                OR m.user_id IN ( \
                    SELECT user_being_followed_id FROM follows WHERE user_following_id = $1 \
                ) \
             ORDER BY m.timestamp DESC, m.id DESC \
             LIMIT $2",
            &[&user_id, &MESSAGE_LIMIT],
        )
        .await?;
    Ok(rows.iter().map(TimelineMessage::from_row).collect())
}
