//! Table definitions for the Warbler schema

use deadpool_postgres::Pool;

use crate::db::error::Result;
use crate::models::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

fn create_tables_sql() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    image_url TEXT NOT NULL DEFAULT '{image_url}',
    header_image_url TEXT NOT NULL DEFAULT '{header_image_url}',
    bio TEXT,
    location TEXT,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id SERIAL PRIMARY KEY,
    text VARCHAR(140) NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
    user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS messages_user_id_timestamp_idx
    ON messages (user_id, timestamp DESC);

CREATE TABLE IF NOT EXISTS follows (
    user_being_followed_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    user_following_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    PRIMARY KEY (user_being_followed_id, user_following_id)
);

CREATE TABLE IF NOT EXISTS likes (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    message_id INTEGER NOT NULL REFERENCES messages (id) ON DELETE CASCADE,
    UNIQUE (user_id, message_id)
);
"#,
        image_url = DEFAULT_IMAGE_URL,
        header_image_url = DEFAULT_HEADER_IMAGE_URL,
    )
}

const DROP_TABLES: &str = r#"
DROP TABLE IF EXISTS likes;
DROP TABLE IF EXISTS follows;
DROP TABLE IF EXISTS messages;
DROP TABLE IF EXISTS users;
"#;

/// Create every table that doesn't exist yet
pub async fn create_all(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;
    conn.batch_execute(&create_tables_sql()).await?;
    tracing::debug!("schema created");
    Ok(())
}

/// Drop every table, data included
pub async fn drop_all(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;
    conn.batch_execute(DROP_TABLES).await?;
    tracing::debug!("schema dropped");
    Ok(())
}
