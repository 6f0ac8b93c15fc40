use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use deadpool_postgres::Pool;

use crate::db::error::{Error, Result};
use crate::models::{User, UserEdit, UserProfile, DEFAULT_IMAGE_URL};

const USER_COLUMNS: &str =
    "id, username, email, password, image_url, header_image_url, bio, location";

/// Generates a new password hash using argon2.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Uses argon2 to verify a stored hash against the provided password.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("failed to parse password hash: {}", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

/// Create a user with a hashed password
///
/// The password is checked before anything is written: a missing or empty
/// password is a validation error. Username and email are left to the
/// table's NOT NULL and UNIQUE constraints, which surface as
/// `Error::Integrity`. An absent or blank image URL gets the default image.
pub async fn signup(
    pool: &Pool,
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    image_url: Option<&str>,
) -> Result<User> {
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(Error::Validation("Password must be non-empty".to_string())),
    };
    let hashed = hash_password(password)?;
    let image_url = image_url.filter(|url| !url.trim().is_empty());

    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO users (username, email, password, image_url) \
         VALUES ($1, $2, $3, COALESCE($4::TEXT, '{}')) \
         RETURNING {}",
        DEFAULT_IMAGE_URL,
        USER_COLUMNS
    );
    let row = conn
        .query_one(&sql, &[&username, &email, &hashed, &image_url])
        .await?;

    let user = User::from_row(&row);
    tracing::info!(user_id = user.id, username = %user.username, "user signed up");
    Ok(user)
}

/// Find a user by username and check their password
///
/// Returns `None` for an unknown username or a wrong password.
pub async fn authenticate(pool: &Pool, username: &str, password: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let row = conn.query_opt(&sql, &[&username]).await?;

    Ok(row
        .map(|row| User::from_row(&row))
        .filter(|user| verify_password(&user.password, password)))
}

pub async fn get_user(pool: &Pool, user_id: i32) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let row = conn.query_opt(&sql, &[&user_id]).await?;
    Ok(row.map(|row| User::from_row(&row)))
}

/// List users, optionally narrowed to usernames containing `query`
pub async fn search_users(pool: &Pool, query: Option<&str>) -> Result<Vec<User>> {
    let conn = pool.get().await?;
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let rows = match query {
        Some(q) => {
            let sql = format!(
                "SELECT {} FROM users WHERE username ILIKE $1 ORDER BY username",
                USER_COLUMNS
            );
            let pattern = format!("%{}%", escape_like(q));
            conn.query(&sql, &[&pattern]).await?
        }
        None => {
            let sql = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
            conn.query(&sql, &[]).await?
        }
    };

    Ok(rows.iter().map(User::from_row).collect())
}

/// Apply a profile edit and return the updated user
pub async fn update_user(pool: &Pool, user_id: i32, edit: &UserEdit) -> Result<User> {
    let conn = pool.get().await?;
    let sql = format!(
        "UPDATE users SET \
             username = COALESCE($2, username), \
             email = COALESCE($3, email), \
             image_url = COALESCE($4, image_url), \
             header_image_url = COALESCE($5, header_image_url), \
             bio = COALESCE($6, bio), \
             location = COALESCE($7, location) \
         WHERE id = $1 \
         RETURNING {}",
        USER_COLUMNS
    );
    let row = conn
        .query_opt(
            &sql,
            &[
                &user_id,
                &edit.username,
                &edit.email,
                &edit.image_url,
                &edit.header_image_url,
                &edit.bio,
                &edit.location,
            ],
        )
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

    Ok(User::from_row(&row))
}

/// Delete a user; their messages, follows and likes go with them
pub async fn delete_user(pool: &Pool, user_id: i32) -> Result<()> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute("DELETE FROM users WHERE id = $1", &[&user_id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound(format!("user {}", user_id)));
    }
    tracing::info!(user_id, "user deleted");
    Ok(())
}

/// Load a user together with their message, follower, following and like counts
pub async fn user_profile(pool: &Pool, user_id: i32) -> Result<Option<UserProfile>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {}, \
             (SELECT COUNT(*) FROM messages WHERE user_id = users.id) AS message_count, \
             (SELECT COUNT(*) FROM follows WHERE user_being_followed_id = users.id) AS followers_count, \
             (SELECT COUNT(*) FROM follows WHERE user_following_id = users.id) AS following_count, \
             (SELECT COUNT(*) FROM likes WHERE user_id = users.id) AS likes_count \
         FROM users WHERE id = $1",
        USER_COLUMNS
    );
    let row = conn.query_opt(&sql, &[&user_id]).await?;

    Ok(row.map(|row| UserProfile {
        user: User::from_row(&row),
        message_count: row.get("message_count"),
        followers_count: row.get("followers_count"),
        following_count: row.get("following_count"),
        likes_count: row.get("likes_count"),
    }))
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
