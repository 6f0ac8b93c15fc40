// Row types for users, messages, follows and likes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::Row;

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never rendered
    #[serde(skip_serializing)]
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl User {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password: row.get("password"),
            image_url: row.get("image_url"),
            header_image_url: row.get("header_image_url"),
            bio: row.get("bio"),
            location: row.get("location"),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// A warble
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
}

impl Message {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            text: row.get("text"),
            timestamp: row.get("timestamp"),
            user_id: row.get("user_id"),
        }
    }
}

/// A message joined with the author fields needed to render it in a list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineMessage {
    pub message: Message,
    pub username: String,
    pub image_url: String,
}

impl TimelineMessage {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            message: Message::from_row(row),
            username: row.get("username"),
            image_url: row.get("image_url"),
        }
    }
}

/// Directed follow edge: `user_following_id` follows `user_being_followed_id`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Follows {
    pub user_being_followed_id: i32,
    pub user_following_id: i32,
}

impl Follows {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            user_being_followed_id: row.get("user_being_followed_id"),
            user_following_id: row.get("user_following_id"),
        }
    }
}

/// A user liking a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Likes {
    pub id: i32,
    pub user_id: i32,
    pub message_id: i32,
}

impl Likes {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            message_id: row.get("message_id"),
        }
    }
}

/// A user with the counters shown on the profile header
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    pub user: User,
    pub message_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub likes_count: i64,
}

/// Fields accepted when editing a profile; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserEdit {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}
