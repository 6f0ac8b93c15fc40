use deadpool_postgres::Pool;

use crate::db::{connection::DbConfig, error::Result, operations, schema};
use crate::models::{Follows, Likes, Message, TimelineMessage, User, UserEdit, UserProfile};

/// Handle to the Warbler database
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone)]
pub struct WarblerDb {
    pool: Pool,
}

impl WarblerDb {
    /// Create a new client from configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use warbler::db::{DbConfig, WarblerDb};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = DbConfig::from_connection_string("postgresql:///warbler")?;
    ///     let db = WarblerDb::new(config).await?;
    ///     db.create_all().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: DbConfig) -> Result<Self> {
        let pool = config.build_pool()?;

        // Test the connection
        let _conn = pool.get().await?;

        Ok(Self { pool })
    }

    /// Create any missing tables
    pub async fn create_all(&self) -> Result<()> {
        schema::create_all(&self.pool).await
    }

    /// Drop all tables
    pub async fn drop_all(&self) -> Result<()> {
        schema::drop_all(&self.pool).await
    }

    /// Sign up a new user, hashing their password
    ///
    /// # Example
    ///
    /// ```no_run
    /// use warbler::db::{DbConfig, WarblerDb};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let db = WarblerDb::new(DbConfig::default()).await?;
    ///     let user = db
    ///         .signup(Some("user"), Some("user@email.com"), Some("password"), None)
    ///         .await?;
    ///     println!("{}", user);
    ///     Ok(())
    /// }
    /// ```
    pub async fn signup(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<User> {
        operations::signup(&self.pool, username, email, password, image_url).await
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        operations::authenticate(&self.pool, username, password).await
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<User>> {
        operations::get_user(&self.pool, user_id).await
    }

    pub async fn search_users(&self, query: Option<&str>) -> Result<Vec<User>> {
        operations::search_users(&self.pool, query).await
    }

    pub async fn update_user(&self, user_id: i32, edit: &UserEdit) -> Result<User> {
        operations::update_user(&self.pool, user_id, edit).await
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<()> {
        operations::delete_user(&self.pool, user_id).await
    }

    pub async fn user_profile(&self, user_id: i32) -> Result<Option<UserProfile>> {
        operations::user_profile(&self.pool, user_id).await
    }

    pub async fn create_message(&self, user_id: i32, text: &str) -> Result<Message> {
        operations::create_message(&self.pool, user_id, text).await
    }

    pub async fn get_message(&self, message_id: i32) -> Result<Option<Message>> {
        operations::get_message(&self.pool, message_id).await
    }

    pub async fn delete_message(&self, message_id: i32) -> Result<bool> {
        operations::delete_message(&self.pool, message_id).await
    }

    pub async fn user_messages(&self, user_id: i32) -> Result<Vec<Message>> {
        operations::user_messages(&self.pool, user_id).await
    }

    pub async fn timeline(&self, user_id: i32) -> Result<Vec<TimelineMessage>> {
        operations::timeline(&self.pool, user_id).await
    }

    pub async fn follow(&self, follower_id: i32, followed_id: i32) -> Result<()> {
        operations::follow(&self.pool, follower_id, followed_id).await
    }

    pub async fn unfollow(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        operations::unfollow(&self.pool, follower_id, followed_id).await
    }

    pub async fn following(&self, user_id: i32) -> Result<Vec<User>> {
        operations::following(&self.pool, user_id).await
    }

    pub async fn followers(&self, user_id: i32) -> Result<Vec<User>> {
        operations::followers(&self.pool, user_id).await
    }

    pub async fn is_following(&self, user_id: i32, other_id: i32) -> Result<bool> {
        operations::is_following(&self.pool, user_id, other_id).await
    }

    pub async fn is_followed_by(&self, user_id: i32, other_id: i32) -> Result<bool> {
        operations::is_followed_by(&self.pool, user_id, other_id).await
    }

    pub async fn follow_edges(&self, user_id: i32) -> Result<Vec<Follows>> {
        operations::follow_edges(&self.pool, user_id).await
    }

    pub async fn add_like(&self, user_id: i32, message_id: i32) -> Result<()> {
        operations::add_like(&self.pool, user_id, message_id).await
    }

    pub async fn remove_like(&self, user_id: i32, message_id: i32) -> Result<bool> {
        operations::remove_like(&self.pool, user_id, message_id).await
    }

    /// Flip a like; returns `true` when the message ends up liked
    pub async fn toggle_like(&self, user_id: i32, message_id: i32) -> Result<bool> {
        operations::toggle_like(&self.pool, user_id, message_id).await
    }

    pub async fn user_likes(&self, user_id: i32) -> Result<Vec<Likes>> {
        operations::user_likes(&self.pool, user_id).await
    }

    pub async fn liked_message_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        operations::liked_message_ids(&self.pool, user_id).await
    }

    pub async fn liked_messages(&self, user_id: i32) -> Result<Vec<TimelineMessage>> {
        operations::liked_messages(&self.pool, user_id).await
    }
}
