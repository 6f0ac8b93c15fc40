pub mod follows;
pub mod likes;
pub mod messages;
pub mod users;

pub use follows::{follow, follow_edges, followers, following, is_followed_by, is_following, unfollow};
pub use likes::{add_like, liked_message_ids, liked_messages, remove_like, toggle_like, user_likes};
pub use messages::{create_message, delete_message, get_message, timeline, user_messages};
pub use users::{
    authenticate, delete_user, get_user, hash_password, search_users, signup, update_user,
    user_profile, verify_password,
};
