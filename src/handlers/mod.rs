// Handlers module

pub mod auth;
pub mod home;
pub mod messages;
pub mod users;

pub use home::homepage;
