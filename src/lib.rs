// Warbler: a small Twitter-style web application

pub mod config;
pub mod context;
pub mod db;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod templates;
