pub mod activity;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod slug;
pub mod storage;

pub use db::create_pool;
