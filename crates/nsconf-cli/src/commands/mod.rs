pub mod auth;
pub mod catalog;
pub mod config;
pub mod edit;
pub mod record;
pub mod theme;
