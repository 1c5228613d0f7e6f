pub mod agent;
pub mod auth;
pub mod comments;
pub mod goals;
pub mod organizations;
pub mod preferences;
pub mod users;
