pub mod files;
pub mod grants;
pub mod health;
pub mod messages;
pub mod sessions;
