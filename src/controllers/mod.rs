pub mod admin;
pub mod auth;
pub mod completions;
pub mod home;
pub mod me;
pub mod profiles;
