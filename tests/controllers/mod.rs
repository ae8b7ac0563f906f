mod admin;
mod auth;
mod completions;
mod home;
