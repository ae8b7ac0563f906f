pub mod completions;
pub mod error;
pub mod external_links;
pub mod login_tokens;
pub mod profiles;
pub mod uploads;
pub mod users;
