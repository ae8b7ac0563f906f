pub mod error;
pub mod login_code;
pub mod token;

pub use login_code::generate_login_code;
pub use token::{TokenPair, decode_access_token, decode_refresh_token, issue_token_pair};
