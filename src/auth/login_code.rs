use rand::{Rng, distr::Alphanumeric};

const LOGIN_CODE_LENGTH: usize = 40;

/// One-time code embedded in the magic login link.
pub fn generate_login_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LOGIN_CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{LOGIN_CODE_LENGTH, generate_login_code};

    #[test]
    fn codes_are_url_safe_and_unique() {
        let first = generate_login_code();
        let second = generate_login_code();

        assert_eq!(first.len(), LOGIN_CODE_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
