#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Jwt error")]
    JwtError(jsonwebtoken::errors::Error),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("User not found")]
    UserNotFound,
    #[error("Registration is closed")]
    RegistrationClosed,
    #[error("Login code is invalid or expired")]
    LoginCodeInvalid,
    #[error("Wrong token kind")]
    WrongTokenKind,
}
