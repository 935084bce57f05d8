#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Incorrect credential")]
    IncorrectCredential,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password error")]
    PasswordError(argon2::password_hash::Error),
}
