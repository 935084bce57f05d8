#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("Database error")]
    Sqlx(sqlx::Error),
    #[error("Unique constraint violated")]
    UniqueViolation,
    #[error("Referenced record is missing")]
    ForeignKeyViolation,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(database_error) = &error {
            if database_error.is_unique_violation() {
                return Self::UniqueViolation;
            }
            if database_error.is_foreign_key_violation() {
                return Self::ForeignKeyViolation;
            }
        }

        Self::Sqlx(error)
    }
}
