#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Collapse a unique-violation on users.email into the conflict variant.
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::EmailTaken;
            }
        }
        StoreError::Database(err)
    }
}
