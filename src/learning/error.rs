use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("State store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum LearningError {
    #[error("Catalog unavailable: {0}")]
    Catalog(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    #[error("Stage not found: {0}")]
    StageNotFound(String),

    #[error("Stage {0} is locked until the previous quiz is passed")]
    StageLocked(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("First name and last name are required")]
    MissingName,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid stored user: {0}")]
    Serialization(#[from] serde_json::Error),
}
