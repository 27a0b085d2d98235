use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "fixture '{0}' not found. Checked the following locations:\n\
        - the path itself\n\
        - ./test-fixtures/ and ./fixtures/\n\
        - $GROUNDCHECK_FIXTURE_DIR\n\
        Set GROUNDCHECK_FIXTURE_DIR to the directory holding your fixtures"
    )]
    FixtureNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
