pub type Result<T> = std::result::Result<T, InputError>;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    RowShape {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: '{text}' is not a number")]
    NotANumber { line: usize, text: String },

    #[error("Input contains no rows")]
    Empty,
}
