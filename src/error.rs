//! Process-level error type.
//!
//! Every failure maps to a small, documented exit-code taxonomy so shell
//! wrappers can tell a missing dataset apart from rendering trouble.

/// Source dataset missing: fatal startup error, no retry.
pub const EXIT_DATASET_MISSING: u8 = 1;
/// Filesystem or encoding failures (reads, artifact writes, exports).
pub const EXIT_IO: u8 = 2;
/// Dataset is empty or degenerate where data is required.
pub const EXIT_EMPTY_DATA: u8 = 3;
/// Chart or terminal rendering failures.
pub const EXIT_RENDER: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
