use crate::compat::CompatError;
use crate::compile::CompileError;

/// Application-level failure: a message for the user plus the process exit code.
///
/// Exit codes: 1 usage, 2 I/O, 3 native document errors / missing compat input,
/// 4 malformed compat file.
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

    pub fn message(&self) -> &str {
        &self.message
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

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<CompatError> for AppError {
    fn from(err: CompatError) -> Self {
        match err {
            CompatError::BadVersion(_) | CompatError::VersionOutOfRange(_) => AppError::new(1, err.to_string()),
            _ => AppError::new(4, err.to_string()),
        }
    }
}
