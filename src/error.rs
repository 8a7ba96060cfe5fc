use thiserror::Error;

/// Failure of a core computation on one series or one push.
///
/// These are deterministic input-shape errors: the pipeline records them for
/// the affected file/push and moves on to the next unit of work.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PushError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("push #{0} has no single-letter station suffix (at most 26 pushes per file)")]
    LabelOverflow(usize),

    #[error("timestamps go backwards at line {0}; samples must be time-ordered")]
    UnorderedTimestamps(usize),
}

/// Error surfaced by the `cmeter` binary, carrying its process exit code.
///
/// - 2: input, configuration or I/O problem
/// - 3: nothing to process
/// - 4: internal computation failure
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

impl From<PushError> for AppError {
    fn from(err: PushError) -> Self {
        let exit_code = match err {
            PushError::Configuration(_) | PushError::UnorderedTimestamps(_) => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
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
