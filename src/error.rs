use std::io;

/// All error types for the matrix-fx engine.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    #[error("Load error: {0}")]
    Load(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = FxError::Load("no faces".into());
        assert_eq!(e.to_string(), "Load error: no faces");

        let e = FxError::Config("glyph size must be positive".into());
        assert_eq!(e.to_string(), "Config error: glyph size must be positive");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "model missing");
        let e: FxError = io_err.into();
        assert!(matches!(e, FxError::Io(_)));
        assert!(e.to_string().contains("model missing"));
    }
}
