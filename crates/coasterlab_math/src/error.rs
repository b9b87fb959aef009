//! Error type for curve and mesh file handling

use std::fmt;
use std::io;

/// Error returned when reading or writing geometry files
#[derive(Debug)]
pub enum GeometryError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// A line could not be parsed
    Parse {
        /// 1-based line number
        line: usize,
        message: String,
    },
    /// The input held no points
    Empty,
}

impl GeometryError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GeometryError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Io(err) => write!(f, "Geometry IO error: {}", err),
            GeometryError::Parse { line, message } => {
                write!(f, "Geometry parse error on line {}: {}", line, message)
            }
            GeometryError::Empty => write!(f, "Geometry contains no points"),
        }
    }
}

impl std::error::Error for GeometryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeometryError::Io(err) => Some(err),
            GeometryError::Parse { .. } => None,
            GeometryError::Empty => None,
        }
    }
}

impl From<io::Error> for GeometryError {
    fn from(err: io::Error) -> Self {
        GeometryError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parse_error_display() {
        let err = GeometryError::parse(7, "expected 3 coordinates");
        let msg = format!("{}", err);
        assert!(msg.contains("line 7"));
        assert!(msg.contains("expected 3 coordinates"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing.curve");
        let err: GeometryError = io_err.into();
        assert!(matches!(err, GeometryError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_empty_has_no_source() {
        assert!(GeometryError::Empty.source().is_none());
        assert!(format!("{}", GeometryError::Empty).contains("no points"));
    }
}
