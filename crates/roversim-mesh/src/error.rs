//! Error types for mesh loading.

use thiserror::Error;

/// Errors that can occur while loading a mesh file.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed record in an OBJ file.
    #[error("OBJ parse error at line {line}: {message}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// A face references a vertex that does not exist.
    #[error("OBJ face at line {line} references vertex {index} of {count}")]
    IndexOutOfRange {
        /// Line number (1-indexed).
        line: usize,
        /// The (1-based) vertex index as written in the file.
        index: i64,
        /// Number of vertices seen so far.
        count: usize,
    },

    /// The file contained no faces.
    #[error("no faces found in OBJ file")]
    Empty,
}

impl MeshError {
    /// Create a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
