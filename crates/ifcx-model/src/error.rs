// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for IFCX compilation

use thiserror::Error;

/// Result type alias for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that can occur while loading or compiling a layer
///
/// None of these abort a batch: the compiler records them per layer and
/// carries on with the remaining files.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Layer file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Layer text is not valid JSON
    #[error("Parse error in {path} at line {line}, column {column}: {message}")]
    Json {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// Layer is missing its `header` object or `data` array
    #[error("Invalid {section} section in {path}")]
    MissingSection { path: String, section: &'static str },
}

impl CompileError {
    /// Create an IO error for a path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error from a serde_json failure
    pub fn json(path: impl Into<String>, err: &serde_json::Error) -> Self {
        CompileError::Json {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// Create a missing section error
    pub fn missing_section(path: impl Into<String>, section: &'static str) -> Self {
        CompileError::MissingSection {
            path: path.into(),
            section,
        }
    }
}
