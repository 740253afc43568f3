// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File system loader and writer-backed runner

use ifcx_model::{CompileError, Result, ScriptRunner, TextLoader};
use std::io::Write;
use std::path::PathBuf;

/// Loads layer files from disk, optionally relative to a base directory
#[derive(Clone, Debug, Default)]
pub struct FsLoader {
    base: Option<PathBuf>,
}

impl FsLoader {
    /// Create a loader resolving paths as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader resolving relative paths against `base`
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl TextLoader for FsLoader {
    fn load(&self, path: &str) -> Result<String> {
        let full = match &self.base {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        };
        std::fs::read_to_string(&full).map_err(|err| CompileError::io(path, err))
    }
}

/// Writes each script to an [`io::Write`](std::io::Write) sink
///
/// Write failures are logged and remembered, never returned.
#[derive(Debug)]
pub struct WriterRunner<W: Write> {
    writer: W,
    runs: usize,
    failures: usize,
}

impl<W: Write> WriterRunner<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            runs: 0,
            failures: 0,
        }
    }

    /// Number of scripts handed over
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of scripts that failed to write
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScriptRunner for WriterRunner<W> {
    fn run(&mut self, label: &str, script: &str) {
        self.runs += 1;
        let result = self
            .writer
            .write_all(script.as_bytes())
            .and_then(|_| self.writer.flush());
        if let Err(err) = result {
            self.failures += 1;
            log::error!("Failed to write script {}: {}", label, err);
        }
    }
}
