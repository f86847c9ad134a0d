// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load and export failures.

use std::path::PathBuf;

/// Opaque error reported by a backend collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A document could not be constructed.
///
/// Construction failures are fatal to the affected document only and leave no
/// partial state behind; a multi-document stack keeps loading its remaining
/// members.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file extension is not one of the supported formats.
    ///
    /// Supported: `pdf`, `png`, `jpg`, `jpeg`, `heic`.
    #[error("unsupported format '{extension}' for {path:?}")]
    UnsupportedFormat {
        /// The offending extension (lowercased; empty if the path had none).
        extension: String,
        /// The path as given by the host.
        path: PathBuf,
    },
    /// The backend could not open or decode the source file.
    #[error("source unavailable: {path:?}")]
    SourceUnavailable {
        /// The path as given by the host.
        path: PathBuf,
        /// The backend's underlying failure.
        #[source]
        source: BoxError,
    },
}

/// A per-document save step failed.
///
/// The viewport stays usable after an export failure; curves are not lost.
#[derive(Debug, thiserror::Error)]
#[error("failed to export {output:?}")]
pub struct ExportError {
    /// The output path that could not be written.
    pub output: PathBuf,
    /// The backend's underlying failure.
    #[source]
    pub source: BoxError,
}
