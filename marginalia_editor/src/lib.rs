// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing annotation editor session.
//!
//! This crate is the facade over the Marginalia stack: it loads documents,
//! routes touch input, owns cross-document undo, and exports annotated
//! output files. A host embeds it by implementing the collaborator traits in
//! [`marginalia_document`] for its platform's decoder, canvas, and file
//! writer, then driving an [`EditorSession`] with measured sizes and touch
//! events.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use marginalia_editor::{parse_hex_color, EditorOptions, EditorSession};
//!
//! # fn open(backend: &mut impl marginalia_document::RasterBackend) {
//! let mut options = EditorOptions::new(vec![PathBuf::from("notes.pdf")]);
//! options.line_color = parse_hex_color("#4287f5").unwrap();
//! options.line_width = 40.0;
//! let session = EditorSession::new(options, backend);
//! assert!(session.load_failures().is_empty());
//! # }
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod options;
mod session;

pub use options::{parse_hex_color, EditorOptions, OptionsError};
pub use session::{
    EditorSession, InteractionMode, LoadFailure, SaveCallback, SaveOutcome,
};
