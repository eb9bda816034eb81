// This module defines error types for the HSACO translation pipeline using the thiserror
// crate for idiomatic Rust error handling. TranslateError covers the failure points of the
// lowering pipeline: malformed input IR (rejected by the LLVM verifier or the .ll parser),
// a target triple with no registered backend, and failure to emit the relocatable object
// file. Each variant carries the diagnostic text LLVM produced so callers see the same
// information the original cout-based reporting exposed. A failed external link is
// deliberately NOT an error variant: the binary emitter reports it through the log channel
// and still hands back the output path, which callers of the original relied on. The module
// also provides TranslateResult<T> as a convenience alias.

//! Error types for the translation pipeline.
//!
//! Using thiserror for more idiomatic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for LLVM-IR → HSACO translation.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("module failed LLVM verification: {message}")]
    InvalidModule { message: String },

    #[error("no backend registered for target triple {triple}: {message}")]
    TargetLookup { triple: String, message: String },

    #[error("failed to emit assembly: {message}")]
    AssemblyEmission { message: String },

    #[error("failed to emit object file {path}: {message}")]
    ObjectEmission { path: PathBuf, message: String },

    #[error("failed to parse LLVM IR: {message}")]
    InvalidIr { message: String },
}

/// Result type alias for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;
