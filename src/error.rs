//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `xaml-combine`. It uses the `thiserror` library to create an `Error` enum
//! covering every failure mode of a combine run, providing clear and
//! descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur during a combine run. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the crate to simplify function signatures.
//!
//! Every failure is terminal for the invocation: there is no partial-success
//! mode and no retries. Either the full combined dictionary is produced and
//! written, or nothing is written. Each variant carries enough context (the
//! offending path or key list) to diagnose the failure without re-running.

use thiserror::Error;

/// Main error type for combine operations
#[derive(Error, Debug)]
pub enum Error {
    /// A source file named in the manifest (or the manifest itself) could
    /// not be found, neither as given nor relative to the base directory.
    ///
    /// Carries the original, unresolved path for diagnosis.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    /// A source file was found but could not be parsed as XML.
    #[error("Malformed document '{path}': {message}")]
    MalformedDocument { path: String, message: String },

    /// The surviving resource entries contain a reference cycle: after a
    /// full ordering pass no remaining entry became eligible for emission.
    ///
    /// Carries the keys of the entries that could not be ordered.
    #[error("Resource ordering cycle among keys: {keys}")]
    OrderingCycle { keys: String },

    /// Writing the combined result failed: temporary-file write, comparison
    /// read, or the final replace step.
    #[error("Failed to write result '{path}': {message}")]
    WriteFailure { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
