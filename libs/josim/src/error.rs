//! Error types for building and assembling JoSIM netlists.

use std::path::PathBuf;

use arcstr::ArcStr;
use thiserror::Error;

/// A malformed registration request.
///
/// The offending record is never added to the [`Subckt`](crate::Subckt).
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InvalidArgument {
    /// A component was registered without any nets.
    #[error("component `{component}` has no nets")]
    EmptyNets {
        /// The name of the rejected component.
        component: ArcStr,
    },
    /// A transmission line was registered with a negative length.
    #[error("transmission line `{line}` has negative length {length}")]
    NegativeLength {
        /// The name of the rejected line.
        line: ArcStr,
        /// The requested length in nanometers.
        length: i64,
    },
}

/// An error building or assembling a netlist.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input to one of the registration functions.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// The output file could not be created or opened.
    #[error("failed to open output file `{path:?}`: {err}")]
    Output {
        /// The path of the output file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
    /// Failure writing the output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A malformed circuit description or configuration file.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The result type returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
