//! Core results and error types

use thiserror::Error;

/// Core error type encompassing all profiler errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the compiler output bundle.
    #[error("bundle parse failed: {0}")]
    BundleParse(#[from] serde_json::Error),

    /// A PUSH instruction's immediate bytes extend past the end of the bytecode.
    #[error("bytecode truncated: PUSH at pc {pc} needs {needed} immediate bytes, {available} left")]
    BytecodeTruncated {
        /// Program counter of the offending PUSH opcode.
        pc: usize,
        /// Immediate bytes the PUSH requires.
        needed: usize,
        /// Immediate bytes actually present.
        available: usize,
    },

    /// Failed to read file at the specified path.
    #[error("could not read file '{path}': {source}")]
    FileRead {
        /// The path to the file that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode hex string.
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// The transaction names neither a target address nor a created contract.
    #[error("transaction has no target address and no created contract")]
    MissingTarget,

    /// The chain collaborator failed; the run cannot continue.
    #[error("chain rpc failure: {0}")]
    Rpc(String),

    /// Failed to parse a source-map segment.
    #[error("source map malformed at segment {segment}: {msg} ⇒ `{raw}`")]
    SourceMapMalformed {
        /// Index of the segment that failed to parse.
        segment: usize,
        /// Description of the parsing error.
        msg: String,
        /// The raw segment text.
        raw: String,
    },

    /// The trace ends immediately after a call that resolved a target.
    #[error("trace truncated: call at step {0} has no following log")]
    TraceTruncated(usize),
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
