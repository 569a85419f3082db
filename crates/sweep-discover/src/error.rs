//! Error types for the sweep-discover crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Cannot read input file {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file {path} contains no entries")]
    EmptyInput { path: PathBuf },

    #[error("ICMP client unavailable ({0}); run with raw-socket privileges or disable the liveness probe")]
    Icmp(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiscoverError>;

/// Failure of a single SNMP request. Always recovered by the caller.
#[derive(Error, Debug)]
pub enum SnmpError {
    #[error("Cannot open session to {addr}: {source}")]
    Session {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Agent returned error-status {status}")]
    ErrorStatus { status: u32 },

    #[error("Agent has no such object")]
    NoSuchObject,

    #[error("Response carried no varbinds")]
    EmptyResponse,

    #[error("Invalid OID {0}")]
    InvalidOid(String),
}
