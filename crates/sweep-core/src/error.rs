use thiserror::Error;

/// Reasons a range specification is rejected.
///
/// A rejected specification contributes no addresses; callers log it and
/// carry on with the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeSpecError {
    #[error("Malformed range specification '{spec}': {reason}")]
    Malformed { spec: String, reason: &'static str },

    #[error("First octet {octet} out of range in '{spec}' (must be 1-238)")]
    FirstOctet { spec: String, octet: u32 },

    #[error("Octet {position} value {value} out of range in '{spec}' (must be 0-255)")]
    Octet {
        spec: String,
        position: usize,
        value: u32,
    },

    #[error("Prefix length /{prefix} not allowed in '{spec}' (must be 17-32)")]
    PrefixLength { spec: String, prefix: u32 },
}

pub type Result<T> = std::result::Result<T, RangeSpecError>;
