use core::fmt;

use crate::jobs::JobError;

use super::data_interface::Protocol;

/// Failure to send or set up a request on the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    Mqtt(mqttrust::MqttError),
    Http,
    /// A topic, client token or request payload did not fit its buffer.
    Overflow,
    Encoding,
    /// HTTP transfer requested for a file without an `update_data_url`.
    MissingUrl,
    BlockOutOfRange,
}

impl From<mqttrust::MqttError> for TransportError {
    fn from(e: mqttrust::MqttError) -> Self {
        Self::Mqtt(e)
    }
}

impl From<JobError> for TransportError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::Overflow => Self::Overflow,
            JobError::Encoding => Self::Encoding,
            JobError::Mqtt(e) => Self::Mqtt(e),
        }
    }
}

/// A received payload does not conform to the transport's block encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    Cbor,
    BlockSize,
}

/// Inconsistent set of data transports handed to the resolver, or a tuning
/// [`Config`](super::config::Config) no file can be transferred with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    NoDataProtocol,
    DuplicateProtocol(Protocol),
    PrimaryNotEnabled(Protocol),
    TooManyProtocols,
    ZeroBlockSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OtaError {
    /// The job's protocol advertisement names no compiled data transport.
    NoCompatibleProtocol,
    Transport(TransportError),
    Decode(DecodeError),
    Config(ConfigError),
    ZeroFileSize,
    InvalidFile,
    Overflow,
}

impl OtaError {
    /// Transport and decode failures may succeed on a renegotiated interface.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}

impl From<TransportError> for OtaError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<DecodeError> for OtaError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<ConfigError> for OtaError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mqtt(e) => write!(f, "mqtt: {:?}", e),
            Self::Http => write!(f, "http request failed"),
            Self::Overflow => write!(f, "request does not fit buffer"),
            Self::Encoding => write!(f, "request encoding failed"),
            Self::MissingUrl => write!(f, "file has no update data url"),
            Self::BlockOutOfRange => write!(f, "block index past end of file"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cbor => write!(f, "malformed cbor block"),
            Self::BlockSize => write!(f, "block size out of range"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDataProtocol => write!(f, "no data protocol enabled"),
            Self::DuplicateProtocol(p) => write!(f, "data protocol {} enabled twice", p),
            Self::PrimaryNotEnabled(p) => write!(f, "primary data protocol {} not enabled", p),
            Self::TooManyProtocols => write!(f, "more data protocols than supported"),
            Self::ZeroBlockSize => write!(f, "block size is zero"),
        }
    }
}

impl fmt::Display for OtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCompatibleProtocol => write!(f, "no compatible data protocol"),
            Self::Transport(e) => write!(f, "transport: {}", e),
            Self::Decode(e) => write!(f, "decode: {}", e),
            Self::Config(e) => write!(f, "config: {}", e),
            Self::ZeroFileSize => write!(f, "file size is zero"),
            Self::InvalidFile => write!(f, "no such file in job document"),
            Self::Overflow => write!(f, "job document field too large"),
        }
    }
}
