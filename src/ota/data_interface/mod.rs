#[cfg(feature = "ota_http_data")]
pub mod http;
#[cfg(feature = "ota_mqtt_data")]
pub mod mqtt;
mod priority;
mod resolver;

use core::fmt;

use serde::Deserialize;

use crate::ota::config::Config;

use super::{
    encoding::FileContext,
    error::{DecodeError, TransportError},
};

pub use priority::{ProtocolPriority, MAX_DATA_PROTOCOLS};
pub use resolver::{resolve_data_interface, DataTransports, Prioritized, Selected, Single};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    #[serde(rename = "MQTT")]
    Mqtt,
    #[serde(rename = "HTTP")]
    Http,
}

impl Protocol {
    /// Every protocol this crate knows how to name, compiled in or not.
    pub const ALL: [Protocol; 2] = [Protocol::Mqtt, Protocol::Http];

    /// Name as it appears in a job document's protocol advertisement.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Protocol::Mqtt => "MQTT",
            Protocol::Http => "HTTP",
        }
    }

    /// Whether a data transport for this protocol is part of the build.
    pub const fn is_compiled(&self) -> bool {
        match self {
            Protocol::Mqtt => cfg!(feature = "ota_mqtt_data"),
            Protocol::Http => cfg!(feature = "ota_http_data"),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data protocol tried first when a job advertises more than one compiled
/// protocol. HTTP when `ota_http_primary` is enabled or MQTT is not compiled,
/// MQTT otherwise.
#[cfg(any(feature = "ota_http_primary", not(feature = "ota_mqtt_data")))]
pub const PRIMARY_DATA_PROTOCOL: Protocol = Protocol::Http;
#[cfg(all(feature = "ota_mqtt_data", not(feature = "ota_http_primary")))]
pub const PRIMARY_DATA_PROTOCOL: Protocol = Protocol::Mqtt;

#[derive(Debug, Clone, PartialEq)]
pub struct FileBlock<'a> {
    pub client_token: Option<&'a str>,
    pub file_id: u8,
    pub block_size: usize,
    pub block_id: usize,
    pub block_payload: &'a [u8],
}

impl<'a> FileBlock<'a> {
    /// Validate the block index and size. If it is NOT the last block, it MUST
    /// be equal to a full block size. If it IS the last block, it MUST be equal
    /// to the expected remainder. If the block ID is out of range, that's an
    /// error.
    pub fn validate(&self, block_size: usize, filesize: usize) -> bool {
        if block_size == 0 || filesize == 0 {
            return false;
        }

        let total_blocks = filesize.div_ceil(block_size);
        let last_block_id = total_blocks - 1;

        (self.block_id < last_block_id && self.block_size == block_size)
            || (self.block_id == last_block_id
                && self.block_size == (filesize - last_block_id * block_size))
    }
}

/// The four data operations of a single transport. A bound interface always
/// dispatches all of them to the same transport.
pub trait DataInterface {
    fn protocol(&self) -> Protocol;

    /// Set up whatever per-transport state is needed before block requests.
    fn init_file_transfer(&self, file_ctx: &mut FileContext) -> Result<(), TransportError>;

    /// Dispatch a request for file blocks starting at `block`. Success means
    /// the request was sent, not that a block arrived.
    fn request_file_block(
        &self,
        file_ctx: &mut FileContext,
        block: u32,
        config: &Config,
    ) -> Result<(), TransportError>;

    fn decode_file_block<'c>(
        &self,
        file_ctx: &FileContext,
        payload: &'c [u8],
    ) -> Result<FileBlock<'c>, DecodeError>;

    /// Release transport resources held for `file_ctx`. Idempotent; release
    /// failures are logged, never returned.
    fn cleanup(&self, file_ctx: &mut FileContext, config: &Config);
}

impl<D: DataInterface + ?Sized> DataInterface for &D {
    fn protocol(&self) -> Protocol {
        (**self).protocol()
    }

    fn init_file_transfer(&self, file_ctx: &mut FileContext) -> Result<(), TransportError> {
        (**self).init_file_transfer(file_ctx)
    }

    fn request_file_block(
        &self,
        file_ctx: &mut FileContext,
        block: u32,
        config: &Config,
    ) -> Result<(), TransportError> {
        (**self).request_file_block(file_ctx, block, config)
    }

    fn decode_file_block<'c>(
        &self,
        file_ctx: &FileContext,
        payload: &'c [u8],
    ) -> Result<FileBlock<'c>, DecodeError> {
        (**self).decode_file_block(file_ctx, payload)
    }

    fn cleanup(&self, file_ctx: &mut FileContext, config: &Config) {
        (**self).cleanup(file_ctx, config)
    }
}
