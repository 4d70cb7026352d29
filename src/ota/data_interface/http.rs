//! File transfer over HTTP(S) byte ranges against the pre-signed
//! `update_data_url` of the job document.
//!
//! Connection handling and TLS live in the application's HTTP stack, which
//! this module drives through [`HttpClient`].

use core::fmt::Debug;
use core::ops::RangeInclusive;

use crate::ota::{
    config::Config,
    data_interface::{DataInterface, FileBlock, Protocol},
    encoding::FileContext,
    error::{DecodeError, TransportError},
};

/// Minimal blocking HTTP client used for file downloads.
///
/// Methods take `&self`; implementations use interior mutability the same way
/// [`mqttrust::Mqtt`] clients do.
pub trait HttpClient {
    type Error: Debug;

    /// Open a connection to the host serving `url`.
    fn connect(&self, url: &str) -> Result<(), Self::Error>;

    /// Send `GET url` with `Range: bytes={start}-{end}`. The response body is
    /// delivered to the job layer out of band.
    fn request_range(&self, url: &str, range: RangeInclusive<usize>) -> Result<(), Self::Error>;

    fn disconnect(&self) -> Result<(), Self::Error>;
}

/// One block per request; the body of each response is the raw block.
pub struct HttpDataInterface<'a, H>(&'a H);

impl<'a, H: HttpClient> HttpDataInterface<'a, H> {
    pub fn new(client: &'a H) -> Self {
        Self(client)
    }
}

impl<H: HttpClient> DataInterface for HttpDataInterface<'_, H> {
    fn protocol(&self) -> Protocol {
        Protocol::Http
    }

    fn init_file_transfer(&self, file_ctx: &mut FileContext) -> Result<(), TransportError> {
        let url = file_ctx
            .update_data_url
            .as_ref()
            .ok_or(TransportError::MissingUrl)?;

        self.0.connect(url).map_err(|e| {
            error!("HTTP connect failed: {:?}", defmt_debug(&e));
            TransportError::Http
        })?;

        file_ctx.transfer_active = true;
        Ok(())
    }

    fn request_file_block(
        &self,
        file_ctx: &mut FileContext,
        block: u32,
        config: &Config,
    ) -> Result<(), TransportError> {
        let url = file_ctx
            .update_data_url
            .as_ref()
            .ok_or(TransportError::MissingUrl)?;

        let start = (block as usize)
            .checked_mul(config.block_size)
            .filter(|&start| config.block_size != 0 && start < file_ctx.filesize)
            .ok_or(TransportError::BlockOutOfRange)?;
        let end = start
            .checked_add(config.block_size)
            .map_or(file_ctx.filesize, |end| end.min(file_ctx.filesize))
            - 1;

        debug!("Requesting bytes {}-{} (block {})", start, end, block);

        self.0.request_range(url, start..=end).map_err(|e| {
            error!("HTTP range request failed: {:?}", defmt_debug(&e));
            TransportError::Http
        })?;

        file_ctx.block_offset = block;
        file_ctx.request_block_remaining = 1;
        file_ctx.expected_block_len = end - start + 1;
        Ok(())
    }

    /// The body of a range response is the block itself; its index is the one
    /// last requested and its length must be exactly the requested range.
    fn decode_file_block<'c>(
        &self,
        file_ctx: &FileContext,
        payload: &'c [u8],
    ) -> Result<FileBlock<'c>, DecodeError> {
        if payload.is_empty() || payload.len() != file_ctx.expected_block_len {
            return Err(DecodeError::BlockSize);
        }

        Ok(FileBlock {
            client_token: None,
            file_id: file_ctx.fileid,
            block_size: payload.len(),
            block_id: file_ctx.block_offset as usize,
            block_payload: payload,
        })
    }

    fn cleanup(&self, file_ctx: &mut FileContext, _config: &Config) {
        if !file_ctx.transfer_active {
            return;
        }
        file_ctx.transfer_active = false;

        if let Err(e) = self.0.disconnect() {
            warn!("HTTP disconnect failed: {:?}", defmt_debug(&e));
        }
    }
}

#[cfg(feature = "defmt")]
fn defmt_debug<E: Debug>(e: &E) -> defmt::Debug2Format<'_, E> {
    defmt::Debug2Format(e)
}

#[cfg(not(feature = "defmt"))]
fn defmt_debug<E: Debug>(e: &E) -> &E {
    e
}
