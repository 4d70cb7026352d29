#[cfg(feature = "ota_mqtt_data")]
pub mod cbor;
pub mod json;

use core::ops::{Deref, DerefMut};
use serde::{Serialize, Serializer};

use crate::jobs::{StatusDetails, MAX_JOB_ID_LEN, MAX_STREAM_ID_LEN};

use self::json::{OtaJob, ProtocolAdvertisement, MAX_URL_LEN};

use super::config::Config;
use super::error::{ConfigError, OtaError};

#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap(bitmaps::Bitmap<32>);

impl Bitmap {
    pub fn new(file_size: usize, block_size: usize, block_offset: u32) -> Self {
        // Total number of blocks in file, rounded up
        let total_num_blocks = file_size.div_ceil(block_size.max(1));

        Self(bitmaps::Bitmap::mask(core::cmp::min(
            32 - 1,
            total_num_blocks.saturating_sub(block_offset as usize),
        )))
    }
}

impl Deref for Bitmap {
    type Target = bitmaps::Bitmap<32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bitmap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Serialize for Bitmap {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serializer::serialize_bytes(serializer, &self.deref().into_value().to_le_bytes())
    }
}

/// A `FileContext` denotes an active context of a single file. An ota job can
/// contain multiple files, each with their own `FileContext` built from a
/// corresponding `FileDescription`.
///
/// This is the job context every bound control and data operation receives.
#[derive(Clone)]
pub struct FileContext {
    pub filepath: heapless::String<64>,
    pub filesize: usize,
    pub fileid: u8,
    pub update_data_url: Option<heapless::String<MAX_URL_LEN>>,
    pub auth_scheme: Option<heapless::String<64>>,
    pub file_type: Option<u32>,
    /// Protocols the job document offers for data transfer, comma separated.
    pub protocols: ProtocolAdvertisement,

    pub status_details: StatusDetails,
    pub block_offset: u32,
    pub blocks_remaining: usize,
    pub request_block_remaining: u32,
    pub job_name: heapless::String<MAX_JOB_ID_LEN>,
    pub stream_name: heapless::String<MAX_STREAM_ID_LEN>,
    pub bitmap: Bitmap,

    /// Body length expected for the outstanding single block request.
    pub(crate) expected_block_len: usize,
    pub(crate) transfer_active: bool,
}

impl FileContext {
    pub fn new_from(
        job_name: &str,
        ota_job: &OtaJob,
        status_details: Option<&StatusDetails>,
        file_idx: usize,
        config: &Config,
    ) -> Result<Self, OtaError> {
        let file_desc = ota_job.files.get(file_idx).ok_or(OtaError::InvalidFile)?;

        if file_desc.filesize == 0 {
            return Err(OtaError::ZeroFileSize);
        }

        if config.block_size == 0 {
            return Err(OtaError::Config(ConfigError::ZeroBlockSize));
        }

        let mut name = heapless::String::new();
        name.push_str(job_name).map_err(|_| OtaError::Overflow)?;

        let block_offset = 0;
        let bitmap = Bitmap::new(file_desc.filesize, config.block_size, block_offset);

        Ok(FileContext {
            filepath: file_desc.filepath.clone(),
            filesize: file_desc.filesize,
            fileid: file_desc.fileid,
            update_data_url: file_desc.update_data_url.clone(),
            auth_scheme: file_desc.auth_scheme.clone(),
            file_type: file_desc.file_attributes,
            protocols: ota_job.protocols.clone(),

            status_details: status_details.cloned().unwrap_or_default(),

            job_name: name,
            block_offset,
            request_block_remaining: (bitmap.len() as u32).min(config.max_blocks_per_request),
            blocks_remaining: file_desc.filesize.div_ceil(config.block_size),
            stream_name: ota_job.streamname.clone(),
            bitmap,
            expected_block_len: 0,
            transfer_active: false,
        })
    }

    /// The server's protocol advertisement for this job, as handed to
    /// [`resolve_data_interface`](crate::ota::resolve_data_interface).
    pub fn advertisement(&self) -> &[u8] {
        self.protocols.as_bytes()
    }

    /// Number of `config.block_size` blocks in the file. A zero block size
    /// counts as one byte per block.
    pub fn total_blocks(&self, config: &Config) -> usize {
        self.filesize.div_ceil(config.block_size.max(1))
    }

    /// Whether a data transport currently holds resources for this file.
    pub fn transfer_active(&self) -> bool {
        self.transfer_active
    }
}
