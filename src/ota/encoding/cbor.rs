use serde::{Deserialize, Serialize};

use crate::ota::data_interface::FileBlock;

use super::Bitmap;

#[derive(Serialize)]
pub struct GetStreamRequest<'a> {
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub client_token: Option<&'a str>,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub stream_version: Option<u8>,
    #[serde(rename = "f")]
    pub file_id: u8,
    #[serde(rename = "l")]
    pub block_size: usize,
    #[serde(rename = "o", skip_serializing_if = "Option::is_none")]
    pub block_offset: Option<u32>,
    #[serde(rename = "b", skip_serializing_if = "Option::is_none")]
    pub block_bitmap: Option<&'a Bitmap>,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub number_of_blocks: Option<u32>,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct GetStreamResponse<'a> {
    #[serde(rename = "c")]
    pub client_token: Option<&'a str>,
    #[serde(rename = "f")]
    pub file_id: u8,
    #[serde(rename = "l")]
    pub block_size: usize,
    #[serde(rename = "i")]
    pub block_id: usize,
    #[serde(rename = "p")]
    pub block_payload: &'a [u8],
}

pub fn to_slice<T>(value: &T, slice: &mut [u8]) -> Result<usize, ()>
where
    T: serde::ser::Serialize,
{
    let mut cursor = minicbor::encode::write::Cursor::new(slice);
    let mut serializer = minicbor_serde::Serializer::new(&mut cursor);
    value.serialize(&mut serializer).map_err(drop)?;
    Ok(cursor.position())
}

impl<'a> From<GetStreamResponse<'a>> for FileBlock<'a> {
    fn from(v: GetStreamResponse<'a>) -> Self {
        Self {
            client_token: v.client_token,
            file_id: v.file_id,
            block_size: v.block_size,
            block_id: v.block_id,
            block_payload: v.block_payload,
        }
    }
}
