use core::fmt::Write;

use mqttrust::{Mqtt, QoS, SubscribeTopic};

use crate::{
    jobs::{MAX_STREAM_ID_LEN, MAX_THING_NAME_LEN},
    ota::{
        config::Config,
        data_interface::{DataInterface, FileBlock, Protocol},
        encoding::{cbor, Bitmap, FileContext},
        error::{DecodeError, TransportError},
    },
};

const MAX_STREAM_TOPIC_LEN: usize = MAX_STREAM_ID_LEN + MAX_THING_NAME_LEN + 30;

/// Outgoing and subscribed AWS IoT stream topics, CBOR encoded.
enum OtaTopic<'a> {
    Data(&'a str),
    Get(&'a str),
}

impl OtaTopic<'_> {
    pub fn format<const L: usize>(
        &self,
        client_id: &str,
    ) -> Result<heapless::String<L>, TransportError> {
        let mut topic_path = heapless::String::new();
        match self {
            Self::Data(stream_name) => topic_path.write_fmt(format_args!(
                "$aws/things/{}/streams/{}/data/cbor",
                client_id, stream_name
            )),
            Self::Get(stream_name) => topic_path.write_fmt(format_args!(
                "$aws/things/{}/streams/{}/get/cbor",
                client_id, stream_name
            )),
        }
        .map_err(|_| TransportError::Overflow)?;

        Ok(topic_path)
    }
}

/// File transfer over AWS IoT MQTT streams, CBOR encoded.
pub struct MqttDataInterface<'a, M>(&'a M);

impl<'a, M: Mqtt> MqttDataInterface<'a, M> {
    pub fn new(mqtt: &'a M) -> Self {
        Self(mqtt)
    }
}

impl<M: Mqtt> DataInterface for MqttDataInterface<'_, M> {
    fn protocol(&self) -> Protocol {
        Protocol::Mqtt
    }

    /// Init file transfer by subscribing to the OTA data stream topic
    fn init_file_transfer(&self, file_ctx: &mut FileContext) -> Result<(), TransportError> {
        let topic = OtaTopic::Data(file_ctx.stream_name.as_str())
            .format::<MAX_STREAM_TOPIC_LEN>(self.0.client_id())?;

        debug!("Subscribing to: [{:?}]", topic.as_str());

        self.0.subscribe(&[SubscribeTopic {
            topic_path: topic.as_str(),
            qos: QoS::AtLeastOnce,
        }])?;

        file_ctx.transfer_active = true;
        Ok(())
    }

    /// Request file blocks by publishing to the get stream topic
    fn request_file_block(
        &self,
        file_ctx: &mut FileContext,
        block: u32,
        config: &Config,
    ) -> Result<(), TransportError> {
        if block as usize >= file_ctx.total_blocks(config) {
            return Err(TransportError::BlockOutOfRange);
        }

        file_ctx.block_offset = block;
        file_ctx.bitmap = Bitmap::new(file_ctx.filesize, config.block_size, block);

        let blocks_available = file_ctx.bitmap.len() as u32;
        let blocks_to_request = blocks_available.min(config.max_blocks_per_request);
        file_ctx.request_block_remaining = blocks_to_request;

        let topic = OtaTopic::Get(file_ctx.stream_name.as_str())
            .format::<MAX_STREAM_TOPIC_LEN>(self.0.client_id())?;

        let mut buf = [0u8; 256];
        let len = cbor::to_slice(
            &cbor::GetStreamRequest {
                client_token: None,
                stream_version: None,
                file_id: file_ctx.fileid,
                block_size: config.block_size,
                block_offset: Some(file_ctx.block_offset),
                block_bitmap: Some(&file_ctx.bitmap),
                number_of_blocks: Some(blocks_to_request),
            },
            &mut buf,
        )
        .map_err(|_| TransportError::Encoding)?;

        debug!(
            "Requesting {} file blocks from {} (of {} available)",
            blocks_to_request,
            block,
            blocks_available
        );

        self.0.publish(topic.as_str(), &buf[..len], QoS::AtMostOnce)?;

        Ok(())
    }

    /// Decode a cbor encoded fileblock received from streaming service
    fn decode_file_block<'c>(
        &self,
        _file_ctx: &FileContext,
        payload: &'c [u8],
    ) -> Result<FileBlock<'c>, DecodeError> {
        Ok(minicbor_serde::from_slice::<cbor::GetStreamResponse>(payload)
            .map_err(|_| DecodeError::Cbor)?
            .into())
    }

    /// Unsubscribe from the data stream topic
    fn cleanup(&self, file_ctx: &mut FileContext, _config: &Config) {
        if !file_ctx.transfer_active {
            return;
        }
        file_ctx.transfer_active = false;

        let topic = match OtaTopic::Data(file_ctx.stream_name.as_str())
            .format::<MAX_STREAM_TOPIC_LEN>(self.0.client_id())
        {
            Ok(topic) => topic,
            Err(e) => {
                warn!("Unable to format stream topic during cleanup: {:?}", e);
                return;
            }
        };

        if let Err(e) = self.0.unsubscribe(&[topic.as_str()]) {
            warn!("Failed to unsubscribe from [{:?}]: {:?}", topic.as_str(), e);
        }
    }
}
