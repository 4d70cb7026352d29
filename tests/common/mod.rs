#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use mqttrust::{encoding::v4::encode_slice, Mqtt, MqttError, Packet};
use ota_interface::ota::{
    config::Config,
    encoding::FileContext,
    error::{DecodeError, TransportError},
    DataInterface, Protocol,
};

pub fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}

/// Broker stand-in that keeps every encoded packet.
pub struct RecordingMqtt {
    pub tx: RefCell<VecDeque<Vec<u8>>>,
    offline: Cell<bool>,
}

impl RecordingMqtt {
    pub fn new() -> Self {
        Self {
            tx: RefCell::new(VecDeque::new()),
            offline: Cell::new(false),
        }
    }

    pub fn go_offline(&self) {
        self.offline.set(true);
    }
}

impl Mqtt for RecordingMqtt {
    fn send(&self, packet: Packet<'_>) -> Result<(), MqttError> {
        if self.offline.get() {
            return Err(MqttError::Full);
        }
        let buf = &mut [0u8; 1024];
        let len = encode_slice(&packet, buf).map_err(|_| MqttError::Full)?;
        self.tx.borrow_mut().push_back(buf[..len].to_vec());
        Ok(())
    }

    fn client_id(&self) -> &str {
        "integration_thing"
    }
}

/// Data transport that only answers to its protocol name and counts calls.
pub struct FakeTransport {
    pub protocol: Protocol,
    pub calls: Cell<usize>,
}

impl FakeTransport {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            calls: Cell::new(0),
        }
    }

    fn hit(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl DataInterface for FakeTransport {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn init_file_transfer(&self, _file_ctx: &mut FileContext) -> Result<(), TransportError> {
        self.hit();
        Ok(())
    }

    fn request_file_block(
        &self,
        _file_ctx: &mut FileContext,
        _block: u32,
        _config: &Config,
    ) -> Result<(), TransportError> {
        self.hit();
        Ok(())
    }

    fn decode_file_block<'c>(
        &self,
        _file_ctx: &FileContext,
        _payload: &'c [u8],
    ) -> Result<ota_interface::ota::data_interface::FileBlock<'c>, DecodeError> {
        self.hit();
        Err(DecodeError::BlockSize)
    }

    fn cleanup(&self, _file_ctx: &mut FileContext, _config: &Config) {
        self.hit();
    }
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
