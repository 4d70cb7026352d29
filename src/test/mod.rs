use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};
#[cfg(feature = "ota_http_data")]
use std::ops::RangeInclusive;

use mqttrust::{encoding::v4::encode_slice, Mqtt, MqttError, Packet};

use crate::ota::{
    config::Config,
    encoding::{
        json::{FileDescription, OtaJob, ProtocolAdvertisement},
        FileContext,
    },
};

///
/// Mock Mqtt client used for unit tests. Implements `mqttrust::Mqtt` trait.
///
pub struct MockMqtt {
    pub tx: RefCell<VecDeque<Vec<u8>>>,
    publish_fail: Cell<bool>,
}

impl MockMqtt {
    pub fn new() -> Self {
        Self {
            tx: RefCell::new(VecDeque::new()),
            publish_fail: Cell::new(false),
        }
    }

    pub fn publish_fail(&self) {
        self.publish_fail.set(true);
    }
}

impl Mqtt for MockMqtt {
    fn send(&self, packet: Packet<'_>) -> Result<(), MqttError> {
        if self.publish_fail.get() {
            return Err(MqttError::Full);
        }
        let v = &mut [0u8; 1024];

        let len = encode_slice(&packet, v).map_err(|_| MqttError::Full)?;
        let packet = v[..len].iter().cloned().collect();
        self.tx.borrow_mut().push_back(packet);

        Ok(())
    }

    fn client_id(&self) -> &str {
        "test_client"
    }
}

#[cfg(feature = "ota_http_data")]
#[derive(Debug, Clone, PartialEq)]
pub enum HttpRequest {
    Connect(String),
    Range(String, RangeInclusive<usize>),
    Disconnect,
}

///
/// Mock HTTP client recording every call, for the HTTP data transport.
///
#[cfg(feature = "ota_http_data")]
pub struct MockHttp {
    pub requests: RefCell<Vec<HttpRequest>>,
    fail: Cell<bool>,
}

#[cfg(feature = "ota_http_data")]
impl MockHttp {
    pub fn new() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }

    pub fn fail(&self) {
        self.fail.set(true);
    }

    fn record(&self, request: HttpRequest) -> Result<(), ()> {
        if self.fail.get() {
            return Err(());
        }
        self.requests.borrow_mut().push(request);
        Ok(())
    }
}

#[cfg(feature = "ota_http_data")]
impl crate::ota::data_interface::http::HttpClient for MockHttp {
    type Error = ();

    fn connect(&self, url: &str) -> Result<(), Self::Error> {
        self.record(HttpRequest::Connect(url.to_owned()))
    }

    fn request_range(&self, url: &str, range: RangeInclusive<usize>) -> Result<(), Self::Error> {
        self.record(HttpRequest::Range(url.to_owned(), range))
    }

    fn disconnect(&self) -> Result<(), Self::Error> {
        self.record(HttpRequest::Disconnect)
    }
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Job document offering MQTT and HTTP for a single 123456 byte file.
pub fn test_job_doc() -> OtaJob {
    let mut protocols = ProtocolAdvertisement::new();
    protocols.push("MQTT");
    protocols.push("HTTP");

    OtaJob {
        protocols,
        streamname: heapless::String::from("test_stream"),
        files: heapless::Vec::from_slice(&[FileDescription {
            filepath: heapless::String::from("/firmware.bin"),
            filesize: 123456,
            fileid: 0,
            certfile: None,
            update_data_url: None,
            auth_scheme: None,
            file_attributes: None,
        }])
        .unwrap(),
    }
}

pub fn test_file_ctx(config: &Config) -> FileContext {
    FileContext::new_from("test_job", &test_job_doc(), None, 0, config).unwrap()
}
