use core::fmt;
use core::str::FromStr;

use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::jobs::MAX_STREAM_ID_LEN;

/// Capacity of the joined protocol advertisement.
pub const MAX_ADVERTISEMENT_LEN: usize = 256;
/// Pre-signed S3 urls easily exceed 512 bytes.
pub const MAX_URL_LEN: usize = 1024;

/// OTA job document, compatible with FreeRTOS OTA process
#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename = "afr_ota")]
pub struct OtaJob {
    pub protocols: ProtocolAdvertisement,
    pub streamname: heapless::String<MAX_STREAM_ID_LEN>,
    pub files: heapless::Vec<FileDescription, 1>,
}

/// The raw protocol names a job document offers, joined by `,`, e.g.
/// `MQTT,HTTP`.
///
/// Names are kept as the server sent them, including ones this build does not
/// know. A name that no longer fits is dropped whole rather than cut, so a
/// truncated name can never match a protocol it does not spell out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolAdvertisement(heapless::String<MAX_ADVERTISEMENT_LEN>);

impl ProtocolAdvertisement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name`. Returns `false`, leaving the advertisement untouched, if
    /// it does not fit.
    pub fn push(&mut self, name: &str) -> bool {
        let separator = usize::from(!self.0.is_empty());
        if self.0.len() + separator + name.len() > MAX_ADVERTISEMENT_LEN {
            return false;
        }
        if separator == 1 && self.0.push(',').is_err() {
            return false;
        }
        self.0.push_str(name).is_ok()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl<'de> Deserialize<'de> for ProtocolAdvertisement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AdvertisementVisitor;

        impl<'de> Visitor<'de> for AdvertisementVisitor {
            type Value = ProtocolAdvertisement;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of protocol names")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut advertisement = ProtocolAdvertisement::new();
                while let Some(name) = seq.next_element::<&'de str>()? {
                    if !advertisement.push(name) {
                        warn!("Dropping advertised protocol {:?}: no room", name);
                    }
                }
                Ok(advertisement)
            }
        }

        deserializer.deserialize_seq(AdvertisementVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileDescription {
    #[serde(rename = "filepath")]
    pub filepath: heapless::String<64>,
    #[serde(rename = "filesize")]
    pub filesize: usize,
    #[serde(rename = "fileid")]
    pub fileid: u8,
    #[serde(rename = "certfile")]
    pub certfile: Option<heapless::String<64>>,
    #[serde(rename = "update_data_url")]
    pub update_data_url: Option<heapless::String<MAX_URL_LEN>>,
    #[serde(rename = "auth_scheme")]
    pub auth_scheme: Option<heapless::String<64>>,
    #[serde(rename = "attr")]
    pub file_attributes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobStatusReason {
    #[serde(rename = "")]
    Receiving, /* Update progress status. */
    #[serde(rename = "ready")]
    SigCheckPassed, /* Set status details to Self Test Ready. */
    #[serde(rename = "active")]
    SelfTestActive, /* Set status details to Self Test Active. */
    #[serde(rename = "accepted")]
    Accepted, /* Set job state to Succeeded. */
    #[serde(rename = "rejected")]
    Rejected, /* Set job state to Failed. */
    #[serde(rename = "aborted")]
    Aborted, /* Set job state to Failed. */
}

impl JobStatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatusReason::Receiving => "",
            JobStatusReason::SigCheckPassed => "ready",
            JobStatusReason::SelfTestActive => "active",
            JobStatusReason::Accepted => "accepted",
            JobStatusReason::Rejected => "rejected",
            JobStatusReason::Aborted => "aborted",
        }
    }
}

impl FromStr for JobStatusReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => JobStatusReason::Receiving,
            "ready" => JobStatusReason::SigCheckPassed,
            "active" => JobStatusReason::SelfTestActive,
            "accepted" => JobStatusReason::Accepted,
            "rejected" => JobStatusReason::Rejected,
            "aborted" => JobStatusReason::Aborted,
            _ => return Err(()),
        })
    }
}
