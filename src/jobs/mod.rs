//! # Iot Jobs Data
//!
//! The subset of the AWS IoT Jobs MQTT API that the OTA control interface
//! drives:
//!
//! - `$aws/things/{thing_name}/jobs/notify-next` (subscribed when requesting a
//!   job, to be told about the next pending execution)
//! - `$aws/things/{thing_name}/jobs/$next/get` (DescribeJobExecution for the
//!   next pending job)
//! - `$aws/things/{thing_name}/jobs/{job_id}/update` (UpdateJobExecution with
//!   status and status details)
//!
//! Requests are built with [`Jobs::describe`] and [`Jobs::update`], and sent
//! over any [`mqttrust::Mqtt`] client.
pub mod data_types;
pub mod describe;
pub mod update;

use core::fmt::Write;

use self::{data_types::JobStatus, describe::Describe, update::Update};

/// https://docs.aws.amazon.com/iot/latest/apireference/API_DescribeThing.html
pub const MAX_THING_NAME_LEN: usize = 128;
pub const MAX_CLIENT_TOKEN_LEN: usize = MAX_THING_NAME_LEN + 10;
pub const MAX_JOB_ID_LEN: usize = 64;
pub const MAX_STREAM_ID_LEN: usize = MAX_JOB_ID_LEN;

pub type StatusDetails = heapless::FnvIndexMap<heapless::String<15>, heapless::String<11>, 4>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobError {
    Overflow,
    Encoding,
    Mqtt(mqttrust::MqttError),
}

impl From<mqttrust::MqttError> for JobError {
    fn from(e: mqttrust::MqttError) -> Self {
        Self::Mqtt(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobTopic<'a> {
    // Outgoing Topics
    GetNext,
    Update(&'a str),

    // Incoming Topics
    NotifyNext,
}

impl<'a> JobTopic<'a> {
    const PREFIX: &'static str = "$aws/things";

    pub fn format<const L: usize>(&self, client_id: &str) -> Result<heapless::String<L>, JobError> {
        let mut topic_path = heapless::String::new();
        match self {
            Self::GetNext => topic_path.write_fmt(format_args!(
                "{}/{}/jobs/$next/get",
                Self::PREFIX,
                client_id
            )),
            Self::Update(job_id) => topic_path.write_fmt(format_args!(
                "{}/{}/jobs/{}/update",
                Self::PREFIX,
                client_id,
                job_id
            )),
            Self::NotifyNext => topic_path.write_fmt(format_args!(
                "{}/{}/jobs/notify-next",
                Self::PREFIX,
                client_id
            )),
        }
        .map_err(|_| JobError::Overflow)?;

        Ok(topic_path)
    }
}

pub struct Jobs;

impl Jobs {
    pub fn describe<'a>() -> Describe<'a> {
        Describe::new()
    }

    pub fn update(job_id: &str, status: JobStatus) -> Update<'_> {
        Update::new(job_id, status)
    }
}
