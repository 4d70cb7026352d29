use mqttrust::{Mqtt, QoS};

use super::{
    data_types::DescribeJobExecutionRequest, JobError, JobTopic, MAX_CLIENT_TOKEN_LEN,
    MAX_THING_NAME_LEN,
};

/// DescribeJobExecution request for the next pending job (`$next`).
#[derive(Default)]
pub struct Describe<'a> {
    client_token: Option<&'a str>,
}

impl<'a> Describe<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_token(self, client_token: &'a str) -> Self {
        Self {
            client_token: Some(client_token),
        }
    }

    pub fn topic_payload(
        self,
        client_id: &str,
    ) -> Result<
        (
            heapless::String<{ MAX_THING_NAME_LEN + 30 }>,
            heapless::Vec<u8, { MAX_CLIENT_TOKEN_LEN + 20 }>,
        ),
        JobError,
    > {
        let topic_path = JobTopic::GetNext.format(client_id)?;

        let payload = serde_json_core::to_vec(&DescribeJobExecutionRequest {
            client_token: self.client_token,
        })
        .map_err(|_| JobError::Encoding)?;

        Ok((topic_path, payload))
    }

    pub fn send<M: Mqtt>(self, mqtt: &M, qos: QoS) -> Result<(), JobError> {
        let (topic, payload) = self.topic_payload(mqtt.client_id())?;

        mqtt.publish(topic.as_str(), &payload, qos)?;

        Ok(())
    }
}
