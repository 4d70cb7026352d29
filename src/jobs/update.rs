use mqttrust::{Mqtt, QoS};

use super::{
    data_types::{JobStatus, UpdateJobExecutionRequest},
    JobError, JobTopic, StatusDetails, MAX_JOB_ID_LEN, MAX_THING_NAME_LEN,
};

pub struct Update<'a> {
    job_id: &'a str,
    status: JobStatus,
    status_details: Option<&'a StatusDetails>,
}

impl<'a> Update<'a> {
    pub fn new(job_id: &'a str, status: JobStatus) -> Self {
        Self {
            job_id,
            status,
            status_details: None,
        }
    }

    pub fn status_details(self, status_details: &'a StatusDetails) -> Self {
        Self {
            status_details: Some(status_details),
            ..self
        }
    }

    pub fn topic_payload(
        self,
        client_id: &str,
    ) -> Result<
        (
            heapless::String<{ MAX_THING_NAME_LEN + MAX_JOB_ID_LEN + 25 }>,
            heapless::Vec<u8, 512>,
        ),
        JobError,
    > {
        if self.job_id.len() > MAX_JOB_ID_LEN {
            return Err(JobError::Overflow);
        }

        let topic_path = JobTopic::Update(self.job_id).format(client_id)?;

        let payload = serde_json_core::to_vec(&UpdateJobExecutionRequest {
            status: self.status,
            status_details: self.status_details,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_payload() {
        let mut details = StatusDetails::new();
        details
            .insert(
                heapless::String::from("self_test"),
                heapless::String::from("rejected"),
            )
            .unwrap();

        let (topic, payload) = Update::new("test_job_id", JobStatus::Failed)
            .status_details(&details)
            .topic_payload("test_client")
            .unwrap();

        assert_eq!(
            payload.as_slice(),
            br#"{"status":"FAILED","statusDetails":{"self_test":"rejected"}}"#
        );

        assert_eq!(
            topic.as_str(),
            "$aws/things/test_client/jobs/test_job_id/update"
        );
    }

    #[test]
    fn without_status_details() {
        let (_, payload) = Update::new("test_job_id", JobStatus::Succeeded)
            .topic_payload("test_client")
            .unwrap();

        assert_eq!(payload.as_slice(), br#"{"status":"SUCCEEDED"}"#);
    }

    #[test]
    fn job_id_too_long() {
        let job_id = "j".repeat(MAX_JOB_ID_LEN + 1);
        assert!(matches!(
            Update::new(&job_id, JobStatus::Succeeded).topic_payload("test_client"),
            Err(JobError::Overflow)
        ));
    }
}
