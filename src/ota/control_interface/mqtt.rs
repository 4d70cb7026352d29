use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

use mqttrust::{Mqtt, QoS, SubscribeTopic};

use super::ControlInterface;
use crate::jobs::data_types::JobStatus;
use crate::jobs::{JobTopic, Jobs, MAX_CLIENT_TOKEN_LEN, MAX_THING_NAME_LEN};
use crate::ota::config::Config;
use crate::ota::encoding::json::JobStatusReason;
use crate::ota::encoding::FileContext;
use crate::ota::error::TransportError;

static REQUEST_CNT: AtomicU32 = AtomicU32::new(0);

/// Control operations over the AWS IoT Jobs MQTT API.
pub struct MqttControl<'a, M>(&'a M);

impl<'a, M: Mqtt> MqttControl<'a, M> {
    pub fn new(mqtt: &'a M) -> Self {
        Self(mqtt)
    }
}

impl<M> Clone for MqttControl<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MqttControl<'_, M> {}

/// Two bindings are the same when they drive the same client.
impl<M> PartialEq for MqttControl<'_, M> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<M> Eq for MqttControl<'_, M> {}

impl<M> core::fmt::Debug for MqttControl<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("MqttControl").finish()
    }
}

impl<M: Mqtt> ControlInterface for MqttControl<'_, M> {
    /// Check for next available OTA job from the job service by publishing a
    /// "get next job" message to the job service.
    fn request_job(&self) -> Result<(), TransportError> {
        // Subscribe to the OTA job notification topics
        let topic =
            JobTopic::NotifyNext.format::<{ MAX_THING_NAME_LEN + 30 }>(self.0.client_id())?;

        debug!("Subscribing to: [{:?}]", topic.as_str());

        self.0.subscribe(&[SubscribeTopic {
            topic_path: topic.as_str(),
            qos: QoS::AtLeastOnce,
        }])?;

        let request_cnt = REQUEST_CNT.fetch_add(1, Ordering::Relaxed);

        // Obtains a unique client token on the form
        // `{requestNumber}:{thingName}`
        let mut client_token = heapless::String::<MAX_CLIENT_TOKEN_LEN>::new();
        client_token
            .write_fmt(format_args!("{}:{}", request_cnt, self.0.client_id()))
            .map_err(|_| TransportError::Overflow)?;

        Jobs::describe()
            .client_token(client_token.as_str())
            .send(self.0, QoS::AtLeastOnce)?;

        Ok(())
    }

    /// Update the job status on the service side with progress or completion info
    fn update_job_status(
        &self,
        file_ctx: &mut FileContext,
        config: &Config,
        status: JobStatus,
        reason: JobStatusReason,
    ) -> Result<(), TransportError> {
        file_ctx
            .status_details
            .insert(
                heapless::String::from("self_test"),
                heapless::String::from(reason.as_str()),
            )
            .map_err(|_| TransportError::Overflow)?;

        let mut qos = QoS::AtLeastOnce;

        if let JobStatus::InProgress | JobStatus::Succeeded = status {
            let total_blocks = file_ctx.total_blocks(config) as u32;
            let received_blocks =
                total_blocks.saturating_sub(file_ctx.blocks_remaining as u32);

            // Output a status update once in a while. Always update first and last status
            if file_ctx.blocks_remaining != 0
                && received_blocks != 0
                && received_blocks % config.status_update_frequency.max(1) != 0
            {
                return Ok(());
            }

            // Don't override the progress on succeeded
            if status != JobStatus::Succeeded {
                let mut progress = heapless::String::new();
                progress
                    .write_fmt(format_args!("{}/{}", received_blocks, total_blocks))
                    .map_err(|_| TransportError::Overflow)?;

                file_ctx
                    .status_details
                    .insert(heapless::String::from("progress"), progress)
                    .map_err(|_| TransportError::Overflow)?;
            }

            // Downgrade Progress updates to QOS 0 to avoid overloading MQTT
            // buffers during active streaming
            qos = QoS::AtMostOnce;
        }

        trace!("Sending job update for {:?}", file_ctx.job_name.as_str());

        Jobs::update(file_ctx.job_name.as_str(), status)
            .status_details(&file_ctx.status_details)
            .send(self.0, qos)?;

        Ok(())
    }
}
