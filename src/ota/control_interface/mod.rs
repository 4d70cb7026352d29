use crate::jobs::data_types::JobStatus;

use super::{
    config::Config,
    data_interface::Protocol,
    encoding::{json::JobStatusReason, FileContext},
    error::TransportError,
};

#[cfg(feature = "ota_mqtt_control")]
pub mod mqtt;

#[cfg(feature = "ota_mqtt_control")]
pub use mqtt::MqttControl;

/// Control traffic is never negotiated; this is the only transport it uses.
pub const CONTROL_PROTOCOL: Protocol = Protocol::Mqtt;

/// Job request and job status reporting, independent of how file blocks are
/// fetched.
pub trait ControlInterface {
    /// Ask the job service for the next pending OTA job.
    fn request_job(&self) -> Result<(), TransportError>;

    /// Report `status` for the job of `file_ctx`. Returns once the update is
    /// handed to the transport.
    fn update_job_status(
        &self,
        file_ctx: &mut FileContext,
        config: &Config,
        status: JobStatus,
        reason: JobStatusReason,
    ) -> Result<(), TransportError>;
}

/// Bind the control operations to the build's control transport. Pure;
/// repeated calls with the same client yield equal bindings.
#[cfg(feature = "ota_mqtt_control")]
pub fn bind_control_interface<M: mqttrust::Mqtt>(mqtt: &M) -> MqttControl<'_, M> {
    MqttControl::new(mqtt)
}
