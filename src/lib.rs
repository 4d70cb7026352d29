#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod jobs;
pub mod ota;

#[cfg(test)]
pub(crate) mod test;

#[cfg(not(feature = "ota_mqtt_control"))]
compile_error!("Enable the `ota_mqtt_control` feature: control operations are only supported over MQTT.");

#[cfg(not(any(feature = "ota_mqtt_data", feature = "ota_http_data")))]
compile_error!("Enable at least one data protocol: `ota_mqtt_data` and/or `ota_http_data`.");
