//! ## Over-the-air (OTA) transport negotiation
//!
//! AWS IoT OTA splits an update into two kinds of traffic:
//!
//! - **Control**: requesting the next job and reporting job status, always
//!   carried over MQTT through the AWS IoT Jobs API.
//! - **Data**: fetching the firmware file block by block, carried over
//!   whichever protocol both the job document and this build support (MQTT
//!   streams or HTTP ranges against a pre-signed URL).
//!
//! The control binding is fixed at build time ([`bind_control_interface`]).
//! The data binding is negotiated per job: the job document advertises the
//! protocols the server is willing to use, and
//! [`resolve_data_interface`] picks the first entry of the client-side
//! [`ProtocolPriority`] found in that advertisement.
//!
//! ### Flow:
//! 1. At startup, bind the control interface and build the set of compiled
//!    data transports ([`Single`] or [`Prioritized`]).
//! 2. For each job document, build a [`FileContext`] and resolve a data
//!    interface from its protocol advertisement.
//! 3. Drive the job through the bound operations; when the job ends (or a
//!    transport failure calls for renegotiation), call `cleanup` on the bound
//!    interface and drop it.
//!
//! [`FileContext`]: encoding::FileContext

pub mod config;
pub mod control_interface;
pub mod data_interface;
pub mod encoding;
pub mod error;

pub use control_interface::{bind_control_interface, ControlInterface, CONTROL_PROTOCOL};
pub use data_interface::{
    resolve_data_interface, DataInterface, DataTransports, Prioritized, Protocol,
    ProtocolPriority, Selected, Single, PRIMARY_DATA_PROTOCOL,
};
