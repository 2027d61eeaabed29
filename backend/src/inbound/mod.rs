//! Driving adapters: the `/api/v1` REST handlers in [`http`] and the live
//! round stream in [`ws`]. Both only translate between wire formats and the
//! domain's driving ports.

pub mod http;
pub mod ws;
