//! Node-level plumbing: block verification against header commitments and
//! the monitoring endpoint.
#![deny(rust_2018_idioms)]

pub mod monitoring;
pub mod verify;
