//! Request construction.
//!
//! A [`RequestDescriptor`] says everything about one outbound call except the
//! token. The builders in [`operations`] are pure: they turn a domain
//! operation and its arguments into a descriptor without touching the network.

mod descriptor;
pub mod operations;

pub use descriptor::{RequestDescriptor, ResponseType};
pub use operations::{ContentSubmission, OpinionChange};
