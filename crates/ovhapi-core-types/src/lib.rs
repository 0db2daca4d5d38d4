//! Types shared by every ovhapi crate
//!
//! - [`Sensitive`]: credential wrapper that never formats its value
//! - [`RequestId`] and [`RequestContext`]: per-invocation correlation
//! - [`schema`]: log field and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId};
pub use sensitive::Sensitive;
