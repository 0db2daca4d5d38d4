//! Structured logging
//!
//! [`init`] installs the subscriber once per process. Operations log their
//! lifecycle with [`log_op_start!`](crate::log_op_start),
//! [`log_op_end!`](crate::log_op_end) and
//! [`log_op_error!`](crate::log_op_error). Tests read the events back
//! through [`init_test_capture`].
//!
//! Everything is written to stderr. In module mode stdout carries the JSON
//! result and nothing else.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
