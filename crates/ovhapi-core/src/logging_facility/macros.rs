//! Lifecycle logging macros
//!
//! Every operation logs `start`, then exactly one of `end` or `end_error`.
//! Each event carries `component`, `op` and `event` so the capture layer
//! and log processors can pair them up.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log that `op` started
///
/// ```
/// # use ovhapi_core::log_op_start;
/// log_op_start!("detect_change");
/// log_op_start!("detect_change", verb = "POST", path = "/me");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, $crate::types::schema::EVENT_START $(, $($field)*)?)
    };
}

/// Log that `op` finished; `duration_ms` is mandatory
///
/// ```
/// # use ovhapi_core::log_op_end;
/// log_op_end!("detect_change", duration_ms = 42, changed = true);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log that `op` failed
///
/// `$err` is anything convertible into `ExError`; its kind, code and
/// message become `err.kind`, `err.code` and `message`.
///
/// ```
/// # use ovhapi_core::log_op_error;
/// # use ovhapi_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::NotFound).with_message("no such path");
/// log_op_error!("api_call", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex.kind(),
            err.code = ex.code(),
            message = ex.message()
            $(, $($field)*)?
        )
    }};
}
