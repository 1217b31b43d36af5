use std::time::Duration;

use crate::error::Error;

pub(crate) fn record_ok(netfn: u8, cmd: u8, elapsed: Duration, data_len: usize) {
    let _ = (netfn, cmd, elapsed, data_len);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_local_requests_total", "outcome" => "ok").increment(1);
        metrics::histogram!("ipmi_local_request_seconds").record(elapsed.as_secs_f64());
    }

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            netfn,
            cmd,
            data_len,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi exchange ok"
        );
    }
}

pub(crate) fn record_err(netfn: u8, cmd: u8, elapsed: Duration, err: &Error) {
    let _ = (netfn, cmd, elapsed, err);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_local_requests_total", "outcome" => "err").increment(1);
        metrics::counter!(
            "ipmi_local_request_errors_total",
            "kind" => error_kind(err)
        )
        .increment(1);
        metrics::histogram!("ipmi_local_request_seconds").record(elapsed.as_secs_f64());
    }

    #[cfg(feature = "tracing")]
    {
        tracing::warn!(
            netfn,
            cmd,
            error = %err,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi exchange failed"
        );
    }
}

#[cfg(feature = "metrics")]
fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::InvalidArgument(_) => "invalid_argument",
        Error::DeviceUnavailable(_) => "device_unavailable",
        Error::DeviceConfiguration(_) => "device_configuration",
        Error::SessionNotOpen => "session_not_open",
        Error::SendFailed(_) => "send_failed",
        Error::WaitFailed(_) => "wait_failed",
        Error::ResponseTimeout => "response_timeout",
        Error::ReceiveFailed(_) => "receive_failed",
        Error::CorrelationMismatch { .. } => "correlation_mismatch",
    }
}
