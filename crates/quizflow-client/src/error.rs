//! Mapping of transport failures onto [`ServiceError`].

use quizflow_core::error::ServiceError;

/// Classify a `reqwest` failure.
pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(timeout_secs)
    } else if err.is_decode() {
        ServiceError::Decode(err.to_string())
    } else {
        ServiceError::Network(err.to_string())
    }
}

/// Classify an HTTP error status. `what` names the requested resource.
pub(crate) fn from_status(status: u16, body: String, what: &str) -> ServiceError {
    match status {
        401 | 403 => ServiceError::Unauthorized(if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }),
        404 => ServiceError::NotFound(what.to_string()),
        _ => ServiceError::Api {
            status,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            from_status(401, String::new(), "quiz 1"),
            ServiceError::Unauthorized(m) if m == "HTTP 401"
        ));
        assert!(from_status(403, "forbidden".into(), "quiz 1").is_unauthorized());
        assert!(matches!(
            from_status(404, "gone".into(), "quiz 1"),
            ServiceError::NotFound(m) if m == "quiz 1"
        ));
        assert!(matches!(
            from_status(503, "busy".into(), "quiz 1"),
            ServiceError::Api { status: 503, .. }
        ));
    }
}
