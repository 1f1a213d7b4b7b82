//! Security-relevant events published by the authorization pipeline.
//!
//! Publication is fire-and-forget: a slow or unavailable sink must never
//! block or fail the authorization decision, so publishers ignore the bus
//! result entirely.

use chrono::{DateTime, Utc};

use chassis_events::Event;

use crate::codec::VerifyCause;
use crate::policy::Dimension;

/// Request facts attached to a security event for audit purposes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMetadata {
    pub path: String,
    pub origin: Option<String>,
    pub ip: Option<String>,
}

/// A security-relevant outcome of credential handling.
///
/// These carry the internal cause/dimension that is deliberately absent from
/// the client-facing response.
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    /// A presented credential failed verification.
    InvalidAccessToken {
        cause: VerifyCause,
        meta: RequestMetadata,
        occurred_at: DateTime<Utc>,
    },

    /// Verified claims were denied by the unlock policy.
    AccessDenied {
        dimension: Dimension,
        meta: RequestMetadata,
        occurred_at: DateTime<Utc>,
    },
}

impl SecurityEvent {
    pub fn invalid_access_token(cause: VerifyCause, meta: RequestMetadata) -> Self {
        Self::InvalidAccessToken {
            cause,
            meta,
            occurred_at: Utc::now(),
        }
    }

    pub fn access_denied(dimension: Dimension, meta: RequestMetadata) -> Self {
        Self::AccessDenied {
            dimension,
            meta,
            occurred_at: Utc::now(),
        }
    }

    pub fn meta(&self) -> &RequestMetadata {
        match self {
            Self::InvalidAccessToken { meta, .. } | Self::AccessDenied { meta, .. } => meta,
        }
    }
}

impl Event for SecurityEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::InvalidAccessToken { .. } => "auth.access_token.invalid",
            Self::AccessDenied { .. } => "auth.access.denied",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::InvalidAccessToken { occurred_at, .. }
            | Self::AccessDenied { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_are_stable() {
        let meta = RequestMetadata::default();
        let invalid =
            SecurityEvent::invalid_access_token(VerifyCause::BadSignature, meta.clone());
        let denied = SecurityEvent::access_denied(Dimension::Origin, meta);

        assert_eq!(invalid.event_type(), "auth.access_token.invalid");
        assert_eq!(denied.event_type(), "auth.access.denied");
        assert_eq!(invalid.version(), 1);
    }
}
