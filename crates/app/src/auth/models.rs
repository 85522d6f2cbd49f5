//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::customers::CustomerUuid;

/// Customer resolved from a trusted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub uuid: CustomerUuid,

    /// Inactive customers may authenticate but not place orders.
    pub is_active: bool,
}

/// Session metadata persisted in storage. The token itself is never stored.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub uuid: Uuid,
    pub customer_uuid: CustomerUuid,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// Freshly issued session; the only time the raw token is available.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub metadata: SessionMetadata,
}
