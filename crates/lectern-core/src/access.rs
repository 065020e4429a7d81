//! Access-policy seam between the gateway and the platform's authorization
//! service.
//!
//! The gateway does not implement authorization rules. It extracts an opaque
//! caller identity from the request, loads the object's access level, and
//! asks an [`AccessPolicy`] for a decision. Deployments plug in their own
//! policy; [`StandardAccessPolicy`] covers the stock levels.

use async_trait::async_trait;

use crate::models::{AccessLevel, StoredObject};

/// Caller identity as supplied by the upstream authentication layer.
///
/// `subject == None` means an unauthenticated request.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub subject: Option<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    pub fn identified(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn is_identified(&self) -> bool {
        self.subject.is_some()
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Decides whether a caller may read a stored object.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn authorize(&self, caller: &Caller, object: &StoredObject) -> AccessDecision;
}

/// Stock policy: public objects are readable by anyone; private and
/// restricted objects require an identified caller. Finer-grained restricted
/// checks (per-lesson enrollment) belong to the deployment's own policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAccessPolicy;

#[async_trait]
impl AccessPolicy for StandardAccessPolicy {
    async fn authorize(&self, caller: &Caller, object: &StoredObject) -> AccessDecision {
        match object.access_level {
            AccessLevel::Public => AccessDecision::Allow,
            AccessLevel::Private | AccessLevel::Restricted => {
                if caller.is_identified() {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny
                }
            }
        }
    }
}
