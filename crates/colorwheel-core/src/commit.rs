//! The entity write path: one primary service call plus one fallback.

use crate::binding::{BoxFuture, EntityBinding};
use serde_json::json;
use std::sync::Arc;

/// Primary write: the text-entity set service.
pub const PRIMARY_DOMAIN: &str = "input_text";
pub const PRIMARY_SERVICE: &str = "set_value";

/// Fallback write: a generic entity update, same value under `new_state`.
pub const FALLBACK_DOMAIN: &str = "homeassistant";
pub const FALLBACK_SERVICE: &str = "update_entity";

/// Which write path landed. Informational only, never a UI error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The primary write succeeded.
    Primary,
    /// The primary write failed and the fallback succeeded.
    Fallback,
    /// Both writes failed; the preview is left at the uncommitted value.
    Failed,
}

/// A single pending write of a formatted color value to an entity.
///
/// Produced at drag release; the host drives [`PendingCommit::execute`]
/// fire-and-forget. Overlapping commits from rapid successive drags are
/// independent calls with no ordering guarantee between them. This is an
/// accepted limitation, not something this type tries to fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub entity_id: String,
    pub value: String,
}

impl PendingCommit {
    /// Run the write chain against the binding.
    ///
    /// On primary failure, exactly one fallback call carries the same value
    /// under a different payload field. Total failure is logged and reported
    /// through the outcome; no error escapes.
    pub fn execute<B: EntityBinding + 'static>(
        self,
        binding: Arc<B>,
    ) -> BoxFuture<'static, CommitOutcome> {
        Box::pin(async move {
            let primary = json!({
                "entity_id": self.entity_id,
                "value": self.value,
            });
            let primary_err = match binding
                .call_service(PRIMARY_DOMAIN, PRIMARY_SERVICE, primary)
                .await
            {
                Ok(()) => return CommitOutcome::Primary,
                Err(err) => err,
            };
            log::warn!(
                "Failed to update entity {}: {primary_err}; trying {FALLBACK_DOMAIN}.{FALLBACK_SERVICE}",
                self.entity_id
            );

            let fallback = json!({
                "entity_id": self.entity_id,
                "new_state": self.value,
            });
            match binding
                .call_service(FALLBACK_DOMAIN, FALLBACK_SERVICE, fallback)
                .await
            {
                Ok(()) => CommitOutcome::Fallback,
                Err(fallback_err) => {
                    log::error!(
                        "Failed to update entity {} with fallback method: {fallback_err}",
                        self.entity_id
                    );
                    CommitOutcome::Failed
                }
            }
        })
    }
}
