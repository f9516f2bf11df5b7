//! Entity binding: the dashboard host's state and service surface.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from the host binding.
#[derive(Debug, Clone, Error)]
pub enum BindingError {
    #[error("service {domain}.{service} rejected the call: {message}")]
    ServiceRejected {
        domain: String,
        service: String,
        message: String,
    },
    #[error("binding error: {0}")]
    Other(String),
}

/// Result type for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;

/// Boxed future for async binding operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Connection to the dashboard host's entity registry and service bus.
///
/// Reads are synchronous snapshots of the host's last pushed state; writes
/// go through asynchronous service calls and carry no timeout; a call that
/// never resolves simply never reports.
pub trait EntityBinding: Send + Sync {
    /// Current raw value of an entity, or `None` when the entity is absent
    /// or unknown.
    fn entity_value(&self, entity_id: &str) -> Option<String>;

    /// Issue an asynchronous service call with a JSON payload.
    fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
    ) -> BoxFuture<'_, BindingResult<()>>;
}

/// One recorded service call, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: serde_json::Value,
}

/// In-memory binding for tests and the demo host.
///
/// Records every service call and supports per-service failure injection.
/// Successful write calls update the stored entity value, so a subsequent
/// read observes the write.
#[derive(Default)]
pub struct MemoryBinding {
    entities: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<ServiceCall>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryBinding {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entity's raw value.
    pub fn set_entity(&self, entity_id: &str, value: &str) {
        if let Ok(mut entities) = self.entities.write() {
            entities.insert(entity_id.to_string(), value.to_string());
        }
    }

    /// Remove an entity, as if the host never knew it.
    pub fn remove_entity(&self, entity_id: &str) {
        if let Ok(mut entities) = self.entities.write() {
            entities.remove(entity_id);
        }
    }

    /// Make every future call to `domain.service` fail.
    pub fn fail_service(&self, domain: &str, service: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(format!("{domain}.{service}"));
        }
    }

    /// Every service call issued so far, in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.read().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn apply_write(&self, domain: &str, service: &str, data: &serde_json::Value) {
        use crate::commit::{FALLBACK_DOMAIN, FALLBACK_SERVICE, PRIMARY_DOMAIN, PRIMARY_SERVICE};

        let value_field = if domain == PRIMARY_DOMAIN && service == PRIMARY_SERVICE {
            "value"
        } else if domain == FALLBACK_DOMAIN && service == FALLBACK_SERVICE {
            "new_state"
        } else {
            return;
        };
        if let (Some(entity_id), Some(value)) = (
            data.get("entity_id").and_then(|v| v.as_str()),
            data.get(value_field).and_then(|v| v.as_str()),
        ) {
            self.set_entity(entity_id, value);
        }
    }
}

impl EntityBinding for MemoryBinding {
    fn entity_value(&self, entity_id: &str) -> Option<String> {
        self.entities
            .read()
            .ok()
            .and_then(|entities| entities.get(entity_id).cloned())
    }

    fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
    ) -> BoxFuture<'_, BindingResult<()>> {
        let domain = domain.to_string();
        let service = service.to_string();
        Box::pin(async move {
            let mut calls = self
                .calls
                .write()
                .map_err(|e| BindingError::Other(format!("Lock error: {e}")))?;
            calls.push(ServiceCall {
                domain: domain.clone(),
                service: service.clone(),
                data: data.clone(),
            });
            drop(calls);

            let failing = self
                .failing
                .read()
                .map_err(|e| BindingError::Other(format!("Lock error: {e}")))?;
            if failing.contains(&format!("{domain}.{service}")) {
                return Err(BindingError::ServiceRejected {
                    domain,
                    service,
                    message: "injected failure".to_string(),
                });
            }
            drop(failing);

            self.apply_write(&domain, &service, &data);
            Ok(())
        })
    }
}

/// Simple blocking executor for driving binding futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_roundtrip() {
        let binding = MemoryBinding::new();
        assert_eq!(binding.entity_value("input_text.color"), None);

        binding.set_entity("input_text.color", "#112233");
        assert_eq!(
            binding.entity_value("input_text.color").as_deref(),
            Some("#112233")
        );

        binding.remove_entity("input_text.color");
        assert_eq!(binding.entity_value("input_text.color"), None);
    }

    #[test]
    fn test_successful_write_updates_entity() {
        let binding = MemoryBinding::new();
        binding.set_entity("input_text.color", "#000000");

        let result = block_on(binding.call_service(
            "input_text",
            "set_value",
            json!({"entity_id": "input_text.color", "value": "#FF0000"}),
        ));
        assert!(result.is_ok());
        assert_eq!(
            binding.entity_value("input_text.color").as_deref(),
            Some("#FF0000")
        );
        assert_eq!(binding.calls().len(), 1);
    }

    #[test]
    fn test_injected_failure() {
        let binding = MemoryBinding::new();
        binding.set_entity("input_text.color", "#000000");
        binding.fail_service("input_text", "set_value");

        let result = block_on(binding.call_service(
            "input_text",
            "set_value",
            json!({"entity_id": "input_text.color", "value": "#FF0000"}),
        ));
        assert!(result.is_err());

        // Failed calls are still recorded but never applied.
        assert_eq!(binding.calls().len(), 1);
        assert_eq!(
            binding.entity_value("input_text.color").as_deref(),
            Some("#000000")
        );
    }
}
