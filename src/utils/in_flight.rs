use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Named slots for commands that must not run twice at once.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    slots: Arc<Mutex<HashSet<String>>>,
}

/// Releases its slot when dropped, including when the request is cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    slots: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: impl Into<String>) -> Result<InFlightGuard> {
        let key = key.into();
        let mut guard = self.slots.lock().expect("in-flight mutex poisoned");
        if !guard.insert(key.clone()) {
            return Err(Error::Conflict(format!("'{}' is already in progress", key)));
        }
        Ok(InFlightGuard {
            slots: self.slots.clone(),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_conflicts_until_release() {
        let in_flight = InFlight::new();
        let guard = in_flight.acquire("cv:polish").unwrap();
        assert!(matches!(in_flight.acquire("cv:polish"), Err(Error::Conflict(_))));
        assert!(in_flight.acquire("cv:save").is_ok());
        drop(guard);
        assert!(in_flight.acquire("cv:polish").is_ok());
    }
}
