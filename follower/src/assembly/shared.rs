//! Shared handle for live recalibration.
//!
//! Readers take a snapshot `Arc` of the current configuration and keep using it for as long as
//! they like. Recalibration assembles a whole new configuration and swaps the pointer, so a
//! control loop iteration sees either the old bundle or the new one, never a mix.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use std::sync::{Arc, Mutex, MutexGuard};

use super::ControllerConfig;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Thread-safe holder of the active controller configuration.
#[derive(Debug)]
pub struct SharedConfig {
    current: Mutex<Arc<ControllerConfig>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SharedConfig {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            current: Mutex::new(Arc::new(config)),
        }
    }

    /// Snapshot of the active configuration.
    pub fn current(&self) -> Arc<ControllerConfig> {
        let guard = self.lock();
        Arc::clone(&*guard)
    }

    /// Make `config` the active configuration, returning the one it replaces.
    pub fn replace(&self, config: ControllerConfig) -> Arc<ControllerConfig> {
        let new = Arc::new(config);
        let old = std::mem::replace(&mut *self.lock(), new);

        info!("Controller configuration replaced");

        old
    }

    fn lock(&self) -> MutexGuard<'_, Arc<ControllerConfig>> {
        // The guarded value is only ever replaced whole, so a poisoned lock still holds a
        // complete configuration.
        match self.current.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::baseline;
    use std::thread;

    #[test]
    fn test_replace_swaps_whole_config() {
        let first = baseline().assemble().unwrap();
        let mut params = baseline();
        params.localizer.defaults();
        params.mass = 18.0;
        let second = params.assemble().unwrap();

        let shared = SharedConfig::new(first.clone());
        let snapshot = shared.current();

        let old = shared.replace(second.clone());

        // Earlier snapshots are unaffected
        assert_eq!(*snapshot, first);
        assert_eq!(*old, first);
        assert_eq!(*shared.current(), second);
        assert_eq!(shared.current().mass(), 18.0);
    }

    #[test]
    fn test_readers_see_whole_configs() {
        let a = baseline().assemble().unwrap();
        let mut params = baseline();
        params.mass = 20.0;
        params.centripetal_scaling = 0.001;
        let b = params.assemble().unwrap();

        let shared = Arc::new(SharedConfig::new(a.clone()));

        let reader = {
            let shared = Arc::clone(&shared);
            let (a, b) = (a.clone(), b.clone());
            thread::spawn(move || {
                for _ in 0..1000 {
                    let cfg = shared.current();
                    assert!(*cfg == a || *cfg == b);
                }
            })
        };

        for i in 0..100 {
            if i % 2 == 0 {
                shared.replace(b.clone());
            } else {
                shared.replace(a.clone());
            }
        }

        reader.join().unwrap();
    }

    #[test]
    fn test_poisoned_lock_still_usable() {
        let first = baseline().assemble().unwrap();
        let mut params = baseline();
        params.mass = 17.5;
        let second = params.assemble().unwrap();

        let shared = Arc::new(SharedConfig::new(first.clone()));

        // A thread panicking while holding the lock poisons it
        let result = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let _guard = shared.current.lock().unwrap();
                panic!("panic while holding the configuration lock");
            })
            .join()
        };
        assert!(result.is_err());
        assert!(shared.current.is_poisoned());

        assert_eq!(*shared.current(), first);

        let old = shared.replace(second.clone());
        assert_eq!(*old, first);
        assert_eq!(*shared.current(), second);
    }
}
