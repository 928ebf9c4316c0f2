//! In-process observer registry.
//!
//! # Responsibility
//! - Track observers registered on collection or item identifiers.
//! - Fan a change signal out to every interested observer.
//!
//! # Invariants
//! - An observer on `r` hears a change on `u` when `u == r`, when `u` lies
//!   below `r` and the observer asked for descendants, or when `r` lies below
//!   `u`.
//! - Observers are called in registration order, outside the registry lock.

use crate::model::uri::ResourceUri;
use crate::notify::ChangeNotifier;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// Callback interface for change listeners.
pub trait ContentObserver: Send + Sync {
    fn on_change(&self, uri: &ResourceUri);
}

/// Registration token returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

struct Registration {
    handle: ObserverHandle,
    uri: ResourceUri,
    notify_for_descendants: bool,
    observer: Arc<dyn ContentObserver>,
}

impl Registration {
    fn wants(&self, changed: &ResourceUri) -> bool {
        self.uri == *changed
            || (self.notify_for_descendants && self.uri.is_ancestor_of(changed))
            || changed.is_ancestor_of(&self.uri)
    }
}

#[derive(Default)]
struct RegistryState {
    next_handle: u64,
    registrations: Vec<Registration>,
}

/// Observer registry usable as the dispatcher's [`ChangeNotifier`].
#[derive(Default)]
pub struct ObserverRegistry {
    state: Mutex<RegistryState>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for changes on `uri`.
    pub fn register(
        &self,
        uri: ResourceUri,
        notify_for_descendants: bool,
        observer: Arc<dyn ContentObserver>,
    ) -> ObserverHandle {
        let mut state = self.state.lock();
        state.next_handle += 1;
        let handle = ObserverHandle(state.next_handle);
        state.registrations.push(Registration {
            handle,
            uri,
            notify_for_descendants,
            observer,
        });
        handle
    }

    /// Removes one registration; returns whether it existed.
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        let mut state = self.state.lock();
        let before = state.registrations.len();
        state
            .registrations
            .retain(|registration| registration.handle != handle);
        state.registrations.len() != before
    }

    pub fn len(&self) -> usize {
        self.state.lock().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChangeNotifier for ObserverRegistry {
    fn notify_change(&self, uri: &ResourceUri) {
        let targets: Vec<Arc<dyn ContentObserver>> = {
            let state = self.state.lock();
            state
                .registrations
                .iter()
                .filter(|registration| registration.wants(uri))
                .map(|registration| Arc::clone(&registration.observer))
                .collect()
        };

        debug!(
            "event=notify_change module=notify status=ok observers={}",
            targets.len()
        );
        for observer in targets {
            observer.on_change(uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentObserver, ObserverRegistry};
    use crate::model::uri::ResourceUri;
    use crate::notify::ChangeNotifier;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl ContentObserver for Recorder {
        fn on_change(&self, uri: &ResourceUri) {
            self.seen.lock().push(uri.to_string());
        }
    }

    fn uri(text: &str) -> ResourceUri {
        ResourceUri::parse(text).expect("test uri should parse")
    }

    #[test]
    fn exact_match_is_always_delivered() {
        let registry = ObserverRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.register(uri("content://auth/items"), false, recorder.clone());

        registry.notify_change(&uri("content://auth/items"));
        registry.notify_change(&uri("content://auth/notes"));
        assert_eq!(*recorder.seen.lock(), vec!["content://auth/items"]);
    }

    #[test]
    fn descendants_require_opt_in() {
        let registry = ObserverRegistry::new();
        let shallow = Arc::new(Recorder::default());
        let deep = Arc::new(Recorder::default());
        registry.register(uri("content://auth/items"), false, shallow.clone());
        registry.register(uri("content://auth/items"), true, deep.clone());

        registry.notify_change(&uri("content://auth/items/3"));
        assert!(shallow.seen.lock().is_empty());
        assert_eq!(*deep.seen.lock(), vec!["content://auth/items/3"]);
    }

    #[test]
    fn item_observer_hears_collection_changes() {
        let registry = ObserverRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.register(uri("content://auth/items/3"), false, recorder.clone());

        registry.notify_change(&uri("content://auth/items"));
        registry.notify_change(&uri("content://auth/items/4"));
        assert_eq!(*recorder.seen.lock(), vec!["content://auth/items"]);
    }

    #[test]
    fn unregister_stops_delivery() {
        let registry = ObserverRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let handle = registry.register(uri("content://auth/items"), true, recorder.clone());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(handle));
        assert!(!registry.unregister(handle));
        assert!(registry.is_empty());

        registry.notify_change(&uri("content://auth/items"));
        assert!(recorder.seen.lock().is_empty());
    }
}
