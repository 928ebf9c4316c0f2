//! Change notification contracts.
//!
//! # Responsibility
//! - Define the fire-and-forget hook the dispatcher calls after mutations.
//! - Provide an in-process observer registry as the default transport.
//!
//! # Invariants
//! - Notifications carry only the changed identifier.
//! - Delivery is synchronous; order equals call order on one thread.

pub mod observer;

pub use observer::{ContentObserver, ObserverHandle, ObserverRegistry};

use crate::model::uri::ResourceUri;
use std::rc::Rc;
use std::sync::Arc;

/// Receives "resource changed" signals from the dispatcher.
pub trait ChangeNotifier {
    fn notify_change(&self, uri: &ResourceUri);
}

/// Notifier that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify_change(&self, _uri: &ResourceUri) {}
}

impl<T: ChangeNotifier + ?Sized> ChangeNotifier for &T {
    fn notify_change(&self, uri: &ResourceUri) {
        (**self).notify_change(uri);
    }
}

impl<T: ChangeNotifier + ?Sized> ChangeNotifier for Arc<T> {
    fn notify_change(&self, uri: &ResourceUri) {
        (**self).notify_change(uri);
    }
}

impl<T: ChangeNotifier + ?Sized> ChangeNotifier for Rc<T> {
    fn notify_change(&self, uri: &ResourceUri) {
        (**self).notify_change(uri);
    }
}
