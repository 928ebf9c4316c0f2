//! Identifier-based CRUD dispatch.
//!
//! # Responsibility
//! - Map each identifier to its table via the shared `ContentRouter`.
//! - Forward insert/update/delete/query to the backing store.
//! - Notify observers after insert, update and delete.
//!
//! # Invariants
//! - `insert` only accepts collection identifiers.
//! - `update` and `delete` notify with the caller's identifier exactly once,
//!   even when no row was affected.
//! - `insert` notifies with the new item identifier only when the store
//!   reports a positive row id.
//! - `query` and `get_type` never notify.
//! - Store errors are returned unchanged; nothing is retried.

use crate::model::entity::EntityType;
use crate::model::uri::ResourceUri;
use crate::model::values::{ContentValues, ResultSet};
use crate::notify::ChangeNotifier;
use crate::routing::{Cardinality, ContentRouter, ResolvedRoute, RoutingError};
use crate::store::{BackingStore, StoreError, StoreQuery};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of one dispatcher call.
#[derive(Debug)]
pub enum ProviderError {
    Routing(RoutingError),
    Store(StoreError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routing(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Routing(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RoutingError> for ProviderError {
    fn from(value: RoutingError) -> Self {
        Self::Routing(value)
    }
}

impl From<StoreError> for ProviderError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Routes identifier-addressed CRUD calls to a backing store.
pub struct ContentDispatcher<S, N> {
    router: Arc<ContentRouter>,
    store: S,
    notifier: N,
}

impl<S: BackingStore, N: ChangeNotifier> ContentDispatcher<S, N> {
    pub fn new(router: Arc<ContentRouter>, store: S, notifier: N) -> Self {
        Self {
            router,
            store,
            notifier,
        }
    }

    pub fn router(&self) -> &ContentRouter {
        &self.router
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Inserts one row into the collection addressed by `uri`.
    ///
    /// Returns `Ok(None)` when the store produced no positive row id; no
    /// notification is sent in that case.
    ///
    /// # Errors
    /// - `Routing(CardinalityMismatch)` for item identifiers.
    pub fn insert(
        &self,
        uri: &ResourceUri,
        values: &ContentValues,
    ) -> ProviderResult<Option<ResourceUri>> {
        let route = self.resolve(uri)?;
        if route.cardinality != Cardinality::Collection {
            return Err(RoutingError::CardinalityMismatch {
                uri: uri.to_string(),
                expected: Cardinality::Collection,
            }
            .into());
        }

        let generated = self.store.insert(route.table_name(), values)?;
        let Some(id) = generated.filter(|id| *id > 0) else {
            debug!(
                "event=dispatch op=insert module=service status=rejected table={}",
                route.table_name()
            );
            return Ok(None);
        };

        let item_uri = self.router.create_uri(route.entity, Some(id));
        self.notifier.notify_change(&item_uri);
        debug!(
            "event=dispatch op=insert module=service status=ok table={}",
            route.table_name()
        );
        Ok(Some(item_uri))
    }

    /// Updates rows in the table addressed by `uri`.
    ///
    /// Collection and item identifiers are both accepted; `selection` decides
    /// which rows change.
    pub fn update(
        &self,
        uri: &ResourceUri,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> ProviderResult<usize> {
        let route = self.resolve(uri)?;
        let count = self
            .store
            .update(route.table_name(), values, selection, selection_args)?;

        self.notifier.notify_change(uri);
        debug!(
            "event=dispatch op=update module=service status=ok table={} affected={count}",
            route.table_name()
        );
        Ok(count)
    }

    /// Deletes rows in the table addressed by `uri`.
    pub fn delete(
        &self,
        uri: &ResourceUri,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> ProviderResult<usize> {
        let route = self.resolve(uri)?;
        let count = self
            .store
            .delete(route.table_name(), selection, selection_args)?;

        self.notifier.notify_change(uri);
        debug!(
            "event=dispatch op=delete module=service status=ok table={} affected={count}",
            route.table_name()
        );
        Ok(count)
    }

    /// Reads rows from the table addressed by `uri`.
    pub fn query(
        &self,
        uri: &ResourceUri,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        selection_args: &[&str],
        sort_order: Option<&str>,
    ) -> ProviderResult<ResultSet> {
        let route = self.resolve(uri)?;
        let query = StoreQuery {
            projection,
            selection,
            selection_args,
            group_by: None,
            having: None,
            sort_order,
        };
        Ok(self.store.query(route.table_name(), &query)?)
    }

    /// Content type of the resource class addressed by `uri`.
    pub fn get_type(&self, uri: &ResourceUri) -> ProviderResult<String> {
        Ok(self.router.mime_type(uri)?.into_owned())
    }

    /// See [`ContentRouter::create_uri`].
    pub fn create_uri(&self, entity: &EntityType, id: Option<i64>) -> ResourceUri {
        self.router.create_uri(entity, id)
    }

    fn resolve(&self, uri: &ResourceUri) -> ProviderResult<ResolvedRoute<'_>> {
        Ok(self.router.resolve(uri)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentDispatcher, ProviderError};
    use crate::model::entity::CatalogEntry;
    use crate::model::uri::ResourceUri;
    use crate::model::values::{ContentValues, ResultSet};
    use crate::notify::ChangeNotifier;
    use crate::routing::{ContentRouter, RoutingError};
    use crate::store::{BackingStore, StoreQuery, StoreResult};
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    /// Store double that counts calls and returns a configured insert id.
    struct ScriptedStore {
        calls: Cell<usize>,
        insert_id: Option<i64>,
        last_table: RefCell<Option<String>>,
    }

    impl ScriptedStore {
        fn returning(insert_id: Option<i64>) -> Self {
            Self {
                calls: Cell::new(0),
                insert_id,
                last_table: RefCell::new(None),
            }
        }

        fn record(&self, table: &str) {
            self.calls.set(self.calls.get() + 1);
            *self.last_table.borrow_mut() = Some(table.to_string());
        }
    }

    impl BackingStore for ScriptedStore {
        fn insert(&self, table: &str, _values: &ContentValues) -> StoreResult<Option<i64>> {
            self.record(table);
            Ok(self.insert_id)
        }

        fn update(
            &self,
            table: &str,
            _values: &ContentValues,
            _selection: Option<&str>,
            _selection_args: &[&str],
        ) -> StoreResult<usize> {
            self.record(table);
            Ok(0)
        }

        fn delete(
            &self,
            table: &str,
            _selection: Option<&str>,
            _selection_args: &[&str],
        ) -> StoreResult<usize> {
            self.record(table);
            Ok(2)
        }

        fn query(&self, table: &str, _query: &StoreQuery<'_>) -> StoreResult<ResultSet> {
            self.record(table);
            Ok(ResultSet::default())
        }
    }

    #[derive(Default)]
    struct Notifications(RefCell<Vec<String>>);

    impl ChangeNotifier for Notifications {
        fn notify_change(&self, uri: &ResourceUri) {
            self.0.borrow_mut().push(uri.to_string());
        }
    }

    fn router() -> Arc<ContentRouter> {
        Arc::new(
            ContentRouter::from_catalog("auth", &[CatalogEntry::new("Items", "com.example.Item")])
                .expect("catalog should build"),
        )
    }

    fn uri(text: &str) -> ResourceUri {
        ResourceUri::parse(text).expect("test uri should parse")
    }

    #[test]
    fn routing_failure_never_reaches_store() {
        let store = ScriptedStore::returning(Some(1));
        let notifications = Notifications::default();
        let dispatcher = ContentDispatcher::new(router(), &store, &notifications);
        let bogus = uri("content://auth/bogus");

        assert!(matches!(
            dispatcher.insert(&bogus, &ContentValues::new()),
            Err(ProviderError::Routing(RoutingError::NoMatch(_)))
        ));
        assert!(dispatcher.update(&bogus, &ContentValues::new(), None, &[]).is_err());
        assert!(dispatcher.delete(&bogus, None, &[]).is_err());
        assert!(dispatcher.query(&bogus, None, None, &[], None).is_err());
        assert!(dispatcher.get_type(&bogus).is_err());

        assert_eq!(store.calls.get(), 0);
        assert!(notifications.0.borrow().is_empty());
    }

    #[test]
    fn insert_on_item_identifier_is_rejected_before_store() {
        let store = ScriptedStore::returning(Some(1));
        let dispatcher = ContentDispatcher::new(router(), &store, Notifications::default());

        let err = dispatcher
            .insert(&uri("content://auth/items/4"), &ContentValues::new())
            .expect_err("item identifiers cannot be inserted into");
        assert!(matches!(
            err,
            ProviderError::Routing(RoutingError::CardinalityMismatch { .. })
        ));
        assert_eq!(store.calls.get(), 0);
    }

    #[test]
    fn insert_returns_item_identifier_and_notifies_it() {
        let store = ScriptedStore::returning(Some(12));
        let notifications = Notifications::default();
        let dispatcher = ContentDispatcher::new(router(), &store, &notifications);

        let created = dispatcher
            .insert(&uri("content://auth/ITEMS"), &ContentValues::new())
            .unwrap()
            .expect("positive id should produce an identifier");
        assert_eq!(created.to_string(), "content://auth/items/12");
        assert_eq!(store.last_table.borrow().as_deref(), Some("Items"));
        assert_eq!(*notifications.0.borrow(), vec!["content://auth/items/12"]);
    }

    #[test]
    fn insert_without_positive_id_returns_none_silently() {
        for insert_id in [None, Some(0), Some(-1)] {
            let store = ScriptedStore::returning(insert_id);
            let notifications = Notifications::default();
            let dispatcher = ContentDispatcher::new(router(), &store, &notifications);

            let created = dispatcher
                .insert(&uri("content://auth/items"), &ContentValues::new())
                .unwrap();
            assert!(created.is_none());
            assert!(notifications.0.borrow().is_empty());
        }
    }

    #[test]
    fn update_and_delete_notify_original_identifier_once() {
        let store = ScriptedStore::returning(None);
        let notifications = Notifications::default();
        let dispatcher = ContentDispatcher::new(router(), &store, &notifications);

        let count = dispatcher
            .update(
                &uri("content://auth/items/3"),
                &ContentValues::new().with("name", "x"),
                Some("_id = ?"),
                &["3"],
            )
            .unwrap();
        assert_eq!(count, 0);

        let count = dispatcher
            .delete(&uri("content://auth/items"), None, &[])
            .unwrap();
        assert_eq!(count, 2);

        assert_eq!(
            *notifications.0.borrow(),
            vec!["content://auth/items/3", "content://auth/items"]
        );
    }

    #[test]
    fn query_and_get_type_do_not_notify() {
        let store = ScriptedStore::returning(None);
        let notifications = Notifications::default();
        let dispatcher = ContentDispatcher::new(router(), &store, &notifications);

        dispatcher
            .query(&uri("content://auth/items/1"), None, None, &[], None)
            .unwrap();
        assert_eq!(
            dispatcher.get_type(&uri("content://auth/items/1")).unwrap(),
            "vnd.auth.item/vnd.auth.Items"
        );
        assert!(notifications.0.borrow().is_empty());
    }
}
