//! In-memory entity store
//!
//! Process-local store backed by [`DashMap`]. It mints and validates the same
//! 24-hex identifiers as the MongoDB store, applies partial updates by
//! merging the patch's JSON fields over the stored entity, and ignores
//! transaction contexts.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use cacheside_domain::constants::ENTITY_ID_HEX_LEN;
use cacheside_domain::entities::{Entity, FromCreate};
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::repositories::EntityRepository;
use cacheside_domain::value_objects::{TransactionContext, validate_entity_id};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Entity store held in memory
pub struct InMemoryEntityStore<E: Entity> {
    entries: DashMap<String, E>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> InMemoryEntityStore<E> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn mint_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ENTITY_ID_HEX_LEN);
        id
    }
}

impl<E: Entity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> std::fmt::Debug for InMemoryEntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntityStore")
            .field("entity", &E::ENTITY_NAME)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Overlay the fields of `patch` onto `current`
fn merge_patch<E: Entity, U: Serialize>(current: &E, patch: &U) -> Result<E> {
    let mut merged = serde_json::to_value(current)?;
    if let (Value::Object(target), Value::Object(fields)) =
        (&mut merged, serde_json::to_value(patch)?)
    {
        target.extend(fields);
    }
    Ok(serde_json::from_value(merged)?)
}

#[async_trait]
impl<E, C, U> EntityRepository<E, C, U> for InMemoryEntityStore<E>
where
    E: FromCreate<C>,
    C: Send + 'static,
    U: Serialize + Send + Sync + 'static,
{
    async fn create(&self, dto: C, _tx: Option<&TransactionContext>) -> Result<E> {
        let id = Self::mint_id();
        let entity = E::from_create(id.clone(), dto);
        match self.entries.entry(id) {
            Entry::Occupied(occupied) => Err(Error::conflict(format!(
                "{} {} already exists",
                E::ENTITY_NAME,
                occupied.key()
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    async fn find_by_id(&self, id: &str, _tx: Option<&TransactionContext>) -> Result<Option<E>> {
        validate_entity_id(id)?;
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(
        &self,
        id: &str,
        patch: U,
        _tx: Option<&TransactionContext>,
    ) -> Result<Option<E>> {
        validate_entity_id(id)?;
        let Some(mut slot) = self.entries.get_mut(id) else {
            return Ok(None);
        };
        let updated = merge_patch(slot.value(), &patch)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use cacheside_application::ports::registry::{
    STORE_PROVIDERS, StoreHandle, StoreProviderConfig, StoreProviderEntry,
};
use cacheside_domain::User;
use futures::FutureExt;
use futures::future::BoxFuture;

fn memory_store_factory(
    _config: StoreProviderConfig,
) -> BoxFuture<'static, std::result::Result<StoreHandle, String>> {
    let handle = StoreHandle {
        repository: Arc::new(InMemoryEntityStore::<User>::new()),
        transactions: None,
    };
    futures::future::ready(Ok(handle)).boxed()
}

#[linkme::distributed_slice(STORE_PROVIDERS)]
static MEMORY_STORE: StoreProviderEntry = StoreProviderEntry {
    name: "memory",
    description: "Process-local store, no transactions",
    factory: memory_store_factory,
};
