//! MongoDB entity store
//!
//! Stores each entity as one document. The entity's `id` is kept in the
//! document's `_id` as an `ObjectId`; every other field is stored as
//! serialized. Partial updates use `$set` with the patch's present fields.
//!
//! The store also implements [`TransactionManager`] with client sessions.
//! A [`TransactionContext`] created here carries a [`MongoSession`] and is
//! only valid for this store.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use cacheside_domain::entities::{Entity, FromCreate};
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::repositories::{EntityRepository, TransactionManager};
use cacheside_domain::value_objects::{TransactionContext, validate_entity_id};
use mongodb::options::ReturnDocument;
use mongodb::{Client, ClientSession, Collection};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::{MONGO_DUPLICATE_KEY_MARKER, MONGO_TIMEOUT_PARAMS};

/// Client session carried inside a [`TransactionContext`]
#[derive(Debug)]
pub struct MongoSession(Mutex<ClientSession>);

/// MongoDB-backed entity store
pub struct MongoEntityStore<E: Entity> {
    client: Client,
    collection: Collection<Document>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for MongoEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for MongoEntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoEntityStore")
            .field("entity", &E::ENTITY_NAME)
            .field("collection", &self.collection.name())
            .finish()
    }
}

impl<E: Entity> MongoEntityStore<E> {
    /// Connect, verify the server answers a ping, and open the collection
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        info!(database = database, collection = collection, "Connecting to MongoDB");

        // Fail fast on an unreachable server instead of hanging
        let separator = if uri.contains('?') { '&' } else { '?' };
        let timeout_uri = format!("{uri}{separator}{MONGO_TIMEOUT_PARAMS}");

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| Error::database_with_source("Failed to connect to MongoDB", e))?;

        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| Error::database_with_source("MongoDB ping failed", e))?;

        info!(database = database, "Connected to MongoDB");
        Ok(Self::new(client, database, collection))
    }

    /// Wrap an existing client
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection::<Document>(collection);
        Self {
            client,
            collection,
            _entity: PhantomData,
        }
    }

    fn object_id(id: &str) -> Result<ObjectId> {
        validate_entity_id(id)?;
        ObjectId::parse_str(id)
            .map_err(|e| Error::invalid_argument(format!("Invalid ObjectId '{id}': {e}")))
    }

    fn to_document(entity: &E) -> Result<Document> {
        let mut document = bson::to_document(entity)
            .map_err(|e| Error::database_with_source("Failed to encode document", e))?;
        document.remove("id");
        document.insert("_id", Self::object_id(entity.id())?);
        Ok(document)
    }

    fn from_document(mut document: Document) -> Result<E> {
        if let Some(Bson::ObjectId(oid)) = document.remove("_id") {
            document.insert("id", oid.to_hex());
        }
        bson::from_document(document)
            .map_err(|e| Error::database_with_source("Failed to decode document", e))
    }

    fn session(tx: Option<&TransactionContext>) -> Result<Option<&MongoSession>> {
        tx.map(|ctx| {
            ctx.handle::<MongoSession>().ok_or_else(|| {
                Error::invalid_argument(format!(
                    "transaction {} was not started by the MongoDB store",
                    ctx.id()
                ))
            })
        })
        .transpose()
    }
}

/// Map a write failure, turning duplicate keys into `Conflict`
fn write_error(operation: &str, error: mongodb::error::Error) -> Error {
    if error.to_string().contains(MONGO_DUPLICATE_KEY_MARKER) {
        return Error::conflict(format!("{operation}: duplicate key"));
    }
    Error::database_with_source(format!("{operation} failed"), error)
}

#[async_trait]
impl<E, C, U> EntityRepository<E, C, U> for MongoEntityStore<E>
where
    E: FromCreate<C>,
    C: Send + 'static,
    U: Serialize + Send + Sync + 'static,
{
    async fn create(&self, dto: C, tx: Option<&TransactionContext>) -> Result<E> {
        let entity = E::from_create(ObjectId::new().to_hex(), dto);
        let document = Self::to_document(&entity)?;

        let result = match Self::session(tx)? {
            Some(session) => {
                let mut guard = session.0.lock().await;
                self.collection.insert_one(document).session(&mut *guard).await
            }
            None => self.collection.insert_one(document).await,
        };
        result.map_err(|e| write_error("insert", e))?;

        debug!(entity = E::ENTITY_NAME, id = entity.id(), "Document inserted");
        Ok(entity)
    }

    async fn find_by_id(&self, id: &str, tx: Option<&TransactionContext>) -> Result<Option<E>> {
        let filter = doc! { "_id": Self::object_id(id)? };

        let found = match Self::session(tx)? {
            Some(session) => {
                let mut guard = session.0.lock().await;
                self.collection.find_one(filter).session(&mut *guard).await
            }
            None => self.collection.find_one(filter).await,
        }
        .map_err(|e| Error::database_with_source(format!("find {id} failed"), e))?;

        found.map(Self::from_document).transpose()
    }

    async fn update(
        &self,
        id: &str,
        patch: U,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<E>> {
        let oid = Self::object_id(id)?;
        let fields = bson::to_document(&patch)
            .map_err(|e| Error::database_with_source("Failed to encode update", e))?;
        if fields.is_empty() {
            return <Self as EntityRepository<E, C, U>>::find_by_id(self, id, tx).await;
        }

        let filter = doc! { "_id": oid };
        let update = doc! { "$set": fields };

        let updated = match Self::session(tx)? {
            Some(session) => {
                let mut guard = session.0.lock().await;
                self.collection
                    .find_one_and_update(filter, update)
                    .return_document(ReturnDocument::After)
                    .session(&mut *guard)
                    .await
            }
            None => {
                self.collection
                    .find_one_and_update(filter, update)
                    .return_document(ReturnDocument::After)
                    .await
            }
        }
        .map_err(|e| write_error("update", e))?;

        updated.map(Self::from_document).transpose()
    }
}

#[async_trait]
impl<E: Entity> TransactionManager for MongoEntityStore<E> {
    async fn begin(&self) -> Result<TransactionContext> {
        let mut session = self
            .client
            .start_session()
            .await
            .map_err(|e| Error::database_with_source("Failed to start session", e))?;
        session
            .start_transaction()
            .await
            .map_err(|e| Error::database_with_source("Failed to start transaction", e))?;

        Ok(TransactionContext::new(
            Uuid::new_v4().to_string(),
            MongoSession(Mutex::new(session)),
        ))
    }

    async fn commit(&self, ctx: TransactionContext) -> Result<()> {
        let session = Self::session(Some(&ctx))?
            .ok_or_else(|| Error::internal("missing session"))?;
        session
            .0
            .lock()
            .await
            .commit_transaction()
            .await
            .map_err(|e| write_error("commit", e))
    }

    async fn abort(&self, ctx: TransactionContext) -> Result<()> {
        let session = Self::session(Some(&ctx))?
            .ok_or_else(|| Error::internal("missing session"))?;
        session
            .0
            .lock()
            .await
            .abort_transaction()
            .await
            .map_err(|e| Error::database_with_source("Failed to abort transaction", e))
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use crate::constants::MONGO_DEFAULT_DATABASE;
use cacheside_application::ports::registry::{
    STORE_PROVIDERS, StoreHandle, StoreProviderConfig, StoreProviderEntry,
};
use cacheside_domain::User;
use futures::FutureExt;
use futures::future::BoxFuture;

fn mongo_store_factory(
    config: StoreProviderConfig,
) -> BoxFuture<'static, std::result::Result<StoreHandle, String>> {
    async move {
        let uri = config
            .uri
            .ok_or_else(|| "mongo store requires a connection uri".to_string())?;
        let database = config
            .database
            .unwrap_or_else(|| MONGO_DEFAULT_DATABASE.to_string());
        let collection = config
            .collection
            .unwrap_or_else(|| format!("{}s", User::ENTITY_NAME));

        let store = MongoEntityStore::<User>::connect(&uri, &database, &collection)
            .await
            .map_err(|e| format!("Failed to create MongoDB store: {e}"))?;
        let store = Arc::new(store);

        Ok::<_, String>(StoreHandle {
            repository: store.clone(),
            transactions: Some(store),
        })
    }
    .boxed()
}

#[linkme::distributed_slice(STORE_PROVIDERS)]
static MONGO_STORE: StoreProviderEntry = StoreProviderEntry {
    name: "mongo",
    description: "MongoDB store with session transactions",
    factory: mongo_store_factory,
};
