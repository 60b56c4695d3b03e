//! MongoDB adapter for the persistent store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::store::{PersistentStore, User};
use crate::types::{Result, WicketError};

/// Collection holding user records
pub const USERS_COLLECTION: &str = "users";
/// Collection holding file records (count-only from this service)
pub const FILES_COLLECTION: &str = "files";

/// User document as stored in MongoDB
///
/// `password` holds the hex digest of the secret, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: String,
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        User {
            id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            email: doc.email,
        }
    }
}

/// MongoDB client wrapper for the `users` and `files` collections
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db_name: String,
}

impl MongoStore {
    /// Create the store without blocking on the backend.
    ///
    /// The driver connects lazily on first operation; short selection and
    /// connect timeouts are pinned in the URI so an unreachable MongoDB fails
    /// fast instead of hanging request tasks.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Configuring MongoDB client for {}", uri);

        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=2000&connectTimeoutMS=2000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=2000&connectTimeoutMS=2000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| WicketError::Config(format!("Invalid MongoDB URI: {}", e)))?;

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    fn users(&self) -> Collection<UserDoc> {
        self.client
            .database(&self.db_name)
            .collection::<UserDoc>(USERS_COLLECTION)
    }

    /// Startup readiness gate: poll liveness on a fixed interval until the
    /// store answers, up to `attempts` polls.
    ///
    /// Consulted once at boot. The wait is an ordinary async sleep, so a
    /// caller dropping the future cancels it cleanly. After the budget is
    /// spent the gate fails fast with `ConnectionTimeout`.
    pub async fn wait_until_alive(&self, attempts: u32, interval: Duration) -> Result<()> {
        for attempt in 1..=attempts {
            if self.is_alive().await {
                info!("MongoDB alive after {} poll(s)", attempt);
                return Ok(());
            }
            debug!("MongoDB not ready (poll {}/{})", attempt, attempts);
            tokio::time::sleep(interval).await;
        }

        warn!("MongoDB never became alive within {} polls", attempts);
        Err(WicketError::ConnectionTimeout(format!(
            "MongoDB not reachable after {} attempts",
            attempts
        )))
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        self.client
            .database(&self.db_name)
            .collection::<bson::Document>(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Count failed: {}", e)))
    }
}

#[async_trait]
impl PersistentStore for MongoStore {
    async fn is_alive(&self) -> bool {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .is_ok()
    }

    async fn nb_users(&self) -> Result<u64> {
        self.count(USERS_COLLECTION).await
    }

    async fn nb_files(&self) -> Result<u64> {
        self.count(FILES_COLLECTION).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let found = self
            .users()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Find failed: {}", e)))?;
        Ok(found.map(User::from))
    }

    async fn find_by_credentials(&self, email: &str, digest: &str) -> Result<Option<User>> {
        let found = self
            .users()
            .find_one(doc! { "email": email, "password": digest })
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Find failed: {}", e)))?;
        Ok(found.map(User::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        // An unparseable id cannot match any document
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let found = self
            .users()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Find failed: {}", e)))?;
        Ok(found.map(User::from))
    }

    async fn insert_user(&self, email: &str, digest: &str) -> Result<User> {
        let doc = UserDoc {
            id: None,
            email: email.to_string(),
            password: digest.to_string(),
        };

        let result = self
            .users()
            .insert_one(doc)
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Insert failed: {}", e)))?;

        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| WicketError::StoreUnavailable("Failed to get inserted ID".into()))?;

        Ok(User {
            id: oid.to_hex(),
            email: email.to_string(),
        })
    }
}
