//! MongoDB connection management
//!
//! The `MongoConnection` wrapper holds a reference to the database and provides
//! collection access methods.

use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::sync::Arc;
use std::time::Duration;

/// Applies to both initial connection and server selection.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(3);

pub struct MongoConnection {
    database: Database,
}

impl MongoConnection {
    /// Create a new MongoDB connection with timeout configuration.
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI (e.g., "mongodb://localhost:27017")
    /// * `db_name` - Database name to use
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the server does not answer
    /// a ping within the timeout.
    pub async fn new(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = Self::create_client_options(uri).await?;
        let client = Client::with_options(options)?;
        let database = client.database(db_name);

        database
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        tracing::info!("Connected to MongoDB: {}", db_name);

        Ok(Self { database })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> mongodb::Collection<T> {
        self.database.collection(name)
    }

    async fn create_client_options(uri: &str) -> anyhow::Result<ClientOptions> {
        let mut options = ClientOptions::parse(uri).await?;
        options.connect_timeout = Some(CONNECTION_TIMEOUT);
        options.server_selection_timeout = Some(CONNECTION_TIMEOUT);
        options.app_name = Some("runwithme".to_string());
        Ok(options)
    }
}

/// Initialize MongoDB connection and return a shared reference.
pub async fn init_mongodb(uri: &str, db_name: &str) -> anyhow::Result<Arc<MongoConnection>> {
    let conn = Arc::new(MongoConnection::new(uri, db_name).await?);
    Ok(conn)
}
