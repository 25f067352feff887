use std::time::Duration;
use mongodb::{
    bson::doc,
    options::ClientOptions,
    Client,
    ClientSession,
    Database,
};

/// Handle on the MongoDB deployment. Cheap to clone; the driver pools connections.
#[derive(Clone, Debug)]
pub struct MongoDB {
    client: Client,
    database: String,
}

impl MongoDB {
    pub async fn init(uri: &str, database: &str) -> mongodb::error::Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some("segreto_backend".to_string());
        options.connect_timeout = Some(Duration::from_secs(5));
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options)?;
        client.database(database).run_command(doc! { "ping": 1 }).await?;
        log::info!("Connected to MongoDB database {}", database);

        Ok(Self { client, database: database.to_string() })
    }

    pub fn connect(&self) -> Database {
        self.client.database(&self.database)
    }

    /// Database handle plus a session with an open transaction.
    pub async fn connect_acid(&self) -> mongodb::error::Result<(Database, ClientSession)> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok((self.connect(), session))
    }
}
