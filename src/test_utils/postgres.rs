use postgresql_embedded::PostgreSQL;
use tokio::runtime::Runtime;

/// A running embedded `PostgreSQL` instance.
///
/// The runtime only drives the server's lifecycle; connections opened by the
/// crate's postgres driver run on their own runtime.
pub struct EmbeddedPostgres {
    runtime: Runtime,
    postgresql: PostgreSQL,
    /// `host=... port=... dbname=...` for the provisioned database
    pub connection_string: String,
    pub username: String,
    pub password: String,
}

/// Set up an embedded `PostgreSQL` instance and create `dbname` on it.
///
/// # Errors
/// Returns an error if the server cannot be installed, started, or if the
/// database cannot be created.
pub fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let postgresql = runtime.block_on(async {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(dbname).await?;
        Ok::<_, postgresql_embedded::Error>(postgresql)
    })?;

    let settings = postgresql.settings();
    let connection_string = format!(
        "host={} port={} dbname={dbname}",
        settings.host, settings.port
    );
    let username = settings.username.clone();
    let password = settings.password.clone();
    tracing::debug!(%connection_string, "embedded postgres started");

    Ok(EmbeddedPostgres {
        runtime,
        postgresql,
        connection_string,
        username,
        password,
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres {
        runtime, postgresql, ..
    } = postgres;
    if let Err(err) = runtime.block_on(postgresql.stop()) {
        tracing::debug!(error = %err, "embedded postgres did not stop cleanly");
    }
}
