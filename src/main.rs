use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sql_props_loader::credentials::{CredentialResolver, NoCredentialStore, SettingsFile};
use sql_props_loader::{
    LoadConfig, PropertiesFilePublisher, PropertyLoader, PropertyPublisher, SqlPropsError,
    Statement, WriterPublisher,
};

/// Load build properties from a SQL query.
///
/// The query must select the property name as its first column and the
/// value as its second. Pre-statements run first, in the same transaction.
#[derive(Debug, Parser)]
#[command(name = "load-props-sql", version, about)]
struct Cli {
    /// JSON file with the load parameters; flags override its values.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Database driver identifier (sqlite, postgres).
    #[arg(long, env = "LOAD_PROPS_DRIVER")]
    driver: Option<String>,

    /// Driver-specific connection string.
    #[arg(long, env = "LOAD_PROPS_CONNECTION_STRING")]
    connection_string: Option<String>,

    #[arg(long, env = "LOAD_PROPS_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "LOAD_PROPS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Server id in the settings file to take username and password from.
    #[arg(long, env = "LOAD_PROPS_SQL_KEY")]
    sql_key: Option<String>,

    /// Query selecting (name, value) rows.
    #[arg(long, env = "LOAD_PROPS_SELECT")]
    select: Option<String>,

    /// Pre-statement as dml:<sql> or call:<sql>; repeat to run several in order.
    #[arg(long = "pre", value_name = "KIND:SQL")]
    pre: Vec<Statement>,

    /// JSON settings file with server credentials, used with --sql-key.
    #[arg(long, env = "LOAD_PROPS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Merge the properties into this file instead of printing them.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn overrides(&self) -> LoadConfig {
        LoadConfig {
            driver_classname: self.driver.clone(),
            connection_string: self.connection_string.clone(),
            sql_username: self.username.clone(),
            sql_password: self.password.clone(),
            sql_key: self.sql_key.clone(),
            select_statement: self.select.clone(),
            pre_sql_statements: self.pre.iter().cloned().map(Some).collect(),
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), SqlPropsError> {
    let base = match &cli.config {
        Some(path) => LoadConfig::from_path(path)?,
        None => LoadConfig::default(),
    };
    let config = base.merge(cli.overrides());
    tracing::debug!(?config, "effective configuration");

    let resolver: Box<dyn CredentialResolver> = match &cli.settings {
        Some(path) => Box::new(SettingsFile::from_path(path)?),
        None => Box::new(NoCredentialStore),
    };
    let loader = PropertyLoader::new().with_credentials(resolver);

    let mut publisher: Box<dyn PropertyPublisher> = match &cli.output {
        Some(path) => Box::new(PropertiesFilePublisher::new(path)),
        None => Box::new(WriterPublisher::new(std::io::stdout().lock())),
    };
    loader.load(&config, publisher.as_mut())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "execution failed");
            ExitCode::FAILURE
        }
    }
}
