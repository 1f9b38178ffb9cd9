use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Postgres,
    /// A hosted PostgREST-style backend.
    Rest,
    /// In-process tables, gone on restart.
    Memory,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Where scores are kept: sqlite, postgres, rest or memory
    #[arg(
        short = 's',
        long,
        value_name = "STORE",
        env = "FORE_STORE",
        value_enum,
        default_value = "sqlite"
    )]
    pub store: StoreKind,
    // Only necessary for postgres.
    #[arg(long, value_name = "DATABASE_HOST", env = "FORE_DB_HOST", default_value = "localhost")]
    pub db_host: Option<String>,
    #[arg(
        short = 'p',
        long,
        value_name = "DATABASE_PORT",
        env = "FORE_DB_PORT",
        default_value = "5432"
    )]
    pub db_port: Option<u16>,
    #[arg(
        short = 'u',
        long,
        value_name = "DATABASE_USER",
        env = "FORE_DB_USER",
        default_value = "postgres"
    )]
    pub db_user: Option<String>,
    #[arg(short = 'w', long, value_name = "DATABASE_PASSWORD", env = "FORE_DB_PASSWORD")]
    pub db_password: Option<String>,

    /// For postgres, the name of the database. For sqlite, the filename.
    #[arg(
        short = 'n',
        long,
        value_name = "DATABASE_NAME",
        env = "FORE_DB_NAME",
        default_value = "fore.db"
    )]
    pub db_name: String,
    /// If specified, this sql is run on program startup. Several files may be joined with `;`.
    #[arg(long, value_name = "DATABASE_STARTUP_SCRIPT", value_parser = crate::args::validation::check_readable_file)]
    pub db_startup_script: Option<String>,

    /// Base url of the hosted store, e.g. https://xyz.example.co
    #[arg(long, value_name = "REST_URL", env = "FORE_REST_URL")]
    pub rest_url: Option<String>,
    #[arg(long, value_name = "REST_KEY", env = "FORE_REST_KEY")]
    pub rest_key: Option<String>,

    /// The shared password everyone logs in with.
    #[arg(long, value_name = "PASSWORD", env = "FORE_PASSWORD")]
    pub password: String,
    /// How long a login lasts. 0 keeps sessions until logout or restart.
    #[arg(long, value_name = "HOURS", env = "FORE_SESSION_TTL_HOURS", default_value_t = 24)]
    pub session_ttl_hours: u32,
    /// How long page loads wait on the store before drawing what they have.
    #[arg(long, value_name = "MILLISECONDS", env = "FORE_LOAD_TIMEOUT_MS", default_value_t = 3000)]
    pub load_timeout_ms: u64,
    /// How long a save or clear waits on the hosted store for each request.
    #[arg(long, value_name = "MILLISECONDS", env = "FORE_WRITE_TIMEOUT_MS", default_value_t = 15000)]
    pub write_timeout_ms: u64,
    #[arg(long, value_name = "ADDRESS", env = "FORE_BIND", default_value = "0.0.0.0:8081")]
    pub bind: String,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub store: StoreKind,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: String,
    pub db_startup_script: Option<String>,
    pub combined_sql_script: String,
    pub rest_url: Option<String>,
    pub rest_key: Option<String>,
    pub password: String,
    pub session_ttl_hours: u32,
    pub load_timeout_ms: u64,
    pub write_timeout_ms: u64,
    pub bind: String,
}
