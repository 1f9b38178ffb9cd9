use clap::Parser;
use std::fs;
use std::time::Duration;
use tracing::warn;

use crate::session::SessionPolicy;

pub mod database;
pub mod types;
pub mod validation;

pub use types::{Args, CleanArgs, StoreKind};

/// Reads `.env` if there is one, then the command line and environment.
///
/// # Errors
///
/// Will return `Err` if the arguments are invalid
pub fn args_checks() -> Result<CleanArgs, String> {
    dotenvy::dotenv().ok();
    let mut args = Args::parse();
    args.validate()?;
    Ok(CleanArgs::new(args))
}

impl CleanArgs {
    #[must_use]
    pub fn new(args: Args) -> Self {
        let mut combined_sql_script = String::new();
        if let Some(db_startup_script) = &args.db_startup_script {
            for file in db_startup_script.split(';').map(str::trim) {
                if file.is_empty() {
                    continue;
                }
                match fs::read_to_string(file) {
                    Ok(script) => {
                        combined_sql_script.push_str(&script);
                        combined_sql_script.push('\n');
                    }
                    Err(e) => {
                        warn!("Failed to read SQL startup script '{file}': {e}");
                    }
                }
            }
        }
        CleanArgs {
            store: args.store,
            db_host: args.db_host,
            db_port: args.db_port,
            db_user: args.db_user,
            db_password: args.db_password,
            db_name: args.db_name,
            db_startup_script: args.db_startup_script,
            combined_sql_script,
            rest_url: args.rest_url,
            rest_key: args.rest_key,
            password: args.password,
            session_ttl_hours: args.session_ttl_hours,
            load_timeout_ms: args.load_timeout_ms,
            write_timeout_ms: args.write_timeout_ms,
            bind: args.bind,
        }
    }

    #[must_use]
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    #[must_use]
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy::with_ttl_hours(self.password.clone(), self.session_ttl_hours)
    }
}
