use fore_scorecard::args::{self, CleanArgs, StoreKind};
use fore_scorecard::storage::sql::SqlDialect;
use fore_scorecard::storage::{MemoryStorage, RestStorage, RestStorageConfig, SqlStorage, Storage};
use fore_scorecard::{AppSettings, SessionGate, configure};
use sql_middleware::middleware::{ConfigAndPool, PgConfig, PostgresOptions, SqliteOptions};

use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fore_scorecard=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = args::args_checks()?;
    info!(store = ?args.store, bind = %args.bind, "starting scorecard");

    let storage = init_storage(&args).await?;
    let gate = SessionGate::new(args.session_policy());
    let settings = AppSettings {
        load_timeout: args.load_timeout(),
    };

    let storage: Data<dyn Storage> = Data::from(storage);
    let gate = Data::new(gate);
    let settings = Data::new(settings);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(storage.clone())
            .app_data(gate.clone())
            .app_data(settings.clone())
            .configure(configure)
            .service(Files::new("/static", "./static"))
    })
    .bind(args.bind.as_str())?
    .run()
    .await?;
    Ok(())
}

async fn init_sql(args: &CleanArgs) -> Result<SqlStorage, Box<dyn std::error::Error>> {
    let storage = if args.store == StoreKind::Postgres {
        let mut postgres_config = PgConfig::new();
        postgres_config.dbname = Some(args.db_name.clone());
        postgres_config.host.clone_from(&args.db_host);
        postgres_config.port = args.db_port;
        postgres_config.user.clone_from(&args.db_user);
        postgres_config.password.clone_from(&args.db_password);

        let pool = ConfigAndPool::new_postgres(PostgresOptions::new(postgres_config)).await?;
        SqlStorage::new(pool, SqlDialect::Postgres)
    } else {
        let pool = ConfigAndPool::new_sqlite(SqliteOptions::new(args.db_name.clone())).await?;
        SqlStorage::new(pool, SqlDialect::Sqlite)
    };

    storage.ensure_schema().await?;
    if !args.combined_sql_script.is_empty() {
        info!("running startup script");
        storage.execute_batch_sql(&args.combined_sql_script).await?;
    }
    Ok(storage)
}

async fn init_storage(args: &CleanArgs) -> Result<Arc<dyn Storage>, Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = match args.store {
        StoreKind::Sqlite | StoreKind::Postgres => Arc::new(init_sql(args).await?),
        StoreKind::Rest => {
            let config = RestStorageConfig {
                base_url: args.rest_url.clone().unwrap_or_default(),
                api_key: args.rest_key.clone().unwrap_or_default(),
                read_timeout: args.load_timeout(),
                write_timeout: args.write_timeout(),
            };
            Arc::new(RestStorage::new(config)?)
        }
        StoreKind::Memory => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}
