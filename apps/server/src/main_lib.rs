use std::sync::Arc;

use crate::{
    config::{Config, LogFormat},
    domain_events::TracingDomainEventSink,
};
use goalsaver_core::{
    documents::DocumentStoreTrait,
    events::DomainEventSink,
    goals::{GoalService, GoalServiceTrait},
    seed::{SeedOutcome, SeedService},
};
use goalsaver_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, SqliteDocumentStore,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub seed_service: Arc<SeedService>,
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let store: Arc<dyn DocumentStoreTrait> = Arc::new(SqliteDocumentStore::new(pool, writer));
    let event_sink: Arc<dyn DomainEventSink> = Arc::new(TracingDomainEventSink);

    let seed_service = Arc::new(SeedService::new(store.clone(), event_sink.clone()));
    if config.seed_on_start {
        // A failed bootstrap is fatal to startup.
        match seed_service.initialize().await? {
            SeedOutcome::AlreadySeeded => tracing::info!("Seed data already present"),
            SeedOutcome::Applied(summary) => {
                tracing::warn!(
                    documents = summary.total(),
                    fixture_version = summary.fixture_version,
                    "Database reset to the demo data set"
                )
            }
        }
    } else {
        tracing::info!("Seeding disabled (GS_SEED_ON_START=false)");
    }

    let goal_service: Arc<dyn GoalServiceTrait> =
        Arc::new(GoalService::new(store.clone(), event_sink));

    Ok(Arc::new(AppState {
        goal_service,
        seed_service,
    }))
}
