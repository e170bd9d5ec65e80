use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::cache::{RedisConfig, RedisPool};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use rental::MIGRATOR;
use rental::config::AppConfig;
use rental::repositories::{CarRepository, ReservationRepository, UserRepository};
use rental::routes;
use rental::session::SessionStore;
use rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting rental service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;
    info!("Database migrations applied");

    // Initialize the Redis-backed session store
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let app_config = AppConfig::from_env();
    let sessions = SessionStore::new(redis_pool, app_config.session_ttl_seconds());

    let app_state = AppState {
        db_pool: pool.clone(),
        config: app_config.clone(),
        users: UserRepository::new(pool.clone()),
        cars: CarRepository::new(pool.clone()),
        reservations: ReservationRepository::new(pool),
        sessions,
    };

    info!("Rental service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&app_config.bind_addr).await?;
    info!("Rental service listening on {}", app_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
