use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use verdant_adapters::config::settings::PostgresSetting;

/// Connect to PostgreSQL and run all pending migrations
///
/// # Arguments
/// * `settings` - Connection URL and pool size
///
/// # Returns
/// A configured PgPool ready for use
pub async fn configure_postgresql(settings: &PostgresSetting) -> Result<PgPool, sqlx::Error> {
    let pg_pool =
        get_postgres_pool(settings.url.expose_secret(), settings.max_connections).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

/// Create a PostgreSQL connection pool
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
