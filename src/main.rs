use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};
use tracing_subscriber::EnvFilter;

use crate::common::{
    config::Config,
    error::{ErrorResponse, ErrorTypes},
};

mod common;
mod controllers;
mod db;
mod handlers;
mod swagger;
mod templates;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<MySql>,
    pub redis: Option<r2d2::Pool<redis::Client>>,
    pub config: Arc<Config>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(pool: Pool<MySql>) -> Self {
        Self {
            pool,
            redis: None,
            config: Arc::new(common::config::test_config()),
        }
    }
}

fn internal_server_error_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Internal server error catched: {}", details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorResponse::new(ErrorTypes::InternalError, &details)),
    )
        .into_response()
}

async fn get_db_pool(config: &Config) -> anyhow::Result<Pool<MySql>> {
    let mysql_pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await?;
    Ok(mysql_pool)
}

// Group names are only memoized when redis is configured and reachable
fn get_redis_pool(config: &Config) -> Option<r2d2::Pool<redis::Client>> {
    let url = config.redis_url.as_deref()?;
    let client = match redis::Client::open(url) {
        Ok(client) => client,
        Err(why) => {
            tracing::warn!("Invalid REDIS_URL, caching disabled: {}", why);
            return None;
        }
    };
    match r2d2::Pool::builder()
        .connection_timeout(Duration::from_secs(1))
        .build(client)
    {
        Ok(pool) => Some(pool),
        Err(why) => {
            tracing::warn!("Could not connect to redis, caching disabled: {}", why);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = get_db_pool(&config).await?;
    let redis = get_redis_pool(&config);

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        pool,
        redis,
        config: Arc::new(config),
    };
    let router = common::router::get_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Started on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
