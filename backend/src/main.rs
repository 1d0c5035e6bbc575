//! Backend entry-point: wires settings, the connection pool, and the HTTP
//! server.

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::{self, AppState};
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{AppSettings, load_session_key, session_middleware};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let key = load_session_key(&settings.session_key_file())?;
    let cookie_secure = settings.cookie_secure;

    let pool_config = PoolConfig::new(settings.database_url())
        .with_max_size(settings.max_db_connections());
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(pool));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), cookie_secure))
            .configure(http::configure)
    })
    .bind(settings.bind_addr())?
    .run()
    .await
}
