use clap::Parser;
use tracing::info;

use crate::{
    config::{Config, StartArgs},
    state::AppState,
};

pub mod auth;
pub mod config;
pub mod db;
pub mod drive;
pub mod error;
pub mod folders;
pub mod listing;
pub mod remarks;
pub mod router;
pub mod search;
pub mod state;
pub mod tree;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let StartArgs {
        config_path,
        address: host,
        port,
        log_level: level,
    } = StartArgs::parse();

    tracing_subscriber::fmt().with_max_level(level).init();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
    let db_pool = db::create_pool(&db_url)
        .await
        .expect("unable to connect to database");

    db::migrate(&db_pool)
        .await
        .expect("error while running migrations");

    let addr = format!("{host}:{port}");

    let config = Config::read(config_path).expect("invalid config file");

    info!("Serving folder tree rooted at {}", config.root_folder_id);

    let state = AppState::connect(config, db_pool).expect("error while building state");

    info!("Now listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("error while starting TCP listener");

    axum::serve(listener, router::router(state))
        .await
        .expect("error while starting server");
}
