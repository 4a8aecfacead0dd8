// crates/server/src/main.rs
use anyhow::Result;
use playlog_db::Database;
use playlog_server::state::AppState;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let port: u16 = std::env::var("PLAYLOG_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let static_dir = std::env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./dist"));

    let db = match std::env::var("PLAYLOG_DB") {
        Ok(path) => Database::new(Path::new(&path)).await?,
        Err(_) => Database::open_default().await?,
    };
    let db_path = db.db_path().to_owned();

    let state = AppState::new(db);
    let app = playlog_server::create_app(state, &static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("playlog v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("  api:    http://localhost:{port}/api");
    eprintln!("  db:     {}", db_path.display());
    eprintln!("  static: {}", static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
