use tokio::net::TcpListener;
use todos_server::{AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = Config::from_env();
    init_tracing(config.log_json);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(seed = config.seed, "listening on {addr}");
    todos_server::run(listener, AppState::new(&config)).await
}
