use config::Config;
use dotenvy::dotenv;
use serde::Deserialize;
use tokio::net::TcpListener;

#[derive(Debug, Deserialize)]
struct ServerConfig {
    address: String,
    port: u16,
}

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    Config::builder()
        .set_default("address", "127.0.0.1")?
        .set_default("port", 3000)?
        // Optional `./config/default.yaml`
        .add_source(config::File::with_name("config/default").required(false))
        // MOCK_ADDRESS, MOCK_PORT
        .add_source(config::Environment::with_prefix("MOCK"))
        .build()?
        .try_deserialize()
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let addr = format!("{}:{}", server_config.address, server_config.port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    mock_server::run(listener).await
}
