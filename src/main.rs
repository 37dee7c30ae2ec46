use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::fs;
use std::path::Path;

mod models;
mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config = settings::Settings::load(&args.config).expect("Could not load config file.");

    init_logging(&args.log4rs).expect("Could not initialize logging.");

    let conn = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await
        .expect("Could not connect to database.");

    sqlx::migrate!("./migrations")
        .run(&conn)
        .await
        .expect("Could not run database migrations.");

    println!("[*] Starting services.");
    services::start_services(conn, config)
        .await
        .expect("Could not start services.");
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    match log4rs::init_file(path, Default::default()) {
        Ok(_) => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Could not initialize logging: {}", e)),
    }
}
