mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use env_logger::{Builder, Target};
use log::LevelFilter;
use roster_core::Config;

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("roster_core", LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let config = Config::load();
    let mut app = commands::build(config)?;

    match cli.command {
        Command::Login { email, password } => commands::login(&app, &email, &password).await,
        Command::Logout => commands::logout(&app).await,
        Command::List { page, query } => commands::list(&mut app, page, &query).await,
        Command::Create(fields) => commands::create(&mut app, fields).await,
        Command::Update { id, fields } => commands::update(&mut app, &id, fields).await,
        Command::Delete { id } => commands::delete(&mut app, &id).await,
    }
}
