use clap::Parser;
use matchday_core::db;
use matchday_core::error::CoreError;
use matchday_core::repository::SqliteRepository;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::load().unwrap_or_else(|_| config::Config::default());
    let db_pool = match db::establish_connection(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_activity(&repository, command).await,
        cli::Commands::List(command) => {
            commands::list::list_window(&repository, command, &config).await
        }
        cli::Commands::Show(command) => {
            commands::show::show_occurrence(&repository, command).await
        }
        cli::Commands::Edit(command) => commands::edit::edit_activity(&repository, command).await,
        cli::Commands::Delete(command) => {
            commands::delete::delete_activity(&repository, command).await
        }
        cli::Commands::Team(command) => commands::team::team_command(&repository, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();
    let core_error = err.chain().find_map(|cause| cause.downcast_ref::<CoreError>());

    match core_error {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::AmbiguousId(activities)) => {
            eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
            eprintln!("Did you mean one of these?");
            for (id, title) in activities {
                eprintln!("  {} ({})", id.yellow(), title);
            }
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidRecurrence(s)) => {
            eprintln!("{} Invalid repeat rule: {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {}", "Error:".style(error_style), err),
    }
}
