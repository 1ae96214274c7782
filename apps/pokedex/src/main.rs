use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::PokeApiClient;
use shared::{
    domain::{PokemonId, SortKind},
    error::{ApiError, ErrorCode},
};
use storage::{FavoritesStore, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;
mod session;

use config::{load_settings, prepare_database_url};
use session::Session;

#[derive(Parser, Debug)]
#[command(name = "pokedex", about = "Browse, search and bookmark Pokémon from the terminal")]
struct Cli {
    #[arg(long)]
    graphql_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of the catalogue.
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        page: i64,
        #[arg(long, default_value = "name")]
        sort: SortKind,
    },
    /// Search by name, number or type (chosen by --sort).
    Search {
        term: String,
        #[arg(long, default_value = "name")]
        sort: SortKind,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        page: i64,
    },
    Show {
        id: i64,
    },
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Interactive grid; type :help once inside.
    Browse {
        #[arg(long, default_value = "name")]
        sort: SortKind,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    List,
    Toggle { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.graphql_url {
        settings.graphql_url = url;
    }
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = Arc::new(PokeApiClient::with_timeout(
        settings.graphql_url.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    )?);
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open favorites database at {database_url}"))?;
    info!(endpoint = %settings.graphql_url, database = %database_url, "pokedex starting");
    let favorites = FavoritesStore::load(Arc::new(storage)).await?;

    let mut session = Session::new(
        client.clone(),
        client.clone(),
        client,
        favorites,
        settings.page_size,
    );

    match cli.command {
        Command::List { page, sort } => {
            session.orchestrator_mut().change_sort(sort);
            session.orchestrator_mut().go_to_page(page);
            print_grid(&mut session).await?;
        }
        Command::Search { term, sort, page } => {
            let orchestrator = session.orchestrator_mut();
            orchestrator.change_sort(sort);
            orchestrator.update_raw_input(term.clone());
            orchestrator.commit_search(&term).map_err(ApiError::from)?;
            orchestrator.go_to_page(page);
            print_grid(&mut session).await?;
        }
        Command::Show { id } => match session.render_detail(PokemonId(id)).await? {
            Some(text) => print!("{text}"),
            None => {
                return Err(ApiError::new(
                    ErrorCode::NotFound,
                    format!("no Pokémon with number {}", PokemonId(id)),
                )
                .into())
            }
        },
        Command::Favorites { action } => match action {
            FavoritesCommand::List => print!("{}", session.render_favorites().await?),
            FavoritesCommand::Toggle { id } => {
                let id = PokemonId(id);
                if session.toggle_favorite(id).await? {
                    println!("{id} added to favorites.");
                } else {
                    println!("{id} removed from favorites.");
                }
            }
        },
        Command::Browse { sort } => {
            session.orchestrator_mut().change_sort(sort);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            browse::run(&mut session, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

async fn print_grid(session: &mut Session) -> Result<()> {
    let view = session.view().await;
    if let Some(error) = view.error.clone() {
        return Err(error.into());
    }
    print!(
        "{}",
        render::grid(&view, session.orchestrator().state(), session.favorites())
    );
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
