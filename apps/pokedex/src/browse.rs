use std::io::Write;

use anyhow::Result;
use client_core::{pagination::is_navigable, PageNav};
use shared::domain::{PokemonId, SortKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::session::Session;

const HELP: &str = "\
Type a term and press Enter to search (an empty line clears the search).
  :sort name|number|type   change sort and search field
  :page <n>                jump to page n
  :next / :prev            move one page
  :clear                   drop the search and return to the listing
  :retry                   reissue a failed query
  :fav <id>                toggle a favorite
  :favorites               list favorites
  :show <id>               show details
  :help                    this text
  :quit                    leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Sort(SortKind),
    Page(i64),
    Next,
    Previous,
    Clear,
    Retry,
    ToggleFavorite(PokemonId),
    Favorites,
    Show(PokemonId),
    Help,
    Quit,
}

/// Lines starting with `:` are commands; anything else is a search commit.
pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(BrowseCommand::Search(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();

    match (name, argument) {
        ("sort", Some(kind)) => kind.parse().map(BrowseCommand::Sort),
        ("page", Some(page)) => page
            .parse()
            .map(BrowseCommand::Page)
            .map_err(|_| format!("'{page}' is not a page number")),
        ("next", None) => Ok(BrowseCommand::Next),
        ("prev", None) => Ok(BrowseCommand::Previous),
        ("clear", None) => Ok(BrowseCommand::Clear),
        ("retry", None) => Ok(BrowseCommand::Retry),
        ("fav", Some(id)) => parse_id(id).map(BrowseCommand::ToggleFavorite),
        ("favorites", None) => Ok(BrowseCommand::Favorites),
        ("show", Some(id)) => parse_id(id).map(BrowseCommand::Show),
        ("help", None) => Ok(BrowseCommand::Help),
        ("quit" | "q", None) => Ok(BrowseCommand::Quit),
        _ => Err(format!("unknown command ':{command}' (try :help)")),
    }
}

fn parse_id(raw: &str) -> Result<PokemonId, String> {
    raw.trim_start_matches('#')
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(PokemonId)
        .ok_or_else(|| format!("'{raw}' is not a Pokémon number"))
}

/// Reads commands until `:quit` or end of input, rendering after each one.
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    write!(out, "{}", session.render_grid().await)?;

    loop {
        let kind = session.orchestrator().state().search_kind();
        write!(out, "{} ({})> ", kind.placeholder(), kind.hint())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!(?command, "browse command");

        if command == BrowseCommand::Quit {
            break;
        }
        if let Some(text) = apply(session, command).await? {
            write!(out, "{text}")?;
        }
    }
    Ok(())
}

async fn apply(session: &mut Session, command: BrowseCommand) -> Result<Option<String>> {
    let current = session.orchestrator().state().current_page();
    let total_pages = session.last_total_pages();
    let nav = PageNav::new(current, total_pages);

    match command {
        BrowseCommand::Search(text) => {
            let orchestrator = session.orchestrator_mut();
            orchestrator.update_raw_input(text.clone());
            if let Err(rejection) = orchestrator.commit_search(&text) {
                return Ok(Some(format!("{rejection}\n")));
            }
        }
        BrowseCommand::Sort(kind) => session.orchestrator_mut().change_sort(kind),
        BrowseCommand::Page(page) => {
            if !is_navigable(page, current, total_pages) {
                return Ok(Some(format!("No page {page} to go to.\n")));
            }
            session.orchestrator_mut().go_to_page(page);
        }
        BrowseCommand::Next | BrowseCommand::Previous => {
            let target = if command == BrowseCommand::Next {
                nav.next
            } else {
                nav.previous
            };
            let Some(page) = target else {
                return Ok(Some("No page in that direction.\n".to_string()));
            };
            session.orchestrator_mut().go_to_page(page);
        }
        BrowseCommand::Clear => session.orchestrator_mut().clear_search(),
        BrowseCommand::Retry => {
            if !session.orchestrator_mut().retry() {
                return Ok(Some("Nothing to retry.\n".to_string()));
            }
        }
        BrowseCommand::ToggleFavorite(id) => {
            let now_favorite = session.toggle_favorite(id).await?;
            let verb = if now_favorite { "added to" } else { "removed from" };
            return Ok(Some(format!("{id} {verb} favorites.\n")));
        }
        BrowseCommand::Favorites => return Ok(Some(session.render_favorites().await?)),
        BrowseCommand::Show(id) => {
            let text = session
                .render_detail(id)
                .await?
                .unwrap_or_else(|| format!("No Pokémon with number {id}.\n"));
            return Ok(Some(text));
        }
        BrowseCommand::Help => return Ok(Some(format!("{HELP}\n"))),
        BrowseCommand::Quit => return Ok(None),
    }

    Ok(Some(session.render_grid().await))
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
