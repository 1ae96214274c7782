use super::*;

#[test]
fn page_defaults_to_one() {
    let cli = Cli::try_parse_from(["pokedex", "list"]).expect("parse");
    assert!(matches!(
        cli.command,
        Command::List {
            page: 1,
            sort: SortKind::ByName
        }
    ));
}

#[test]
fn page_below_one_is_rejected_by_the_parser() {
    for page in ["0", "-3"] {
        assert!(
            Cli::try_parse_from(["pokedex", "list", "--page", page]).is_err(),
            "list --page {page} should be rejected"
        );
        assert!(
            Cli::try_parse_from(["pokedex", "search", "pikachu", "--page", page]).is_err(),
            "search --page {page} should be rejected"
        );
    }
}

#[test]
fn search_accepts_sort_and_page() {
    let cli = Cli::try_parse_from(["pokedex", "search", "#025", "--sort", "number", "--page", "2"])
        .expect("parse");
    match cli.command {
        Command::Search { term, sort, page } => {
            assert_eq!(term, "#025");
            assert_eq!(sort, SortKind::ByNumber);
            assert_eq!(page, 2);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn database_and_endpoint_flags_are_global() {
    let cli = Cli::try_parse_from([
        "pokedex",
        "--graphql-url",
        "http://localhost/graphql",
        "--database-url",
        "sqlite::memory:",
        "favorites",
        "toggle",
        "25",
    ])
    .expect("parse");
    assert_eq!(cli.graphql_url.as_deref(), Some("http://localhost/graphql"));
    assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
    assert!(matches!(
        cli.command,
        Command::Favorites {
            action: FavoritesCommand::Toggle { id: 25 }
        }
    ));
}
