//! Command-line configuration.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::query::{QueryChange, QueryParam, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "catadm", version, about = "Terminal admin console for a music catalog API")]
pub struct Cli {
    /// Base URL of the catalog API
    #[arg(long, env = "CATADM_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// API token; without one the console starts signed out
    #[arg(long, env = "CATADM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a table and exit
    List {
        /// Which table to list
        #[arg(value_enum)]
        table: PageKind,

        /// Sort as key=ASC|DESC (repeatable; applied in column order)
        #[arg(long = "sort", value_parser = parse_sort)]
        sorts: Vec<(String, SortOrder)>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PageKind {
    Music,
    Albums,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Parse "key=ASC" / "key=DESC".
pub fn parse_sort(raw: &str) -> Result<(String, SortOrder), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=ASC|DESC, got '{}'", raw))?;
    let order = SortOrder::parse(&value.to_ascii_uppercase())
        .filter(|o| o.is_sorted())
        .ok_or_else(|| format!("sort order must be ASC or DESC, got '{}'", value))?;
    Ok((key.trim().to_string(), order))
}

/// Apply command-line sorts and page to a query model. Returns the keys
/// that are not sortable on this page.
pub fn apply_list_args(
    query: &mut QueryParam,
    sorts: &[(String, SortOrder)],
    page: u32,
) -> Vec<String> {
    let mut unknown = Vec::new();
    for (key, order) in sorts {
        let known = query.sorts().iter().find(|(k, _)| k == key).map(|(k, _)| *k);
        match known {
            Some(key) => {
                query.apply(QueryChange::Sort { key, order: *order });
            }
            None => unknown.push(key.clone()),
        }
    }
    query.apply(QueryChange::Page(page));
    unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("title=desc"),
            Ok(("title".to_string(), SortOrder::Descending))
        );
        assert!(parse_sort("title").is_err());
        assert!(parse_sort("title=").is_err());
        assert!(parse_sort("title=UP").is_err());
    }

    #[test]
    fn test_apply_list_args_reports_unknown_keys() {
        let mut query = QueryParam::new(&["name", "releaseDate"]);
        let unknown = apply_list_args(
            &mut query,
            &[
                ("name".to_string(), SortOrder::Ascending),
                ("bogus".to_string(), SortOrder::Descending),
            ],
            2,
        );
        assert_eq!(unknown, vec!["bogus"]);
        assert_eq!(query.sort("name"), Some(SortOrder::Ascending));
        assert_eq!(query.page(), 2);
    }

    #[test]
    fn test_cli_parses_list_command() {
        let cli = Cli::try_parse_from([
            "catadm",
            "--api-url",
            "http://api.test",
            "list",
            "albums",
            "--sort",
            "name=ASC",
            "--page",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://api.test");
        match cli.command {
            Some(Command::List { table, sorts, page }) => {
                assert_eq!(table, PageKind::Albums);
                assert_eq!(sorts, vec![("name".to_string(), SortOrder::Ascending)]);
                assert_eq!(page, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
