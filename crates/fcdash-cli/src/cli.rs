//! CLI argument definitions for fcdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the web dashboard |
//! | `render` | Render one page as JSON |
//! | `sql` | Read-only query against the warehouse |
//! | `init-schema` | Create the empty `analytics` tables locally |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | `$FCDASH_HOME/secrets.toml` | Secret file to load |
//! | `--verbose` | `false` | Debug-level logging |
//!
//! # Examples
//!
//! ```bash
//! fcdash serve --bind 0.0.0.0:8501
//! fcdash render --page champions --pretty
//! fcdash render --page fw --select 265231747
//! fcdash sql "SELECT COUNT(*) FROM analytics.ranking_info"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// FC Online ranking dashboard
#[derive(Debug, Parser)]
#[command(
    name = "fcdash",
    author,
    version,
    about = "FC Online ranking dashboard",
    long_about = "Serves a dashboard of FC Online ranker statistics (tiers, positions, \
players, formations, team colors) read from an analytics warehouse.\n\
\n\
Use 'fcdash <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Secret file with the `[warehouse]` and `[dashboard]` sections.
    ///
    /// Defaults to `$FCDASH_CONFIG`, then `$FCDASH_HOME/secrets.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web dashboard.
    Serve(ServeArgs),

    /// Render one page to JSON on stdout.
    ///
    /// # Examples
    ///
    ///   fcdash render
    ///   fcdash render --page ranker_DNFS --pretty
    Render(RenderArgs),

    /// Run a read-only SQL query against the warehouse.
    ///
    /// Only a single SELECT or WITH statement is accepted.
    Sql(SqlArgs),

    /// Create the empty `analytics` schema in a local DuckDB warehouse.
    InitSchema,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page id: `main`, a tier key, a position key, or `ranker_<name>`.
    #[arg(long)]
    pub page: Option<String>,

    /// Player key whose detail panel should be open.
    #[arg(long)]
    pub select: Option<String>,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SqlArgs {
    /// SQL query to execute.
    pub query: String,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "fcdash",
            "render",
            "--page",
            "fw",
            "--select",
            "265231747",
            "--config",
            "/tmp/secrets.toml",
            "-v",
        ])
        .expect("valid arguments");

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/secrets.toml")));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.page.as_deref(), Some("fw"));
        assert_eq!(args.select.as_deref(), Some("265231747"));
        assert!(!args.pretty);
    }

    #[test]
    fn serve_defaults_to_localhost() {
        let cli = Cli::try_parse_from(["fcdash", "serve"]).expect("valid arguments");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, "127.0.0.1:8501".parse::<SocketAddr>().expect("addr"));
    }

    #[test]
    fn rejects_malformed_bind_address() {
        assert!(Cli::try_parse_from(["fcdash", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn init_schema_uses_kebab_case() {
        let cli = Cli::try_parse_from(["fcdash", "init-schema"]).expect("valid arguments");
        assert!(matches!(cli.command, Command::InitSchema));
    }
}
