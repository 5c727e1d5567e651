use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CATALOG: &str = "items.json";
const DEFAULT_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "craftbook",
    about = "Browse item recipes and compute crafting shopping lists",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        env = "CRAFTBOOK_CONFIG",
        value_name = "FILE",
        help = "Path to a TOML configuration file",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "CRAFTBOOK_CATALOG",
        value_name = "PATH",
        help = "Catalog file (.json, .ron, .toml) or a directory holding items.*",
        global = true
    )]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List catalog items, optionally filtered by id.
    List {
        #[arg(long, short, value_name = "TEXT")]
        search: Option<String>,
    },
    /// Show an item's details and recipe tree.
    Show {
        id: String,
        #[arg(long, short, value_name = "X")]
        multiplier: Option<String>,
        /// Also print the craft / base resource totals.
        #[arg(long, short)]
        resources: bool,
        /// Expand every recipe except FARMER ones.
        #[arg(long)]
        expand_all: bool,
        /// Expand FARMER recipes.
        #[arg(long)]
        expand_farmer: bool,
        /// Expand the recipe of a specific ingredient (repeatable).
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<String>,
    },
    /// Print the craft / base resource totals for an item.
    Summary {
        id: String,
        #[arg(long, short, value_name = "X")]
        multiplier: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the view described by a query string such as
    /// `id=sword&multiplier=5&showResources=true&expandAll=true`.
    View { query: String },
}

/// Settings that may come from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    catalog: Option<PathBuf>,
    default_multiplier: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: PathBuf,
    pub default_multiplier: f64,
}

impl AppConfig {
    /// Merge command-line arguments over the config file. CLI values win.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let file_config = match args.config.as_deref() {
            Some(path) => load_config_file(path)?,
            None => PartialConfig::default(),
        };

        let catalog = args
            .catalog
            .clone()
            .or(file_config.catalog)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));

        let default_multiplier = file_config.default_multiplier.unwrap_or(DEFAULT_MULTIPLIER);
        anyhow::ensure!(
            default_multiplier.is_finite() && default_multiplier >= 0.0,
            "default_multiplier must be a finite non-negative number, got {default_multiplier}"
        );

        Ok(Self {
            catalog,
            default_multiplier,
        })
    }
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse TOML config {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["craftbook"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    /// Built directly so `CRAFTBOOK_*` variables in the test environment
    /// cannot leak in through clap's `env` fallback.
    fn list_args(config: Option<PathBuf>) -> CliArgs {
        CliArgs {
            config,
            catalog: None,
            command: Command::List { search: None },
        }
    }

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "craftbook_config_{name}_{}.toml",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_config() {
        let config = AppConfig::from_args(&list_args(None)).unwrap();
        assert_eq!(config.catalog, PathBuf::from("items.json"));
        assert_eq!(config.default_multiplier, 1.0);
    }

    #[test]
    fn config_file_supplies_values() {
        let path = write_config("file", "catalog = \"data/items.ron\"\ndefault_multiplier = 4.0\n");

        let config = AppConfig::from_args(&list_args(Some(path.clone()))).unwrap();
        assert_eq!(config.catalog, PathBuf::from("data/items.ron"));
        assert_eq!(config.default_multiplier, 4.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn cli_catalog_overrides_file() {
        let path = write_config("override", "catalog = \"from_file.json\"\n");
        let cli = args(&["--config", path.to_str().unwrap(), "--catalog", "cli.json", "list"]);

        let config = AppConfig::from_args(&cli).unwrap();
        assert_eq!(config.catalog, PathBuf::from("cli.json"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_config_key_is_rejected() {
        let path = write_config("unknown", "colour = \"red\"\n");
        let cli = args(&["--config", path.to_str().unwrap(), "list"]);

        assert!(AppConfig::from_args(&cli).is_err());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn negative_default_multiplier_is_rejected() {
        let path = write_config("negative", "default_multiplier = -2.0\n");
        let cli = args(&["--config", path.to_str().unwrap(), "list"]);

        assert!(AppConfig::from_args(&cli).is_err());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = args(&["--config", "/definitely/not/here.toml", "list"]);
        assert!(AppConfig::from_args(&cli).is_err());
    }

    #[test]
    fn show_subcommand_parses_flags() {
        let cli = args(&[
            "show", "sword", "-m", "2.5", "-r", "--expand-all", "--expand", "hilt", "--expand",
            "plank",
        ]);
        match cli.command {
            Command::Show {
                id,
                multiplier,
                resources,
                expand_all,
                expand_farmer,
                expand,
            } => {
                assert_eq!(id, "sword");
                assert_eq!(multiplier.as_deref(), Some("2.5"));
                assert!(resources);
                assert!(expand_all);
                assert!(!expand_farmer);
                assert_eq!(expand, ["hilt", "plank"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn summary_format_defaults_to_text() {
        let cli = args(&["summary", "sword"]);
        assert!(matches!(
            cli.command,
            Command::Summary {
                format: OutputFormat::Text,
                ..
            }
        ));
    }
}
