//! Configuration assembly
//!
//! Values come from three places, highest precedence first: command-line
//! arguments, a JSON config file, built-in defaults. They are merged once
//! into an immutable [`Config`].

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tob_report::{PersonalInfo, TaxRecord};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tob.json";
/// Blank declaration used when no template is configured
pub const DEFAULT_TEMPLATE: &str = "tob-template.pdf";

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("At least one address line is required")]
    EmptyAddress,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "tob",
    version,
    about = "Fill the Belgian TOB declaration and payment QR code from a broker tax report"
)]
pub struct Cli {
    /// Broker tax report (PDF)
    pub input: Option<PathBuf>,

    /// JSON config file (default: ./tob.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// National number, e.g. 12.34.56-789.01
    #[arg(short, long)]
    pub national_number: Option<String>,

    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Address line, repeat for every line
    #[arg(short, long = "address")]
    pub address: Vec<String>,

    /// Square signature image (JPEG or PNG)
    #[arg(short, long)]
    pub signature: Option<PathBuf>,

    /// Blank declaration template
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output document (default: tob_<year>_<month>.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Place of signature (default: city of the last address line)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Signing date as YYYY-MM-DD (default: today)
    #[arg(short = 'd', long)]
    pub sign_date: Option<NaiveDate>,

    /// Do not open the mail client
    #[arg(long)]
    pub no_mail: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings read from the JSON config file
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub national_number: Option<String>,
    pub name: Option<String>,
    pub address: Option<Vec<String>>,
    pub signature: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub location: Option<String>,
    pub sign_date: Option<NaiveDate>,
    pub no_mail: Option<bool>,
}

impl FileConfig {
    /// Parse a config file from JSON
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else `tob.json` in `dir` if it exists
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    log::debug!(
                        "No {} found, using command-line settings only",
                        path.display()
                    );
                    return Ok(Self::default());
                }
                path
            }
        };

        let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded config file {}", path.display());
        Self::from_json(&json, &path)
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub template: PathBuf,
    pub personal: PersonalInfo,
    pub no_mail: bool,
}

impl Config {
    /// Read the config file and merge it with the command line
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let file = FileConfig::load(cli.config.as_deref(), Path::new("."))?;
        let today = chrono::Local::now().date_naive();
        Self::resolve(cli, file, today)
    }

    /// Merge command line, file config and defaults
    pub fn resolve(cli: Cli, file: FileConfig, today: NaiveDate) -> Result<Self, ConfigError> {
        let input = cli
            .input
            .or(file.input)
            .ok_or(ConfigError::MissingField("input"))?;
        let national_number = cli
            .national_number
            .or(file.national_number)
            .ok_or(ConfigError::MissingField("national_number"))?;
        let name = cli
            .name
            .or(file.name)
            .ok_or(ConfigError::MissingField("name"))?;
        let signature = cli
            .signature
            .or(file.signature)
            .ok_or(ConfigError::MissingField("signature"))?;

        let address = if cli.address.is_empty() {
            file.address.ok_or(ConfigError::MissingField("address"))?
        } else {
            cli.address
        };
        if address.iter().all(|line| line.trim().is_empty()) {
            return Err(ConfigError::EmptyAddress);
        }

        let sign_date = cli.sign_date.or(file.sign_date).unwrap_or(today);

        let mut personal = PersonalInfo::new(national_number, name, address, sign_date, signature);
        if let Some(location) = cli.location.or(file.location) {
            personal = personal.with_location(location);
        }
        if let Some(output) = cli.output.or(file.output) {
            personal = personal.with_output(output);
        }

        Ok(Self {
            input,
            template: cli
                .template
                .or(file.template)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
            personal,
            no_mail: cli.no_mail || file.no_mail.unwrap_or(false),
        })
    }

    /// Where the filled declaration is written
    pub fn output_path(&self, record: &TaxRecord) -> PathBuf {
        self.personal
            .output
            .clone()
            .unwrap_or_else(|| default_output_name(record))
    }
}

/// `tob_2023_01.pdf` for January 2023
pub fn default_output_name(record: &TaxRecord) -> PathBuf {
    PathBuf::from(format!("tob_{}_{:02}.pdf", record.year, record.month))
}
