use clap::builder::TypedValueParser as _;
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use entity::locale::Locale;
use log::LevelFilter;
use semver::{BuildMetadata, Prerelease, Version};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use utoipa::IntoParams;

type APiVersionList = [&'static str; 1];

const DEFAULT_API_VERSION: &str = "1.0.0-beta1";
// Expand this array to include all valid API versions. Versions that have been
// completely removed should be removed from this list - they're no longer valid.
const API_VERSIONS: APiVersionList = [DEFAULT_API_VERSION];

static X_VERSION: &str = "x-version";

/// Card number the mock credit card processor declines unless configured otherwise.
pub const DEFAULT_DECLINED_CREDIT_CARD_NUMBER: &str = "4000000000000002";

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Header)]
pub struct ApiVersion {
    /// The version of the API to use for a request. Optional; when sent it must
    /// match the server's version.
    #[param(rename = "x-version", value_type = String, style = Simple, example = "1.0.0-beta1")]
    pub version: Version,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl fmt::Display for RustEnvParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected one of development, production or staging")
    }
}

impl std::error::Error for RustEnvParseError {}

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:8080,http://127.0.0.1:8080"
    )]
    pub allowed_origins: Vec<String>,

    /// Set the current semantic version of the endpoint API to expose to clients.
    #[arg(short, long, env, default_value = DEFAULT_API_VERSION,
        value_parser = clap::builder::PossibleValuesParser::new(API_VERSIONS),
        )]
    api_version: String,

    /// Sets the SQLite database URL to connect to. The default in-memory database
    /// is created empty on every boot.
    #[arg(short, long, env, default_value = "sqlite::memory:")]
    database_url: String,

    /// Maximum number of database connections in the pool. Forced to 1 for
    /// in-memory databases.
    #[arg(long, env, default_value_t = 1)]
    pub db_max_connections: u32,

    /// Minimum number of idle database connections to maintain
    #[arg(long, env, default_value_t = 1)]
    pub db_min_connections: u32,

    /// Timeout in seconds for establishing a new database connection
    #[arg(long, env, default_value_t = 8)]
    pub db_connect_timeout_secs: u64,

    /// Timeout in seconds for acquiring a connection from the pool
    #[arg(long, env, default_value_t = 8)]
    pub db_acquire_timeout_secs: u64,

    /// Seconds before an idle connection is closed. Ignored for in-memory databases.
    #[arg(long, env, default_value_t = 600)]
    pub db_idle_timeout_secs: u64,

    /// Maximum lifetime in seconds for any connection in the pool. Ignored for
    /// in-memory databases.
    #[arg(long, env, default_value_t = 1800)]
    pub db_max_lifetime_secs: u64,

    /// Populate the database with demonstration accounts and toys on boot.
    #[arg(long, env, default_value_t = true, action = ArgAction::Set)]
    pub seed_database: bool,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8080)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .try_map(|s| s.parse::<LevelFilter>()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .try_map(|s| s.parse::<RustEnv>()),
    )]
    pub runtime_env: RustEnv,

    /// Path to a PKCS#8 PEM file holding the Ed25519 key used to sign access tokens.
    /// A fresh key is generated on every boot when unset.
    #[arg(long, env)]
    access_token_key_path: Option<PathBuf>,

    /// Lifetime in seconds of the access token issued at sign-in (default: 24 hours)
    #[arg(long, env, default_value_t = 86400)]
    pub access_token_lifetime_seconds: u64,

    /// Lifetime in seconds of the short-lived token used to open the SSE stream
    #[arg(long, env, default_value_t = 60)]
    pub sse_access_token_lifetime_seconds: u64,

    /// Locale used for requests that neither come from an account nor send a
    /// supported Accept-Language header.
    #[arg(long, env, default_value_t = Locale::EnUs, value_parser = |s: &str| s.parse::<Locale>())]
    pub default_locale: Locale,

    /// Card numbers the mock credit card processor declines.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = DEFAULT_DECLINED_CREDIT_CARD_NUMBER
    )]
    pub declined_credit_card_numbers: Vec<String>,
}

impl Default for Config {
    /// Every option at its default value, ignoring the process's command line.
    fn default() -> Self {
        Config::parse_from(["toystore"])
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn set_database_url(mut self, database_url: String) -> Self {
        self.database_url = database_url;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// True for SQLite URLs whose data only lives as long as a connection.
    pub fn is_in_memory_database(&self) -> bool {
        let url = self.database_url.to_lowercase();
        url.contains(":memory:") || url.contains("mode=memory")
    }

    pub fn access_token_key_path(&self) -> Option<&PathBuf> {
        self.access_token_key_path.as_ref()
    }

    pub fn set_access_token_key_path(mut self, path: PathBuf) -> Self {
        self.access_token_key_path = Some(path);
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

impl ApiVersion {
    pub fn new(version_str: &'static str) -> Self {
        ApiVersion {
            version: Version::parse(version_str).unwrap_or(Version {
                major: 0,
                minor: 0,
                patch: 1,
                pre: Prerelease::EMPTY,
                build: BuildMetadata::EMPTY,
            }),
        }
    }

    pub fn default_version() -> &'static str {
        DEFAULT_API_VERSION
    }

    pub fn field_name() -> &'static str {
        X_VERSION
    }

    pub fn versions() -> APiVersionList {
        API_VERSIONS
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion::new(DEFAULT_API_VERSION)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_fresh_in_memory_store() {
        let config = Config::parse_from(["toystore"]);

        assert_eq!(config.database_url(), "sqlite::memory:");
        assert!(config.is_in_memory_database());
        assert!(config.seed_database);
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_locale, Locale::EnUs);
        assert_eq!(config.access_token_lifetime_seconds, 86400);
        assert_eq!(config.sse_access_token_lifetime_seconds, 60);
        assert_eq!(
            config.declined_credit_card_numbers,
            vec![DEFAULT_DECLINED_CREDIT_CARD_NUMBER]
        );
        assert_eq!(config.api_version(), ApiVersion::default_version());
    }

    #[test]
    fn options_parse_from_the_command_line() {
        let config = Config::parse_from([
            "toystore",
            "--default-locale",
            "pt_BR",
            "--seed-database",
            "false",
            "--declined-credit-card-numbers",
            "4000000000000002,4000000000000069",
            "--database-url",
            "sqlite://toystore.db?mode=rwc",
            "--log-level-filter",
            "DEBUG",
        ]);

        assert_eq!(config.default_locale, Locale::PtBr);
        assert!(!config.seed_database);
        assert_eq!(config.declined_credit_card_numbers.len(), 2);
        assert!(!config.is_in_memory_database());
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn unsupported_api_versions_are_rejected() {
        assert!(Config::try_parse_from(["toystore", "--api-version", "0.0.1"]).is_err());
    }

    #[test]
    fn api_version_parses_the_default() {
        assert_eq!(ApiVersion::default().to_string(), DEFAULT_API_VERSION);
    }
}
