use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// In-memory database marker accepted in `DB_NAME`.
pub const IN_MEMORY: &str = ":memory:";

/// Process configuration, read from flags or the environment.
#[derive(Clone, Parser)]
#[command(
    name = "todo-server",
    version,
    about = "Todo list service with REST and GraphQL endpoints"
)]
pub struct Config {
    /// Database host (unused by the embedded SQLite backend)
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database port (unused by the embedded SQLite backend)
    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<String>,

    /// Database user (unused by the embedded SQLite backend)
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password (unused by the embedded SQLite backend)
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name; the SQLite file is `<name>.db` unless an extension is given
    #[arg(long, env = "DB_NAME", default_value = "todos")]
    pub db_name: String,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

impl Config {
    /// Path of the SQLite database file derived from `db_name`.
    pub fn database_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.db_name);
        if self.db_name == IN_MEMORY || path.extension().is_some() {
            path
        } else {
            path.with_extension("db")
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Names of the server-style connection settings that were provided but
    /// have no effect on the SQLite backend.
    pub fn ignored_settings(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.db_host.is_some() {
            ignored.push("DB_HOST");
        }
        if self.db_port.is_some() {
            ignored.push("DB_PORT");
        }
        if self.db_user.is_some() {
            ignored.push("DB_USER");
        }
        if self.db_password.is_some() {
            ignored.push("DB_PASSWORD");
        }
        ignored
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "<redacted>"))
            .field("db_name", &self.db_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
