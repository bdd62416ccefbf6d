
use std::collections::HashMap;
use std::path::PathBuf;

use cucumber::World;

/// Shared state carried through each scenario.
#[derive(Debug, Default, World)]
pub struct TodoWorld {
    /// Temporary directory that owns the database file.
    pub db_dir: Option<tempfile::TempDir>,
    /// Path to the SQLite database file inside `db_dir`.
    pub db_path: Option<PathBuf>,
    /// Port of the in-process test server, once started.
    pub server_port: Option<u16>,
    /// Task running the in-process test server.
    pub server_handle: Option<tokio::task::JoinHandle<()>>,
    /// Client reused for every request in the scenario.
    pub http_client: reqwest::Client,
    /// Status code of the most recent HTTP response.
    pub last_response_status: Option<u16>,
    /// Body of the most recent HTTP response.
    pub last_response_body: Option<String>,
    /// Working directory for `todo-server` invocations.
    pub work_dir: Option<tempfile::TempDir>,
    /// The raw stderr of the most recent `todo-server` invocation.
    pub last_stderr: String,
    /// Exit code of the most recent `todo-server` invocation.
    pub last_exit_code: i32,
    /// Alias to actual todo ID map, populated by create steps.
    pub todo_ids: HashMap<String, String>,
}

impl Drop for TodoWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}

#[tokio::main]
async fn main() {
    TodoWorld::cucumber().run_and_exit("tests/features").await;
}
