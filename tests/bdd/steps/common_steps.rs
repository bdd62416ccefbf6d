use cucumber::given;
use todo_service::db::Database;

use crate::TodoWorld;

/// Create and migrate a fresh todo database in the world's temp dir.
#[given("a todo database is initialized")]
async fn a_todo_database_is_initialized(world: &mut TodoWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("todos.db");

    let mut db = Database::open(&db_path).expect("failed to open database");
    db.migrate().expect("failed to migrate database");

    world.db_path = Some(db_path);
    // Keep the TempDir alive for the lifetime of the scenario.
    world.db_dir = Some(dir);
}
