use async_graphql::{Context, EmptySubscription, ErrorExtensions, ID, Object, Result, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use chrono::{DateTime, Utc};
use std::sync::MutexGuard;

use super::errors::TODO_NOT_FOUND;
use super::{AppError, AppState, SharedDb, lock_db, parse_id};
use crate::db::Database;
use crate::models::{Todo, TodoInput};

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema over the shared database handle.
pub fn build_schema(db: SharedDb) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish()
}

/// POST /graphql
pub async fn graphql_handler(
    State(state): State<AppState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.message()).extend_with(|_, ext| ext.set("code", code))
    }
}

fn store<'a>(ctx: &Context<'a>) -> Result<MutexGuard<'a, Database>> {
    let db = ctx.data::<SharedDb>()?;
    lock_db(db).map_err(|e| e.extend())
}

fn todo_id(raw: &ID) -> Result<uuid::Uuid> {
    parse_id(raw.as_str()).map_err(|e| e.extend())
}

#[Object]
impl Todo {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn task(&self) -> &str {
        &self.task
    }

    async fn completed(&self) -> bool {
        self.completed
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All todos, oldest first.
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        store(ctx)?
            .list_todos()
            .map_err(|e| AppError::internal("Cannot retrieve todos", e).extend())
    }

    async fn todo(&self, ctx: &Context<'_>, id: ID) -> Result<Todo> {
        let id = todo_id(&id)?;
        store(ctx)?
            .get_todo(id)
            .map_err(|e| AppError::internal("Cannot retrieve todo", e).extend())?
            .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.to_string()).extend())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_todo(&self, ctx: &Context<'_>, input: TodoInput) -> Result<Todo> {
        let todo = store(ctx)?
            .insert_todo(&input)
            .map_err(|e| AppError::internal("Cannot create todo", e).extend())?;
        tracing::info!(id = %todo.id, "created todo via graphql");
        Ok(todo)
    }

    async fn update_todo(&self, ctx: &Context<'_>, id: ID, input: TodoInput) -> Result<Todo> {
        let uuid = todo_id(&id)?;
        let todo = store(ctx)?
            .update_todo(uuid, &input)
            .map_err(|e| AppError::from_db(e, "Cannot update todo").extend())?;
        tracing::info!(id = %uuid, "updated todo via graphql");
        Ok(todo)
    }

    /// Delete a todo, returning its id in canonical form.
    async fn delete_todo(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let uuid = todo_id(&id)?;
        store(ctx)?
            .delete_todo(uuid)
            .map_err(|e| AppError::from_db(e, "Cannot delete todo").extend())?;
        tracing::info!(id = %uuid, "deleted todo via graphql");
        Ok(ID(uuid.to_string()))
    }
}
