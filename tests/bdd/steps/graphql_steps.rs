use cucumber::{then, when};
use reqwest::Method;
use serde_json::{Value, json};

use crate::TodoWorld;
use crate::steps::web_steps::{http_request, parse_last_response, resolve_aliases};

/// POST a GraphQL document to /graphql. `<alias>` placeholders in the query
/// are replaced with recorded todo ids.
async fn graphql(world: &mut TodoWorld, query: &str) -> Value {
    let query = resolve_aliases(world, query);
    let body = json!({ "query": query }).to_string();
    let (status, text) = http_request(world, Method::POST, "/graphql", Some(body)).await;
    assert_eq!(status, 200, "GraphQL transport failed with {status}: {text}");
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("GraphQL response is not valid JSON: {e}\n{text}"))
}

#[when(expr = "I run the GraphQL query {string}")]
async fn i_run_the_graphql_query(world: &mut TodoWorld, query: String) {
    graphql(world, &query).await;
}

#[when(expr = "I create a todo via GraphQL with task {string} as {string}")]
async fn i_create_a_todo_via_graphql(world: &mut TodoWorld, task: String, alias: String) {
    let query = format!(
        "mutation {{ createTodo(input: {{ task: {} }}) {{ id task completed createdAt }} }}",
        json!(task)
    );
    let resp = graphql(world, &query).await;
    let id = resp["data"]["createTodo"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("createTodo returned no id: {resp}"))
        .to_string();
    world.todo_ids.insert(alias, id);
}

/// Look up a dotted path such as `data.todo.task` in the last response.
fn lookup(world: &TodoWorld, path: &str) -> Value {
    let json = parse_last_response(world);
    path.split('.')
        .fold(&json, |value, key| match key.parse::<usize>() {
            Ok(index) => &value[index],
            Err(_) => &value[key],
        })
        .clone()
}

#[then(expr = "the GraphQL field {string} is {string}")]
async fn the_graphql_field_is(world: &mut TodoWorld, path: String, expected: String) {
    let actual = lookup(world, &path);
    let expected = resolve_aliases(world, &expected);
    let matches = match &actual {
        Value::String(s) => *s == expected,
        other => other.to_string() == expected,
    };
    assert!(matches, "expected {path} to be {expected:?}, got {actual}");
}

#[then(expr = "the GraphQL list {string} has {int} item(s)")]
async fn the_graphql_list_has(world: &mut TodoWorld, path: String, expected: usize) {
    let actual = lookup(world, &path);
    let items = actual
        .as_array()
        .unwrap_or_else(|| panic!("{path} is not a list: {actual}"));
    assert_eq!(items.len(), expected, "{path}: {actual}");
}

#[then("the GraphQL response has no errors")]
async fn the_graphql_response_has_no_errors(world: &mut TodoWorld) {
    let json = parse_last_response(world);
    assert!(json.get("errors").is_none(), "unexpected errors: {json}");
}

#[then(expr = "the GraphQL error code is {string}")]
async fn the_graphql_error_code_is(world: &mut TodoWorld, expected: String) {
    let json = parse_last_response(world);
    let code = json["errors"][0]["extensions"]["code"].as_str();
    assert_eq!(code, Some(expected.as_str()), "response: {json}");
}
