
use scalr_cli::config::{ConfigFile, Context};
use scalr_cli::engine::{execute, Invocation};
use scalr_cli::error::Error;
use scalr_cli::response::PagedOutput;
use scalr_cli::transport::ApiResponse;
use serde_json::{json, Value};
use std::path::PathBuf;
use test_helpers::{json_api, workspace_index, ScriptedTransport};

fn context() -> Context {
    let file = ConfigFile {
        hostname: Some("example.scalr.io".to_string()),
        token: Some("t0k".to_string()),
        page_size: Some(2),
        ..ConfigFile::default()
    };
    Context::from_sources(file, |_| None, PathBuf::from("/unused")).unwrap()
}

fn list_workspaces(args: &[&str]) -> Invocation {
    Invocation {
        command: "list-workspaces".to_string(),
        args: args.iter().map(ToString::to_string).collect(),
        raw_body: None,
    }
}

fn page(data: &Value, included: &Value, next: Option<u32>) -> ApiResponse {
    json_api(
        &json!({
            "data": data,
            "included": included,
            "meta": {"pagination": {"next-page": next}}
        })
        .to_string(),
    )
}

#[test]
fn test_pages_are_fetched_and_flattened() {
    let environment = json!([{
        "id": "env-1",
        "type": "environments",
        "attributes": {"name": "production"},
        "relationships": {"account": {"data": {"id": "acc-1", "type": "accounts"}}}
    }]);
    let transport = ScriptedTransport::new(vec![
        page(
            &json!([
                {"id": "ws-1", "type": "workspaces", "attributes": {"name": "one"},
                 "relationships": {"environment": {"data": {"id": "env-1", "type": "environments"}}}},
                {"id": "ws-2", "type": "workspaces", "attributes": {"name": "two"},
                 "relationships": {"environment": {"data": null}}}
            ]),
            &environment,
            Some(2),
        ),
        page(
            &json!([{"id": "ws-3", "type": "workspaces", "attributes": {"name": "three"},
                     "relationships": {"tags": {"data": [{"id": "tag-1", "type": "tags"}]}}}]),
            &json!([]),
            None,
        ),
    ]);

    let output = execute(
        &workspace_index(),
        &context(),
        &transport,
        &list_workspaces(&["--include=environment"]),
    )
    .unwrap();

    let PagedOutput::Records(records) = output else {
        panic!("expected records, got {output:?}");
    };
    assert_eq!(records.len(), 3);
    assert_eq!(
        Value::Object(records[0].clone()),
        json!({
            "name": "one",
            "id": "ws-1",
            "type": "workspaces",
            "environment": {
                "name": "production",
                "id": "env-1",
                "type": "environments",
                "account-id": "acc-1"
            }
        })
    );
    assert!(!records[1].contains_key("environment"));
    assert_eq!(records[2]["tags"], json!([{"id": "tag-1", "type": "tags"}]));

    let requests = transport.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.contains("include=environment"));
    assert!(requests[0].url.contains("page%5Bsize%5D=2"));
    assert!(requests[0].url.contains("page%5Bnumber%5D=1"));
    assert!(requests[1].url.contains("page%5Bnumber%5D=2"));
    assert!(requests[0]
        .headers
        .contains(&("Authorization".to_string(), "Bearer t0k".to_string())));
}

#[test]
fn test_flattened_keys_keep_record_order() {
    let transport = ScriptedTransport::new(vec![page(
        &json!([{"id": "ws-1", "type": "workspaces", "attributes": {"name": "one", "auto-apply": false}}]),
        &json!([]),
        None,
    )]);
    let output = execute(&workspace_index(), &context(), &transport, &list_workspaces(&[])).unwrap();

    let PagedOutput::Records(records) = output else {
        panic!("expected records");
    };
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "auto-apply", "id", "type"]);
}

#[test]
fn test_empty_listing_renders_empty_array() {
    let transport = ScriptedTransport::new(vec![page(&json!([]), &json!([]), None)]);
    let output = execute(&workspace_index(), &context(), &transport, &list_workspaces(&[])).unwrap();
    assert_eq!(output.render().unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_remote_error_discards_earlier_pages() {
    let transport = ScriptedTransport::new(vec![
        page(&json!([{"id": "ws-1", "type": "workspaces"}]), &json!([]), Some(2)),
        ApiResponse {
            status: 500,
            content_type: "application/vnd.api+json".to_string(),
            body: r#"{"errors":[{"status":"500"}]}"#.to_string(),
        },
    ]);
    let err = execute(&workspace_index(), &context(), &transport, &list_workspaces(&[])).unwrap_err();
    assert!(matches!(err, Error::RemoteError { status: 500, .. }));
    assert_eq!(transport.calls(), 2);
}

#[test]
fn test_single_resource_stops_paging() {
    let transport = ScriptedTransport::new(vec![page(
        &json!({"id": "ws-1", "type": "workspaces", "attributes": {"name": "one"}}),
        &json!([]),
        Some(2),
    )]);
    let invocation = Invocation {
        command: "get-workspace".to_string(),
        args: vec!["--workspace=ws-1".to_string()],
        raw_body: None,
    };
    let output = execute(&workspace_index(), &context(), &transport, &invocation).unwrap();
    assert_eq!(transport.calls(), 1);
    let PagedOutput::Single(record) = output else {
        panic!("expected a single record");
    };
    assert_eq!(record["name"], json!("one"));
    assert!(transport.requests.borrow()[0].url.contains("/workspaces/ws-1?"));
}
