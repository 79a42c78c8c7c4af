//! Integration tests for task endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_list_tasks_newest_first() {
    let app = TestApp::new();
    app.write_task(
        "task_20240101_000000",
        &[("result.json", r#"{"description":"old","status":"done"}"#)],
    );
    app.write_task(
        "task_20240202_000000",
        &[
            (
                "result.json",
                r#"{"description":"new","status":"done","verification":{"passed":true,"score":1.0}}"#,
            ),
            ("output.txt", "finished"),
        ],
    );

    let response = app.request("GET", "/api/tasks", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 2);
    let tasks = response.body["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["id"], "task_20240202_000000");
    assert_eq!(tasks[0]["description"], "new");
    assert_eq!(tasks[0]["verified"], true);
    assert_eq!(tasks[0]["preview"], "finished");
    assert_eq!(tasks[1]["preview"], "(no output)");
}

#[tokio::test]
async fn test_get_task_artifacts() {
    let app = TestApp::new();
    app.write_task(
        "task_1",
        &[
            ("result.json", r#"{"status":"done"}"#),
            ("report.txt", "all checks passed"),
            ("stats.json", r#"{"steps":3}"#),
        ],
    );

    let response = app.request("GET", "/api/task/task_1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["result.json"]["status"], "done");
    assert_eq!(response.body["report.txt"], "all checks passed");
    assert_eq!(response.body["stats.json"]["steps"], 3);
    assert!(response.body.get("output.txt").is_none());
}

#[tokio::test]
async fn test_get_unknown_task_is_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/task/task_missing", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_non_task_directories_are_not_found() {
    let app = TestApp::new();
    app.write_task("scratch", &[("output.txt", "not a task")]);

    for uri in ["/api/task/scratch", "/api/task/."] {
        let response = app.request("GET", uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_accepts_task_description_alias() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/run",
            Some(json!({ "taskDescription": "write a haiku" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "running");
    assert_eq!(response.body["description"], "write a haiku");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_without_description_uses_default() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/run", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["description"],
        app.config.tasks.default_description.as_str()
    );
}
