//! Integration tests for tree, file and root endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_tree_lists_directories_and_files() {
    let app = TestApp::new();
    app.write("src/main.rs", "fn main() {}");
    app.write("README.md", "# hi");
    app.write("node_modules/pkg/index.js", "");

    let response = app.request("GET", "/api/tree", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let root = app.request("GET", "/api/root", None).await;
    assert_eq!(response.body["root"], root.body["root"]);
    let tree = response.body["tree"].as_array().unwrap();
    let names: Vec<&str> = tree.iter().map(|n| n["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["README.md", "src"]);

    let src = &tree[1];
    assert_eq!(src["type"], "dir");
    assert_eq!(src["children"][0]["path"], "src/main.rs");
    assert_eq!(src["children"][0]["type"], "file");
    assert_eq!(src["children"][0]["size"], 12);
}

#[tokio::test]
async fn test_tree_depth_truncates_children() {
    let app = TestApp::new();
    app.write("a/b/c/deep.txt", "x");

    let response = app.request("GET", "/api/tree?depth=1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let a = &response.body["tree"][0];
    assert_eq!(a["path"], "a");
    assert_eq!(a["children"][0]["path"], "a/b");
    assert_eq!(a["children"][0]["children"], json!([]));
}

#[tokio::test]
async fn test_read_write_delete_file() {
    let app = TestApp::new();

    let saved = app
        .request(
            "POST",
            "/api/file",
            Some(json!({ "path": "notes/todo.txt", "content": "buy milk" })),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.body["path"], "notes/todo.txt");
    assert_eq!(saved.body["size"], 8);
    assert_eq!(
        std::fs::read_to_string(app.root().join("notes/todo.txt")).unwrap(),
        "buy milk"
    );

    let read = app.request("GET", "/api/file?path=notes/todo.txt", None).await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["content"], "buy milk");
    assert_eq!(read.body["size"], 8);

    let deleted = app
        .request("DELETE", "/api/file?path=notes/todo.txt", None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(!app.root().join("notes/todo.txt").exists());

    let gone = app.request("GET", "/api/file?path=notes/todo.txt", None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_escaping_paths_are_rejected() {
    let app = TestApp::new();
    std::fs::write(app.base().join("secret.txt"), "s3cret").unwrap();

    let read = app.request("GET", "/api/file?path=../secret.txt", None).await;
    assert_eq!(read.status, StatusCode::BAD_REQUEST);
    assert_eq!(read.code(), "PATH_ESCAPE");

    let write = app
        .request(
            "POST",
            "/api/file",
            Some(json!({ "path": "../../evil.txt", "content": "x" })),
        )
        .await;
    assert_eq!(write.status, StatusCode::BAD_REQUEST);
    assert!(!app.base().parent().unwrap().join("evil.txt").exists());

    let tree = app.request("GET", "/api/tree?path=..", None).await;
    assert_eq!(tree.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_parameters_are_validation_errors() {
    let app = TestApp::new();

    let read = app.request("GET", "/api/file", None).await;
    assert_eq!(read.status, StatusCode::BAD_REQUEST);
    assert_eq!(read.code(), "VALIDATION");

    let save = app
        .request("POST", "/api/file", Some(json!({ "path": "a.txt" })))
        .await;
    assert_eq!(save.status, StatusCode::BAD_REQUEST);
    assert_eq!(save.code(), "VALIDATION");
}

#[tokio::test]
async fn test_size_limits_are_too_large() {
    let app = TestApp::with_config(|config| {
        config.workspace.max_read_bytes = 8;
        config.workspace.max_write_bytes = 8;
    });
    app.write("big.txt", "0123456789");

    let read = app.request("GET", "/api/file?path=big.txt", None).await;
    assert_eq!(read.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read.code(), "TOO_LARGE");

    let write = app
        .request(
            "POST",
            "/api/file",
            Some(json!({ "path": "new.txt", "content": "0123456789" })),
        )
        .await;
    assert_eq!(write.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.root().join("new.txt").exists());
}

#[tokio::test]
async fn test_delete_directory_is_invalid_target() {
    let app = TestApp::new();
    app.write("dir/file.txt", "x");

    let response = app.request("DELETE", "/api/file?path=dir", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "INVALID_TARGET");
    assert!(app.root().join("dir/file.txt").exists());
}

#[tokio::test]
async fn test_mkdir_then_conflict() {
    let app = TestApp::new();

    let created = app
        .request("POST", "/api/mkdir", Some(json!({ "path": "a/b" })))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert!(app.root().join("a/b").is_dir());

    let again = app
        .request("POST", "/api/mkdir", Some(json!({ "path": "a/b" })))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.code(), "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_browse_lists_folders_under_base() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.base().join("other")).unwrap();
    std::fs::write(app.base().join("loose.txt"), "").unwrap();

    let response = app.request("GET", "/api/browse", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.body["folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["other", "project"]);

    let outside = app.request("GET", "/api/browse?path=..", None).await;
    assert_eq!(outside.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_switch_root_within_base() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.base().join("other")).unwrap();
    std::fs::write(app.base().join("other/hello.txt"), "hi").unwrap();

    let switched = app
        .request("POST", "/api/root", Some(json!({ "root": "other" })))
        .await;
    assert_eq!(switched.status, StatusCode::OK);
    assert!(switched.body["root"].as_str().unwrap().ends_with("other"));

    let current = app.request("GET", "/api/root", None).await;
    assert_eq!(current.body["root"], switched.body["root"]);

    let read = app.request("GET", "/api/file?path=hello.txt", None).await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["content"], "hi");

    let escape = app
        .request("POST", "/api/root", Some(json!({ "root": "../.." })))
        .await;
    assert_eq!(escape.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_reports_workspace() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/status", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["results_exist"], true);
    assert_eq!(response.body["reload_clients"], 0);
}
