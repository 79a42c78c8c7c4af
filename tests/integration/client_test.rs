//! End-to-end tests driving a live server through the client crate.

use std::sync::Arc;

use tokio::net::TcpListener;

use workbench_client::{HttpBackend, SaveOutcome, Workspace, WorkspaceBackend};
use workbench_core::error::ErrorKind;

use crate::helpers::TestApp;

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    let router = workbench_api::build_app(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_backend_round_trip() {
    let app = TestApp::new();
    app.write("docs/readme.md", "hello");
    let backend = HttpBackend::new(&serve(&app).await).unwrap();

    let snapshot = backend.fetch_tree("", 4).await.unwrap();
    assert_eq!(snapshot.tree[0].path(), "docs");
    assert_eq!(snapshot.tree[0].children()[0].path(), "docs/readme.md");

    let file = backend.read_file("docs/readme.md").await.unwrap();
    assert_eq!(file.content, "hello");

    let receipt = backend.write_file("docs/readme.md", "hello, world").await.unwrap();
    assert_eq!(receipt.size_bytes, 12);

    let err = backend.read_file("../outside.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::PathEscape);

    let err = backend.mkdir("docs").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyExists);
}

#[tokio::test]
async fn test_workspace_edit_save_delete() {
    let app = TestApp::new();
    app.write("a/x.txt", "hello");
    app.write("b.txt", "bee");
    let backend = Arc::new(HttpBackend::new(&serve(&app).await).unwrap());
    let workspace = Workspace::new(backend);

    workspace.refresh_root().await.unwrap();
    workspace.refresh_tree().await.unwrap();
    {
        let view = workspace.view().await;
        assert_eq!(view.tree().expansion().expand_level, 1);
        let rows: Vec<&str> = view.tree().visible_rows().map(|r| r.node.path()).collect();
        assert_eq!(rows, vec!["a", "b.txt"]);
    }

    workspace.select_file("a/x.txt").await.unwrap();
    workspace.select_file("b.txt").await.unwrap();
    workspace.edit("a/x.txt", "hello!").await.unwrap();
    let outcome = workspace.save("a/x.txt").await.unwrap();

    assert_eq!(outcome, SaveOutcome::Saved { size_bytes: 6 });
    assert_eq!(
        std::fs::read_to_string(app.root().join("a/x.txt")).unwrap(),
        "hello!"
    );

    workspace.delete_file("b.txt").await.unwrap();
    let view = workspace.view().await;
    assert!(!app.root().join("b.txt").exists());
    assert!(!view.documents().contains("b.txt"));
    assert_eq!(view.selection().file.as_deref(), Some("a/x.txt"));
}

#[tokio::test]
async fn test_workspace_create_file_selects_it() {
    let app = TestApp::new();
    let backend = Arc::new(HttpBackend::new(&serve(&app).await).unwrap());
    let workspace = Workspace::new(backend);

    workspace.create_file("new/empty.txt").await.unwrap();

    let view = workspace.view().await;
    assert!(app.root().join("new/empty.txt").is_file());
    assert_eq!(view.selection().file.as_deref(), Some("new/empty.txt"));
    assert_eq!(view.documents().get("new/empty.txt").unwrap().draft, "");
}

#[tokio::test]
async fn test_workspace_switch_root_clears_documents() {
    let app = TestApp::new();
    app.write("x.txt", "x");
    std::fs::create_dir_all(app.base().join("other")).unwrap();
    std::fs::write(app.base().join("other/y.txt"), "y").unwrap();
    let backend = Arc::new(HttpBackend::new(&serve(&app).await).unwrap());
    let workspace = Workspace::new(backend);

    workspace.select_file("x.txt").await.unwrap();
    let folders = workspace.browse("").await.unwrap();
    assert!(folders.folders.iter().any(|f| f.name == "other"));

    workspace.switch_root("other").await.unwrap();

    let view = workspace.view().await;
    assert!(view.documents().is_empty());
    assert_eq!(view.selection().file, None);
    assert!(view.root().unwrap().ends_with("other"));
    let rows: Vec<&str> = view.tree().visible_rows().map(|r| r.node.path()).collect();
    assert_eq!(rows, vec!["y.txt"]);
}

#[tokio::test]
async fn test_workspace_tasks_select_newest() {
    let app = TestApp::new();
    app.write_task("task_a", &[("result.json", r#"{"status":"done"}"#)]);
    app.write_task("task_b", &[("output.txt", "latest")]);
    let backend = Arc::new(HttpBackend::new(&serve(&app).await).unwrap());
    let workspace = Workspace::new(backend);

    workspace.refresh_tasks().await.unwrap();

    let view = workspace.view().await;
    assert_eq!(view.tasks().len(), 2);
    assert_eq!(view.status(), "Ready • 2 tasks");
    assert_eq!(view.selection().task.as_deref(), Some("task_b"));
    assert_eq!(
        view.task_artifacts().unwrap()["output.txt"],
        serde_json::Value::String("latest".into())
    );
}
