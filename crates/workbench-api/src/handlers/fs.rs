//! File, tree and root-selection handlers.

use axum::Json;
use axum::extract::{Query, State};

use workbench_core::types::{
    FileContent, FolderEntry, FolderListing, PathReceipt, RootInfo, TreeSnapshot, WriteReceipt,
};

use crate::dto::request::{MkdirRequest, PathQuery, RootRequest, SaveFileRequest, TreeQuery};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/tree?path=&depth=
pub async fn get_tree(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> ApiResult<Json<TreeSnapshot>> {
    let depth = query.depth.unwrap_or(state.config.workspace.default_depth);
    let path = query.path.unwrap_or_default();

    let snapshot = state.store().await.tree(&path, depth).await?;
    Ok(Json(snapshot))
}

/// GET /api/file?path=
pub async fn read_file(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Json<FileContent>> {
    let path = query.required()?;
    let file = state.store().await.read(path).await?;
    Ok(Json(file))
}

/// POST /api/file
pub async fn save_file(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SaveFileRequest>,
) -> ApiResult<Json<WriteReceipt>> {
    let path = req.path.unwrap_or_default();
    let content = req.content.unwrap_or_default();

    let receipt = state.store().await.write(&path, &content).await?;
    tracing::info!(path = %receipt.path, size = receipt.size_bytes, "File saved");
    Ok(Json(receipt))
}

/// DELETE /api/file?path=
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Json<PathReceipt>> {
    let path = query.required()?;
    let receipt = state.store().await.delete(path).await?;
    tracing::info!(path = %receipt.path, "File deleted");
    Ok(Json(receipt))
}

/// POST /api/mkdir
pub async fn make_dir(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MkdirRequest>,
) -> ApiResult<Json<PathReceipt>> {
    let path = req.path.unwrap_or_default();
    let receipt = state.store().await.mkdir(&path).await?;
    tracing::info!(path = %receipt.path, "Directory created");
    Ok(Json(receipt))
}

/// GET /api/browse?path=
///
/// Lists directories below the base directory for root selection.
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Json<FolderListing>> {
    let requested = query.path.unwrap_or_default();
    let resolved = state.base.guard().resolve(&requested)?;
    let path = state.base.guard().relative_of(&resolved);

    let folders = state
        .base
        .list_children(&path)
        .await?
        .into_iter()
        .filter(|child| child.is_directory)
        .map(|child| FolderEntry {
            name: child.name,
            path: child.path,
        })
        .collect();

    Ok(Json(FolderListing { path, folders }))
}

/// GET /api/root
pub async fn get_root(State(state): State<AppState>) -> ApiResult<Json<RootInfo>> {
    let store = state.store().await;
    Ok(Json(RootInfo {
        root: store.root().display().to_string(),
    }))
}

/// POST /api/root
///
/// Switches the workspace root to a directory inside the base directory.
pub async fn set_root(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RootRequest>,
) -> ApiResult<Json<RootInfo>> {
    let requested = req.root.unwrap_or_default();
    let target = state.base.guard().resolve(&requested)?;

    let next = state.store().await.with_root(&target)?;
    let store = state.replace_store(next).await;

    tracing::info!(root = %store.root().display(), "Workspace root switched");
    Ok(Json(RootInfo {
        root: store.root().display().to_string(),
    }))
}
