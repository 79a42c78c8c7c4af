//! The single coordinator of client state.
//!
//! [`Workspace`] owns the tree state, the open documents, the task list
//! and the status line. Every network call goes through the backend
//! without holding the state lock, except save and reload which must not
//! interleave with edits to the same document. Failures set the status
//! line and leave drafts, selection and expansion as they were.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, broadcast, watch};

use workbench_core::error::AppError;
use workbench_core::result::AppResult;
use workbench_core::types::{FolderListing, RunAck, TaskArtifacts, TaskSummary};

use crate::backend::WorkspaceBackend;
use crate::documents::{OpenDocumentSet, SaveOutcome};
use crate::tree_state::TreeStateMachine;

/// Delay before the task list is polled after a run is started.
pub const TASK_POLL_DELAY: Duration = Duration::from_secs(4);

/// Tree depth requested on refresh.
pub const DEFAULT_TREE_DEPTH: u32 = 4;

/// Selected file and task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected file path.
    pub file: Option<String>,
    /// Selected task id.
    pub task: Option<String>,
}

/// Change notifications for observers such as a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// The workspace root changed.
    RootChanged(String),
    /// A new snapshot was loaded or expansion changed.
    TreeChanged,
    /// Documents were opened, edited, saved, reloaded or closed.
    DocumentsChanged,
    /// The file or task selection changed.
    SelectionChanged(Selection),
    /// The task list was refreshed.
    TasksChanged,
    /// The status line changed.
    Status(String),
}

/// State guarded by the coordinator.
#[derive(Debug, Default)]
pub struct WorkspaceState {
    root: Option<String>,
    tree: TreeStateMachine,
    documents: OpenDocumentSet,
    /// Paths with a read in flight, each with the outcome its waiters observe.
    pending: HashMap<String, watch::Receiver<Option<AppResult<()>>>>,
    tasks: Vec<TaskSummary>,
    selected_task: Option<String>,
    task_artifacts: Option<TaskArtifacts>,
    status: String,
}

impl WorkspaceState {
    /// Current root as reported by the server.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Tree snapshot and expansion.
    pub fn tree(&self) -> &TreeStateMachine {
        &self.tree
    }

    /// Open documents.
    pub fn documents(&self) -> &OpenDocumentSet {
        &self.documents
    }

    /// Last fetched task list.
    pub fn tasks(&self) -> &[TaskSummary] {
        &self.tasks
    }

    /// Artifacts of the selected task.
    pub fn task_artifacts(&self) -> Option<&TaskArtifacts> {
        self.task_artifacts.as_ref()
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        Selection {
            file: self.tree.selected_file().map(str::to_string),
            task: self.selected_task.clone(),
        }
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Role of a `select_file` call for a file that is not open yet.
enum OpenSlot {
    /// Performs the read and publishes its outcome.
    Reader(watch::Sender<Option<AppResult<()>>>),
    /// Waits for the outcome of a read already in flight.
    Waiter(watch::Receiver<Option<AppResult<()>>>),
}

/// Coordinates tree, documents and tasks against a [`WorkspaceBackend`].
pub struct Workspace {
    backend: Arc<dyn WorkspaceBackend>,
    state: Mutex<WorkspaceState>,
    events: broadcast::Sender<WorkspaceEvent>,
    tree_depth: u32,
    task_poll_delay: Duration,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("tree_depth", &self.tree_depth)
            .field("task_poll_delay", &self.task_poll_delay)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Create a coordinator with empty state.
    pub fn new(backend: Arc<dyn WorkspaceBackend>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            backend,
            state: Mutex::new(WorkspaceState::default()),
            events,
            tree_depth: DEFAULT_TREE_DEPTH,
            task_poll_delay: TASK_POLL_DELAY,
        }
    }

    /// Override the depth requested on tree refresh.
    pub fn with_tree_depth(mut self, depth: u32) -> Self {
        self.tree_depth = depth;
        self
    }

    /// Override the delay before polling tasks after a run.
    pub fn with_task_poll_delay(mut self, delay: Duration) -> Self {
        self.task_poll_delay = delay;
        self
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// Lock the state for reading.
    pub async fn view(&self) -> MutexGuard<'_, WorkspaceState> {
        self.state.lock().await
    }

    // ── Root & tree ──────────────────────────────────────────────

    /// Fetch the current root.
    pub async fn refresh_root(&self) -> AppResult<String> {
        match self.backend.get_root().await {
            Ok(info) => {
                let mut state = self.state.lock().await;
                state.root = Some(info.root.clone());
                self.emit(WorkspaceEvent::RootChanged(info.root.clone()));
                Ok(info.root)
            }
            Err(err) => Err(self.fail("Failed to load root", err).await),
        }
    }

    /// Fetch a fresh snapshot and collapse it fully.
    pub async fn refresh_tree(&self) -> AppResult<()> {
        match self.backend.fetch_tree("", self.tree_depth).await {
            Ok(snapshot) => {
                let mut state = self.state.lock().await;
                state.tree.load(snapshot.tree);
                self.emit(WorkspaceEvent::TreeChanged);
                Ok(())
            }
            Err(err) => Err(self.fail("Failed to load tree", err).await),
        }
    }

    /// Switch the server root, drop all documents and selection, then reload the tree.
    pub async fn switch_root(&self, root: &str) -> AppResult<()> {
        let info = match self.backend.set_root(root).await {
            Ok(info) => info,
            Err(err) => return Err(self.fail("Failed to switch root", err).await),
        };

        {
            let mut state = self.state.lock().await;
            if state.documents.has_unsaved() {
                tracing::warn!(root = %info.root, "Switching root discards unsaved drafts");
            }
            state.root = Some(info.root.clone());
            state.documents.clear();
            state.pending.clear();
            state.tree.clear_selection();
            state.tree.load(Vec::new());
            self.set_status(&mut state, format!("Root set to {}", info.root));
            self.emit(WorkspaceEvent::RootChanged(info.root));
            self.emit(WorkspaceEvent::DocumentsChanged);
            self.emit(WorkspaceEvent::SelectionChanged(state.selection()));
        }

        self.refresh_tree().await
    }

    /// List directories below the base directory.
    pub async fn browse(&self, path: &str) -> AppResult<FolderListing> {
        match self.backend.browse(path).await {
            Ok(listing) => Ok(listing),
            Err(err) => Err(self.fail("Failed to browse folders", err).await),
        }
    }

    /// Toggle one directory.
    pub async fn toggle_dir(&self, path: &str) {
        self.update_tree(|tree| tree.toggle(path)).await;
    }

    /// Show one more tree level.
    pub async fn expand_next_level(&self) {
        self.update_tree(TreeStateMachine::expand_next_level).await;
    }

    /// Hide one tree level.
    pub async fn collapse_next_level(&self) {
        self.update_tree(TreeStateMachine::collapse_next_level).await;
    }

    /// Expand every directory.
    pub async fn expand_all(&self) {
        self.update_tree(TreeStateMachine::expand_all).await;
    }

    /// Collapse every directory.
    pub async fn collapse_all(&self) {
        self.update_tree(TreeStateMachine::collapse_all).await;
    }

    // ── Documents ────────────────────────────────────────────────

    /// Select a file, opening it on first selection.
    ///
    /// Concurrent selections of one unopened file issue a single read, and
    /// every caller receives the outcome of that read.
    pub async fn select_file(&self, path: &str) -> AppResult<()> {
        let slot = {
            let mut state = self.state.lock().await;
            if state.documents.contains(path) {
                state.tree.select(path);
                self.set_status(&mut state, format!("Showing {path}"));
                self.emit(WorkspaceEvent::SelectionChanged(state.selection()));
                return Ok(());
            }
            match state.pending.get(path) {
                Some(in_flight) => OpenSlot::Waiter(in_flight.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    state.pending.insert(path.to_string(), rx);
                    OpenSlot::Reader(tx)
                }
            }
        };

        let tx = match slot {
            OpenSlot::Reader(tx) => tx,
            OpenSlot::Waiter(mut in_flight) => {
                tracing::debug!(path = %path, "Read already in flight, waiting for it");
                return match in_flight.wait_for(Option::is_some).await {
                    Ok(outcome) => (*outcome).clone().unwrap_or(Ok(())),
                    Err(_) => Err(AppError::internal(format!("Read of {path} was abandoned"))),
                };
            }
        };

        let fetched = self.backend.read_file(path).await;

        let mut state = self.state.lock().await;
        state.pending.remove(path);
        let outcome = match fetched {
            Ok(file) => {
                state.documents.open(path, file.content, file.size_bytes);
                state.tree.select(path);
                self.set_status(&mut state, format!("Showing {path}"));
                self.emit(WorkspaceEvent::DocumentsChanged);
                self.emit(WorkspaceEvent::SelectionChanged(state.selection()));
                Ok(())
            }
            Err(err) => Err(self.record(&mut state, &format!("Failed to open {path}"), err)),
        };
        tx.send_replace(Some(outcome.clone()));
        outcome
    }

    /// Replace the draft of an open document.
    pub async fn edit(&self, path: &str, draft: impl Into<String>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        match state.documents.edit(path, draft) {
            Ok(()) => {
                self.emit(WorkspaceEvent::DocumentsChanged);
                Ok(())
            }
            Err(err) => Err(self.record(&mut state, "Edit failed", err)),
        }
    }

    /// Save an open document.
    pub async fn save(&self, path: &str) -> AppResult<SaveOutcome> {
        let mut state = self.state.lock().await;
        match state.documents.save(path, self.backend.as_ref()).await {
            Ok(outcome) => {
                let message = match outcome {
                    SaveOutcome::Saved { .. } => {
                        self.emit(WorkspaceEvent::DocumentsChanged);
                        format!("Saved {path}")
                    }
                    SaveOutcome::NothingToSave => "No changes to save".to_string(),
                };
                self.set_status(&mut state, message);
                Ok(outcome)
            }
            Err(err) => Err(self.record(&mut state, "Save failed", err)),
        }
    }

    /// Re-read an open document from the server.
    ///
    /// A dirty document is only reloaded when `confirmed`; otherwise nothing
    /// changes and `Ok(false)` is returned.
    pub async fn reload(&self, path: &str, confirmed: bool) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let dirty = match state.documents.get(path) {
            Some(document) => document.is_dirty(),
            None => {
                let err = AppError::not_found(format!("Document is not open: {path}"));
                return Err(self.record(&mut state, "Reload failed", err));
            }
        };
        if dirty && !confirmed {
            self.set_status(&mut state, format!("Unsaved changes in {path}, reload not confirmed"));
            return Ok(false);
        }

        let reloaded = state
            .documents
            .reload(path, self.backend.as_ref())
            .await
            .map(|_| ());
        match reloaded {
            Ok(()) => {
                self.set_status(&mut state, format!("Reloaded {path}"));
                self.emit(WorkspaceEvent::DocumentsChanged);
                Ok(true)
            }
            Err(err) => Err(self.record(&mut state, "Reload failed", err)),
        }
    }

    /// Close an open document.
    pub async fn close(&self, path: &str) {
        let mut state = self.state.lock().await;
        let selected = state.tree.selected_file().map(str::to_string);
        let next = state.documents.close(path, selected.as_deref());
        self.apply_file_selection(&mut state, next);
        self.emit(WorkspaceEvent::DocumentsChanged);
    }

    /// Create an empty file, refresh the tree and select the new file.
    pub async fn create_file(&self, path: &str) -> AppResult<()> {
        if let Err(err) = self.backend.write_file(path, "").await {
            return Err(self.fail("Failed to create file", err).await);
        }
        self.status(format!("File created: {path}")).await;
        self.refresh_tree().await?;
        self.select_file(path).await
    }

    /// Create a directory and refresh the tree.
    pub async fn create_folder(&self, path: &str) -> AppResult<()> {
        if let Err(err) = self.backend.mkdir(path).await {
            return Err(self.fail("Failed to create folder", err).await);
        }
        self.status(format!("Folder created: {path}")).await;
        self.refresh_tree().await
    }

    /// Delete a file, drop its document and refresh the tree.
    pub async fn delete_file(&self, path: &str) -> AppResult<()> {
        if let Err(err) = self.backend.delete_file(path).await {
            return Err(self.fail("Failed to delete file", err).await);
        }

        {
            let mut state = self.state.lock().await;
            let selected = state.tree.selected_file().map(str::to_string);
            let next = state.documents.remove(path, selected.as_deref());
            self.apply_file_selection(&mut state, next);
            self.set_status(&mut state, format!("File deleted: {path}"));
            self.emit(WorkspaceEvent::DocumentsChanged);
        }

        self.refresh_tree().await
    }

    // ── Tasks ────────────────────────────────────────────────────

    /// Fetch the task list, selecting the newest task when none is selected.
    pub async fn refresh_tasks(&self) -> AppResult<()> {
        let list = match self.backend.list_tasks().await {
            Ok(list) => list,
            Err(err) => return Err(self.fail("Failed to load tasks", err).await),
        };

        let first = {
            let mut state = self.state.lock().await;
            state.tasks = list.tasks;
            self.set_status(&mut state, format!("Ready • {} tasks", list.total));
            self.emit(WorkspaceEvent::TasksChanged);
            match state.selected_task {
                Some(_) => None,
                None => state.tasks.first().map(|task| task.id.clone()),
            }
        };

        match first {
            Some(id) => self.select_task(&id).await,
            None => Ok(()),
        }
    }

    /// Select a task and fetch its artifacts.
    pub async fn select_task(&self, id: &str) -> AppResult<()> {
        match self.backend.get_task(id).await {
            Ok(artifacts) => {
                let mut state = self.state.lock().await;
                state.selected_task = Some(id.to_string());
                state.task_artifacts = Some(artifacts);
                self.emit(WorkspaceEvent::SelectionChanged(state.selection()));
                Ok(())
            }
            Err(err) => Err(self.fail(&format!("Failed to load task {id}"), err).await),
        }
    }

    /// Start a task run. Completion is only observable by polling.
    pub async fn run_task(&self, description: &str) -> AppResult<RunAck> {
        match self.backend.run_task(description).await {
            Ok(ack) => {
                self.status(format!("Task started: {}", ack.description)).await;
                Ok(ack)
            }
            Err(err) => Err(self.fail("Failed to start task", err).await),
        }
    }

    /// Start a task run and refresh the task list after the poll delay.
    pub async fn run_task_and_poll(self: &Arc<Self>, description: &str) -> AppResult<RunAck> {
        let ack = self.run_task(description).await?;

        let workspace = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(workspace.task_poll_delay).await;
            if let Err(e) = workspace.refresh_tasks().await {
                tracing::warn!(error = %e, "Task poll failed");
            }
        });

        Ok(ack)
    }

    // ── Internals ────────────────────────────────────────────────

    async fn update_tree(&self, f: impl FnOnce(&mut TreeStateMachine)) {
        let mut state = self.state.lock().await;
        f(&mut state.tree);
        self.emit(WorkspaceEvent::TreeChanged);
    }

    fn apply_file_selection(&self, state: &mut WorkspaceState, next: Option<String>) {
        let changed = state.tree.selected_file() != next.as_deref();
        match next {
            Some(path) => state.tree.select(path),
            None => state.tree.clear_selection(),
        }
        if changed {
            self.emit(WorkspaceEvent::SelectionChanged(state.selection()));
        }
    }

    async fn status(&self, message: String) {
        let mut state = self.state.lock().await;
        self.set_status(&mut state, message);
    }

    fn set_status(&self, state: &mut WorkspaceState, message: String) {
        state.status = message.clone();
        self.emit(WorkspaceEvent::Status(message));
    }

    async fn fail(&self, context: &str, err: AppError) -> AppError {
        let mut state = self.state.lock().await;
        self.record(&mut state, context, err)
    }

    fn record(&self, state: &mut WorkspaceState, context: &str, err: AppError) -> AppError {
        tracing::warn!(kind = %err.kind, error = %err.message, "{context}");
        self.set_status(state, format!("{context}: {}", err.message));
        err
    }

    fn emit(&self, event: WorkspaceEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
