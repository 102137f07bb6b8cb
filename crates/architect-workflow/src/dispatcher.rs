// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow dispatcher: one chat message in, an ordered chunk stream out.
//!
//! The flow is a small state machine driven lazily by the consumer:
//!
//! ```text
//! Start -> CheckAuth -+-> (unauthorized) login prompt -> Done
//!                     +-> (authorized) status -> Research -> result -> Done
//! ```
//!
//! Nothing runs until the stream is polled, and dropping the stream drops
//! any in-flight research and cancels its token. Each flow's token is a
//! child of the dispatcher's shutdown token when one is set.

use std::fmt;
use std::sync::Arc;

use architect_core::{
    ArchitectError, InstallationId, RepositoryLister, ResponseChunk, ResponseMeta, TaskRunner,
    UserId,
};
use futures::stream::{self, Stream};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::auth::AuthorizationGate;

/// Status line sent once research starts.
pub const STATUS_MESSAGE: &str =
    "🏗️ **Bl1nk Architect Initialized**\n\n_Connecting to GitHub & Gemini Deep Research..._\n\n";

/// Renders the prompt shown to users who have not installed the app.
pub fn login_prompt(login_url: &str) -> String {
    format!(
        "🔒 **Authentication Required**\n\n\
         To analyze your private repositories, Bl1nk needs access via the GitHub App.\n\n\
         👉 [**Click here to Authorize GitHub Access**]({login_url})\n\n\
         _After authorizing, please reply with \"Start\" again._"
    )
}

/// Lists repository files to include in the research prompt.
#[derive(Clone)]
pub struct RepositoryContext {
    pub lister: Arc<dyn RepositoryLister>,
    pub file_limit: usize,
}

impl fmt::Debug for RepositoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryContext")
            .field("file_limit", &self.file_limit)
            .finish_non_exhaustive()
    }
}

/// Builds the research prompt from the user's message and repository paths.
pub fn compose_prompt(message: &str, files: &[String]) -> String {
    if files.is_empty() {
        return message.to_string();
    }
    let mut prompt = String::with_capacity(message.len() + files.len() * 32);
    prompt.push_str(message);
    prompt.push_str("\n\n## Repository files\n");
    for file in files {
        prompt.push_str("- ");
        prompt.push_str(file);
        prompt.push('\n');
    }
    prompt
}

/// States in the dispatch FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    CheckAuth,
    Research,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::Start => write!(f, "start"),
            FlowState::CheckAuth => write!(f, "check_auth"),
            FlowState::Research => write!(f, "research"),
            FlowState::Done => write!(f, "done"),
        }
    }
}

/// Routes chat messages through authorization and research.
#[derive(Clone)]
pub struct WorkflowDispatcher {
    gate: Arc<AuthorizationGate>,
    runner: Arc<dyn TaskRunner>,
    repository: Option<RepositoryContext>,
    shutdown: Option<CancellationToken>,
}

impl WorkflowDispatcher {
    pub fn new(gate: Arc<AuthorizationGate>, runner: Arc<dyn TaskRunner>) -> Self {
        Self {
            gate,
            runner,
            repository: None,
            shutdown: None,
        }
    }

    /// Cancels in-flight research when `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Adds repository file listing ahead of research.
    pub fn with_repository(mut self, repository: RepositoryContext) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn gate(&self) -> &Arc<AuthorizationGate> {
        &self.gate
    }

    /// Returns the reply to `message` from `user` as a lazy, finite stream.
    ///
    /// The first chunk is always [`ResponseChunk::Meta`], and every stream
    /// carries at least one text chunk after it.
    pub fn dispatch(
        &self,
        user: UserId,
        message: String,
    ) -> impl Stream<Item = ResponseChunk> + Send + 'static {
        let cancel = match &self.shutdown {
            Some(shutdown) => shutdown.child_token(),
            None => CancellationToken::new(),
        };
        let flow = Flow {
            gate: self.gate.clone(),
            runner: self.runner.clone(),
            repository: self.repository.clone(),
            user,
            message,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
            state: FlowState::Start,
        };

        stream::unfold(flow, |mut flow| async move {
            let chunk = flow.step().await?;
            Some((chunk, flow))
        })
    }
}

struct Flow {
    gate: Arc<AuthorizationGate>,
    runner: Arc<dyn TaskRunner>,
    repository: Option<RepositoryContext>,
    user: UserId,
    message: String,
    cancel: CancellationToken,
    _guard: DropGuard,
    state: FlowState,
}

impl Flow {
    /// Emits the chunk for the current state and advances.
    async fn step(&mut self) -> Option<ResponseChunk> {
        debug!(user = self.user.as_str(), state = %self.state, "workflow step");
        match self.state {
            FlowState::Start => {
                self.state = FlowState::CheckAuth;
                Some(ResponseChunk::Meta(ResponseMeta::default()))
            }
            FlowState::CheckAuth => {
                if self.gate.is_authorized(&self.user).await {
                    self.state = FlowState::Research;
                    Some(ResponseChunk::text(STATUS_MESSAGE))
                } else {
                    self.state = FlowState::Done;
                    Some(ResponseChunk::text(self.login_prompt()))
                }
            }
            FlowState::Research => {
                self.state = FlowState::Done;
                Some(ResponseChunk::Text(self.research().await))
            }
            FlowState::Done => None,
        }
    }

    fn login_prompt(&self) -> String {
        info!(user = self.user.as_str(), "user not authorized, sending login link");
        match self.gate.build_login_url(&self.user) {
            Ok(url) => login_prompt(&url),
            Err(e) => {
                warn!(error = %e, "failed to build login url");
                format!("Login unavailable: {e}")
            }
        }
    }

    async fn research(&self) -> String {
        let files = match &self.repository {
            Some(repository) => match self.list_files(repository).await {
                Ok(files) => files,
                Err(text) => return text,
            },
            None => Vec::new(),
        };

        let prompt = compose_prompt(&self.message, &files);
        info!(
            user = self.user.as_str(),
            files = files.len(),
            "starting research"
        );
        self.runner.run(&prompt, &self.cancel).await.into_text()
    }

    async fn list_files(&self, repository: &RepositoryContext) -> Result<Vec<String>, String> {
        let installation: InstallationId = self
            .gate
            .installation(&self.user)
            .await
            .ok_or_else(|| "GitHub Error: no installation recorded for this user".to_string())?;

        repository
            .lister
            .list_files(&installation, repository.file_limit)
            .await
            .map_err(|e| {
                warn!(user = self.user.as_str(), error = %e, "repository listing failed");
                match e {
                    ArchitectError::GitHub { message, .. } => {
                        format!("GitHub Error: {message}")
                    }
                    other => format!("GitHub Error: {other}"),
                }
            })
    }
}
