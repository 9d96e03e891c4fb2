use super::ClientPipelineArgs;
use crate::core::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Continuation requested by a command, resumed on the next round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCall {
    pub command: String,
    pub method: String,
    pub args: ClientPipelineArgs,
}

/// Message pushed to the client page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMessage {
    pub command: String,
    pub payload: String,
}

/// The browser-side page a command talks to
#[async_trait]
pub trait ClientPage: Send + Sync {
    /// Schedules `command.method(args)` for after the current request
    async fn start(&self, command: &str, method: &str, args: ClientPipelineArgs) -> Result<()>;

    /// True when there are no unsaved edits, or the user agreed to drop them
    async fn check_modified(&self) -> Result<bool>;

    async fn send_message(&self, command: &str, payload: String) -> Result<()>;

    async fn alert(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct PageState {
    pending: VecDeque<PendingCall>,
    messages: Vec<ClientMessage>,
    alerts: Vec<String>,
    unsaved_changes: bool,
    discard_on_prompt: bool,
    modified_checks: usize,
}

/// In-process client page that buffers everything it is sent
///
/// Pending continuations are drained by [`crate::shell::Shell::round_trip`].
#[derive(Debug, Default)]
pub struct BufferedClientPage {
    state: Mutex<PageState>,
}

impl BufferedClientPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with unsaved edits. `discard_on_prompt` is the user's answer
    /// when asked whether to drop them.
    pub fn with_unsaved_changes(discard_on_prompt: bool) -> Self {
        Self {
            state: Mutex::new(PageState {
                unsaved_changes: true,
                discard_on_prompt,
                ..PageState::default()
            }),
        }
    }

    pub async fn set_unsaved_changes(&self, unsaved: bool, discard_on_prompt: bool) {
        let mut state = self.state.lock().await;
        state.unsaved_changes = unsaved;
        state.discard_on_prompt = discard_on_prompt;
    }

    pub async fn take_pending(&self) -> Vec<PendingCall> {
        self.state.lock().await.pending.drain(..).collect()
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn messages(&self) -> Vec<ClientMessage> {
        self.state.lock().await.messages.clone()
    }

    pub async fn alerts(&self) -> Vec<String> {
        self.state.lock().await.alerts.clone()
    }

    pub async fn modified_checks(&self) -> usize {
        self.state.lock().await.modified_checks
    }
}

#[async_trait]
impl ClientPage for BufferedClientPage {
    async fn start(&self, command: &str, method: &str, args: ClientPipelineArgs) -> Result<()> {
        self.state.lock().await.pending.push_back(PendingCall {
            command: command.to_string(),
            method: method.to_string(),
            args,
        });
        Ok(())
    }

    async fn check_modified(&self) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.modified_checks += 1;

        if !state.unsaved_changes {
            return Ok(true);
        }

        if state.discard_on_prompt {
            state.unsaved_changes = false;
            return Ok(true);
        }

        Ok(false)
    }

    async fn send_message(&self, command: &str, payload: String) -> Result<()> {
        self.state.lock().await.messages.push(ClientMessage {
            command: command.to_string(),
            payload,
        });
        Ok(())
    }

    async fn alert(&self, message: &str) -> Result<()> {
        self.state.lock().await.alerts.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_queues_pending_call() {
        let page = BufferedClientPage::new();
        let mut args = ClientPipelineArgs::new();
        args.insert("id", "x");

        page.start("item:addversion", "Run", args.clone()).await.unwrap();
        assert_eq!(page.pending_count().await, 1);

        let pending = page.take_pending().await;
        assert_eq!(pending[0].command, "item:addversion");
        assert_eq!(pending[0].method, "Run");
        assert_eq!(pending[0].args, args);
        assert_eq!(page.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_check_modified_answers() {
        let clean = BufferedClientPage::new();
        assert!(clean.check_modified().await.unwrap());

        let keep = BufferedClientPage::with_unsaved_changes(false);
        assert!(!keep.check_modified().await.unwrap());
        assert!(!keep.check_modified().await.unwrap());
        assert_eq!(keep.modified_checks().await, 2);

        let discard = BufferedClientPage::with_unsaved_changes(true);
        assert!(discard.check_modified().await.unwrap());
        discard.set_unsaved_changes(true, false).await;
        assert!(!discard.check_modified().await.unwrap());
    }

    #[tokio::test]
    async fn test_messages_and_alerts_are_recorded() {
        let page = BufferedClientPage::new();
        page.send_message("cmd", "item:versionadded(...)".into()).await.unwrap();
        page.alert("Item not found.").await.unwrap();

        assert_eq!(page.messages().await.len(), 1);
        assert_eq!(page.alerts().await, vec!["Item not found.".to_string()]);
    }
}
