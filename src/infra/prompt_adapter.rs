use crate::app::ports::{ConfirmationPort, ConfirmationRequest};
use async_trait::async_trait;
use dialoguer::Confirm;
use tracing::{debug, warn};

/// Asks on the terminal. A prompt that can't be shown (no TTY, I/O error) counts as "no".
pub struct DialoguerConfirmation;

#[async_trait]
impl ConfirmationPort for DialoguerConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let prompt = format!("{}: {}", request.title(), request.message());
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                warn!("Confirmation prompt failed, treating as declined: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation task failed, treating as declined: {}", e);
                false
            }
        }
    }
}

/// Answers every confirmation the same way (`--yes`, tests, non-interactive runs)
pub struct AutoConfirm {
    answer: bool,
}

impl AutoConfirm {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl ConfirmationPort for AutoConfirm {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        debug!(title = request.title(), answer = self.answer, "auto-answering confirmation");
        self.answer
    }
}
