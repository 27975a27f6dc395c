use async_trait::async_trait;
use client_core::{Confirmer, Notifier};
use tokio::io::{self, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::warn;

/// Prints notifications; errors go to stderr. With `require_ack` each
/// message waits for Enter before the call returns.
pub struct TerminalNotifier {
    require_ack: bool,
}

impl TerminalNotifier {
    pub fn new(require_ack: bool) -> Self {
        Self { require_ack }
    }

    async fn acknowledge(&self) {
        if !self.require_ack {
            return;
        }
        write_to(io::stdout(), "(press Enter to continue)", "acknowledgement prompt").await;
        if let Err(err) = read_line().await {
            warn!(error = %err, "could not read acknowledgement");
        }
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn report_error(&self, message: &str) {
        write_to(io::stderr(), &format!("Error: {message}\n"), "error notification").await;
        self.acknowledge().await;
    }

    async fn report_success(&self, message: &str) {
        write_to(io::stdout(), &format!("{message}\n"), "success notification").await;
        self.acknowledge().await;
    }
}

pub struct TerminalConfirmer {
    assume_yes: bool,
}

impl TerminalConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        write_to(io::stdout(), &format!("{prompt} [y/N] "), "confirmation prompt").await;
        match read_line().await {
            Ok(answer) => is_affirmative(&answer),
            Err(err) => {
                warn!(error = %err, "could not read confirmation, treating as no");
                false
            }
        }
    }
}

/// Anything but an explicit yes declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// Writes and flushes `text`. A failed write is logged with the text so the
/// message still reaches the log.
pub(crate) async fn write_to<W>(mut out: W, text: &str, what: &'static str) -> bool
where
    W: AsyncWrite + Unpin,
{
    let result = match out.write_all(text.as_bytes()).await {
        Ok(()) => out.flush().await,
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(what, text = text.trim_end(), error = %err, "could not write to terminal");
            false
        }
    }
}

async fn read_line() -> std::io::Result<String> {
    let mut line = String::new();
    BufReader::new(io::stdin()).read_line(&mut line).await?;
    Ok(line)
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
