use async_trait::async_trait;

/// Surfaces outcomes to the user. Each call resolves only once the user has
/// acknowledged the message, so callers never have two notifications in
/// flight. Implementations must show every message exactly once.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn report_error(&self, message: &str);
    async fn report_success(&self, message: &str);
}

/// Yes/no question asked before destructive operations.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}
