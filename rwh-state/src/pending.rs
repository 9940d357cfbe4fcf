use tokio::task::JoinHandle;

/// A delayed submission that has not published yet.
#[derive(Debug)]
pub struct PendingSubmission {
    sequence: u64,
    handle: JoinHandle<bool>,
}

impl PendingSubmission {
    pub(crate) fn new(sequence: u64, handle: JoinHandle<bool>) -> Self {
        Self { sequence, handle }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Abort the wait; the submission will not publish.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the submission published. Cancelled or stale submissions
    /// report `false`.
    pub async fn wait(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}
