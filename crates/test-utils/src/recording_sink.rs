use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use livebridge::engine::{PipelineReply, ReplySink};
use livebridge::errors::Result;

/// A reply sink that keeps every reply in memory.
///
/// Clones share the same buffer, so a test can hand one to the runtime and
/// inspect the other after `run()` returns.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    replies: Arc<Mutex<Vec<PipelineReply>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replies(&self) -> Vec<PipelineReply> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReplySink for RecordingSink {
    fn send(
        &mut self,
        reply: PipelineReply,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let replies = Arc::clone(&self.replies);
        Box::pin(async move {
            replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(reply);
            Ok(())
        })
    }
}
