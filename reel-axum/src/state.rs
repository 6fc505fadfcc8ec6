use std::sync::Arc;

use reel_stream::ContentStreamAdapter;

/// Shared by every handler; the adapter is chosen once at startup
#[derive(Clone)]
pub struct ReelState {
    pub adapter: Arc<dyn ContentStreamAdapter>,
}

impl ReelState {
    pub fn from_arc(adapter: Arc<dyn ContentStreamAdapter>) -> Self {
        Self { adapter }
    }
}
