use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, event_loop};
use crate::io::watcher_io;
use crate::state::AppState;

/// Task spawning and lifecycle for the interactive loop
pub struct AppController {
    input: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            input: kanal::bounded_async(64),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.state.clone(),
            self.input.1.clone(),
            self.input.0.clone(),
        ));

        tasks.spawn(watcher_io(
            self.cancel_token.child_token(),
            self.input.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
        self.state.gate.cancel_all();
    }
}
