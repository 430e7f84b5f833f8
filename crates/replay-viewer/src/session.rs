//! Async glue between the controller and its network collaborators.
//!
//! All mutation funnels through one controller behind a mutex; evaluation
//! fetches run on spawned tasks and re-check the cursor before applying,
//! so navigating while a request is in flight is always safe. In-flight
//! requests are never aborted — stale ones are dropped on arrival.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::clients::{EvalService, RecordSource};
use crate::controller::{EvalRequest, ReplayController};
use crate::error::ViewerError;
use crate::view::ReplayView;

pub struct ReplaySession<S, E, V>
where
    S: RecordSource,
    E: EvalService + 'static,
    V: ReplayView + 'static,
{
    controller: Arc<Mutex<ReplayController<V>>>,
    records: S,
    eval: Arc<E>,
}

impl<S, E, V> ReplaySession<S, E, V>
where
    S: RecordSource,
    E: EvalService + 'static,
    V: ReplayView + 'static,
{
    pub fn new(view: V, records: S, eval: E) -> Self {
        Self {
            controller: Arc::new(Mutex::new(ReplayController::new(view))),
            records,
            eval: Arc::new(eval),
        }
    }

    pub fn controller(&self) -> Arc<Mutex<ReplayController<V>>> {
        self.controller.clone()
    }

    /// Fetch and install a game. On failure the previously loaded game, if
    /// any, stays displayed as-is; only the status line changes. (The step
    /// buttons staying live against the old record is inherited behavior.)
    pub async fn load_game(&self, player: &str, date: &str, filename: &str) {
        match self.records.load(player, date, filename).await {
            Ok(record) => {
                let request = {
                    let mut controller = self.controller.lock().await;
                    controller.install_record(record)
                };
                self.spawn_evaluation(request);
            }
            Err(err) => {
                warn!(%player, %date, %filename, error = %err, "game load failed");
                let mut controller = self.controller.lock().await;
                controller
                    .view_mut()
                    .set_status(&format!("Failed to load game: {err}"));
            }
        }
    }

    /// Step forward one ply and kick off an evaluation of the new position.
    pub async fn next_move(&self) -> Result<(), ViewerError> {
        let request = {
            let mut controller = self.controller.lock().await;
            controller.next_move()?
        };
        if let Some(request) = request {
            self.spawn_evaluation(request);
        }
        Ok(())
    }

    /// Step back one ply and kick off an evaluation of the restored position.
    pub async fn prev_move(&self) {
        let request = {
            let mut controller = self.controller.lock().await;
            controller.prev_move()
        };
        if let Some(request) = request {
            self.spawn_evaluation(request);
        }
    }

    /// Fire-and-forget: apply_evaluation re-checks the cursor on arrival.
    fn spawn_evaluation(&self, request: EvalRequest) {
        let controller = self.controller.clone();
        let eval = self.eval.clone();
        tokio::spawn(async move {
            let outcome = eval.evaluate(&request.fen).await;
            let mut controller = controller.lock().await;
            controller.apply_evaluation(&request, outcome);
        });
    }
}
