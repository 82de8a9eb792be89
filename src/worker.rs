use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{SearchLimit, SearchResult, Searcher};
use crate::logic::game::GameSession;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

#[derive(Debug, Serialize, Deserialize)]
pub enum Request {
    /// Search the given session for its side to move.
    ComputeMove(Box<GameSession>, SearchLimit, EngineConfig),
    Shutdown,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    MoveFound(SearchResult),
}

/// Background search worker.
///
/// The blocking `minimax` call runs on a dedicated thread; the caller's loop
/// stays responsive and picks the verdict up from a channel. The worker owns
/// its engine for its whole lifetime, so the memoization table persists
/// across requests. The shipped session snapshot is exclusively owned by the
/// worker for the duration of each search.
pub struct SearchWorker {
    requests: Sender<Request>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    #[must_use]
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (response_tx, response_rx) = mpsc::channel::<Response>();

        let handle = std::thread::spawn(move || {
            let mut engine: Option<AlphaBetaEngine> = None;

            while let Ok(request) = request_rx.recv() {
                match request {
                    Request::ComputeMove(session, limit, config) => {
                        let config = Arc::new(config);
                        match engine.as_mut() {
                            Some(existing) => existing.update_config(config),
                            None => engine = Some(AlphaBetaEngine::new(config)),
                        }
                        let Some(engine) = engine.as_mut() else {
                            continue;
                        };

                        let result = engine.search(&session, limit);
                        if response_tx.send(Response::MoveFound(result)).is_err() {
                            log::warn!("search worker: caller went away, stopping");
                            break;
                        }
                    }
                    Request::Shutdown => break,
                }
            }
        });

        Self {
            requests: request_tx,
            responses: response_rx,
            handle: Some(handle),
        }
    }

    /// Queues a search over a snapshot of the session. Returns false when the
    /// worker thread is gone.
    pub fn submit(&self, session: &GameSession, limit: SearchLimit, config: &EngineConfig) -> bool {
        self.requests
            .send(Request::ComputeMove(
                Box::new(session.clone()),
                limit,
                config.clone(),
            ))
            .is_ok()
    }

    /// Non-blocking poll, for callers driving an event loop.
    #[must_use]
    pub fn try_result(&self) -> Option<Response> {
        self.responses.try_recv().ok()
    }

    /// Blocks until the next verdict arrives.
    #[must_use]
    pub fn wait_result(&self) -> Option<Response> {
        self.responses.recv().ok()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        let _ = self.requests.send(Request::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
