//! WebSocket pushes for the live monitoring and system health pages
//!
//! Each socket owns a [`Poller`] and a [`LiveView`]. The poller renders the
//! panel on every tick; a `refresh` message from the page renders once more
//! out of band. Both go through the view's generations, so a slow render
//! finishing after a newer one is dropped, and nothing is pushed once the
//! socket has closed.

use axum::{
    Extension,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, interval_at};
use tracing::{debug, error, info};

use crate::list::Loadable;
use crate::pages::operations::{MonitoringFragment, MonitoringPanel, SystemFragment, SystemPanel};
use crate::poll::Poller;
use crate::render;
use crate::session::SessionContext;
use crate::state::SharedState;

const PING_PERIOD: Duration = Duration::from_secs(30);

/// Message the page sends to ask for an immediate render
const REFRESH: &str = "refresh";

/// Rendered panel state for one open socket
#[derive(Debug, Clone, Default)]
pub struct LiveView {
    state: Arc<Mutex<Loadable<String>>>,
}

impl LiveView {
    /// Fresh view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render once and return the markup to push
    ///
    /// `None` when the render failed, a newer render started meanwhile, or
    /// the view was closed.
    pub async fn refresh<F, Fut>(&self, render: F) -> Option<String>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Option<String>> + Send,
    {
        let ticket = self.state.lock().await.begin();
        let result = render().await.ok_or(roomspa_core::Error::MissingData);
        let mut state = self.state.lock().await;
        if state.resolve(ticket, result) {
            state.value().cloned()
        } else {
            None
        }
    }

    /// Stop accepting results; renders still in flight are discarded
    pub async fn close(&self) {
        self.state.lock().await.unmount();
    }
}

/// Start polling `render` every `period`, sending each fresh panel to `tx`
///
/// The poller ends on the first tick after the receiver is dropped.
pub fn forward<F, Fut>(view: &LiveView, period: Duration, render: F, tx: mpsc::Sender<String>) -> Poller
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    let view = view.clone();
    Poller::spawn(period, move || {
        let (view, render, tx) = (view.clone(), render.clone(), tx.clone());
        async move {
            let Some(html) = view.refresh(render).await else {
                return ControlFlow::Continue(());
            };
            if tx.send(html).await.is_err() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    })
}

/// Push rendered panels over `socket` until the client goes away
pub async fn stream_panel<F, Fut>(socket: WebSocket, period: Duration, render: F)
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    let (mut sender, mut receiver) = socket.split();
    let view = LiveView::new();
    let (tx, mut panels) = mpsc::channel::<String>(4);
    let poller = forward(&view, period, render.clone(), tx.clone());
    let mut ping = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        tokio::select! {
            panel = panels.recv() => {
                let Some(html) = panel else { break };
                if sender.send(Message::Text(html)).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) if text.trim() == REFRESH => {
                        debug!("Manual panel refresh");
                        let (view, render, tx) = (view.clone(), render.clone(), tx.clone());
                        tokio::spawn(async move {
                            if let Some(html) = view.refresh(render).await {
                                let _ = tx.send(html).await;
                            }
                        });
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    view.close().await;
    poller.stop();
    debug!("Live panel socket closed");
}

/// `GET /admin/monitoring/live`
pub async fn monitoring(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let period = state.config.polling.monitoring_period();
    let client = state.client_for(&session);
    info!(user = %session.display_name(), "Live monitoring connected");

    ws.on_upgrade(move |socket| {
        stream_panel(socket, period, move || {
            let client = client.clone();
            async move {
                let panel = MonitoringPanel::load(&client).await;
                render::fragment(&MonitoringFragment { panel: &panel })
            }
        })
    })
}

/// `GET /admin/system/live`
pub async fn system(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let period = state.config.polling.system_health_period();
    let client = state.client_for(&session);
    info!(user = %session.display_name(), "Live system health connected");

    ws.on_upgrade(move |socket| {
        stream_panel(socket, period, move || {
            let client = client.clone();
            async move {
                let panel = SystemPanel::load(&client).await;
                render::fragment(&SystemFragment { panel: &panel })
            }
        })
    })
}
