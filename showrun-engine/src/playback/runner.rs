//! Engine actor
//!
//! One task owns the [`PlaybackEngine`]. Commands arrive on a bounded queue
//! and are applied between ticks, so a tick evaluation never sees a
//! half-applied command. Callers hold a cloneable [`EngineHandle`].

use std::time::Duration;

use showrun_common::events::{MessageKind, ShowSnapshot};
use showrun_common::{CueEvent, CuePatch};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::PlaybackEngine;
use crate::error::{Error, Result};

/// Capacity of the command queue
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Command sent to the engine task
#[derive(Debug)]
pub enum EngineCommand {
    Trigger {
        action: String,
        reply: oneshot::Sender<bool>,
    },
    LoadById {
        id: String,
        reply: oneshot::Sender<bool>,
    },
    LoadByIndex {
        index: usize,
        reply: oneshot::Sender<bool>,
    },
    Increment {
        amount_ms: i64,
        reply: oneshot::Sender<Result<()>>,
    },
    SetupRundown {
        events: Vec<CueEvent>,
        reply: oneshot::Sender<()>,
    },
    UpdateRundown {
        events: Vec<CueEvent>,
        reply: oneshot::Sender<()>,
    },
    UpdateEvent {
        id: String,
        patch: CuePatch,
        reply: oneshot::Sender<bool>,
    },
    DeleteEvent {
        id: String,
        reply: oneshot::Sender<bool>,
    },
    SetMessage {
        kind: MessageKind,
        text: Option<String>,
        visible: Option<bool>,
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<ShowSnapshot>,
    },
}

fn apply(engine: &mut PlaybackEngine, command: EngineCommand) {
    // A dropped reply receiver only means the caller gave up waiting
    match command {
        EngineCommand::Trigger { action, reply } => {
            let _ = reply.send(engine.trigger(&action));
        }
        EngineCommand::LoadById { id, reply } => {
            let _ = reply.send(engine.load_event_by_id(&id));
        }
        EngineCommand::LoadByIndex { index, reply } => {
            let _ = reply.send(engine.load_event_by_index(index));
        }
        EngineCommand::Increment { amount_ms, reply } => {
            let _ = reply.send(engine.increment(amount_ms));
        }
        EngineCommand::SetupRundown { events, reply } => {
            engine.setup_with_event_list(events);
            let _ = reply.send(());
        }
        EngineCommand::UpdateRundown { events, reply } => {
            engine.update_event_list(events);
            let _ = reply.send(());
        }
        EngineCommand::UpdateEvent { id, patch, reply } => {
            let _ = reply.send(engine.update_single_event(&id, &patch));
        }
        EngineCommand::DeleteEvent { id, reply } => {
            let _ = reply.send(engine.delete_id(&id));
        }
        EngineCommand::SetMessage {
            kind,
            text,
            visible,
            reply,
        } => {
            engine.set_message(kind, text, visible);
            let _ = reply.send(());
        }
        EngineCommand::Snapshot { reply } => {
            let _ = reply.send(engine.snapshot());
        }
    }
}

/// Spawn the engine task with the given tick interval
///
/// The task ends when every [`EngineHandle`] has been dropped.
pub fn spawn_engine(mut engine: PlaybackEngine, tick: Duration) -> (EngineHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<EngineCommand>(COMMAND_QUEUE_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Engine task started, tick {:?}", tick);

        loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(command) => apply(&mut engine, command),
                    None => break,
                },
                _ = ticker.tick() => engine.tick(),
            }
        }

        info!("Engine task stopped");
    });

    (EngineHandle { tx }, handle)
}

/// Cloneable handle to the engine task
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> EngineCommand) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| Error::EngineUnavailable("engine task stopped".to_string()))?;
        rx.await.map_err(|_| {
            debug!("Engine dropped a reply");
            Error::EngineUnavailable("no reply from engine".to_string())
        })
    }

    pub async fn trigger(&self, action: impl Into<String>) -> Result<bool> {
        let action = action.into();
        self.request(|reply| EngineCommand::Trigger { action, reply }).await
    }

    pub async fn load_event_by_id(&self, id: impl Into<String>) -> Result<bool> {
        let id = id.into();
        self.request(|reply| EngineCommand::LoadById { id, reply }).await
    }

    pub async fn load_event_by_index(&self, index: usize) -> Result<bool> {
        self.request(|reply| EngineCommand::LoadByIndex { index, reply })
            .await
    }

    pub async fn increment(&self, amount_ms: i64) -> Result<()> {
        self.request(|reply| EngineCommand::Increment { amount_ms, reply })
            .await?
    }

    pub async fn setup_with_event_list(&self, events: Vec<CueEvent>) -> Result<()> {
        self.request(|reply| EngineCommand::SetupRundown { events, reply })
            .await
    }

    pub async fn update_event_list(&self, events: Vec<CueEvent>) -> Result<()> {
        self.request(|reply| EngineCommand::UpdateRundown { events, reply })
            .await
    }

    pub async fn update_single_event(&self, id: impl Into<String>, patch: CuePatch) -> Result<bool> {
        let id = id.into();
        self.request(|reply| EngineCommand::UpdateEvent { id, patch, reply })
            .await
    }

    pub async fn delete_id(&self, id: impl Into<String>) -> Result<bool> {
        let id = id.into();
        self.request(|reply| EngineCommand::DeleteEvent { id, reply }).await
    }

    pub async fn set_message(
        &self,
        kind: MessageKind,
        text: Option<String>,
        visible: Option<bool>,
    ) -> Result<()> {
        self.request(|reply| EngineCommand::SetMessage {
            kind,
            text,
            visible,
            reply,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<ShowSnapshot> {
        self.request(|reply| EngineCommand::Snapshot { reply }).await
    }
}
