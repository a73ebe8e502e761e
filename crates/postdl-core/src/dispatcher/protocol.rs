//! Dispatcher/worker handoff protocol.
//!
//! Two directions over rendezvous channels (`sync_channel(0)`):
//! - "request next work": every worker sends [`Ready`] on one shared channel;
//! - "deliver work or stop": the dispatcher answers on that worker's private
//!   channel with a [`Handoff`].
//!
//! A send completes only when the other side receives, so a worker never
//! holds more than one task and the number of tasks in flight is bounded by
//! the number of workers.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;

use crate::task::Task;

/// Completion token: "worker `worker` is ready for more work".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    pub worker: usize,
}

/// Dispatcher's answer to a [`Ready`] token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    Task(Arc<Task>),
    /// Termination sentinel: no more work, exit.
    Stop,
}

/// Dispatcher side of the protocol.
pub struct DispatcherEnd {
    ready_rx: Receiver<Ready>,
    ready_tx: Option<SyncSender<Ready>>,
    handoffs: Vec<Option<SyncSender<Handoff>>>,
}

/// Worker side of the protocol.
pub struct WorkerLink {
    id: usize,
    ready_tx: SyncSender<Ready>,
    handoff_rx: Receiver<Handoff>,
}

impl DispatcherEnd {
    pub fn new() -> Self {
        let (ready_tx, ready_rx) = mpsc::sync_channel(0);
        Self {
            ready_rx,
            ready_tx: Some(ready_tx),
            handoffs: Vec::new(),
        }
    }

    /// Creates the link for a new worker. Worker ids start at 1.
    /// Returns `None` after [`close_spawning`](DispatcherEnd::close_spawning).
    pub fn attach(&mut self) -> Option<WorkerLink> {
        let ready_tx = self.ready_tx.clone()?;
        let (handoff_tx, handoff_rx) = mpsc::sync_channel(0);
        self.handoffs.push(Some(handoff_tx));
        Some(WorkerLink {
            id: self.handoffs.len(),
            ready_tx,
            handoff_rx,
        })
    }

    /// Drops the dispatcher's own request sender so that [`wait_ready`]
    /// returns `None` once every worker is gone.
    ///
    /// [`wait_ready`]: DispatcherEnd::wait_ready
    pub fn close_spawning(&mut self) {
        self.ready_tx = None;
    }

    /// Blocks until some worker requests work. `None` if all workers exited.
    pub fn wait_ready(&self) -> Option<Ready> {
        self.ready_rx.recv().ok()
    }

    /// Delivers `handoff` to `worker`, blocking until it is received.
    /// Returns false if that worker has exited.
    pub fn deliver(&mut self, worker: usize, handoff: Handoff) -> bool {
        let Some(slot) = worker.checked_sub(1).and_then(|i| self.handoffs.get_mut(i)) else {
            return false;
        };
        let stop = handoff == Handoff::Stop;
        let delivered = match slot {
            Some(tx) => tx.send(handoff).is_ok(),
            None => false,
        };
        if stop || !delivered {
            // Retired or gone; nothing more is sent to this worker.
            *slot = None;
        }
        delivered
    }
}

impl Default for DispatcherEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerLink {
    pub fn id(&self) -> usize {
        self.id
    }

    /// "Request next work": returns false once the dispatcher is gone.
    pub fn request_work(&self) -> bool {
        self.ready_tx.send(Ready { worker: self.id }).is_ok()
    }

    /// Waits for the dispatcher's answer. A closed channel reads as `Stop`.
    pub fn next_handoff(&self) -> Handoff {
        self.handoff_rx.recv().unwrap_or(Handoff::Stop)
    }
}
