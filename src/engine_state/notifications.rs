//! # Notification Queue
//!
//! Hands text messages from I/O threads to the frame loop.
//!
//! Producers hold a cloneable [`NotificationSender`] and never block: when the
//! bounded queue is full the message is dropped with a warning. The frame loop
//! drains a bounded number of messages at the start of each frame.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use log::warn;

/// Producer side of a [`NotificationQueue`].
#[derive(Clone, Debug)]
pub struct NotificationSender {
    inner: SyncSender<String>,
}

impl NotificationSender {
    /// Offers a message to the queue without blocking.
    ///
    /// # Returns
    /// `false` once the queue has been dropped; a full queue drops the message
    /// but still returns `true`
    pub fn notify(&self, message: impl Into<String>) -> bool {
        match self.inner.try_send(message.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!("Notification queue full, dropping {:?}", dropped);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Bounded single-consumer queue of inbound notifications.
#[derive(Debug)]
pub struct NotificationQueue {
    sender: SyncSender<String>,
    receiver: Receiver<String>,
}

impl NotificationQueue {
    /// Creates a queue holding at most `capacity` undelivered messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        Self { sender, receiver }
    }

    /// A new producer handle.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender {
            inner: self.sender.clone(),
        }
    }

    /// Takes up to `max` pending messages in arrival order.
    pub fn drain(&self, max: usize) -> Vec<String> {
        let mut drained = Vec::new();
        while drained.len() < max {
            match self.receiver.try_recv() {
                Ok(message) => drained.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }
}
