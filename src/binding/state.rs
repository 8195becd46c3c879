//! Observable state cell.

use std::sync::Mutex;

use tokio::sync::{mpsc, watch};

/// A value that can be read at any time and watched for changes.
///
/// Two ways to follow it: `subscribe` yields the latest value and may skip
/// writes that land close together, `updates` yields every write in order.
#[derive(Debug)]
pub struct ObservableState<T> {
    tx: watch::Sender<T>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<T>>>,
}

impl<T: Clone> ObservableState<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value and wake every receiver.
    pub fn set(&self, value: T) {
        self.update_if(|current| {
            *current = value;
            true
        });
    }

    /// Mutate in place under the cell's lock. Receivers are woken only when
    /// `modify` returns `true`.
    pub fn update_if<F>(&self, modify: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.tx.send_if_modified(|current| {
            let modified = modify(current);
            if modified {
                // Still under the watch lock, so listeners see writes in order.
                self.publish(current);
            }
            modified
        })
    }

    /// Receiver positioned at the current value; `changed()` resolves on the
    /// next write.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Receiver of every value written from now on. It ends once the state
    /// is dropped.
    pub fn updates(&self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(tx);
        }
        rx
    }

    fn publish(&self, value: &T) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|tx| tx.send(value.clone()).is_ok());
        }
    }
}
