use std::sync::Mutex;

use futures::channel::oneshot;

/// Ordered fan-out queue for change notifications.
///
/// Every message ever pushed gets a position; a cursor is just a count of
/// messages already seen. Subscribing at a cursor behind the head resolves
/// immediately with everything missed, otherwise the subscription parks
/// until the next push. Any number of consumers can follow the queue
/// independently, and all of them observe messages in push order.
pub struct MessageQueue<T> {
    state: Mutex<QueueState<T>>,
}

struct QueueState<T> {
    messages: Vec<T>,
    listeners: Vec<(u32, oneshot::Sender<(u32, Vec<T>)>)>,
}

impl<T> MessageQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                messages: Vec::new(),
                listeners: Vec::new(),
            }),
        }
    }

    /// The cursor at the current head of the queue. Subscribing here waits
    /// for the next push.
    pub fn cursor(&self) -> u32 {
        self.state.lock().unwrap().messages.len() as u32
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MessageQueue<T> {
    /// Appends messages and wakes every parked subscriber with the messages
    /// it has not seen yet.
    pub fn push_messages(&self, messages: &[T]) {
        if messages.is_empty() {
            return;
        }

        let mut state = self.state.lock().unwrap();
        state.messages.extend_from_slice(messages);
        let head = state.messages.len() as u32;

        let listeners = std::mem::take(&mut state.listeners);
        for (cursor, sender) in listeners {
            let missed = state.messages[cursor as usize..].to_vec();
            // A dropped receiver is fine; the subscriber went away.
            let _ = sender.send((head, missed));
        }
    }

    /// Resolves with `(new_cursor, messages)` for every message past
    /// `cursor`: immediately if the queue is already ahead, on the next push
    /// otherwise.
    pub fn subscribe(&self, cursor: u32) -> oneshot::Receiver<(u32, Vec<T>)> {
        let (sender, receiver) = oneshot::channel();

        let mut state = self.state.lock().unwrap();
        let head = state.messages.len() as u32;
        if cursor < head {
            let missed = state.messages[cursor as usize..].to_vec();
            let _ = sender.send((head, missed));
        } else {
            // A cursor from the future clamps to the head rather than
            // skipping messages that have not happened yet.
            state.listeners.push((cursor.min(head), sender));
        }

        receiver
    }
}
