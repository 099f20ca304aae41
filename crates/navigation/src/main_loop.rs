// Copyright 2026 Shinobu Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mailbox routing asynchronous completions back onto the main loop.
//!
//! Content screens may finish fetching on any task or thread. They never
//! touch navigation state directly: they post a [`LoopMessage`] through a
//! [`MainLoopHandle`], and the container applies it the next time it drains
//! its [`Mailbox`] on the main loop.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::destination::DestinationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMessage {
    /// The screen for this destination has received its data.
    ScreenReady(DestinationKind),
}

/// Cloneable, `Send` sender half of the mailbox.
#[derive(Debug, Clone)]
pub struct MainLoopHandle {
    tx: UnboundedSender<LoopMessage>,
}

impl MainLoopHandle {
    /// Posts a message. Returns `false` if the container is gone, in which
    /// case the message is dropped.
    pub fn post(&self, message: LoopMessage) -> bool { self.tx.send(message).is_ok() }

    pub fn screen_ready(&self, kind: DestinationKind) -> bool {
        self.post(LoopMessage::ScreenReady(kind))
    }
}

/// Receiver half, owned by the container.
#[derive(Debug)]
pub struct Mailbox {
    rx: UnboundedReceiver<LoopMessage>,
}

impl Mailbox {
    /// Takes every message posted so far without waiting.
    pub fn drain(&mut self) -> Vec<LoopMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}

pub fn channel() -> (MainLoopHandle, Mailbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MainLoopHandle { tx }, Mailbox { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completions_from_other_tasks_wait_for_drain() {
        let (handle, mut mailbox) = channel();
        assert!(mailbox.drain().is_empty());

        let remote = handle.clone();
        tokio::spawn(async move {
            remote.screen_ready(DestinationKind::Library);
            remote.screen_ready(DestinationKind::RemoteSelector);
        })
        .await
        .unwrap();

        assert_eq!(
            mailbox.drain(),
            vec![
                LoopMessage::ScreenReady(DestinationKind::Library),
                LoopMessage::ScreenReady(DestinationKind::RemoteSelector),
            ]
        );
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn posting_after_the_mailbox_is_gone_is_dropped() {
        let (handle, mailbox) = channel();
        drop(mailbox);
        assert!(!handle.screen_ready(DestinationKind::Settings));
    }
}
