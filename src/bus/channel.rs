// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BusError;
use crate::observability::messages::dispatch::BusSendFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{BusFrame, BusTransport};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

/// Hands frames to a link task over a bounded channel.
///
/// Sending never waits: a full channel is reported as [`BusError::Full`] and
/// the frame is dropped, so an announcement cannot stall on a slow link.
#[derive(Debug, Clone)]
pub struct ChannelBus {
    sender: mpsc::Sender<BusFrame>,
}

impl ChannelBus {
    /// Create the bus and the receiving end the link task consumes.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<BusFrame>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl BusTransport for ChannelBus {
    fn send(&self, frame: BusFrame) -> Result<(), BusError> {
        let pid = frame.pid;
        self.sender.try_send(frame).map_err(|error| match error {
            TrySendError::Full(_) => BusError::Full { pid },
            TrySendError::Closed(_) => BusError::Closed,
        })
    }
}

/// Move frames from the channel onto `link` until the channel closes or
/// `token` is cancelled. Refused frames are logged and dropped; the count of
/// refusals is returned.
pub async fn forward(
    frames: &mut mpsc::Receiver<BusFrame>,
    link: &dyn BusTransport,
    token: &CancellationToken,
) -> usize {
    let mut refused = 0;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            frame = frames.recv() => match frame {
                Some(frame) => {
                    let pid = frame.pid;
                    if let Err(error) = link.send(frame) {
                        BusSendFailed { pid, error: &error }.log();
                        refused += 1;
                    }
                }
                None => break,
            },
        }
    }
    refused
}
