// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// An owned, multi-producer notification channel.
///
/// The bus is generic over the event type `T` so that `tableau-core` stays
/// decoupled from the stage events defined in `tableau-data`. Producers get a
/// [`flume::Sender`] through [`EventBus::sender`]; the owner drains the
/// receiving end at its own pace.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus created.");
        Self { sender, receiver }
    }

    /// Publishes an event from the owner's side of the bus, logging an error
    /// if the receiver is disconnected.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    ///
    /// ## Returns
    /// `false` when the event could not be delivered.
    pub fn publish(&self, event: T) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to publish event: {e}. Receiver likely disconnected.");
                false
            }
        }
    }

    /// Returns a new producer handle for this bus.
    ///
    /// This is what gets injected into a `Stage` as its observer.
    ///
    /// ## Returns
    /// A cloned [`flume::Sender`] feeding this bus's receiver.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns the consuming end of the bus.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Takes every event currently queued, without blocking.
    ///
    /// ## Returns
    /// The queued events in publication order; empty if none are pending.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of events waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
