use crate::PackKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    PackApplied {
        kind: PackKind,
        coins_delta: i64,
        new_cards: usize,
        upgrades: usize,
        conversions: usize,
        premium: bool,
        coins: i64,
    },
    CoinsAdded { amount: i64, coins: i64 },
    MuteToggled { mute: bool },
    StateReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
