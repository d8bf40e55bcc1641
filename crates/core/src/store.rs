use crate::{Event, EventBus, OwnedCard, PackResult, Role, Tier, MAX_STARS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_COINS: i64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub coins: i64,
    #[serde(default)]
    pub inventory: HashMap<u32, OwnedCard>,
    #[serde(default)]
    pub mute: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            coins: DEFAULT_COINS,
            inventory: HashMap::new(),
            mute: false,
        }
    }
}

impl StoreState {
    /// Collection view with optional tier/role filters, best rating first.
    pub fn collection(&self, tier: Option<Tier>, role: Option<Role>) -> Vec<&OwnedCard> {
        let mut cards: Vec<&OwnedCard> = self
            .inventory
            .values()
            .filter(|owned| tier.map_or(true, |t| owned.card.tier == t))
            .filter(|owned| role.map_or(true, |r| owned.card.role == r))
            .collect();
        cards.sort_by(|a, b| {
            b.card
                .rating
                .cmp(&a.card.rating)
                .then(a.card.id.cmp(&b.card.id))
        });
        cards
    }
}

#[derive(Debug, Clone)]
pub enum StoreAction {
    ApplyPackResult(PackResult),
    AddCoins(i64),
    ToggleMute,
    Reset,
}

/// Single state transition. Pure in `(state, action)`: no clock, no
/// randomness, no IO. Persistence is the caller's follow-up effect.
pub fn apply(state: &StoreState, action: &StoreAction, events: &mut EventBus) -> StoreState {
    match action {
        StoreAction::ApplyPackResult(result) => {
            let mut next = state.clone();
            next.coins += result.coins_delta;
            let mut new_cards = 0;
            let mut upgrades = 0;
            let mut conversions = 0;
            for item in &result.items {
                match next.inventory.get_mut(&item.card.id) {
                    None => {
                        next.inventory
                            .insert(item.card.id, OwnedCard::first_pull(item.card.clone()));
                        new_cards += 1;
                    }
                    Some(owned) => {
                        if owned.stars < MAX_STARS {
                            upgrades += 1;
                        } else {
                            conversions += 1;
                        }
                        owned.record_dupe();
                    }
                }
            }
            events.push(Event::PackApplied {
                kind: result.kind,
                coins_delta: result.coins_delta,
                new_cards,
                upgrades,
                conversions,
                premium: result.any_premium,
                coins: next.coins,
            });
            next
        }
        StoreAction::AddCoins(amount) => {
            let mut next = state.clone();
            next.coins = (next.coins + amount).max(0);
            events.push(Event::CoinsAdded {
                amount: *amount,
                coins: next.coins,
            });
            next
        }
        StoreAction::ToggleMute => {
            let mut next = state.clone();
            next.mute = !next.mute;
            events.push(Event::MuteToggled { mute: next.mute });
            next
        }
        StoreAction::Reset => {
            events.push(Event::StateReset);
            StoreState::default()
        }
    }
}
