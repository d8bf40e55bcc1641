use crate::{
    apply, resolve_pack, EventBus, PackCatalog, PackError, PackKind, PackResult, RngState, Roster,
    StoreAction, StoreState,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not enough coins: need {needed}, have {available}")]
    NotEnoughCoins { needed: i64, available: i64 },
    #[error("a pack is already being opened")]
    OpenInProgress,
    #[error("no resolved pack to commit")]
    NothingToCommit,
    #[error("unknown pack {0:?}")]
    UnknownPack(PackKind),
    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Caller-side aggregate: catalog, store state, RNG, and the pending slot
/// that makes pack opening a two-phase resolve/commit protocol. Front ends
/// own the reveal pacing between the two phases and the persistence after
/// each committed transition.
#[derive(Debug)]
pub struct Session {
    pub roster: Roster,
    pub catalog: PackCatalog,
    pub state: StoreState,
    pub rng: RngState,
    roster_seed: u64,
    pending: Option<PackResult>,
}

impl Session {
    /// The catalog regenerates deterministically from `roster_seed`, so a
    /// persisted inventory keeps pointing at the same cards; draws come
    /// from an independently seeded stream.
    pub fn new(catalog: PackCatalog, state: StoreState, roster_seed: u64, draw_seed: u64) -> Self {
        let mut roster_rng = RngState::from_seed(roster_seed);
        let roster = Roster::generate(&mut roster_rng);
        Self {
            roster,
            catalog,
            state,
            rng: RngState::from_seed(draw_seed),
            roster_seed,
            pending: None,
        }
    }

    pub fn roster_seed(&self) -> u64 {
        self.roster_seed
    }

    pub fn pending(&self) -> Option<&PackResult> {
        self.pending.as_ref()
    }

    /// Phase one: validates the purchase and resolves it without touching
    /// the store. The result stays pending until `commit`.
    pub fn resolve_open(&mut self, kind: PackKind) -> Result<&PackResult, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::OpenInProgress);
        }
        let def = self
            .catalog
            .get(kind)
            .ok_or(SessionError::UnknownPack(kind))?;
        if self.state.coins < def.price {
            return Err(SessionError::NotEnoughCoins {
                needed: def.price,
                available: self.state.coins,
            });
        }
        let result = resolve_pack(def, &self.roster, &self.state.inventory, &mut self.rng)?;
        Ok(self.pending.insert(result))
    }

    /// Phase two: commits the pending resolution through the reducer.
    pub fn commit(&mut self, events: &mut EventBus) -> Result<PackResult, SessionError> {
        let result = self.pending.take().ok_or(SessionError::NothingToCommit)?;
        self.state = apply(
            &self.state,
            &StoreAction::ApplyPackResult(result.clone()),
            events,
        );
        Ok(result)
    }

    pub fn add_coins(&mut self, amount: i64, events: &mut EventBus) {
        self.state = apply(&self.state, &StoreAction::AddCoins(amount), events);
    }

    pub fn toggle_mute(&mut self, events: &mut EventBus) {
        self.state = apply(&self.state, &StoreAction::ToggleMute, events);
    }

    pub fn reset(&mut self, events: &mut EventBus) {
        self.pending = None;
        self.state = apply(&self.state, &StoreAction::Reset, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_COINS;

    fn session() -> Session {
        Session::new(PackCatalog::builtin(), StoreState::default(), 42, 7)
    }

    #[test]
    fn insufficient_coins_rejects_before_resolution() {
        let mut session = session();
        session.state.coins = 100;
        let err = session
            .resolve_open(PackKind::Bronze)
            .map(|_| ())
            .expect_err("must reject");
        match err {
            SessionError::NotEnoughCoins { needed, available } => {
                assert_eq!(needed, 200);
                assert_eq!(available, 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.state.coins, 100);
        assert!(session.state.inventory.is_empty());
        assert!(session.pending().is_none());
    }

    #[test]
    fn resolve_does_not_touch_the_store() {
        let mut session = session();
        session.resolve_open(PackKind::Bronze).expect("resolve");
        assert_eq!(session.state.coins, DEFAULT_COINS);
        assert!(session.state.inventory.is_empty());
        assert!(session.pending().is_some());
    }

    #[test]
    fn second_open_blocked_while_pending() {
        let mut session = session();
        session.resolve_open(PackKind::Bronze).expect("resolve");
        let err = session
            .resolve_open(PackKind::Silver)
            .map(|_| ())
            .expect_err("must reject");
        assert!(matches!(err, SessionError::OpenInProgress));
    }

    #[test]
    fn commit_applies_and_clears_pending() {
        let mut session = session();
        let delta = session
            .resolve_open(PackKind::Bronze)
            .expect("resolve")
            .coins_delta;
        let mut events = EventBus::default();
        let result = session.commit(&mut events).expect("commit");
        assert_eq!(result.coins_delta, delta);
        assert_eq!(session.state.coins, DEFAULT_COINS + delta);
        assert!(!session.state.inventory.is_empty());
        assert!(session.pending().is_none());
        // The slot is free again.
        session.resolve_open(PackKind::Bronze).expect("resolve again");
    }

    #[test]
    fn commit_without_pending_fails() {
        let mut session = session();
        let mut events = EventBus::default();
        let err = session.commit(&mut events).expect_err("nothing pending");
        assert!(matches!(err, SessionError::NothingToCommit));
    }

    #[test]
    fn reset_drops_pending_resolution() {
        let mut session = session();
        session.resolve_open(PackKind::Bronze).expect("resolve");
        let mut events = EventBus::default();
        session.reset(&mut events);
        assert!(session.pending().is_none());
        assert_eq!(session.state.coins, DEFAULT_COINS);
        let err = session.commit(&mut events).expect_err("pending cleared");
        assert!(matches!(err, SessionError::NothingToCommit));
    }

    #[test]
    fn same_roster_seed_rebuilds_the_same_catalog() {
        let a = Session::new(PackCatalog::builtin(), StoreState::default(), 42, 1);
        let b = Session::new(PackCatalog::builtin(), StoreState::default(), 42, 2);
        assert_eq!(a.roster.cards, b.roster.cards);
    }
}
