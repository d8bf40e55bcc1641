use crate::{OwnedCard, PlayerCard, RngState, Roster, Tier, MAX_STARS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Coins refunded per rating point when a pull hits the star cap.
pub const CONVERSION_PER_RATING: i64 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackKind {
    Bronze,
    Silver,
    Gold,
}

impl PackKind {
    pub const ALL: [PackKind; 3] = [PackKind::Bronze, PackKind::Silver, PackKind::Gold];

    pub fn label(self) -> &'static str {
        match self {
            PackKind::Bronze => "Bronze",
            PackKind::Silver => "Silver",
            PackKind::Gold => "Gold",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "bronze" => Some(PackKind::Bronze),
            "silver" => Some(PackKind::Silver),
            "gold" => Some(PackKind::Gold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierWeight {
    pub tier: Tier,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackDef {
    pub kind: PackKind,
    pub price: i64,
    pub draws: u8,
    /// Percentage weights in declared tier order, summing to 100.
    pub odds: Vec<TierWeight>,
}

impl PackDef {
    pub fn new(kind: PackKind, price: i64, draws: u8, weights: [f64; 4]) -> Self {
        let odds = Tier::ALL
            .iter()
            .zip(weights)
            .map(|(tier, weight)| TierWeight {
                tier: *tier,
                weight,
            })
            .collect();
        Self {
            kind,
            price,
            draws,
            odds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackCatalog {
    pub packs: Vec<PackDef>,
}

impl PackCatalog {
    pub fn builtin() -> Self {
        Self {
            packs: vec![
                PackDef::new(PackKind::Bronze, 200, 5, [70.0, 25.0, 4.5, 0.5]),
                PackDef::new(PackKind::Silver, 600, 5, [40.0, 45.0, 13.0, 2.0]),
                PackDef::new(PackKind::Gold, 1200, 5, [20.0, 50.0, 25.0, 5.0]),
            ],
        }
    }

    pub fn get(&self, kind: PackKind) -> Option<&PackDef> {
        self.packs.iter().find(|pack| pack.kind == kind)
    }
}

/// Weighted tier draw: accumulate weights in declared order and take the
/// first tier whose cumulative weight meets the roll. Common is the
/// fallback when the table leaves the roll unreached.
pub fn pick_tier(odds: &[TierWeight], rng: &mut RngState) -> Tier {
    let roll = rng.roll_percent();
    let mut cumulative = 0.0;
    for entry in odds {
        cumulative += entry.weight;
        if roll <= cumulative {
            return entry.tier;
        }
    }
    Tier::Common
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackItem {
    pub card: PlayerCard,
    pub is_dupe: bool,
    pub upgraded: bool,
    pub converted_coins: i64,
}

/// Value computed by `resolve_pack`; the store commits it separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    pub kind: PackKind,
    pub items: Vec<PackItem>,
    pub any_premium: bool,
    pub coins_delta: i64,
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("empty roster")]
    EmptyRoster,
}

/// Draws the pack's cards and computes its full economic effect against the
/// given inventory snapshot. Pure with respect to the store: duplicate flags
/// and conversions are judged against the snapshot as it was when the pack
/// was bought, and nothing is mutated here.
pub fn resolve_pack(
    def: &PackDef,
    roster: &Roster,
    inventory: &HashMap<u32, OwnedCard>,
    rng: &mut RngState,
) -> Result<PackResult, PackError> {
    let mut items = Vec::with_capacity(def.draws as usize);
    let mut any_premium = false;
    let mut coins_delta = -def.price;
    for _ in 0..def.draws {
        let tier = pick_tier(&def.odds, rng);
        let card = draw_card(roster, tier, rng)?;
        let mut is_dupe = false;
        let mut upgraded = false;
        let mut converted_coins = 0;
        if let Some(owned) = inventory.get(&card.id) {
            is_dupe = true;
            if owned.stars < MAX_STARS {
                upgraded = true;
            } else {
                converted_coins = card.rating as i64 * CONVERSION_PER_RATING;
                coins_delta += converted_coins;
            }
        }
        if card.tier.is_premium() {
            any_premium = true;
        }
        items.push(PackItem {
            card: card.clone(),
            is_dupe,
            upgraded,
            converted_coins,
        });
    }
    Ok(PackResult {
        kind: def.kind,
        items,
        any_premium,
        coins_delta,
    })
}

/// Picks from the drawn tier, widening to the nearest populated tier when
/// the catalog generated none at that tier. Lower tiers are tried first.
fn draw_card<'a>(
    roster: &'a Roster,
    tier: Tier,
    rng: &mut RngState,
) -> Result<&'a PlayerCard, PackError> {
    if let Some(card) = roster.pick_from_tier(tier, rng) {
        return Ok(card);
    }
    let pos = Tier::ALL.iter().position(|t| *t == tier).unwrap_or(0);
    let below = Tier::ALL[..pos].iter().rev();
    let above = Tier::ALL[pos + 1..].iter();
    for fallback in below.chain(above) {
        if let Some(card) = roster.pick_from_tier(*fallback, rng) {
            return Ok(card);
        }
    }
    Err(PackError::EmptyRoster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, Stats};

    fn card(id: u32, rating: u8) -> PlayerCard {
        PlayerCard {
            id,
            name: format!("Player {id}"),
            team: "Chennai Kings".to_string(),
            role: Role::Bat,
            rating,
            tier: Tier::from_rating(rating),
            stats: Stats {
                batting: 70,
                bowling: 70,
                fielding: 70,
                pace: 70,
            },
        }
    }

    fn single_tier_odds(tier: Tier) -> [f64; 4] {
        let mut weights = [0.0; 4];
        for (slot, candidate) in weights.iter_mut().zip(Tier::ALL) {
            if candidate == tier {
                *slot = 100.0;
            }
        }
        weights
    }

    #[test]
    fn builtin_odds_sum_to_one_hundred() {
        for pack in PackCatalog::builtin().packs {
            let total: f64 = pack.odds.iter().map(|entry| entry.weight).sum();
            assert!(
                (total - 100.0).abs() < 1e-9,
                "{:?} sums to {total}",
                pack.kind
            );
        }
    }

    #[test]
    fn builtin_catalog_lookup() {
        let catalog = PackCatalog::builtin();
        for kind in PackKind::ALL {
            let pack = catalog.get(kind).expect("builtin pack");
            assert_eq!(pack.kind, kind);
            assert_eq!(pack.draws, 5);
            assert!(pack.price > 0);
        }
    }

    #[test]
    fn degenerate_odds_always_pick_that_tier() {
        let mut rng = RngState::from_seed(17);
        for tier in Tier::ALL {
            let def = PackDef::new(PackKind::Bronze, 200, 5, single_tier_odds(tier));
            for _ in 0..64 {
                assert_eq!(pick_tier(&def.odds, &mut rng), tier);
            }
        }
    }

    #[test]
    fn tier_draw_respects_declared_order() {
        // With the whole weight on the first bucket, later buckets must
        // never win the tie-break.
        let odds = PackDef::new(PackKind::Gold, 1200, 5, [100.0, 0.0, 0.0, 0.0]).odds;
        let mut rng = RngState::from_seed(23);
        for _ in 0..128 {
            assert_eq!(pick_tier(&odds, &mut rng), Tier::Common);
        }
    }

    #[test]
    fn resolver_marks_new_cards() {
        let roster = Roster {
            cards: vec![card(1, 70)],
        };
        let def = PackDef::new(PackKind::Bronze, 200, 5, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(1);
        let result =
            resolve_pack(&def, &roster, &HashMap::new(), &mut rng).expect("resolve");
        assert_eq!(result.items.len(), 5);
        for item in &result.items {
            assert!(!item.is_dupe);
            assert!(!item.upgraded);
            assert_eq!(item.converted_coins, 0);
        }
        assert_eq!(result.coins_delta, -200);
        assert!(!result.any_premium);
    }

    #[test]
    fn resolver_upgrades_below_star_cap() {
        let roster = Roster {
            cards: vec![card(1, 70)],
        };
        let mut inventory = HashMap::new();
        let mut owned = OwnedCard::first_pull(card(1, 70));
        owned.stars = 3;
        owned.count = 3;
        inventory.insert(1, owned);
        let def = PackDef::new(PackKind::Bronze, 200, 1, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(1);
        let result = resolve_pack(&def, &roster, &inventory, &mut rng).expect("resolve");
        let item = &result.items[0];
        assert!(item.is_dupe);
        assert!(item.upgraded);
        assert_eq!(item.converted_coins, 0);
        assert_eq!(result.coins_delta, -200);
    }

    #[test]
    fn resolver_converts_capped_dupes() {
        let roster = Roster {
            cards: vec![card(1, 80)],
        };
        let mut inventory = HashMap::new();
        let mut owned = OwnedCard::first_pull(card(1, 80));
        owned.stars = MAX_STARS;
        owned.count = 6;
        inventory.insert(1, owned);
        let def = PackDef::new(PackKind::Bronze, 200, 1, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(1);
        let result = resolve_pack(&def, &roster, &inventory, &mut rng).expect("resolve");
        let item = &result.items[0];
        assert!(item.is_dupe);
        assert!(!item.upgraded);
        assert_eq!(item.converted_coins, 400);
        assert_eq!(result.coins_delta, -200 + 400);
    }

    #[test]
    fn resolver_flags_premium_pulls() {
        let roster = Roster {
            cards: vec![card(1, 90)],
        };
        let def = PackDef::new(PackKind::Gold, 1200, 1, single_tier_odds(Tier::Epic));
        let mut rng = RngState::from_seed(1);
        let result =
            resolve_pack(&def, &roster, &HashMap::new(), &mut rng).expect("resolve");
        assert!(result.any_premium);
        assert_eq!(result.items[0].card.tier, Tier::Epic);
    }

    #[test]
    fn empty_tier_widens_downward_first() {
        // No Legend card was generated; a Legend draw lands on the nearest
        // populated tier below instead.
        let roster = Roster {
            cards: vec![card(1, 90), card(2, 70)],
        };
        let def = PackDef::new(PackKind::Gold, 1200, 8, single_tier_odds(Tier::Legend));
        let mut rng = RngState::from_seed(7);
        let result =
            resolve_pack(&def, &roster, &HashMap::new(), &mut rng).expect("resolve");
        for item in &result.items {
            assert_eq!(item.card.tier, Tier::Epic);
        }
    }

    #[test]
    fn empty_tier_widens_upward_when_nothing_below() {
        let roster = Roster {
            cards: vec![card(1, 90)],
        };
        let def = PackDef::new(PackKind::Bronze, 200, 4, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(7);
        let result =
            resolve_pack(&def, &roster, &HashMap::new(), &mut rng).expect("resolve");
        for item in &result.items {
            assert_eq!(item.card.tier, Tier::Epic);
        }
    }

    #[test]
    fn empty_roster_is_an_error() {
        let roster = Roster { cards: Vec::new() };
        let def = PackDef::new(PackKind::Bronze, 200, 5, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(7);
        let err = resolve_pack(&def, &roster, &HashMap::new(), &mut rng)
            .expect_err("empty roster must fail");
        assert!(matches!(err, PackError::EmptyRoster));
    }

    #[test]
    fn snapshot_judges_dupes_not_the_draw_itself() {
        // Two pulls of an unseen card in one pack both read the pre-pack
        // snapshot, so neither is a dupe; the store settles them on commit.
        let roster = Roster {
            cards: vec![card(1, 70)],
        };
        let def = PackDef::new(PackKind::Bronze, 200, 2, single_tier_odds(Tier::Common));
        let mut rng = RngState::from_seed(7);
        let result =
            resolve_pack(&def, &roster, &HashMap::new(), &mut rng).expect("resolve");
        assert_eq!(result.items.len(), 2);
        assert!(result.items.iter().all(|item| !item.is_dupe));
    }
}
