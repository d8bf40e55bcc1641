use crate::{PlayerCard, RngState, Role, Stats, Tier};

pub const RATING_MIN: u8 = 60;
pub const RATING_MAX: u8 = 98;
const STAT_MIN: u8 = 50;
const STAT_MAX: u8 = 99;

const NAMES: &[&str] = &[
    "R. Sharma",
    "V. Kohli",
    "S. Gill",
    "K. Rahul",
    "S. Iyer",
    "H. Pandya",
    "R. Jadeja",
    "S. Samson",
    "J. Bumrah",
    "M. Shami",
    "Y. Chahal",
    "B. Kumar",
    "S. Yadav",
    "I. Kishan",
    "P. Shaw",
    "D. Padikkal",
    "S. Raina",
    "A. Rahane",
    "K. Williamson",
    "D. Warner",
    "B. Stokes",
    "G. Maxwell",
    "M. Marsh",
    "T. Head",
    "T. Boult",
    "R. Khan",
    "M. Starc",
    "S. Afridi",
    "N. Pooran",
    "Q. de Kock",
    "J. Root",
    "K. Mayers",
    "F. du Plessis",
    "A. Finch",
    "R. Pant",
    "S. Dhawan",
    "K. Pollard",
    "A. Russell",
    "D. Miller",
    "L. Rahul",
    "U. Malik",
    "P. Krishna",
    "R. Ashwin",
    "W. Hasaranga",
    "S. Narine",
    "M. Nabi",
    "H. Rauf",
    "M. Siraj",
    "S. Thakur",
    "A. Khan",
    "R. Gaikwad",
    "S. Jaiswal",
    "T. Varma",
    "S. Sudharsan",
    "A. Patel",
    "K. Yadav",
    "R. Bishnoi",
    "A. Khan",
    "K. Ahmed",
    "M. Agarwal",
];

const TEAMS: &[&str] = &[
    "Mumbai Mavericks",
    "Chennai Kings",
    "Delhi Dynamos",
    "Bangalore Blaze",
    "Kolkata Knights",
    "Punjab Panthers",
    "Hyderabad Hawks",
    "Rajasthan Royals",
];

/// The card catalog for one process lifetime. Immutable once generated.
#[derive(Debug, Clone)]
pub struct Roster {
    pub cards: Vec<PlayerCard>,
}

impl Roster {
    /// Builds the full catalog from the static name table. Ids start at 1
    /// and follow table order, so the same seed yields the same catalog.
    pub fn generate(rng: &mut RngState) -> Self {
        let mut cards = Vec::with_capacity(NAMES.len());
        for (index, name) in NAMES.iter().enumerate() {
            let role = Role::ALL[(rng.next_u64() % Role::ALL.len() as u64) as usize];
            let team = TEAMS[(rng.next_u64() % TEAMS.len() as u64) as usize];
            let rating = rng.range_inclusive(RATING_MIN, RATING_MAX);
            let stats = Stats {
                batting: rng.range_inclusive(STAT_MIN, STAT_MAX),
                bowling: rng.range_inclusive(STAT_MIN, STAT_MAX),
                fielding: rng.range_inclusive(STAT_MIN, STAT_MAX),
                pace: rng.range_inclusive(STAT_MIN, STAT_MAX),
            };
            cards.push(PlayerCard {
                id: index as u32 + 1,
                name: (*name).to_string(),
                team: team.to_string(),
                role,
                rating,
                tier: Tier::from_rating(rating),
                stats,
            });
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, id: u32) -> Option<&PlayerCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Uniform pick among the cards of one catalog tier.
    pub fn pick_from_tier<'a>(&'a self, tier: Tier, rng: &mut RngState) -> Option<&'a PlayerCard> {
        let indices: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.tier == tier)
            .map(|(idx, _)| idx)
            .collect();
        if indices.is_empty() {
            return None;
        }
        let idx = (rng.next_u64() % indices.len() as u64) as usize;
        self.cards.get(indices[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_full_catalog() {
        let mut rng = RngState::from_seed(11);
        let roster = Roster::generate(&mut rng);
        assert_eq!(roster.len(), NAMES.len());
        for (index, card) in roster.cards.iter().enumerate() {
            assert_eq!(card.id, index as u32 + 1);
            assert!((RATING_MIN..=RATING_MAX).contains(&card.rating));
            assert_eq!(card.tier, Tier::from_rating(card.rating));
            for stat in [
                card.stats.batting,
                card.stats.bowling,
                card.stats.fielding,
                card.stats.pace,
            ] {
                assert!((STAT_MIN..=STAT_MAX).contains(&stat));
            }
            assert!(TEAMS.contains(&card.team.as_str()));
        }
    }

    #[test]
    fn same_seed_same_catalog() {
        let mut a = RngState::from_seed(99);
        let mut b = RngState::from_seed(99);
        assert_eq!(Roster::generate(&mut a).cards, Roster::generate(&mut b).cards);
    }

    #[test]
    fn tier_pick_honors_catalog_tier() {
        let mut rng = RngState::from_seed(3);
        let roster = Roster::generate(&mut rng);
        for tier in Tier::ALL {
            if let Some(card) = roster.pick_from_tier(tier, &mut rng) {
                assert_eq!(card.tier, tier);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        let mut rng = RngState::from_seed(5);
        let roster = Roster::generate(&mut rng);
        assert!(roster.card(1).is_some());
        assert!(roster.card(roster.len() as u32).is_some());
        assert!(roster.card(roster.len() as u32 + 1).is_none());
    }
}
