use serde::{Deserialize, Serialize};

/// Star cap per card; duplicates past it convert to coins instead.
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Common,
    Rare,
    Epic,
    Legend,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Common, Tier::Rare, Tier::Epic, Tier::Legend];

    /// Catalog tier from the fixed rating thresholds.
    pub fn from_rating(rating: u8) -> Self {
        if rating >= 94 {
            Tier::Legend
        } else if rating >= 86 {
            Tier::Epic
        } else if rating >= 75 {
            Tier::Rare
        } else {
            Tier::Common
        }
    }

    /// Epic and Legend pulls trigger the celebration flag on pack results.
    pub fn is_premium(self) -> bool {
        matches!(self, Tier::Epic | Tier::Legend)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Common => "Common",
            Tier::Rare => "Rare",
            Tier::Epic => "Epic",
            Tier::Legend => "Legend",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "common" => Some(Tier::Common),
            "rare" => Some(Tier::Rare),
            "epic" => Some(Tier::Epic),
            "legend" => Some(Tier::Legend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "BAT")]
    Bat,
    #[serde(rename = "BOWL")]
    Bowl,
    #[serde(rename = "AR")]
    AllRounder,
    #[serde(rename = "WK")]
    Keeper,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Bat, Role::Bowl, Role::AllRounder, Role::Keeper];

    pub fn code(self) -> &'static str {
        match self {
            Role::Bat => "BAT",
            Role::Bowl => "BOWL",
            Role::AllRounder => "AR",
            Role::Keeper => "WK",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "bat" => Some(Role::Bat),
            "bowl" => Some(Role::Bowl),
            "ar" => Some(Role::AllRounder),
            "wk" => Some(Role::Keeper),
            _ => None,
        }
    }
}

/// Secondary attributes; display-only, no effect on pack economics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub batting: u8,
    pub bowling: u8,
    pub fielding: u8,
    pub pace: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerCard {
    pub id: u32,
    pub name: String,
    pub team: String,
    pub role: Role,
    pub rating: u8,
    pub tier: Tier,
    pub stats: Stats,
}

/// A catalog card plus the player's progress on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedCard {
    pub card: PlayerCard,
    pub stars: u8,
    pub count: u32,
}

impl OwnedCard {
    pub fn first_pull(card: PlayerCard) -> Self {
        Self {
            card,
            stars: 1,
            count: 1,
        }
    }

    /// Records another pull of the same card, upgrading while below the cap.
    pub fn record_dupe(&mut self) {
        if self.stars < MAX_STARS {
            self.stars += 1;
        }
        self.count += 1;
    }
}
