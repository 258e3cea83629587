//! Static game and prize catalogs.
//!
//! Goal tags are metadata copied into every [`crate::profile::GameResult`];
//! they are never computed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// The four mini-games hosted by the arcade shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Memory,
    Digging,
    Boots,
    Airplanes,
}

impl GameId {
    pub const ALL: [GameId; 4] = [GameId::Memory, GameId::Digging, GameId::Boots, GameId::Airplanes];

    pub fn as_str(self) -> &'static str {
        match self {
            GameId::Memory => "memory",
            GameId::Digging => "digging",
            GameId::Boots => "boots",
            GameId::Airplanes => "airplanes",
        }
    }

    pub fn entry(self) -> &'static GameEntry {
        match self {
            GameId::Memory => &MEMORY,
            GameId::Digging => &DIGGING,
            GameId::Boots => &BOOTS,
            GameId::Airplanes => &AIRPLANES,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| SessionError::UnknownGame(s.to_string()))
    }
}

/// Pedagogy tags a game is meant to exercise.
pub struct GoalTags {
    pub montessori: &'static [&'static str],
    pub waldorf: &'static [&'static str],
    pub intelligences: &'static [&'static str],
}

/// Catalog entry for one mini-game (immutable).
pub struct GameEntry {
    pub id: GameId,
    pub title: &'static str,
    pub emoji: &'static str,
    pub tutorial: &'static str,
    pub goals: GoalTags,
}

/// Owned copy of a game's goal tags as stored in a result record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default)]
    pub montessori: Vec<String>,
    #[serde(default)]
    pub waldorf: Vec<String>,
    #[serde(default)]
    pub intelligences: Vec<String>,
}

impl Goals {
    /// Every tag in list order: intelligences, montessori, waldorf.
    /// A tag listed in two categories is yielded twice.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.intelligences
            .iter()
            .chain(self.montessori.iter())
            .chain(self.waldorf.iter())
            .map(String::as_str)
    }
}

impl From<&GoalTags> for Goals {
    fn from(tags: &GoalTags) -> Self {
        let own = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            montessori: own(tags.montessori),
            waldorf: own(tags.waldorf),
            intelligences: own(tags.intelligences),
        }
    }
}

pub static MEMORY: GameEntry = GameEntry {
    id: GameId::Memory,
    title: "Memory Match",
    emoji: "🃏",
    tutorial: "Tap two cards. If the pictures match, they stay open!",
    goals: GoalTags {
        montessori: &["Sensorial"],
        waldorf: &["Rhythm"],
        intelligences: &["Visual-Spatial", "Logical-Mathematical"],
    },
};

pub static DIGGING: GameEntry = GameEntry {
    id: GameId::Digging,
    title: "Treasure Dig",
    emoji: "⛏️",
    tutorial: "Tap a patch of sand to dig. Keep going until you find the treasure!",
    goals: GoalTags {
        montessori: &["Practical Life"],
        waldorf: &["Nature"],
        intelligences: &["Bodily-Kinesthetic", "Naturalistic"],
    },
};

pub static BOOTS: GameEntry = GameEntry {
    id: GameId::Boots,
    title: "Rain Boots",
    emoji: "🥾",
    tutorial: "Listen for the colour and tap the boots that match.",
    goals: GoalTags {
        montessori: &["Sensorial", "Language"],
        waldorf: &["Imagination"],
        intelligences: &["Visual-Spatial", "Linguistic"],
    },
};

pub static AIRPLANES: GameEntry = GameEntry {
    id: GameId::Airplanes,
    title: "Paper Airplanes",
    emoji: "✈️",
    tutorial: "Catch the airplanes before they land. Tap them fast!",
    goals: GoalTags {
        montessori: &["Practical Life"],
        waldorf: &["Movement"],
        intelligences: &["Bodily-Kinesthetic", "Visual-Spatial"],
    },
};

/// A prize in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prize {
    pub id: &'static str,
    pub label: &'static str,
    pub cost: u64,
}

pub const PRIZES: &[Prize] = &[
    Prize { id: "sticker", label: "⭐ Sticker", cost: 3 },
    Prize { id: "lollipop", label: "🍭 Lollipop", cost: 5 },
    Prize { id: "balloon", label: "🎈 Balloon", cost: 8 },
    Prize { id: "teddy", label: "🧸 Teddy Bear", cost: 15 },
    Prize { id: "rocket", label: "🚀 Rocket", cost: 20 },
    Prize { id: "crown", label: "👑 Crown", cost: 25 },
];

pub fn find_prize(id: &str) -> Result<&'static Prize, SessionError> {
    PRIZES
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SessionError::UnknownPrize(id.to_string()))
}
