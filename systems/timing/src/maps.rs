//! Built-in timing tables for the supported maps.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::TimingTable;

/// Maps with a built-in timing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// Prison, 30 rounds.
    Prison,
    /// The Lab, 40 rounds.
    TheLab,
    /// Dead End, 30 rounds.
    DeadEnd,
    /// Bad Blood, 30 rounds.
    BadBlood,
    /// Alien Arcadium, 105 rounds.
    AlienArcadium,
}

impl MapKind {
    /// Every supported map.
    pub const ALL: [MapKind; 5] = [
        MapKind::Prison,
        MapKind::TheLab,
        MapKind::DeadEnd,
        MapKind::BadBlood,
        MapKind::AlienArcadium,
    ];

    /// Configuration name of the map.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MapKind::Prison => "prison",
            MapKind::TheLab => "the_lab",
            MapKind::DeadEnd => "dead_end",
            MapKind::BadBlood => "bad_blood",
            MapKind::AlienArcadium => "alien_arcadium",
        }
    }

    /// Highest round the map can reach.
    #[must_use]
    pub const fn max_round(self) -> u32 {
        self.rows().len() as u32
    }

    /// Builds the map's timing table.
    #[must_use]
    pub fn timing_table(self) -> TimingTable {
        TimingTable {
            rows: self.rows().iter().map(|row| row.to_vec()).collect(),
        }
    }

    const fn rows(self) -> &'static [&'static [u32]] {
        match self {
            MapKind::Prison => PRISON,
            MapKind::TheLab => THE_LAB,
            MapKind::DeadEnd => DEAD_END,
            MapKind::BadBlood => BAD_BLOOD,
            MapKind::AlienArcadium => ALIEN_ARCADIUM,
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a map name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown map `{name}`")]
pub struct ParseMapError {
    name: String,
}

impl FromStr for MapKind {
    type Err = ParseMapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        MapKind::ALL
            .into_iter()
            .find(|map| map.name() == normalized)
            .ok_or_else(|| ParseMapError {
                name: value.to_owned(),
            })
    }
}

#[rustfmt::skip]
const PRISON: &[&[u32]] = &[
    &[10, 20], &[10, 20, 30], &[10, 17, 24, 31], &[10, 17, 24, 31], &[10, 20, 30], &[10, 20, 30], &[10, 20, 30],
    &[10, 25, 40], &[10, 25, 35], &[10, 25, 45], &[10, 25, 40], &[10, 25, 37], &[10, 22, 34], &[10, 25, 37],
    &[10, 25, 40], &[10, 22, 37], &[10, 22, 42], &[10, 25, 45], &[10, 25, 45], &[10, 25, 40], &[10, 20, 35, 55, 75],
    &[10, 25, 40], &[10, 30, 50], &[10, 30, 50], &[10, 25, 45], &[10, 30, 50], &[10, 25, 45], &[10, 30, 50], &[10, 30, 55], &[10],
];

#[rustfmt::skip]
const THE_LAB: &[&[u32]] = &[
    &[10, 22], &[10, 22], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
];

#[rustfmt::skip]
const DEAD_END: &[&[u32]] = &[
    &[10, 20], &[10, 20], &[10, 20, 35], &[10, 20, 35], &[10, 22, 37], &[10, 22, 44], &[10, 25, 47], &[10, 25, 50],
    &[10, 22, 38], &[10, 24, 45], &[10, 25, 48], &[10, 25, 50], &[10, 25, 50], &[10, 25, 45], &[10, 25, 46], &[10, 24, 47],
    &[10, 24, 47], &[10, 24, 47], &[10, 24, 47], &[10, 24, 49], &[10, 23, 44], &[10, 23, 45], &[10, 23, 42], &[10, 23, 43],
    &[10, 23, 43], &[10, 23, 36], &[10, 24, 44], &[10, 24, 42], &[10, 24, 42], &[10, 24, 45],
];

#[rustfmt::skip]
const BAD_BLOOD: &[&[u32]] = &[
    &[10, 22], &[10, 22], &[10, 22], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34],
    &[10, 22, 34], &[10, 24, 38], &[10, 24, 38], &[10, 22, 34], &[10, 24, 38], &[10, 22, 34],
];

#[rustfmt::skip]
const ALIEN_ARCADIUM: &[&[u32]] = &[
    &[10, 13, 16, 19], &[10, 14, 18, 22], &[10, 13, 16, 19], &[10, 14, 17, 21, 25, 28], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 19, 23, 28, 32], &[10, 15, 19, 23, 27, 31], &[10, 15, 20, 25, 30, 35], &[10, 14, 19, 23, 28, 32],
    &[10, 16, 22, 27, 33, 38], &[10, 16, 21, 27, 32, 38], &[10, 16, 22, 28, 34, 40], &[10, 16, 22, 28, 34, 40],
    &[10, 16, 21, 26, 31, 36], &[10, 17, 24, 31, 38, 46], &[10, 16, 22, 27, 33, 38], &[10, 14, 19, 23, 28, 32],
    &[10, 14, 19, 23, 28, 32], &[10, 14, 18, 22, 26, 30], &[10, 15, 21, 26, 31, 36], &[10, 14, 19, 23, 28, 32],
    &[10, 14, 19, 23, 28, 34], &[10, 14, 18, 22, 26, 30], &[10, 14, 19, 23, 28, 32], &[10],
    &[10, 23, 36], &[10, 22, 34], &[10, 20, 30], &[10, 24, 38], &[10, 22, 34], &[10, 22, 34], &[10, 21, 32], &[10, 22, 34],
    &[10, 22, 34], &[10], &[10, 22, 34], &[10, 20, 31], &[10, 22, 34], &[10, 22, 34], &[10, 22, 34, 37, 45], &[10, 21, 32],
    &[10, 22, 34], &[10, 13, 22, 25, 34, 37], &[10, 22, 34], &[10, 22, 34, 35], &[10, 21, 32, 35], &[10, 20, 30],
    &[10, 20, 30, 33], &[10, 21, 32], &[10, 22, 34, 37], &[10, 20, 30, 33], &[10, 22, 34, 37], &[10, 22, 34, 37],
    &[10, 20, 32, 35, 39], &[10, 16, 22, 28, 34, 40], &[10, 14, 18], &[10, 14, 18], &[10, 22, 34, 37, 38],
    &[10, 14, 18, 22, 26, 30], &[10, 20, 30, 33], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 27, 32], &[10, 14, 18, 22, 27, 32], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30],
    &[10, 14, 18, 22, 26, 30], &[10, 14, 18, 22, 26, 30], &[5], &[5], &[5], &[5], &[5],
];
