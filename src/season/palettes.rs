//! Seasonal palette table
//!
//! A palette table maps each of the nine seasons to an ordered, non-empty list
//! of reference swatches. Tables are validated once when loaded and never
//! change afterwards.
//!
//! # File format
//!
//! ```json
//! {
//!   "Soft Summer": ["#8aa3b5", "#9fb3c8"],
//!   "Cool Summer": ["#7aa0c4"],
//!   ...
//! }
//! ```
//!
//! Every season must appear exactly once. Swatches are `#rrggbb` or `#rgb`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::color::{ColorConverter, Lab, Rgb};
use crate::constants::ranking::SEASON_COUNT;
use crate::{Result, SeasonError};

/// Seasonal color archetype
///
/// Declaration order is the priority order used to break ranking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "Soft Summer")]
    SoftSummer,
    #[serde(rename = "Cool Summer")]
    CoolSummer,
    #[serde(rename = "Light Summer")]
    LightSummer,
    #[serde(rename = "Bright Winter")]
    BrightWinter,
    #[serde(rename = "Deep Winter")]
    DeepWinter,
    #[serde(rename = "Soft Autumn")]
    SoftAutumn,
    #[serde(rename = "Warm Autumn")]
    WarmAutumn,
    #[serde(rename = "Light Spring")]
    LightSpring,
    #[serde(rename = "Bright Spring")]
    BrightSpring,
}

impl Season {
    /// All seasons in priority order
    pub const ALL: [Season; SEASON_COUNT] = [
        Season::SoftSummer,
        Season::CoolSummer,
        Season::LightSummer,
        Season::BrightWinter,
        Season::DeepWinter,
        Season::SoftAutumn,
        Season::WarmAutumn,
        Season::LightSpring,
        Season::BrightSpring,
    ];

    /// Human-readable name, as used in palette files and reports
    pub fn name(self) -> &'static str {
        match self {
            Season::SoftSummer => "Soft Summer",
            Season::CoolSummer => "Cool Summer",
            Season::LightSummer => "Light Summer",
            Season::BrightWinter => "Bright Winter",
            Season::DeepWinter => "Deep Winter",
            Season::SoftAutumn => "Soft Autumn",
            Season::WarmAutumn => "Warm Autumn",
            Season::LightSpring => "Light Spring",
            Season::BrightSpring => "Bright Spring",
        }
    }

    /// Position in the tie-breaking order (0 wins)
    pub fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = SeasonError;

    /// Case-insensitive match on the human-readable name
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Season::ALL
            .into_iter()
            .find(|season| season.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SeasonError::configuration(format!("unknown season '{}'", wanted)))
    }
}

/// One season's reference colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    season: Season,
    swatches: Vec<Rgb>,
    colors: Vec<Lab>,
}

impl Palette {
    fn new(season: Season, swatches: Vec<Rgb>, converter: &ColorConverter) -> Self {
        let colors = swatches.iter().map(|&rgb| converter.rgb_to_lab(rgb)).collect();
        Self {
            season,
            swatches,
            colors,
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn name(&self) -> &'static str {
        self.season.name()
    }

    /// Source swatches in file order
    pub fn swatches(&self) -> &[Rgb] {
        &self.swatches
    }

    /// Lab conversions of the swatches, same order
    pub fn colors(&self) -> &[Lab] {
        &self.colors
    }
}

/// Validated table of all nine palettes, stored in priority order
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteTable {
    palettes: Vec<Palette>,
}

/// Default swatches, eight per season
const BUILTIN_SWATCHES: [(Season, [u32; 8]); SEASON_COUNT] = [
    (Season::SoftSummer, [0x8aa3b5, 0x9fb3c8, 0xa7b7c7, 0xb6c7cf, 0x8f9aa6, 0xb9a5b6, 0xadb7a3, 0xc7c1b3]),
    (Season::CoolSummer, [0x7aa0c4, 0x6f93b0, 0xa3b9d2, 0x89a6be, 0x9b93c7, 0x8fb1aa, 0xb3b7c7, 0xa1a7b3]),
    (Season::LightSummer, [0xb7d7ea, 0xcfe5f2, 0xdbeaf4, 0xc3d8e8, 0xd8d2ee, 0xcfe9e3, 0xece6f2, 0xe6eef5]),
    (Season::BrightWinter, [0x00a3e0, 0x0057b8, 0x00c389, 0xff1f5b, 0x7c3aed, 0x0006cc, 0x00b3e6, 0xff3385]),
    (Season::DeepWinter, [0x1b365d, 0x2c2a4a, 0x0b5563, 0x3f2a56, 0x123b5d, 0x1b2a49, 0x2e3a59, 0x154360]),
    (Season::SoftAutumn, [0x9a8f7a, 0xa5a58d, 0xb69b7d, 0x8f8b66, 0xb69c8c, 0x9d7e6f, 0xa18f7f, 0x8a7f6b]),
    (Season::WarmAutumn, [0xb5651d, 0xc68642, 0xa47149, 0x8b5e3c, 0xb08968, 0xc08457, 0xa77855, 0x7f5f3d]),
    (Season::LightSpring, [0xf3d8d8, 0xf7e1c6, 0xe3f2f1, 0xe6f7d9, 0xf1e6ff, 0xfbe8e7, 0xf0f7ff, 0xfff0e6]),
    (Season::BrightSpring, [0xff6f61, 0x00b8a9, 0xffd166, 0xef476f, 0x06d6a0, 0x118ab2, 0xffc43d, 0x8338ec]),
];

/// Palette file entries in file order, repeated keys kept
struct FileEntries(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for FileEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = FileEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping season names to lists of hex colors")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<FileEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(SEASON_COUNT));
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(FileEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

const fn unpack(value: u32) -> Rgb {
    Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

impl PaletteTable {
    /// The built-in table, converted once per process
    pub fn builtin() -> &'static PaletteTable {
        static BUILTIN: OnceLock<PaletteTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let converter = ColorConverter::new();
            let palettes = BUILTIN_SWATCHES
                .iter()
                .map(|(season, swatches)| {
                    Palette::new(*season, swatches.iter().copied().map(unpack).collect(), &converter)
                })
                .collect();
            PaletteTable { palettes }
        })
    }

    /// Build a table from season names and hex swatches
    ///
    /// # Errors
    ///
    /// `Configuration` if a name is unknown or repeated, a season is missing,
    /// a palette is empty, or a swatch is not a valid hex color
    pub fn from_swatches<I, N, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Vec<S>)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let converter = ColorConverter::new();
        let mut slots: [Option<Palette>; SEASON_COUNT] = Default::default();

        for (name, hexes) in entries {
            let season: Season = name.as_ref().parse()?;
            if slots[season.priority()].is_some() {
                return Err(SeasonError::configuration(format!(
                    "season '{}' appears more than once",
                    season
                )));
            }
            if hexes.is_empty() {
                return Err(SeasonError::configuration(format!(
                    "palette '{}' has no colors",
                    season
                )));
            }

            let swatches = hexes
                .iter()
                .map(|hex| {
                    Rgb::from_hex(hex.as_ref()).map_err(|e| {
                        SeasonError::configuration(format!("palette '{}': {}", season, e))
                    })
                })
                .collect::<Result<Vec<Rgb>>>()?;

            slots[season.priority()] = Some(Palette::new(season, swatches, &converter));
        }

        let missing: Vec<&str> = Season::ALL
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(season, _)| season.name())
            .collect();
        if !missing.is_empty() {
            return Err(SeasonError::configuration(format!(
                "palette table is missing: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            palettes: slots.into_iter().flatten().collect(),
        })
    }

    /// Parse and validate a JSON palette table
    ///
    /// # Errors
    ///
    /// `Configuration` if the JSON does not have the palette file shape, or
    /// for any table rejected by [`PaletteTable::from_swatches`] (including a
    /// season key written twice)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: FileEntries = serde_json::from_str(json)
            .map_err(|e| SeasonError::configuration(format!("malformed palette table: {}", e)))?;
        Self::from_swatches(raw.0)
    }

    /// Load and validate a JSON palette table from disk
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SeasonError::io(format!("reading {}", path.display()), e))?;
        let table = Self::from_json_str(&content)?;
        info!(path = %path.display(), "loaded palette table");
        Ok(table)
    }

    /// Use the file when it exists, otherwise the built-in table
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::from_json_file(path),
            Some(path) => {
                debug!(path = %path.display(), "palette file not found, using built-in table");
                Ok(Self::builtin().clone())
            }
            None => Ok(Self::builtin().clone()),
        }
    }

    /// Serialize back to the JSON file format
    pub fn to_json_pretty(&self) -> Result<String> {
        let raw: BTreeMap<&str, Vec<String>> = self
            .palettes
            .iter()
            .map(|p| (p.name(), p.swatches.iter().map(|rgb| rgb.to_hex()).collect()))
            .collect();
        serde_json::to_string_pretty(&raw).map_err(|e| SeasonError::json("serializing palette table", e))
    }

    /// Palettes in priority order
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn get(&self, season: Season) -> &Palette {
        &self.palettes[season.priority()]
    }
}
