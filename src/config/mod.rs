use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Building layout shared with the central state server.
///
/// Only the parts the radio node reads are modelled here: the ordered floor
/// list and the static room registry. Any other keys in the file are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingConfig {
    #[serde(default)]
    pub floors: Vec<Floor>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// A configured floor
#[derive(Debug, Clone, Deserialize)]
pub struct Floor {
    pub name: String,
}

/// A statically registered room
#[derive(Debug, Clone, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub name: Option<String>,
    pub static_props: StaticProps,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticProps {
    pub loc: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    /// Name of the floor this room belongs to
    pub floor: String,
}

impl BuildingConfig {
    /// First configured floor; the hardware path addresses every update here.
    pub fn first_floor(&self) -> Option<&Floor> {
        self.floors.first()
    }

    /// Rooms registered to the named floor, in registry order
    pub fn rooms_on_floor<'a>(&'a self, floor_name: &'a str) -> impl Iterator<Item = &'a Room> {
        self.rooms
            .iter()
            .filter(move |room| room.static_props.loc.floor == floor_name)
    }

    pub fn room_count_on_floor(&self, floor_name: &str) -> usize {
        self.rooms_on_floor(floor_name).count()
    }
}

/// Load building configuration from disk.
///
/// Files ending in `.json` are read as JSON (the central server's own
/// format); everything else is parsed as TOML.
pub fn load_building_config(path: impl AsRef<Path>) -> Result<BuildingConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read building config {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON building config {}", path.display()))?
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("Invalid TOML building config {}", path.display()))?
    };

    Ok(config)
}
