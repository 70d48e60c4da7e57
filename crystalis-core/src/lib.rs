use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use log::{info, warn};

pub mod catalog;
pub mod constraint;
pub mod graphics;
pub mod location;
pub mod monsters;
pub mod music;
pub mod placement;
pub mod random;
pub mod reachability;
pub mod rom;
pub mod shuffle;
pub mod tables;
pub mod tiles;

#[cfg(test)]
mod fixtures;

use graphics::Graphics;
use location::{decode_all, Location};
use music::MusicTable;
use random::SeededRandom;
use rom::Rom;
use shuffle::{shuffle_monsters, ShuffleOptions, ShuffleReport};
use tiles::TileData;

/// Mixed into the user seed so the monster pass draws its own stream.
pub const MONSTER_SEED_SALT: u64 = 0x4d0e_57e5_u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomiserSettings {
    pub seed: u64,
    pub shuffle_monsters: bool,
    pub shuffle_tower_monsters: bool,
    pub shuffle_sprite_palettes: bool,
    /// Let monsters move to new tiles instead of keeping their old spots.
    pub randomize_maps: bool,
    pub debug: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for RandomiserSettings {
    fn default() -> RandomiserSettings {
        RandomiserSettings {
            seed: 0,
            shuffle_monsters: true,
            shuffle_tower_monsters: false,
            shuffle_sprite_palettes: false,
            randomize_maps: false,
            debug: false,
            input_path: PathBuf::new(),
            output_path: PathBuf::new(),
        }
    }
}

impl RandomiserSettings {
    /// Reads settings saved as JSON. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<RandomiserSettings> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn shuffle_options(&self) -> ShuffleOptions {
        ShuffleOptions {
            shuffle_tower_monsters: self.shuffle_tower_monsters,
            shuffle_sprite_palettes: self.shuffle_sprite_palettes,
            randomize_maps: self.randomize_maps,
        }
    }
}

#[derive(Debug, Error)]
pub enum RandomiserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("ROM error: {0}")]
    Rom(String),
    #[error("location ${location:02x}: {reason}")]
    Layout { location: u8, reason: String },
    #[error("location ${location:02x}: {block} no longer fits its original space")]
    Overflow { location: u8, block: &'static str },
    #[error("graphics constraint error: {0}")]
    Graphics(String),
}

pub type Result<T> = std::result::Result<T, RandomiserError>;

/// Result of randomising one ROM image.
pub struct Randomised {
    pub rom: Rom,
    pub report: Option<ShuffleReport>,
    /// Whether decoding and re-encoding the input reproduced it exactly.
    pub roundtrip_exact: bool,
}

fn encode_all(locations: &[Location], rom: &mut Rom) -> Result<()> {
    for location in locations {
        location.encode(rom)?;
    }
    Ok(())
}

/// Runs every enabled pass over an in-memory ROM.
pub fn randomise_rom(input: &Rom, settings: &RandomiserSettings) -> Result<Randomised> {
    let mut locations = decode_all(input)?;
    let used = locations.iter().filter(|l| l.used).count();
    info!("Decoded {used} locations");

    let mut rebuilt = input.clone();
    encode_all(&locations, &mut rebuilt)?;
    let roundtrip_exact = rebuilt == *input;
    if !roundtrip_exact {
        warn!("Re-encoding the unmodified locations changed the ROM");
    }

    let tiles = TileData::load(input)?;
    let mut music = MusicTable::read(input, &locations)?;
    let mut rom = input.clone();

    let report = if settings.shuffle_monsters {
        let mut graphics = Graphics::build(&locations)?;
        let mut random = SeededRandom::new(settings.seed ^ MONSTER_SEED_SALT);
        let report = shuffle_monsters(
            &mut locations,
            &tiles,
            &mut graphics,
            settings.shuffle_options(),
            &mut random,
        )?;
        Some(report)
    } else {
        None
    };

    encode_all(&locations, &mut rom)?;
    music.sync(&locations);
    music.write(&mut rom)?;
    Ok(Randomised { rom, report, roundtrip_exact })
}

fn spoiler_log(settings: &RandomiserSettings, randomised: &Randomised) -> String {
    let mut log = format!("Crystalis randomiser seed: {}\n", settings.seed);
    log.push_str(&format!("roundtrip_exact: {}\n", randomised.roundtrip_exact));
    if let Some(report) = &randomised.report {
        log.push_str(&format!("unfilled_slots: {}\n\n", report.unfilled()));
        for line in report.lines() {
            log.push_str(&line);
            log.push('\n');
        }
    }
    log
}

pub fn run(settings: RandomiserSettings) -> Result<()> {
    if !settings.input_path.is_file() {
        return Err(RandomiserError::Config(format!(
            "Input ROM does not exist: {}",
            settings.input_path.display()
        )));
    }

    if !settings.output_path.exists() {
        fs::create_dir_all(&settings.output_path)?;
    }

    // One folder per seed so repeated runs sit side by side.
    let out_root = settings
        .output_path
        .join(format!("crystalis_{}", settings.seed));
    if !out_root.exists() {
        fs::create_dir_all(&out_root)?;
    }

    let raw = fs::read(&settings.input_path)?;
    let input = Rom::parse(&raw)?;
    let randomised = randomise_rom(&input, &settings)?;

    let rom_name = settings
        .input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "crystalis.nes".to_string());
    let rom_dest = out_root.join(rom_name);
    fs::write(&rom_dest, randomised.rom.to_bytes())?;
    info!("Wrote {}", rom_dest.display());

    if settings.debug {
        fs::write(out_root.join("spoiler_log.txt"), spoiler_log(&settings, &randomised))?;
        if let Some(report) = &randomised.report {
            let json = serde_json::to_string_pretty(report)?;
            fs::write(out_root.join("spoiler_monsters.json"), json)?;
        }
    }

    Ok(())
}

/// Decodes one location for inspection.
pub fn describe_location(path: &Path, id: u8) -> Result<String> {
    let raw = fs::read(path)?;
    let rom = Rom::parse(&raw)?;
    let location = Location::decode(&rom, id)?;
    if !location.used {
        return Err(RandomiserError::Config(format!("location ${id:02x} is not used")));
    }
    Ok(location.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MapSpec, RomFixture};

    fn rom() -> Rom {
        let spec = MapSpec {
            npc_header: [0x00, 0x10, 0x20, 0x60, 0x61],
            spawns: Some(vec![[0x04, 0x02, 0x00, 0x00], [0x0a, 0x0c, 0x00, 0x04]]),
            ..MapSpec::default()
        };
        RomFixture::new()
            .location(0x18, spec.clone())
            .location(0x20, spec)
            .rom()
    }

    fn settings(seed: u64) -> RandomiserSettings {
        RandomiserSettings { seed, ..RandomiserSettings::default() }
    }

    #[test]
    fn unmodified_rom_round_trips() {
        let input = rom();
        let out = randomise_rom(&input, &RandomiserSettings { shuffle_monsters: false, ..settings(1) })
            .unwrap();
        assert!(out.roundtrip_exact);
        assert!(out.report.is_none());
        assert_eq!(out.rom, input);
    }

    #[test]
    fn output_is_deterministic_per_seed() {
        let input = rom();
        let a = randomise_rom(&input, &settings(17)).unwrap();
        let b = randomise_rom(&input, &settings(17)).unwrap();
        assert_eq!(a.rom.to_bytes(), b.rom.to_bytes());
        let report = a.report.unwrap();
        assert_eq!(report.pre_shuffle_monsters.len(), 4);
    }

    #[test]
    fn settings_load_from_json_with_defaults() {
        let dir = std::env::temp_dir().join("crystalis-settings-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, r#"{ "seed": 5, "randomize_maps": true }"#).unwrap();
        let loaded = RandomiserSettings::from_json_file(&path).unwrap();
        assert_eq!(loaded.seed, 5);
        assert!(loaded.randomize_maps);
        assert!(loaded.shuffle_monsters);
        assert!(!loaded.debug);

        fs::write(&path, "{ seed: }").unwrap();
        assert!(matches!(
            RandomiserSettings::from_json_file(&path),
            Err(RandomiserError::Json(_))
        ));
    }

    #[test]
    fn run_writes_rom_and_spoilers() {
        let dir = std::env::temp_dir().join("crystalis-run-test");
        fs::create_dir_all(&dir).unwrap();
        let input_path = dir.join("crystalis.nes");
        fs::write(&input_path, rom().to_bytes()).unwrap();
        let output_path = dir.join("out");
        run(RandomiserSettings {
            seed: 3,
            debug: true,
            input_path,
            output_path: output_path.clone(),
            ..RandomiserSettings::default()
        })
        .unwrap();

        let root = output_path.join("crystalis_3");
        let written = Rom::parse(&fs::read(root.join("crystalis.nes")).unwrap()).unwrap();
        assert_eq!(written.to_bytes().len(), rom().to_bytes().len());
        let log = fs::read_to_string(root.join("spoiler_log.txt")).unwrap();
        assert!(log.starts_with("Crystalis randomiser seed: 3"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("spoiler_monsters.json")).unwrap())
                .unwrap();
        assert!(json["locations"]["$18"].is_object());
    }

    #[test]
    fn missing_input_is_a_config_error() {
        let err = run(RandomiserSettings {
            input_path: PathBuf::from("/nonexistent/crystalis.nes"),
            ..RandomiserSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, RandomiserError::Config(_)));
    }
}
