use clap::Parser;
use std::path::PathBuf;

use crystalis_core::{describe_location, run, RandomiserSettings};

fn parse_location_id(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u8::from_str_radix(digits, 16).map_err(|e| format!("bad location id {s:?}: {e}"))
}

#[derive(Debug, Parser)]
#[command(name = "crystalis-randomiser", version, about = "Crystalis monster randomiser")]
struct Args {
    #[arg(long)]
    input: PathBuf,

    #[arg(long, required_unless_present = "dump_location")]
    output: Option<PathBuf>,

    #[arg(long, required_unless_present_any = ["dump_location", "settings"])]
    seed: Option<u64>,

    /// JSON settings file; the flags below override what it sets.
    #[arg(long, value_name = "JSON")]
    settings: Option<PathBuf>,

    #[arg(long)]
    no_shuffle_monsters: bool,

    #[arg(long)]
    shuffle_tower_monsters: bool,

    #[arg(long)]
    shuffle_sprite_palettes: bool,

    #[arg(long)]
    randomize_maps: bool,

    #[arg(long)]
    debug: bool,

    /// Print one decoded location (hex id) and exit without randomising.
    #[arg(long, value_name = "ID", value_parser = parse_location_id)]
    dump_location: Option<u8>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(id) = args.dump_location {
        match describe_location(&args.input, id) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut settings = match &args.settings {
        Some(path) => match RandomiserSettings::from_json_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        },
        None => RandomiserSettings::default(),
    };

    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    settings.input_path = args.input;
    if let Some(output) = args.output {
        settings.output_path = output;
    }
    settings.shuffle_monsters &= !args.no_shuffle_monsters;
    settings.shuffle_tower_monsters |= args.shuffle_tower_monsters;
    settings.shuffle_sprite_palettes |= args.shuffle_sprite_palettes;
    settings.randomize_maps |= args.randomize_maps;
    settings.debug |= args.debug;

    log::debug!("settings: {settings:?}");

    if let Err(err) = run(settings) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
