#![allow(dead_code)]

mod components;
mod constants;
mod events;
mod game;
mod game_loop;
mod logging;
mod nav;
mod queries;
mod saves;
mod scene;
mod settings;
mod systems;
mod tuning;

use std::path::{Path, PathBuf};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use constants::*;
use events::EventQueue;
use game_loop::TickResult;
use tuning::Tuning;

/// Headless manor-escape simulation: a scripted intruder works the
/// exit's locks while a patrolling groundskeeper hunts them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the session's randomness
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Tick budget before the session is called off
    #[arg(long, default_value_t = DEFAULT_TICK_COUNT)]
    ticks: u64,

    /// JSON file overriding the built-in agent tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Where autosaves land and resumes come from
    #[arg(long, default_value = DEFAULT_SAVE_PATH)]
    save: PathBuf,

    /// Resume from the save file before simulating
    #[arg(long)]
    load: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let player_settings = settings::load_or_default(Path::new(DEFAULT_SETTINGS_PATH));
    log::debug!(
        "mixer set to music {:.1} dB, sounds {:.1} dB",
        settings::to_decibels(player_settings.music_volume),
        settings::to_decibels(player_settings.sounds_volume)
    );

    let tuning = match &args.tuning {
        Some(path) => match tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("ignoring tuning file: {}", err);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut session = game::init_world(&tuning);
    let mut elapsed = 0.0_f32;
    if args.load {
        match saves::load_from(&args.save) {
            Ok(save) => {
                saves::apply(&mut session.world, &save);
                elapsed = save.elapsed_seconds;
                log::info!("resumed from {}", args.save.display());
            }
            Err(err) => log::error!("starting fresh, resume failed: {}", err),
        }
    }

    let mut events = EventQueue::new();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut autosave_timer = 0.0_f32;
    let mut outcome = TickResult::Continue;

    for tick_index in 0..args.ticks {
        outcome = game_loop::tick(
            &mut session.world,
            &session.scene,
            &session.graph,
            TICK_SECONDS,
            &mut events,
            &mut rng,
        );
        elapsed += TICK_SECONDS;
        autosave_timer += TICK_SECONDS;

        if autosave_timer >= AUTOSAVE_INTERVAL_SECONDS {
            autosave_timer = 0.0;
            let save = saves::capture(&session.world, elapsed);
            match saves::save_to(&args.save, &save) {
                Ok(()) => log::debug!("autosaved to {}", args.save.display()),
                Err(err) => log::error!("autosave failed: {}", err),
            }
        }

        // Once per simulated ten seconds, report where every agent stands
        if tick_index % 600 == 0 {
            for status in queries::enemy_statuses(&session.world) {
                log::info!(
                    "{} is {} at {:?} after {} encounters",
                    status.name,
                    status.state,
                    status.pos,
                    status.encounters
                );
            }
        }

        if outcome != TickResult::Continue {
            break;
        }
    }

    match outcome {
        TickResult::Caught => log::info!("the intruder was caught after {:.1}s", elapsed),
        TickResult::Escaped => log::info!("the intruder slipped out after {:.1}s", elapsed),
        TickResult::Continue => {
            log::info!("tick budget spent after {:.1}s with no resolution", elapsed)
        }
    }
}
