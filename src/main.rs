use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use log::{error, info, LevelFilter};
use simplelog::{Config, WriteLogger};
use snake_evolution::audio::{AudioSink, Silent, TerminalBell};
use snake_evolution::config::{
    BonusConfig, GridSize, SimulationConfig, WallPolicy, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH,
    DEFAULT_MOVES_PER_SECOND, PALETTE,
};
use snake_evolution::input::intent_for_key;
use snake_evolution::renderer;
use snake_evolution::score::FileStore;
use snake_evolution::session::{Control, Game};
use snake_evolution::terminal_runtime::TerminalSession;
use snake_evolution::ui::hud::{HudInfo, HudValueFlash};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
    width: u16,

    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
    height: u16,

    /// Wrap around board edges instead of dying on them.
    #[arg(long, conflicts_with = "walls")]
    wrap: bool,

    /// Die on board edges (overrides the remembered setting).
    #[arg(long)]
    walls: bool,

    /// Moves per second at level 1.
    #[arg(long, default_value_t = DEFAULT_MOVES_PER_SECOND)]
    speed: u32,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable time-limited bonus food.
    #[arg(long = "no-bonus")]
    no_bonus: bool,

    /// Disable the terminal bell.
    #[arg(long)]
    mute: bool,

    /// Write a debug log to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Keep high score and settings in this file instead of the default.
    #[arg(long = "state-file")]
    state_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(error) = WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(path)?) {
            eprintln!("Failed to initialise logging: {error}");
        }
    }

    let mut game = build_game(&cli)?;
    let mut audio: Box<dyn AudioSink> = if cli.mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell)
    };

    info!("starting snake-evolution");
    let mut session = TerminalSession::enter()?;
    let result = run(&mut session, &mut game, audio.as_mut());
    drop(session);

    if let Err(error) = &result {
        error!("terminal loop failed: {error}");
    }
    result
}

fn build_game(cli: &Cli) -> io::Result<Game> {
    let mut config = SimulationConfig {
        grid: GridSize {
            width: cli.width,
            height: cli.height,
        },
        base_moves_per_second: cli.speed,
        bonus: (!cli.no_bonus).then(BonusConfig::default),
        ..SimulationConfig::default()
    };
    config.max_moves_per_second = config.max_moves_per_second.max(config.base_moves_per_second);

    let store = match &cli.state_file {
        Some(path) => FileStore::open(path.clone()),
        None => FileStore::open_default(),
    };

    let mut game = Game::from_store(config, Box::new(store), cli.seed)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    if cli.wrap {
        game.set_wall_policy(WallPolicy::Wrapping);
    } else if cli.walls {
        game.set_wall_policy(WallPolicy::Blocking);
    }
    Ok(game)
}

fn run(session: &mut TerminalSession, game: &mut Game, audio: &mut dyn AudioSink) -> io::Result<()> {
    let mut value_flash = HudValueFlash::default();
    let mut previous = game.snapshot();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let delta = now.saturating_duration_since(last_frame);
        last_frame = now;

        for result in game.frame(delta) {
            for cue in result.cues() {
                audio.play(cue);
            }
        }

        let snapshot = game.snapshot();
        value_flash.observe(&previous, &snapshot, now);
        let hud_info = HudInfo {
            palette: &PALETTE,
            value_flash,
            now,
        };
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot, &hud_info))?;
        previous = snapshot;

        // Drain every pending key so input never lags behind the frame rate.
        let mut timeout = FRAME_INTERVAL.saturating_sub(now.elapsed());
        while event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(intent) = intent_for_key(key) {
                    if game.handle_intent(intent) == Control::Quit {
                        return Ok(());
                    }
                }
            }
            timeout = Duration::ZERO;
        }
    }
}
