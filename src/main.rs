//! Cogworks headless runner.
//!
//! Boots the engine without a window, feeds it a scripted sequence of
//! button presses and optionally prints the last frame as text.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --stage 1 --script "right,right,up" --render
//! ```
//!
//! Each script token is a button name (`up`, `down`, `left`, `right`,
//! `confirm`, `cancel`, `start`, `reset`) pressed for one frame, or `wait`.
//! After every token the engine runs `--frames` idle frames.

use std::path::PathBuf;

use clap::Parser;
use cogworks::app::App;
use cogworks::resources::audio::drain_audio;
use cogworks::resources::gameconfig::GameConfig;
use cogworks::resources::input::Button;
use cogworks::resources::scene::{SceneId, SceneParam};
use cogworks::scenes::SceneError;
use cogworks::systems::input::{HeldButtons, InputSource};
use cogworks::systems::render::TextRenderer;
use log::{debug, error, info, warn};

/// Cogworks, a turn-based tile puzzle engine.
#[derive(Parser, Debug)]
#[command(version, about = "Cogworks: move the workers onto the cogs of their colour.")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Directory with the stage maps, overrides the configuration.
    #[arg(long, value_name = "DIR")]
    maps: Option<PathBuf>,

    /// Progress record file, overrides the configuration.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Jump straight into this stage.
    #[arg(long, value_name = "N")]
    stage: Option<usize>,

    /// Scene to start in: title, stagemenu or game.
    #[arg(long, default_value = "title")]
    scene: String,

    /// Comma separated button presses.
    #[arg(long, default_value = "")]
    script: String,

    /// Idle frames after each script step.
    #[arg(long, default_value_t = 30)]
    frames: usize,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print the last frame.
    #[arg(long)]
    render: bool,
}

/// One parsed script token.
enum Step {
    Press(Button),
    Wait,
}

fn parse_script(script: &str) -> Result<Vec<Step>, String> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            if token.eq_ignore_ascii_case("wait") {
                Ok(Step::Wait)
            } else {
                Button::from_name(token)
                    .map(Step::Press)
                    .ok_or_else(|| format!("unknown button '{token}' in script"))
            }
        })
        .collect()
}

/// Run one frame and play back its audio intents into the log.
fn step(app: &mut App, source: &dyn InputSource, dt: f32) -> Result<(), SceneError> {
    app.frame(source, dt)?;
    for cmd in drain_audio(app.world_mut()) {
        debug!("audio: {:?}", cmd);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(maps) = cli.maps {
        config.maps_dir = maps;
    }
    if let Some(save) = cli.save {
        config.save_path = save;
    }

    let steps = match parse_script(&cli.script) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let (scene, param) = match cli.stage {
        Some(stage) => (SceneId::Game, SceneParam::Stage(stage)),
        None => match SceneId::from_name(&cli.scene) {
            Some(scene) => (scene, SceneParam::None),
            None => {
                eprintln!("Error: unknown scene '{}'", cli.scene);
                std::process::exit(2);
            }
        },
    };

    let mut app = App::new(config);
    if let Err(e) = app.start(scene, param) {
        error!("Cannot start: {}", e);
        std::process::exit(1);
    }

    let idle = HeldButtons::new();
    let mut run = || -> Result<(), SceneError> {
        for _ in 0..cli.frames {
            step(&mut app, &idle, cli.dt)?;
        }
        for token in &steps {
            match token {
                Step::Press(button) => {
                    step(&mut app, &HeldButtons::new().with(*button), cli.dt)?
                }
                Step::Wait => step(&mut app, &idle, cli.dt)?,
            }
            for _ in 0..cli.frames {
                if app.should_quit() {
                    return Ok(());
                }
                step(&mut app, &idle, cli.dt)?;
            }
        }
        Ok(())
    };
    let result = run();

    if let Err(e) = result {
        error!("Fatal scene error: {}", e);
        std::process::exit(1);
    }

    if cli.render {
        let mut renderer = TextRenderer::new();
        app.draw(&mut renderer);
        print!("{}", renderer.frame());
    }
    info!(
        "Finished in scene '{}'",
        app.scenes().active().map_or("none", |id| id.name())
    );
    app.shutdown();
}
