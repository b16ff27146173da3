//! Circle Bounce - native entry point
//!
//! Usage: circle-bounce [preset | config.json] [ticks] [--synth] [--text]
//!
//! `--synth` renders each note to samples without an output device; the
//! samples are only counted and logged. `--text` draws frames to stdout.
//!
//! With a tick count the scene runs headless and the final frame is printed
//! as JSON. Without one it runs in real time for ten seconds.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use circle_bounce::audio::{
    AudioError, AudioSettings, AudioWorker, DEFAULT_QUEUE_CAPACITY, LogPlayer, NoteQueue,
    SynthPlayer,
};
use circle_bounce::renderer::{LogRenderer, Renderer, TextRenderer};
use circle_bounce::settings::{self, Preset};
use circle_bounce::{Runner, Simulation, SimulationConfig};

/// Wall time of an interactive run
const LIVE_DURATION: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct Args {
    scene: Option<String>,
    ticks: Option<u64>,
    synth: bool,
    text: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--synth" => parsed.synth = true,
            "--text" => parsed.text = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ => {
                if let Ok(n) = arg.parse::<u64>() {
                    if parsed.ticks.replace(n).is_some() {
                        return Err("tick count given twice".into());
                    }
                } else if parsed.scene.replace(arg).is_some() {
                    return Err("scene given twice".into());
                }
            }
        }
    }
    Ok(parsed)
}

fn scene_config(scene: Option<&str>) -> Result<SimulationConfig, String> {
    let Some(scene) = scene else {
        return Ok(Preset::default().config());
    };
    if let Some(preset) = Preset::from_str(scene) {
        log::info!("Using preset {}", preset.as_str());
        return Ok(preset.config());
    }
    settings::load_config(scene).map_err(|e| format!("{scene}: {e}"))
}

fn spawn_audio(synth: bool) -> Result<(NoteQueue, AudioWorker), AudioError> {
    if !synth {
        return AudioWorker::spawn(DEFAULT_QUEUE_CAPACITY, LogPlayer);
    }
    // No device backend: count synthesized samples so the work is observable
    let samples = Arc::new(AtomicUsize::new(0));
    let output = move |buf: &[f32]| -> Result<(), AudioError> {
        let total = samples.fetch_add(buf.len(), Ordering::Relaxed) + buf.len();
        log::debug!("Synthesized {} samples ({} total)", buf.len(), total);
        Ok(())
    };
    AudioWorker::spawn(
        DEFAULT_QUEUE_CAPACITY,
        SynthPlayer::new(AudioSettings::default(), output),
    )
}

fn run(args: Args) -> Result<(), String> {
    let config = scene_config(args.scene.as_deref())?;
    let (queue, worker) = spawn_audio(args.synth).map_err(|e| e.to_string())?;
    let sim = Simulation::new(config)
        .map_err(|e| e.to_string())?
        .with_sink(queue);

    let renderer: Box<dyn Renderer> = if args.text {
        Box::new(
            TextRenderer::new(std::io::stdout(), 60, 30)
                .every(6)
                .clear_screen(true),
        )
    } else {
        Box::new(LogRenderer::default())
    };
    let mut runner = Runner::new(sim, renderer);

    let ran = match args.ticks {
        Some(n) => runner.run_ticks(n),
        None => runner.run_for(LIVE_DURATION),
    };

    let (sim, _renderer) = runner.into_parts();
    let frame = sim.frame();
    // Dropping the simulation drops the last queue handle and lets the worker finish
    drop(sim);
    let played = worker.join();
    log::info!("Ran {} ticks, played {} notes", ran, played);

    if args.ticks.is_some() {
        let json = serde_json::to_string_pretty(&frame).map_err(|e| e.to_string())?;
        println!("{json}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Circle Bounce starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            eprintln!("usage: circle-bounce [preset | config.json] [ticks] [--synth] [--text]");
            eprintln!("  --synth  synthesize notes without an audio device (samples are counted)");
            eprintln!("  --text   draw frames to the terminal");
            let names: Vec<&str> = Preset::ALL.iter().map(|p| p.as_str()).collect();
            eprintln!("presets: {}", names.join(", "));
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
