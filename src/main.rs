//! Showroom - headless viewer driver
//!
//! Usage:
//!   cargo run --release -- --model <path> [--frames N] [--fps F]
//!                          [--rotate] [--bounce] [--hover] [--speed S]
//!                          [--config <viewer.json>] [--store <store.json>]
//!                          [--export <dir>]
//!
//! Loads the model (or shows the placeholder cube), runs the evaluator for N
//! frames on a fixed clock and logs the resulting pose.

use std::path::{Path, PathBuf};

use chrono::Utc;

use showroom::animation::AnimationState;
use showroom::asset::ModelSource;
use showroom::core::{Result, logging, time::AnimationClock};
use showroom::scene::ViewerConfig;
use showroom::session::{EditorSession, FileStore, KeyValueStore, MemoryStore};

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!(
            "Usage: showroom [--model PATH] [--frames N] [--fps F] [--rotate] [--bounce] [--hover] \
             [--speed S] [--config PATH] [--store PATH] [--export DIR]"
        );
        return;
    }

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = match parse_str_arg(args, "--config") {
        Some(path) => ViewerConfig::load(Path::new(&path))?,
        None => ViewerConfig::default(),
    };
    let frames = parse_usize_arg(args, "--frames").unwrap_or(120);
    let fps = parse_f32_arg(args, "--fps").unwrap_or(60.0);

    let store: Box<dyn KeyValueStore> = match parse_str_arg(args, "--store") {
        Some(path) => Box::new(FileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let mut session = EditorSession::with_current_runtime(config, store)?;
    session.set_animation(AnimationState {
        rotate: has_flag(args, "--rotate"),
        bounce: has_flag(args, "--bounce"),
        hover: has_flag(args, "--hover"),
        speed: parse_f32_arg(args, "--speed").unwrap_or(1.0),
    });

    if let Some(path) = parse_str_arg(args, "--model") {
        match session.request_load(ModelSource::file(PathBuf::from(path))) {
            Ok(_) => {
                runtime.block_on(session.wait_for_load());
            }
            Err(e) => log::warn!("Not loading model: {}; showing placeholder", e),
        }
    }

    log::info!(
        "Running {} frames at {} fps (animations {}; {})",
        frames,
        fps,
        if session.animations_enabled() { "on" } else { "off" },
        session.animation().summary().join(", ")
    );

    let mut clock = AnimationClock::fixed(fps);
    for _ in 0..frames {
        let tick = clock.tick();
        session.frame(tick.elapsed);
    }

    let items = session.render_items();
    if let Some(node) = session.model_root().and_then(|id| session.graph().get(id)) {
        let t = node.local_transform;
        log::info!(
            "Final transform after {:.2}s: position {:?}, rotation {:?}, scale {:?}",
            clock.elapsed_secs(),
            t.position.to_array(),
            t.rotation.to_array(),
            t.scale.to_array()
        );
    }
    log::info!(
        "{} render items ({})",
        items.len(),
        session.model_name().unwrap_or("placeholder")
    );

    for note in session.drain_notifications() {
        log::info!("[{:?}] {}", note.level, note.message);
    }

    if let Some(dir) = parse_str_arg(args, "--export") {
        match session.export_config(Utc::now()) {
            Ok(export) => {
                export.write_to_dir(Path::new(&dir))?;
            }
            Err(e) => log::warn!("Skipping export: {}", e),
        }
    }

    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
