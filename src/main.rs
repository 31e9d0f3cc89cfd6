//! Spectre Bodies - headless driver
//!
//! Runs the overlay against a simulated zone: the scan task runs on a tokio
//! runtime while this thread plays the host's frame loop, rendering into a
//! recording painter. Prints what was drawn and saves the settings back.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use tokio::runtime::Runtime;

use spectre_bodies::core::config::{load_settings, save_settings};
use spectre_bodies::core::error::Result;
use spectre_bodies::host::SessionContext;
use spectre_bodies::overlay::SpectreOverlay;
use spectre_bodies::render::{RecordingPainter, RenderStats, TopDownCamera};
use spectre_bodies::sim::SimZone;

/// Headless spectre corpse overlay
#[derive(Parser, Debug)]
#[command(name = "spectre-bodies")]
#[command(about = "Track and label spectre-eligible corpses in a simulated zone")]
struct Args {
    /// Settings file (TOML), created with defaults if missing
    #[arg(long, default_value = "spectre_bodies.toml")]
    settings: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Milliseconds per frame
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Monsters spawned per area
    #[arg(long, default_value_t = 40)]
    monsters: usize,

    /// Frame at which the player moves to a new area
    #[arg(long)]
    change_area_at: Option<u32>,

    /// Scan inline from the frame loop instead of a background task
    #[arg(long)]
    inline_scan: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spectre_bodies=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Spectre Bodies starting (seed {})", seed);

    let settings = load_settings(&args.settings)?;
    let rt = Runtime::new()?;

    let zone = Arc::new(SimZone::new(seed));
    zone.spawn_random(args.monsters);

    let mut overlay = SpectreOverlay::new(settings);
    if !args.inline_scan {
        overlay.activate(rt.handle(), zone.clone(), zone.clone());
    }

    let mut camera = TopDownCamera::new(1920.0, 1080.0);
    let mut painter = RecordingPainter::new();
    let mut totals = RenderStats::default();
    let mut last_frame = RenderStats::default();
    let mut last_labels: Vec<String> = Vec::new();

    for frame in 0..args.frames {
        if Some(frame) == args.change_area_at {
            let area = zone.change_area();
            overlay.on_area_change();
            zone.spawn_random(args.monsters);
            tracing::info!("Entered area {}", area);
        }
        if frame % 5 == 0 {
            if let Some(address) = zone.kill_random() {
                tracing::debug!("Killed monster at {:#x}", address.0);
            }
        }
        if frame % 30 == 29 {
            zone.move_player(Vec3::new(120.0, -60.0, 0.0));
        }

        camera.follow(zone.player().position);
        painter.clear();
        last_frame = overlay.render(zone.as_ref(), zone.as_ref(), &camera, &mut painter);
        totals.labels += last_frame.labels;
        totals.circles += last_frame.circles;
        totals.off_screen += last_frame.off_screen;
        last_labels = painter.labels().map(str::to_string).collect();

        std::thread::sleep(Duration::from_millis(args.frame_ms));
    }

    println!("\n=== SPECTRE BODIES ===");
    println!("Area {}: {} entities, {} corpses", zone.area(), zone.entity_count(), zone.dead_count());
    println!(
        "Last frame: {} candidates, {} labels, {} circles, {} off-screen",
        last_frame.candidates, last_frame.labels, last_frame.circles, last_frame.off_screen
    );
    println!(
        "All frames: {} labels, {} circles, {} off-screen",
        totals.labels, totals.circles, totals.off_screen
    );
    println!("Labelled corpses:");
    for label in &last_labels {
        println!("  {}", label);
    }
    println!("Recently seen (newest first):");
    for id in overlay.tracking().recent_sightings() {
        println!("  {}", id);
    }

    rt.block_on(overlay.shutdown())?;
    save_settings(&args.settings, overlay.settings())?;
    tracing::info!("Settings saved to {}", args.settings.display());
    Ok(())
}
