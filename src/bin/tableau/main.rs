use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tableau::{
    Playback, RecordingPlayback, RunReport, SceneBuilder, SceneConfig, SvgOpts, TracingPlayback,
};

use crate::room::RoomScript;

mod room;

#[derive(Parser, Debug)]
#[command(name = "tableau", version, about = "Run the room demo scene")]
struct Cli {
    /// Number of events to play.
    #[arg(long, default_value_t = 3)]
    events: usize,

    /// Scene config JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every played step and snapshot as JSON.
    #[arg(long)]
    record: Option<PathBuf>,

    /// Write one SVG per event pass into this directory.
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Block for each step's duration, like a live preview.
    #[arg(long)]
    realtime: bool,

    /// Ticks per second for realtime playback.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SceneConfig::from_json_file(path)?,
        None => SceneConfig::default(),
    };

    let report = if cli.record.is_some() || cli.svg_dir.is_some() {
        let (report, recording) = run(&cli, config.clone(), RecordingPlayback::new())?;
        if let Some(path) = &cli.record {
            write_recording(path, &recording)?;
        }
        if let Some(dir) = &cli.svg_dir {
            write_svgs(dir, &recording, &config)?;
        }
        report
    } else {
        run(&cli, config, TracingPlayback::new(cli.realtime, cli.fps))?.0
    };

    eprintln!(
        "played {} events, {} explanations",
        report.events(),
        report.total_explanations()
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run<P: Playback>(cli: &Cli, config: SceneConfig, playback: P) -> anyhow::Result<(RunReport, P)> {
    let script = RoomScript::new(cli.events, config.frame.clone());
    let mut scene = SceneBuilder::new(script)
        .config(config)
        .attach_playback(playback)?
        .build()?;
    let report = scene.run().context("room scene aborted")?;
    Ok((report, scene.into_playback()))
}

fn write_recording(path: &Path, recording: &RecordingPlayback) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, recording.to_json()?)
        .with_context(|| format!("write recording '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn write_svgs(
    dir: &Path,
    recording: &RecordingPlayback,
    config: &SceneConfig,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create svg dir '{}'", dir.display()))?;
    let opts = SvgOpts::default();
    for snapshot in recording.snapshots() {
        let path = dir.join(format!("pass_{:04}.svg", snapshot.pass));
        let svg = tableau::snapshot_to_svg(snapshot, &config.frame, &opts);
        std::fs::write(&path, svg).with_context(|| format!("write svg '{}'", path.display()))?;
    }
    eprintln!(
        "wrote {} svg files to {}",
        recording.snapshots().len(),
        dir.display()
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    Ok(())
}
