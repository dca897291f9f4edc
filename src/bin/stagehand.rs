use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stagehand::trace::{NoopSink, RecorderSink, TraceRecord};

#[derive(Parser, Debug)]
#[command(name = "stagehand", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a document for a number of ticks and dump the display tree as JSON.
    Play(PlayArgs),
    /// Print asset and timeline counts of a document.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of ticks to play.
    #[arg(long, default_value_t = 1)]
    ticks: u64,

    /// Deepest nested animator that may be spawned.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Include every playback event in the output.
    #[arg(long)]
    trace: bool,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(serde::Serialize)]
struct PlayReport<'a> {
    ticks: u64,
    frame: usize,
    frame_count: usize,
    animators: usize,
    root: &'a stagehand::DisplayNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceRecord>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_document(path: &Path) -> anyhow::Result<stagehand::Document> {
    stagehand::Document::from_path(path)
        .with_context(|| format!("load document '{}'", path.display()))
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;

    let mut opts = stagehand::AnimatorOpts::default();
    if let Some(depth) = args.max_depth {
        opts.max_nesting_depth = depth;
    }
    let mut stage = stagehand::Stage::from_document(doc, opts)
        .with_context(|| format!("build stage for '{}'", args.in_path.display()))?;

    let mut recorder = RecorderSink::new();
    for _ in 0..args.ticks {
        if args.trace {
            stage.tick_with_sink(&mut recorder);
        } else {
            stage.tick_with_sink(&mut NoopSink);
        }
    }

    let animator = stage.animator();
    let report = PlayReport {
        ticks: stage.ticks(),
        frame: animator.current_frame(),
        frame_count: animator.frame_count(),
        animators: animator.arena().len(),
        root: stage.root(),
        trace: args.trace.then(|| recorder.into_records()),
    };

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(&out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &report).context("write play report")?;
            w.flush().context("flush play report")?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &report).context("write play report")?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;
    let (shapes, bitmaps, texts, sounds, timelines) = doc.library().counts();
    println!("shapes:    {shapes}");
    println!("bitmaps:   {bitmaps}");
    println!("texts:     {texts}");
    println!("sounds:    {sounds}");
    println!("timelines: {timelines}");
    match doc.root_timeline() {
        Some(tl) => println!("main timeline: {} frames", tl.frame_count()),
        None => println!("main timeline: none"),
    }
    Ok(())
}
