use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "runanime", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one sprite and write every composited frame as PNG.
    Frames(FramesArgs),
    /// Print the saved disposal metadata (base64) of a GIF.
    Disposal(DisposalArgs),
    /// Run the overlay loop headlessly and write the final surface as PNG.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input image (GIF or still raster).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Saved disposal metadata (base64) to use instead of the embedded tags.
    #[arg(long)]
    disposal: Option<String>,
}

#[derive(Parser, Debug)]
struct DisposalArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Settings JSON (defaults to the per-user settings file).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Upload directory (defaults to `uploads/` next to the settings file).
    #[arg(long)]
    uploads: Option<PathBuf>,

    /// Monitor id (defaults to the first configured monitor).
    #[arg(long)]
    monitor: Option<String>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Simulated wall-clock time per tick, in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Disposal(args) => cmd_disposal(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn init_tracing() {
    let debug = std::env::var("RUNANIME_DEBUG").is_ok_and(|v| v == "1");
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let saved = match &args.disposal {
        Some(b64) => {
            let codes = BASE64
                .decode(b64.trim())
                .context("decode --disposal as base64")?;
            runanime::decode_saved_disposals(&codes)
        }
        None => Vec::new(),
    };

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let frames = runanime::SpriteLoader::default().load_bytes(&args.in_path, &bytes, &saved)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for (i, f) in frames.frames().iter().enumerate() {
        let path = args.out.join(format!("frame_{i:04}.png"));
        write_png(&path, &f.frame)?;
        println!("{} {}ms", path.display(), f.duration_ms);
    }
    eprintln!(
        "wrote {} frames ({}ms total) to {}",
        frames.len(),
        frames.total_duration_ms(),
        args.out.display()
    );
    Ok(())
}

fn cmd_disposal(args: DisposalArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let methods = runanime::extract_disposals(&bytes)?;
    println!("{}", BASE64.encode(runanime::encode_disposals(&methods)));
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut store = match (&args.settings, &args.uploads) {
        (None, None) => runanime::SettingsStore::default_location()?,
        (settings, uploads) => {
            let settings = match settings {
                Some(p) => p.clone(),
                None => runanime::SettingsStore::default_location()?
                    .settings_path()
                    .to_path_buf(),
            };
            let uploads = uploads.clone().unwrap_or_else(|| {
                settings
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join("uploads")
            });
            runanime::SettingsStore::new(settings, uploads)
        }
    };
    if let Some(id) = &args.monitor {
        store = store.with_monitor(id.clone());
    }

    let mut driver = runanime::OverlayDriver::new(
        store,
        runanime::HeadlessBackend::new(),
        runanime::SpriteLoader::default(),
    )?;
    for _ in 0..args.ticks {
        driver.tick(args.tick_ms)?;
    }

    let surface = driver.backend().surface().snapshot()?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, &surface)?;

    let stats = driver.stats();
    eprintln!(
        "wrote {} ({}x{}, {} instances, {} ticks, {} skipped)",
        args.out.display(),
        surface.width(),
        surface.height(),
        driver.scene().len(),
        stats.ticks,
        stats.skipped_last_rebuild
    );
    Ok(())
}

fn write_png(path: &Path, frame: &runanime::RasterFrame) -> anyhow::Result<()> {
    let straight = runanime::unpremultiply_rgba8(frame.as_bytes());
    image::save_buffer_with_format(
        path,
        &straight,
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
