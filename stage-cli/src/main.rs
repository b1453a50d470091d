//! Stage CLI Tool
//!
//! Command-line interface for placing media files on a canvas timeline and playing them back.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stage_core::{
    Geometry, MediaItem, MediaPatch, MediaRegistry, Notice, Notifier, Session, Snapshot,
    TickOutcome, UploadedFile, VisibilityWindow,
};
use stage_player::{PlaybackEvent, Player, PlayerConfig};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stage")]
#[command(about = "Place images and videos on a canvas and play back their visibility timeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload media files, apply edits and play the timeline to its end
    Play {
        /// Image or video files to place
        files: Vec<PathBuf>,

        #[command(flatten)]
        edits: Edits,

        /// Run ticks back to back instead of waiting between them
        #[arg(long)]
        simulate: bool,

        /// Milliseconds between two ticks in real-time mode
        #[arg(long, default_value = "1000")]
        tick_ms: u64,

        /// Print one JSON snapshot per tick
        #[arg(long)]
        json: bool,
    },

    /// Upload media files, apply edits and print the resulting item list
    Inspect {
        /// Image or video files to place
        files: Vec<PathBuf>,

        #[command(flatten)]
        edits: Edits,
    },
}

#[derive(clap::Args)]
struct Edits {
    /// Visibility window for a media item, e.g. `2=1..4` (one-based index)
    #[arg(long = "window", value_name = "N=START..END", value_parser = parse_window)]
    windows: Vec<(usize, VisibilityWindow)>,

    /// Geometry for a media item, e.g. `1=10,20,320x240` (one-based index)
    #[arg(long = "geometry", value_name = "N=X,Y,WxH", value_parser = parse_geometry)]
    geometries: Vec<(usize, Geometry)>,
}

/// Prints notices the way the browser prototype showed toasts.
///
/// The session already logs upload outcomes through `tracing`, so notices only go to `out`.
struct PrintNotifier<W: Write> {
    out: W,
}

impl<W: Write> Notifier for PrintNotifier<W> {
    fn notify(&mut self, notice: Notice) {
        let prefix = if notice.is_failure() { "error" } else { "ok" };
        let _ = writeln!(self.out, "[{}] {}", prefix, notice);
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            files,
            edits,
            simulate,
            tick_ms,
            json,
        } => {
            let session = build_session(&files, &edits)?;
            if simulate {
                play_simulated(session, json)?;
            } else {
                play_realtime(session, Duration::from_millis(tick_ms), json)?;
            }
        }

        Commands::Inspect { files, edits } => {
            let session = build_session(&files, &edits)?;
            print_items(session.registry());
        }
    }

    Ok(())
}

fn build_session(files: &[PathBuf], edits: &Edits) -> Result<Session> {
    let mut session = Session::new();
    let uploads: Vec<UploadedFile> = files.iter().map(|path| upload_for(path)).collect();
    session
        .upload(uploads, PrintNotifier { out: io::stdout() })
        .context("Failed to upload media")?;

    for (index, window) in &edits.windows {
        let id = item_at(&session, *index)?.id;
        session.update(id, &MediaPatch::default().window(*window));
    }
    for (index, geometry) in &edits.geometries {
        let id = item_at(&session, *index)?.id;
        session.update(id, &MediaPatch::geometry(*geometry));
    }

    Ok(session)
}

fn item_at(session: &Session, index: usize) -> Result<&MediaItem> {
    index
        .checked_sub(1)
        .and_then(|i| session.registry().get_index(i))
        .with_context(|| {
            format!(
                "No media item {} (have {})",
                index,
                session.registry().len()
            )
        })
}

fn upload_for(path: &Path) -> UploadedFile {
    UploadedFile::new(mime_for_path(path), path.display().to_string())
}

/// Guesses a MIME type from the file extension; unknown extensions yield an empty type
fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "ogv" => "video/ogg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "",
    }
}

fn play_simulated(mut session: Session, json: bool) -> Result<()> {
    session.play();
    print_snapshot(&session.snapshot(), json)?;
    loop {
        match session.tick() {
            TickOutcome::Advanced(_) => print_snapshot(&session.snapshot(), json)?,
            TickOutcome::Finished(value) => {
                info!(value, "playback finished");
                break;
            }
            TickOutcome::Idle | TickOutcome::Stale => break,
        }
    }
    Ok(())
}

fn play_realtime(session: Session, tick_interval: Duration, json: bool) -> Result<()> {
    if tick_interval.is_zero() {
        bail!("Tick interval must be positive, use --simulate to skip waiting");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(async move {
        let (mut player, mut rx_events) = Player::new(session, PlayerConfig { tick_interval });
        print_snapshot(&player.snapshot(), json)?;
        player.play().context("Failed to start playback")?;

        while let Some(event) = rx_events.recv().await {
            match event {
                PlaybackEvent::Ticked { .. } => print_snapshot(&player.snapshot(), json)?,
                PlaybackEvent::Finished { value } => {
                    println!("Finished at {}s", value);
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn print_snapshot(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", snapshot.to_json().context("Failed to encode snapshot")?);
        return Ok(());
    }

    let shown: Vec<String> = snapshot
        .visible
        .iter()
        .map(|item| item.source.to_string())
        .collect();
    println!("⏱ {}s  [{}]", snapshot.value, shown.join(", "));
    Ok(())
}

fn print_items(registry: &MediaRegistry) {
    println!("\n=== Media ({}) ===", registry.len());
    for (index, item) in registry.iter().enumerate() {
        let g = &item.geometry;
        let w = &item.window;
        println!(
            "  {}: {} {} at ({}, {}) {}x{}, shown {}s..{}s{}",
            MediaRegistry::label(index),
            item.kind,
            item.source,
            g.x,
            g.y,
            g.width,
            g.height,
            w.start_time,
            w.end_time,
            if w.is_inert() { " (never visible)" } else { "" }
        );
    }
    println!("Timeline ends at {}s", registry.max_end_time());
}

fn parse_indexed(arg: &str) -> Result<(usize, &str), String> {
    let (index, rest) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected N=..., got '{}'", arg))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid media index '{}'", index))?;
    if index == 0 {
        return Err("media indices start at 1".to_string());
    }
    Ok((index, rest))
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", text))
}

fn parse_window(arg: &str) -> Result<(usize, VisibilityWindow), String> {
    let (index, rest) = parse_indexed(arg)?;
    let (start, end) = rest
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{}'", rest))?;
    Ok((index, VisibilityWindow::new(parse_number(start)?, parse_number(end)?)))
}

fn parse_geometry(arg: &str) -> Result<(usize, Geometry), String> {
    let (index, rest) = parse_indexed(arg)?;
    let parts: Vec<&str> = rest.split(',').collect();
    let [x, y, size] = parts.as_slice() else {
        return Err(format!("expected X,Y,WxH, got '{}'", rest));
    };
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got '{}'", size))?;
    Ok((
        index,
        Geometry::new(
            parse_number(x)?,
            parse_number(y)?,
            parse_number(width)?,
            parse_number(height)?,
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(
            parse_window("2=1..4").unwrap(),
            (2, VisibilityWindow::new(1.0, 4.0))
        );
        assert_eq!(
            parse_window("1=0.5..2.5").unwrap(),
            (1, VisibilityWindow::new(0.5, 2.5))
        );
        assert!(parse_window("0=1..2").is_err());
        assert!(parse_window("1=1-2").is_err());
        assert!(parse_window("x=1..2").is_err());
    }

    #[test]
    fn test_parse_geometry() {
        assert_eq!(
            parse_geometry("3=10,20,320x240").unwrap(),
            (3, Geometry::new(10.0, 20.0, 320.0, 240.0))
        );
        assert!(parse_geometry("1=10,20").is_err());
        assert!(parse_geometry("1=10,20,320").is_err());
    }

    #[test]
    fn test_print_notifier_writes_each_notice_once() {
        let mut notifier = PrintNotifier { out: Vec::new() };
        notifier.notify(Notice::Success("Files uploaded successfully.".to_string()));
        notifier.notify(Notice::Failure("No file selected or invalid file.".to_string()));

        let text = String::from_utf8(notifier.out).unwrap();
        assert_eq!(
            text,
            "[ok] Files uploaded successfully.\n[error] No file selected or invalid file.\n"
        );
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("clip.MP4")), "video/mp4");
        assert_eq!(mime_for_path(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes")), "");
    }

    #[test]
    fn test_build_session_applies_edits() {
        let files = vec![PathBuf::from("a.png"), PathBuf::from("b.webm")];
        let edits = Edits {
            windows: vec![(2, VisibilityWindow::new(1.0, 8.0))],
            geometries: vec![(1, Geometry::new(0.0, 0.0, 100.0, 100.0))],
        };

        let session = build_session(&files, &edits).unwrap();
        let items = session.registry().items();

        assert_eq!(items[0].geometry, Geometry::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(items[1].window, VisibilityWindow::new(1.0, 8.0));
        assert_eq!(items[1].kind, stage_core::MediaKind::Video);
        assert_eq!(session.registry().max_end_time(), 8.0);
    }

    #[test]
    fn test_build_session_rejects_missing_index() {
        let files = vec![PathBuf::from("a.png")];
        let edits = Edits {
            windows: vec![(4, VisibilityWindow::new(1.0, 2.0))],
            geometries: Vec::new(),
        };

        assert!(build_session(&files, &edits).is_err());
    }

    #[test]
    fn test_build_session_without_files_fails() {
        let edits = Edits {
            windows: Vec::new(),
            geometries: Vec::new(),
        };

        assert!(build_session(&[], &edits).is_err());
    }
}
