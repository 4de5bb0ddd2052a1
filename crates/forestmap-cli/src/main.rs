use forestmap::render::{DeterministicTextMeasurer, SvgSurface, Viewer};
use forestmap::{
    Camera, Entity, InputEvent, KeyAction, MAX_ZOOM, MIN_ZOOM, Resolution, ViewerConfig,
};
use serde::Serialize;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod snapshot;

use snapshot::SnapshotProvider;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Core(forestmap::Error),
    Render(forestmap_render::Error),
    DiscoveryFailed,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::DiscoveryFailed => {
                write!(f, "topology discovery failed (see log output for the cause)")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<forestmap::Error> for CliError {
    fn from(value: forestmap::Error) -> Self {
        Self::Core(value)
    }
}

impl From<forestmap_render::Error> for CliError {
    fn from(value: forestmap_render::Error) -> Self {
        Self::Render(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    Layout,
    #[default]
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    out: Option<String>,
    camera: Option<(i32, i32, u32)>,
    resolution: Option<(i32, i32)>,
    font_face: Option<String>,
    debug_overlay: bool,
    help_overlay: bool,
}

fn usage() -> &'static str {
    "forestmap-cli\n\
\n\
USAGE:\n\
  forestmap-cli layout [--pretty] [<snapshot.json>|-]\n\
  forestmap-cli [render] [--camera <x,y,zoom>] [--resolution <WxH>] [--font-face <name>]\n\
                [--debug-overlay] [--help-overlay] [--out <path>] [<snapshot.json>|-]\n\
\n\
NOTES:\n\
  - If <snapshot.json> is omitted or '-', input is read from stdin.\n\
  - layout prints the positioned entities as JSON.\n\
  - render prints one SVG frame to stdout by default; use --out to write a file.\n\
  - Resolution dimensions must be multiples of 8; zoom is clamped to 1..100.\n\
"
}

fn parse_pair(raw: &str) -> Option<(i32, i32)> {
    let (w, h) = raw.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn parse_camera(raw: &str) -> Option<(i32, i32, u32)> {
    let mut it = raw.split(',');
    let x = it.next()?.trim().parse().ok()?;
    let y = it.next()?.trim().parse().ok()?;
    let zoom = it.next()?.trim().parse().ok()?;
    if it.next().is_some() {
        return None;
    }
    Some((x, y, zoom))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--debug-overlay" => args.debug_overlay = true,
            "--help-overlay" => args.help_overlay = true,
            "--camera" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.camera = Some(parse_camera(raw).ok_or(CliError::Usage(usage()))?);
            }
            "--resolution" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.resolution = Some(parse_pair(raw).ok_or(CliError::Usage(usage()))?);
            }
            "--font-face" => {
                let Some(face) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.font_face = Some(face.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            _ => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(a.clone());
            }
        }
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_output(out: Option<&str>, content: &str) -> Result<(), CliError> {
    match out {
        None => {
            println!("{content}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, content)?;
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    summary: forestmap::render::LayoutSummary,
    camera: Camera,
    entities: Vec<&'a Entity>,
}

fn run(args: Args) -> Result<(), CliError> {
    let json = read_input(args.input.as_deref())?;

    let mut config = ViewerConfig::default();
    if let Some((w, h)) = args.resolution {
        config.resolution = Resolution::new(w, h)?;
    }
    if let Some(face) = &args.font_face {
        config.font_face = face.clone();
    }

    let measurer = DeterministicTextMeasurer::default();
    let mut viewer = Viewer::new(config, SnapshotProvider::new(json))?;

    // Batch tool: poll the completion gate the way an interactive frame loop
    // would, just without a frame budget to spend in between.
    loop {
        viewer.poll_discovery(&measurer)?;
        if viewer.world().is_some() || viewer.is_stopped() {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    if viewer.is_stopped() {
        return Err(CliError::DiscoveryFailed);
    }

    if let Some((x, y, zoom)) = args.camera {
        viewer.controls.camera = Camera {
            x,
            y,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        };
    }
    if args.debug_overlay {
        viewer.handle_input(InputEvent::Key(KeyAction::ToggleDebugOverlay));
    }
    if args.help_overlay {
        viewer.handle_input(InputEvent::Key(KeyAction::ToggleHelpOverlay));
    }

    match args.command {
        Command::Layout => {
            let Some(world) = viewer.world() else {
                return Err(CliError::DiscoveryFailed);
            };
            let out = LayoutOut {
                summary: world.summary,
                camera: viewer.controls.camera,
                entities: world.store.iter().map(|(_, e)| e).collect(),
            };
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&out)?
            } else {
                serde_json::to_string(&out)?
            };
            write_output(args.out.as_deref(), &rendered)
        }
        Command::Render => {
            let (resolution, font_face) = {
                let config = viewer.config();
                (config.resolution, config.font_face.clone())
            };
            let mut surface = SvgSurface::new(resolution, &font_face);
            viewer.render_frame(&mut surface, &measurer)?;
            write_output(args.out.as_deref(), &surface.document())
        }
    }
}

fn main() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
