use clap::{Args, Parser, Subcommand};
use qreator::camera::{Facing, ReplayBackend};
use qreator::render::{LogoOverlay, Rgb};
use qreator::scan::decode_once;
use qreator::{
    Controller, DecodeOutcome, ExportFormat, PayloadSpec, RenderRequest, RqrrDecoder, ScanState,
    classify, config, encode, tools, tour,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qreator", version, about = "Build QR payloads and scan QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical payload for a QR symbol
    Encode {
        #[command(subcommand)]
        payload: PayloadArgs,
    },
    /// Classify a scanned string and print the suggested action
    Classify {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Decode QR codes in still images (in parallel)
    ScanImage {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Run the live scanner over a directory of frames
    ScanFrames {
        dir: PathBuf,
        #[arg(long, default_value = "environment")]
        facing: Facing,
        #[arg(long, default_value_t = 300)]
        max_frames: usize,
        #[arg(long)]
        torch: bool,
        #[arg(long)]
        zoom: Option<f64>,
    },
    /// Print the rasterizer request for a payload as JSON
    Render {
        #[arg(long)]
        size: Option<u32>,
        #[arg(long, default_value = "#008080")]
        fg: Rgb,
        #[arg(long, default_value = "#E0F8F8")]
        bg: Rgb,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long, default_value = "png")]
        format: ExportFormat,
        #[command(subcommand)]
        payload: PayloadArgs,
    },
    /// Print the details carried by a tour link
    TourDetails { link: String },
}

#[derive(Subcommand)]
enum PayloadArgs {
    /// Website link
    Url { value: String },
    /// Free text
    Text { value: String },
    /// Link to a hosted image
    Image { value: String },
    /// Link to a hosted PDF
    Pdf { value: String },
    /// Tour-guide link
    Tour(TourArgs),
    /// UPI payment request
    Upi {
        payee_id: String,
        #[arg(long)]
        amount: Option<String>,
    },
}

#[derive(Args)]
struct TourArgs {
    details: String,
    /// Origin the tour page is served from (defaults to QREATOR_ORIGIN)
    #[arg(long)]
    origin: Option<String>,
}

impl PayloadArgs {
    fn into_spec(self) -> PayloadSpec {
        match self {
            PayloadArgs::Url { value } => PayloadSpec::Url(value),
            PayloadArgs::Text { value } => PayloadSpec::Text(value),
            PayloadArgs::Image { value } => PayloadSpec::ImageUrl(value),
            PayloadArgs::Pdf { value } => PayloadSpec::PdfUrl(value),
            PayloadArgs::Tour(TourArgs { details, origin }) => PayloadSpec::TourGuide {
                origin_base: origin.unwrap_or_else(|| config::settings().origin.clone()),
                details,
            },
            PayloadArgs::Upi { payee_id, amount } => PayloadSpec::UpiPayment { payee_id, amount },
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Encode { payload } => {
            println!("{}", encode(&payload.into_spec()));
            Ok(())
        }
        Command::Classify { text, json } => classify_cmd(&text, json),
        Command::ScanImage { paths, json } => scan_image_cmd(&paths, json),
        Command::ScanFrames {
            dir,
            facing,
            max_frames,
            torch,
            zoom,
        } => scan_frames_cmd(&dir, facing, max_frames, torch, zoom),
        Command::Render {
            size,
            fg,
            bg,
            logo,
            format,
            payload,
        } => render_cmd(payload.into_spec(), size, fg, bg, logo, format),
        Command::TourDetails { link } => {
            match tour::details_from_link(&link) {
                Some(details) => println!("{details}"),
                None => println!("{}", tour::NO_DETAILS_GREETING),
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let default = if config::settings().debug {
        "qreator=debug"
    } else {
        "qreator=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> qreator::Result<()> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "failed to serialize output");
            Err(qreator::Error::InvalidState("output could not be serialized"))
        }
    }
}

fn classify_cmd(text: &str, json: bool) -> qreator::Result<()> {
    let classification = classify(text);
    let action = classification.action();
    if json {
        #[derive(Serialize)]
        struct Output<'a> {
            classification: &'a qreator::Classification,
            action: qreator::Action,
        }
        return print_json(&Output {
            classification: &classification,
            action,
        });
    }
    println!("{:?} -> {}", classification, action.label());
    Ok(())
}

#[derive(Serialize)]
struct ImageReport {
    path: PathBuf,
    text: Option<String>,
    classification: Option<qreator::Classification>,
    error: Option<String>,
}

fn scan_image_cmd(paths: &[PathBuf], json: bool) -> qreator::Result<()> {
    let max_dim = config::settings().max_image_dim;
    let start = Instant::now();

    // Still images touch no session state, so they can fan out.
    let reports: Vec<ImageReport> = paths
        .par_iter()
        .map(|path| {
            let mut report = ImageReport {
                path: path.clone(),
                text: None,
                classification: None,
                error: None,
            };
            match tools::load_rgba(path, max_dim) {
                Ok(image) => {
                    if let DecodeOutcome::Decoded(text) =
                        decode_once(&image, &mut RqrrDecoder::new())
                    {
                        report.classification = Some(classify(&text));
                        report.text = Some(text);
                    } else {
                        report.error = Some(qreator::Error::NoCodeFound.to_string());
                    }
                }
                Err(err) => report.error = Some(err.to_string()),
            }
            report
        })
        .collect();

    let found = reports.iter().filter(|r| r.text.is_some()).count();
    info!(
        images = reports.len(),
        found,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan finished"
    );

    if json {
        return print_json(&reports);
    }
    for report in &reports {
        match (&report.text, &report.error) {
            (Some(text), _) => println!("{}: {}", report.path.display(), text),
            (None, Some(err)) => println!("{}: {}", report.path.display(), err),
            (None, None) => {}
        }
    }
    if found == 0 {
        return Err(qreator::Error::NoCodeFound);
    }
    Ok(())
}

fn scan_frames_cmd(
    dir: &Path,
    facing: Facing,
    max_frames: usize,
    torch: bool,
    zoom: Option<f64>,
) -> qreator::Result<()> {
    let backend = ReplayBackend::from_dir(dir, facing, config::settings().max_image_dim)?;
    let mut controller = Controller::new(backend, RqrrDecoder::new());
    controller.start(facing)?;

    // Missing controls are reported but do not abort the scan.
    if torch {
        if let Err(err) = controller.set_torch(true) {
            warn!(error = %err, "torch not applied");
        }
    }
    if let Some(level) = zoom {
        match controller.set_zoom(level) {
            Ok(applied) => info!(requested = level, applied, "zoom set"),
            Err(err) => warn!(error = %err, "zoom not applied"),
        }
    }

    for frame in 0..max_frames {
        if let Some(result) = controller.pump() {
            info!(frame, "code found");
            println!("{}", result.raw_text());
            println!("action: {}", result.action().label());
            break;
        }
    }

    let found = matches!(controller.state(), ScanState::Paused(_));
    controller.stop();
    if found {
        Ok(())
    } else {
        Err(qreator::Error::NoCodeFound)
    }
}

fn render_cmd(
    spec: PayloadSpec,
    size: Option<u32>,
    fg: Rgb,
    bg: Rgb,
    logo: Option<String>,
    format: ExportFormat,
) -> qreator::Result<()> {
    let mut request = RenderRequest::new(encode(&spec)).with_colors(fg, bg);
    if let Some(size) = size {
        request = request.with_size(size);
    }
    if let Some(src) = logo {
        request = request.with_logo(LogoOverlay::new(src));
    }

    #[derive(Serialize)]
    struct Output<'a> {
        kind: &'static str,
        request: &'a RenderRequest,
        file_name: String,
        mime_type: &'static str,
    }
    print_json(&Output {
        kind: spec.kind(),
        request: &request,
        file_name: format.file_name(),
        mime_type: format.mime_type(),
    })
}
