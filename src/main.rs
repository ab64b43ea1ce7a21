use std::path::PathBuf;
use std::process::ExitCode;

use byte_barcode::{
    byte_value, render_page_preview, Config, ConfigUpdate, PathOpener, Session, SystemOpener,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
byte-barcode: barcode images and a printable PDF for every byte value

USAGE:
  byte-barcode [OPTIONS]

OPTIONS:
  --out DIR        Export root (default: current directory)
  --config FILE    TOML file with leading_frame_bit / show_border / show_label
  --no-lead-bit    Drop the leading '10' marker (8-pixel barcodes)
  --no-border      No red border on PDF pages
  --no-label       No text label on PDF pages
  --preview N      Also write preview-N.png, a rendering of page N
  --font FILE      TrueType font for preview labels
  --open           Open the export folder when done
  --help           Show this text";

#[derive(Debug, Clone, Default)]
struct Settings {
    out_dir: PathBuf,
    config_file: Option<PathBuf>,
    overrides: ConfigUpdate,
    preview: Option<u8>,
    font: Option<PathBuf>,
    open: bool,
    help: bool,
}

impl Settings {
    fn from_args(args: &[String]) -> Result<Self, String> {
        let mut s = Settings { out_dir: PathBuf::from("."), ..Settings::default() };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out" => {
                    i += 1;
                    let v = args.get(i).ok_or("--out requires a path")?;
                    s.out_dir = PathBuf::from(v);
                }
                "--config" => {
                    i += 1;
                    let v = args.get(i).ok_or("--config requires a path")?;
                    s.config_file = Some(PathBuf::from(v));
                }
                "--font" => {
                    i += 1;
                    let v = args.get(i).ok_or("--font requires a path")?;
                    s.font = Some(PathBuf::from(v));
                }
                "--preview" => {
                    i += 1;
                    let v = args.get(i).ok_or("--preview requires a byte value")?;
                    let n: i64 = v.parse().map_err(|_| format!("invalid byte value: {}", v))?;
                    s.preview = Some(byte_value(n).map_err(|e| e.to_string())?);
                }
                "--no-lead-bit" => s.overrides.leading_frame_bit = Some(false),
                "--no-border" => s.overrides.show_border = Some(false),
                "--no-label" => s.overrides.show_label = Some(false),
                "--open" => s.open = true,
                "--help" | "-h" => s.help = true,
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 1;
        }
        Ok(s)
    }
}

fn run(settings: &Settings) -> byte_barcode::Result<bool> {
    let config = match &settings.config_file {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut session = Session::new(config)?;
    if !settings.overrides.is_empty() {
        session.set_configuration(settings.overrides)?;
    }
    if let Some(err) = session.document().error() {
        error!(%err, "document not generated");
        return Ok(false);
    }

    let summary = session.export(&settings.out_dir)?;
    for (value, err) in summary.images.failures() {
        error!(value, %err, "[ERR] image export failed");
    }

    if let (Some(value), Some(doc)) = (settings.preview, session.document().document()) {
        let font = settings.font.as_ref().map(std::fs::read).transpose()?;
        let page = &doc.pages()[value as usize];
        let img = render_page_preview(page, 2.0, font.as_deref())?;
        let path = settings.out_dir.join(format!("preview-{}.png", value));
        img.save(&path)?;
        info!("Saved: {}", path.display());
    }

    if settings.open {
        SystemOpener.open_path(&settings.out_dir)?;
    }
    Ok(summary.pdf.is_some())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match Settings::from_args(&args) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, HELP);
            return ExitCode::FAILURE;
        }
    };
    if settings.help {
        println!("{}", HELP);
        return ExitCode::SUCCESS;
    }

    match run(&settings) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(%err, "export failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_uses_defaults() {
        let s = Settings::from_args(&[]).unwrap();
        assert_eq!(s.out_dir, PathBuf::from("."));
        assert!(s.overrides.is_empty());
        assert!(!s.open && s.preview.is_none());
    }

    #[test]
    fn flags_become_overrides() {
        let s = Settings::from_args(&args(&["--no-label", "--out", "build", "--preview", "65"])).unwrap();
        assert_eq!(s.overrides, ConfigUpdate::default().show_label(false));
        assert_eq!(s.out_dir, PathBuf::from("build"));
        assert_eq!(s.preview, Some(65));
    }

    #[test]
    fn preview_out_of_range() {
        let err = Settings::from_args(&args(&["--preview", "256"])).unwrap_err();
        assert!(err.contains("256"));
    }

    #[test]
    fn missing_value_and_unknown_flag() {
        assert!(Settings::from_args(&args(&["--out"])).is_err());
        assert!(Settings::from_args(&args(&["--bogus"])).is_err());
    }
}
