//! Replay a recorded landmark stream through a SignAura pipeline.
//!
//! Usage:
//!   signaura-replay [--config FILE] [--collect LABEL] [--dataset FILE]
//!                   [--transcript FILE] [INPUT]
//!
//! INPUT is a JSON-lines frame file (stdin when omitted or `-`). Frame
//! outputs go to stdout as JSON lines, logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use signaura_core::SignauraResult;
use signaura_runtime::{init_tracing, replay, DatasetRecorder, LogFormat, Pipeline, PipelineConfig};
use tracing::{error, info, warn};

const USAGE: &str = "usage: signaura-replay [--config FILE] [--collect LABEL] [--dataset FILE] [--transcript FILE] [INPUT]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    collect: Option<String>,
    dataset: Option<PathBuf>,
    transcript: Option<PathBuf>,
    input: Option<PathBuf>,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut args = Args::default();
        while let Some(arg) = argv.next() {
            let mut value = |name: &str| argv.next().ok_or_else(|| format!("{} needs a value", name));
            match arg.as_str() {
                "--config" => args.config = Some(value("--config")?.into()),
                "--collect" => args.collect = Some(value("--collect")?),
                "--dataset" => args.dataset = Some(value("--dataset")?.into()),
                "--transcript" => args.transcript = Some(value("--transcript")?.into()),
                "-h" | "--help" => return Err(USAGE.to_string()),
                "-" => args.input = None,
                other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
                other => args.input = Some(other.into()),
            }
        }
        Ok(args)
    }
}

fn run(args: Args) -> SignauraResult<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    info!(?config, "pipeline configuration");
    let mut pipeline = Pipeline::with_config(config)?;

    let mut recorder = DatasetRecorder::new();
    if let Some(label) = &args.collect {
        recorder.start_collecting(label)?;
    }

    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    let summary = match &args.input {
        Some(path) => {
            let input = BufReader::new(File::open(path)?);
            replay(&mut pipeline, input, output, Some(&mut recorder))?
        }
        None => {
            let stdin = io::stdin();
            replay(&mut pipeline, stdin.lock(), output, Some(&mut recorder))?
        }
    };
    recorder.stop_collecting();

    if let Some(path) = &args.dataset {
        if recorder.is_empty() {
            warn!(path = %path.display(), "no samples collected, dataset not written");
        } else {
            recorder.write_to(BufWriter::new(File::create(path)?))?;
            info!(path = %path.display(), samples = recorder.sample_count(), "dataset written");
        }
    }

    if let Some(path) = &args.transcript {
        std::fs::write(path, summary.transcript.to_text())?;
        info!(path = %path.display(), entries = summary.transcript.len(), "transcript written");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    init_tracing(LogFormat::from_env());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["--collect", "nod", "--dataset", "out.csv", "frames.jsonl"]).unwrap();
        assert_eq!(args.collect.as_deref(), Some("nod"));
        assert_eq!(args.dataset, Some(PathBuf::from("out.csv")));
        assert_eq!(args.input, Some(PathBuf::from("frames.jsonl")));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["-"]).unwrap().input.is_none());
    }
}
