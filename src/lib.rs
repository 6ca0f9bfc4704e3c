//! Binwise - waste disposal guidance from photos.
//!
//! Detects waste items in an image, maps each one to a city's disposal
//! rules and asks a follow-up question when the detected class alone is
//! not enough to pick a bin.

#![warn(missing_docs)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod server;

use clap::Parser;
use classify::WasteClassifier;
use cli::{ClassifyArgs, Cli, Command, ConfigAction, RulesAction, ServeArgs};
use config::{Config, OutputMode, config_file_path, load_config_file, save_config, validate_config};
use inference::{Detector, OnnxDetector};
use output::json_envelope::{ClassificationPayload, ConfigPayload, FileStatus, ResultType};
use output::{PipelineSummary, emit_json_error, emit_json_result, reporter};
use pipeline::{
    ProcessCheck, classify_image, collect_input_files, output_dir_for, process_file,
    should_process,
};
use rules::RuleBook;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the binwise CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let mode = cli.output_mode;
    let result = dispatch(cli);
    if mode.is_json()
        && let Err(ref e) = result
    {
        emit_json_error(e);
    }
    result
}

fn dispatch(cli: Cli) -> Result<()> {
    let config_path = match cli.config_file {
        Some(ref path) => path.clone(),
        None => config_file_path()?,
    };

    // Config management must work even when the file on disk is broken.
    if let Some(Command::Config { action }) = &cli.command {
        return handle_config_command(*action, &config_path, cli.output_mode);
    }

    let config = load_config_file(&config_path)?;
    validate_config(&config)?;

    let rules_path = cli.rules.clone().or_else(|| config.rules.file.clone());
    let mode = cli.output_mode;

    match cli.command {
        Some(Command::Rules {
            action: RulesAction::Check { file },
        }) => cli::rules::check_rules(file.as_deref().or(rules_path.as_deref()), mode),
        Some(command) => {
            let classifier = load_classifier(rules_path.as_deref())?;
            handle_command(command, &classifier, &config, mode)
        }
        None => {
            if cli.inputs.is_empty() {
                cli::help::print_smart_help(&config);
                return Ok(());
            }
            let classifier = load_classifier(rules_path.as_deref())?;
            classify_files(&cli.inputs, &cli.classify, &config, &classifier, cli.quiet, mode)
        }
    }
}

fn load_classifier(rules_path: Option<&Path>) -> Result<WasteClassifier> {
    if let Some(path) = rules_path {
        info!("Loading rules: {}", path.display());
    }
    Ok(WasteClassifier::new(Arc::new(RuleBook::load(rules_path)?)))
}

/// City from the command line, else the configured default.
///
/// An empty string is returned when neither is set so the rule table
/// rejects it with the list of supported cities.
fn city_or_default(city: Option<String>, config: &Config) -> String {
    city.or_else(|| config.defaults.city.clone())
        .unwrap_or_default()
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT is noisy at info level; -v shows its warnings, -vv info, -vvv everything.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Logs go to stderr; stdout carries results.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(
    command: Command,
    classifier: &WasteClassifier,
    config: &Config,
    mode: OutputMode,
) -> Result<()> {
    match command {
        Command::Resolve {
            city,
            class,
            subtype,
        } => cli::lookup::resolve_answer(
            classifier,
            &city_or_default(city, config),
            &class,
            &subtype,
            mode,
        ),
        Command::Triage { city, detections } => cli::lookup::triage_file(
            classifier,
            &city_or_default(city, config),
            &detections,
            mode,
        ),
        Command::Rules { action } => match action {
            RulesAction::List { city } => {
                cli::rules::list_rules(classifier.rules(), city.as_deref(), mode)
            }
            RulesAction::Show { city, class } => cli::rules::show_rules(
                classifier.rules(),
                &city_or_default(city, config),
                &class,
                mode,
            ),
            RulesAction::Check { file } => cli::rules::check_rules(file.as_deref(), mode),
        },
        Command::Serve(args) => serve(&args, classifier.clone(), config),
        Command::Config { .. } => Err(Error::Internal {
            message: "config command reached the classifier dispatch".to_string(),
        }),
    }
}

/// Run the HTTP service on a Tokio runtime.
fn serve(args: &ServeArgs, classifier: WasteClassifier, config: &Config) -> Result<()> {
    let detector_config = args.detector.apply(&config.detector);
    let detector: Option<Arc<dyn Detector>> = if detector_config.model.is_some() {
        match OnnxDetector::from_config(&detector_config) {
            Ok(detector) => Some(Arc::new(detector)),
            Err(e) => {
                warn!("Detector unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let host = args.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;

    runtime.block_on(server::run(
        server::AppState::new(classifier, detector),
        &host,
        port,
    ))
}

/// Classify input images with the given options.
fn classify_files(
    inputs: &[PathBuf],
    args: &ClassifyArgs,
    config: &Config,
    classifier: &WasteClassifier,
    quiet: bool,
    mode: OutputMode,
) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    // Fail on a bad city before paying for model load.
    let city = classifier.parse_city(&city_or_default(args.city.clone(), config))?;

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }
    info!("Found {} image(s) to classify", files.len());

    let detector_config = args.detector.apply(&config.detector);
    let detector = OnnxDetector::from_config(&detector_config)?;
    info!("Loaded detector: {}", detector.name());

    if args.stdout {
        return classify_to_stdout(&files, &detector, classifier, city, mode);
    }

    let formats = args
        .format
        .clone()
        .unwrap_or_else(|| config.defaults.formats.clone());
    if formats.is_empty() {
        return Err(Error::ConfigValidation {
            message: "no output formats selected".to_string(),
        });
    }

    let progress_enabled = !quiet && !mode.is_json();
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut summary = PipelineSummary::default();
    let mut pending_followups = 0;

    for file in &files {
        let file_output_dir = output_dir_for(file, args.output_dir.as_deref());
        progress::set_progress_message(file_progress.as_ref(), &file.display().to_string());

        if should_process(file, &file_output_dir, &formats, args.force) == ProcessCheck::SkipExists
        {
            info!("Skipping (output exists): {}", file.display());
            summary.files_skipped += 1;
            if mode.is_json() {
                reporter::emit_file_completed(file, FileStatus::Skipped, None, None);
            }
            progress::inc_progress(file_progress.as_ref());
            continue;
        }

        match process_file(
            file,
            &file_output_dir,
            &detector,
            classifier,
            city,
            &formats,
        ) {
            Ok(result) => {
                summary.files_processed += 1;
                summary.total_detections += result.detections;
                pending_followups += result.pending_followups;
                if mode.is_json() {
                    reporter::emit_file_completed(
                        file,
                        FileStatus::Processed,
                        Some(result.detections),
                        None,
                    );
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                summary.files_failed += 1;
                if mode.is_json() {
                    reporter::emit_file_completed(file, FileStatus::Failed, None, Some(&e));
                }
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let elapsed = total_start.elapsed();
    summary.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} items ({} awaiting a follow-up answer) in {:.2}s",
        summary.files_processed,
        summary.files_skipped,
        summary.files_failed,
        summary.total_detections,
        pending_followups,
        elapsed.as_secs_f64()
    );

    if mode.is_json() {
        reporter::emit_pipeline_completed(&summary);
    }

    if summary.files_failed > 0 {
        warn!("{} image(s) had errors", summary.files_failed);
    }

    Ok(())
}

/// Print results instead of writing files.
fn classify_to_stdout(
    files: &[PathBuf],
    detector: &dyn Detector,
    classifier: &WasteClassifier,
    city: rules::City,
    mode: OutputMode,
) -> Result<()> {
    for file in files {
        let response = classify_image(file, detector, classifier, city)?;
        if mode.is_json() {
            emit_json_result(&ClassificationPayload {
                result_type: ResultType::Classification,
                source: file.clone(),
                response,
            });
        } else {
            if files.len() > 1 {
                println!("== {} ==", file.display());
            }
            cli::lookup::print_response(&response);
        }
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, path: &Path, mode: OutputMode) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  Set detector.model and detector.labels, then run: binwise photo.jpg --city <city>");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(path)?;
            if mode.is_json() {
                let value = serde_json::to_value(&config).map_err(|e| Error::Internal {
                    message: format!("failed to serialize config: {e}"),
                })?;
                emit_json_result(&ConfigPayload {
                    result_type: ResultType::Config,
                    config_path: path.to_path_buf(),
                    config: value,
                });
            } else {
                let text = toml::to_string_pretty(&config)
                    .map_err(|e| Error::ConfigSerialize { source: e })?;
                println!("# {}", path.display());
                println!("{text}");
            }
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
