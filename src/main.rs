use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::io::Read;
use std::path::PathBuf;
use webpcbz::{
    channel, classify, default_config_path, default_log_path, parse_path_list,
    partition_existing, write_run_log, CancelToken, Cli, ConversionWorker, Plan, ProgressEvent,
    RunLog, RunReport, SettingsStore, Transcoder,
};

const MAX_LISTED_MISSING: usize = 5;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let store = cli
        .config
        .clone()
        .or_else(default_config_path)
        .map(SettingsStore::new);
    if store.is_none() {
        log::warn!("No home directory found, settings will not be persisted");
    }

    let stored = store.as_ref().map(SettingsStore::load).unwrap_or_default();
    let settings = cli.apply_overrides(stored);
    settings.validate().context("Invalid conversion settings")?;

    if settings != stored {
        if let Some(store) = &store {
            if let Err(e) = store.save(&settings) {
                log::warn!("Could not save settings to {}: {}", store.path().display(), e);
            }
        }
    }

    let raw_paths = collect_input_paths(&cli.paths, std::io::stdin())?;
    let (existing, missing) = partition_existing(raw_paths);
    report_missing(&missing);

    if existing.is_empty() {
        println!("No valid files, folders or CBZ archives were given.");
        return Ok(());
    }

    let plan = classify(&existing);
    report_skipped(&plan);

    if plan.is_empty() {
        println!("Nothing to do: no supported images, folders or CBZ archives found.");
        return Ok(());
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            log::info!("Cancelling...");
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let total = plan.total();
    let (events, receiver) = channel();
    let worker = ConversionWorker::new(
        plan.tasks,
        settings,
        Transcoder::new(&settings),
        events,
        cancel,
    );
    let handle = worker.spawn().context("Failed to start conversion worker")?;

    let bar = create_progress_bar(total)?;
    let mut final_log = None;

    for event in receiver.iter() {
        let terminal = event.is_terminal();
        match event {
            ProgressEvent::Progress(update) => {
                bar.set_length(update.total);
                bar.set_position(update.completed);
                bar.set_message(update.message);
            }
            ProgressEvent::Cancelled => {
                bar.abandon_with_message("Cancelled");
                println!("Conversion cancelled.");
            }
            ProgressEvent::Done(log) => {
                bar.finish_with_message("Done");
                final_log = Some(log);
            }
        }
        if terminal {
            break;
        }
    }

    if handle.join().is_err() {
        anyhow::bail!("Conversion worker panicked");
    }

    if let Some(log) = final_log {
        print_report(&log, cli.log_file.clone().or_else(default_log_path));
    }

    Ok(())
}

/// Arguments are taken as given; `-` reads a pasted, one-per-line list from `stdin`.
fn collect_input_paths(args: &[String], mut stdin: impl Read) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for arg in args {
        if arg == "-" {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("Failed to read path list from stdin")?;
            paths.extend(parse_path_list(&text));
        } else {
            paths.push(arg.clone());
        }
    }
    Ok(paths)
}

fn report_missing(missing: &[String]) {
    if missing.is_empty() {
        return;
    }

    eprintln!("The following paths could not be found and were ignored:");
    for path in missing.iter().take(MAX_LISTED_MISSING) {
        eprintln!("  {}", path);
    }
    if missing.len() > MAX_LISTED_MISSING {
        eprintln!("  ...");
    }
}

fn report_skipped(plan: &Plan) {
    match plan.skipped_folders.as_slice() {
        [] => {}
        [folder] => eprintln!(
            "Skipped folder '{}' because it contains no supported images.",
            folder.display()
        ),
        folders => eprintln!(
            "Skipped {} folders because they contain no supported images.",
            folders.len()
        ),
    }

    for file in &plan.ignored_files {
        log::debug!("Ignoring unsupported file {}", file.display());
    }
}

fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn print_report(log: &RunLog, log_path: Option<PathBuf>) {
    println!("{}", RunReport::from_log(log));

    match log_path {
        Some(path) => match write_run_log(&path, log) {
            Ok(()) => println!("Full log saved to: {}", path.display()),
            Err(e) => eprintln!("Could not save log file: {}", e),
        },
        None => eprintln!("Could not save log file: no home directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_kept_verbatim() {
        let args = vec!["\"quoted\".png".to_string(), "'it'.jpg".to_string()];
        let paths = collect_input_paths(&args, std::io::empty()).unwrap();
        assert_eq!(paths, args);
    }

    #[test]
    fn dash_reads_pasted_list_from_stdin() {
        let args = vec!["cover.png".to_string(), "-".to_string()];
        let stdin = "\"C:/comics/vol 1.cbz\"\r\n\n  chapter  \n".as_bytes();

        let paths = collect_input_paths(&args, stdin).unwrap();
        assert_eq!(paths, vec!["cover.png", "C:/comics/vol 1.cbz", "chapter"]);
    }
}
