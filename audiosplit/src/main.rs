mod cli;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use audiosplit_core::{
    CancellationToken, ChunkSplitter, FfmpegTranscoder, FfprobeProbe, ProgressEvent, SplitOutcome,
    SplitRequest, SplitWorker,
};
use indicatif::{HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;

use crate::cli::build_cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = build_cli().get_matches();

    let input_path = matches
        .get_one::<PathBuf>("file_path")
        .expect("required argument");
    if !input_path.is_file() {
        return Err(anyhow!(
            "input file does not exist: {}",
            input_path.display()
        ));
    }

    let chunk_minutes = *matches
        .get_one::<u32>("length")
        .expect("required argument");
    let format = matches
        .get_one::<String>("format")
        .expect("defaulted argument");
    let normalize = matches.get_flag("normalize");
    let dry_run = matches.get_flag("dry-run");
    let ffmpeg = matches
        .get_one::<PathBuf>("ffmpeg")
        .expect("defaulted argument");
    let ffprobe = matches
        .get_one::<PathBuf>("ffprobe")
        .expect("defaulted argument");

    let mut builder = SplitRequest::builder(input_path, chunk_minutes)
        .format(format)
        .normalize(normalize);
    if let Some(output_dir) = matches.get_one::<PathBuf>("output") {
        builder = builder.output_folder(output_dir);
    }
    let request = builder.build().with_context(|| {
        format!(
            "failed to create split request for '{}'",
            input_path.display()
        )
    })?;

    let splitter = ChunkSplitter::new(
        FfprobeProbe::new(ffprobe.clone()),
        FfmpegTranscoder::new(ffmpeg.clone()),
    );

    if dry_run {
        let plan = splitter
            .plan(&request)
            .with_context(|| format!("failed to plan chunks for '{}'", input_path.display()))?;

        println!("Dry run: would generate {} chunk(s):", plan.len());
        for path in plan.output_paths() {
            println!("  {}", path.display());
        }

        return Ok(());
    }

    let progress = ProgressBar::new(0);
    progress.set_draw_target(ProgressDrawTarget::stderr());
    let bar_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(bar_style);
    progress.enable_steady_tick(Duration::from_millis(100));

    let cancel = CancellationToken::new();
    let handler_cancel = cancel.clone();
    let cancel_progress = progress.clone();
    ctrlc::set_handler(move || {
        handler_cancel.cancel();
        cancel_progress.set_message("cancelling after the current chunk");
    })
    .context("failed to install Ctrl-C handler")?;

    let worker = SplitWorker::spawn_with_cancel(splitter, request, cancel)
        .context("failed to start split worker")?;

    let progress_handle = progress.clone();
    let result = worker
        .wait_with(move |event| match event {
            ProgressEvent::Started {
                total_duration,
                windows,
            } => {
                progress_handle.set_length(windows as u64);
                if let Ok(total) = Duration::try_from_secs_f64(total_duration) {
                    progress_handle.set_message(format!("of {}", HumanDuration(total)));
                }
            }
            ProgressEvent::WindowFinished { window, progress } => {
                debug!("chunk {} done ({:.1}%)", window.index + 1, progress.percent());
                progress_handle.set_position(progress.completed as u64);
            }
            ProgressEvent::Finished => {
                progress_handle.set_message("completed");
            }
        })
        .with_context(|| format!("failed to split '{}'", input_path.display()));

    progress.finish_and_clear();

    match result? {
        SplitOutcome::Completed { outputs } => {
            println!("Wrote {} chunk(s).", outputs.len());
        }
        SplitOutcome::Cancelled { outputs } => {
            println!("Cancelled after {} chunk(s).", outputs.len());
        }
    }

    Ok(())
}
