//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::adapters::SimulatedPlayer;
use crate::app::container::AppContainer;
use crate::app::{EditorSession, MediaEvent, SessionEvent};
use crate::cli::args::{ReplayArgs, SubmitArgs};
use crate::domain::model::{SourceFile, TimeSpec};
use crate::domain::selection::TimelineLayout;
use crate::error::JobError;
use crate::ports::PlaybackPort;
use crate::utils::format_file_size;
use crate::utils::path::{output_path, write_output};
use crate::utils::time::{format_clock, format_gain, format_percent, format_seconds};

const TIMELINE_WIDTH: usize = 40;

/// One entry of a replay script
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Let the simulated player run, then deliver a time update
    Advance { advance: f64 },
    Event(SessionEvent),
}

/// Execute the submit command
pub async fn submit(container: &dyn AppContainer, args: SubmitArgs) -> Result<()> {
    let start = TimeSpec::parse(&args.start)
        .map_err(|e| anyhow::anyhow!("Invalid start time '{}': {}", args.start, e))?
        .as_seconds();
    let end = TimeSpec::parse(&args.end)
        .map_err(|e| anyhow::anyhow!("Invalid end time '{}': {}", args.end, e))?
        .as_seconds();
    if start >= end {
        return Err(anyhow::anyhow!("Start time must be before end time"));
    }

    let duration = match &args.duration {
        Some(duration) => TimeSpec::parse(duration)
            .map_err(|e| anyhow::anyhow!("Invalid duration '{}': {}", duration, e))?
            .as_seconds(),
        None => end,
    };
    let options = args.export.to_options()?;

    let file = SourceFile::load(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    info!(
        "Submitting {} ({}), range {} - {}",
        file.file_name,
        format_file_size(file.len() as u64),
        format_seconds(start),
        format_seconds(end)
    );

    let mut session = EditorSession::new(SimulatedPlayer::new(duration));
    session.set_export_options(options);
    session.load_source(file);
    session.player_mut().load_metadata();
    session.handle_media(MediaEvent::MetadataLoaded);
    session.set_range(start, end);

    run_job(container, &session, args.export.output.as_deref()).await
}

/// Execute the replay command
pub async fn replay(container: &dyn AppContainer, args: ReplayArgs) -> Result<()> {
    let duration = TimeSpec::parse(&args.duration)
        .map_err(|e| anyhow::anyhow!("Invalid duration '{}': {}", args.duration, e))?
        .as_seconds();
    let options = args.export.to_options()?;

    let script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid event script {}", args.script.display()))?;

    let file = SourceFile::load(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let mut session = EditorSession::new(SimulatedPlayer::new(duration));
    session.set_export_options(options);
    session.load_source(file);
    session.player_mut().load_metadata();
    session.handle_media(MediaEvent::MetadataLoaded);

    info!("Replaying {} steps", steps.len());
    for (index, step) in steps.iter().enumerate() {
        match step {
            ScriptStep::Advance { advance } => {
                session.player_mut().advance(*advance);
                session.handle_media(MediaEvent::TimeUpdate);
            }
            ScriptStep::Event(event) => {
                let command = session.handle(event);
                debug!(step = index, ?event, ?command, "Replayed event");
            }
        }
    }

    print_session(&session);

    if args.submit {
        run_job(container, &session, args.export.output.as_deref()).await?;
    }
    Ok(())
}

fn print_session(session: &EditorSession<SimulatedPlayer>) {
    let selection = session.selection();
    let mixer = session.mixer();
    let range = selection.range_ms();

    println!("Duration:  {}", format_clock(selection.duration()));
    println!(
        "Selection: {} - {} ({} - {}), {} ms",
        format_seconds(selection.start_time()),
        format_seconds(selection.end_time()),
        format_clock(selection.start_time()),
        format_clock(selection.end_time()),
        range.duration_ms()
    );
    println!("Playhead:  {}", format_seconds(selection.current_time()));
    println!("Timeline:  [{}]", timeline_bar(&selection.timeline_layout(), TIMELINE_WIDTH));
    println!(
        "Playing:   {}",
        if session.player().is_paused() { "no" } else { "yes" }
    );
    println!(
        "Volume:    {}{}",
        format_percent(mixer.playback_volume()),
        if mixer.is_muted() { " (muted)" } else { "" }
    );
    println!("Gain:      {}", format_gain(mixer.export_gain()));
}

/// Draw the range as `=` and the playhead as `|` over `width` cells
fn timeline_bar(layout: &TimelineLayout, width: usize) -> String {
    let cell = |fraction: f64| ((fraction * width as f64).round() as usize).min(width.saturating_sub(1));
    let start = (layout.start * width as f64).round() as usize;
    let end = (layout.end * width as f64).round() as usize;
    let playhead = cell(layout.playhead);

    (0..width)
        .map(|i| {
            if i == playhead {
                '|'
            } else if i >= start && i < end {
                '='
            } else {
                '-'
            }
        })
        .collect()
}

async fn run_job(
    container: &dyn AppContainer,
    session: &EditorSession<SimulatedPlayer>,
    output: Option<&Path>,
) -> Result<()> {
    let client = container.job_client();
    let policy = client.policy();
    debug!(
        interval_ms = policy.interval.as_millis() as u64,
        max_attempts = policy.max_attempts,
        "Submitting job"
    );
    let job = client.submit(
        session.source().cloned(),
        session.selection(),
        session.export_options(),
    );
    tokio::pin!(job);

    let result = tokio::select! {
        result = &mut job => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling job");
            client.cancel();
            job.await
        }
    };

    match result {
        Ok(video) => {
            let path = output_path(&video, &container.config().output_dir, output);
            write_output(&video, &path).await?;
            println!(
                "Saved {} ({})",
                path.display(),
                format_file_size(video.bytes.len() as u64)
            );
            Ok(())
        }
        Err(JobError::Cancelled) => {
            println!("Job cancelled");
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context("Processing job failed")),
    }
}
