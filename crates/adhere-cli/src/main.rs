//! Adhere CLI application.
//!
//! Command-line interface for the Adhere reminder scheduler: one-shot plan
//! and reminder management plus a long-running dispatch service.

mod args;
mod cli;
mod renderer;

use std::{path::PathBuf, sync::Arc, time::Duration};

use adhere_core::{
    dispatch::run_dispatch_loop,
    params::ListPlans,
    ports::{LogTransport, SharedClock, SharedTimer, SharedTransport, SystemClock},
    Dispatcher, SchedulerBuilder, Sweeper, SweepResult, TimerQueue,
};
use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, RunArgs};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    if let Some(Run(run_args)) = command {
        return run_service(database_file, run_args, renderer).await;
    }

    let scheduler = SchedulerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize scheduler")?;

    let cli = Cli::new(scheduler, renderer);

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Reminder { command }) => cli.handle_reminder_command(command).await,
        Some(Extract(extract_args)) => cli.extract(extract_args).await,
        _ => cli.list_plans(&ListPlans::default()).await,
    }
}

/// Runs the dispatch loop and the due-reminder sweeper until interrupted.
///
/// Timers armed before a restart are gone with the old process; the first
/// sweep cycle fires immediately and re-dispatches whatever came due in the
/// meantime.
async fn run_service(
    database_file: Option<PathBuf>,
    run_args: RunArgs,
    renderer: TerminalRenderer,
) -> Result<()> {
    let clock: SharedClock = Arc::new(SystemClock);
    let transport: SharedTransport = Arc::new(LogTransport);
    let (timer_queue, jobs) = TimerQueue::new();
    let timer: SharedTimer = Arc::new(timer_queue);

    let scheduler = SchedulerBuilder::new()
        .with_database_path(database_file)
        .with_clock(Arc::clone(&clock))
        .with_timer(Arc::clone(&timer))
        .build()
        .await
        .context("Failed to initialize scheduler")?;

    let db_path = scheduler.database_path().to_path_buf();
    let dispatcher = Dispatcher::new(
        db_path.clone(),
        transport,
        Arc::clone(&timer),
        Arc::clone(&clock),
    );
    let sweeper = Sweeper::new(db_path, Arc::clone(&dispatcher), Arc::clone(&clock));

    if run_args.once {
        let count = sweeper.sweep(None).await.context("Sweep failed")?;
        return renderer.render(&SweepResult(count).to_string());
    }

    info!("Adhere dispatch service started");

    let period = Duration::from_secs(run_args.sweep_interval);
    let dispatch_task = tokio::spawn(run_dispatch_loop(dispatcher, jobs, Arc::clone(&clock)));
    let sweep_task = tokio::spawn(async move { sweeper.run(period).await });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    dispatch_task.abort();
    sweep_task.abort();

    Ok(())
}
