//! Command argument definitions and handlers.
//!
//! Argument structs here carry the clap derives and convert into the core's
//! parameter types, keeping `adhere-core` free of CLI framework concerns.
//! Conversions that cannot fail use `From`; the ones that validate user
//! input (dates, JSON payloads) convert through fallible `into_params`
//! methods instead.

use std::io::Read;
use std::path::PathBuf;

use adhere_core::{
    extract::parse_extraction,
    models::Frequency,
    params::{CheckIn, CreatePlan, Id, ListPlans, ListReminders},
    CheckInResult, CreateResult, PlanSummaries, Reminders, Scheduler,
};
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::{civil::Date, tz::TimeZone, Timestamp};

use crate::renderer::TerminalRenderer;

fn parse_date(value: &str) -> std::result::Result<Date, String> {
    value.parse().map_err(|e| format!("invalid date: {e}"))
}

fn parse_instant(value: &str) -> std::result::Result<Timestamp, String> {
    value.parse().map_err(|e| format!("invalid timestamp: {e}"))
}

fn today_utc() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

/// Command-line representation of the recurrence cadence
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FrequencyArg {
    /// One occurrence per day
    Daily,
    /// One occurrence per week
    Weekly,
    /// One occurrence per month
    Monthly,
    /// Opaque custom schedule, stored but not expanded
    Custom,
}

impl From<FrequencyArg> for Frequency {
    fn from(val: FrequencyArg) -> Self {
        match val {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Custom => Frequency::Custom,
        }
    }
}

/// Create and activate an action plan
///
/// Activating a plan supersedes the patient's previous active plan and
/// materializes the full reminder sequence in one transaction.
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Patient the plan is for
    pub patient_id: u64,
    /// Prescribed action text (becomes each reminder's title)
    pub action: String,
    /// Recurrence cadence
    #[arg(short, long, value_enum, default_value_t = FrequencyArg::Daily)]
    pub frequency: FrequencyArg,
    /// Date of the first occurrence (YYYY-MM-DD); defaults to today
    #[arg(short, long, value_parser = parse_date)]
    pub start_date: Option<Date>,
    /// Number of occurrences to schedule
    #[arg(short, long, default_value_t = 7)]
    pub duration: i64,
    /// Clinical note the plan came from
    #[arg(long)]
    pub note: Option<u64>,
    /// Custom schedule payload as JSON (stored alongside the plan)
    #[arg(long)]
    pub custom_schedule: Option<String>,
}

impl CreatePlanArgs {
    fn into_params(self) -> Result<CreatePlan> {
        let custom_schedule = self
            .custom_schedule
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .context("Invalid custom schedule JSON")?;

        Ok(CreatePlan {
            patient_id: self.patient_id,
            note_id: self.note,
            action: self.action,
            frequency: self.frequency.into(),
            custom_schedule,
            start_date: self.start_date.unwrap_or_else(today_utc),
            duration_days: self.duration,
        })
    }
}

/// List plans with reminder progress counts
#[derive(Args)]
pub struct ListPlansArgs {
    /// Restrict the listing to one patient's plans
    #[arg(long)]
    pub patient: Option<u64>,
    /// Include superseded plans alongside active ones
    #[arg(long)]
    pub all: bool,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            patient_id: val.patient,
            include_inactive: val.all,
        }
    }
}

/// Show details of a specific plan
#[derive(Args)]
pub struct ShowPlanArgs {
    /// ID of the plan to display
    #[arg(help = "Unique identifier of the plan to show details for")]
    pub id: u64,
}

impl From<ShowPlanArgs> for Id {
    fn from(val: ShowPlanArgs) -> Self {
        Id { id: val.id }
    }
}

/// Show a patient's currently active plan
#[derive(Args)]
pub struct ActivePlanArgs {
    /// Patient whose active plan to display
    pub patient_id: u64,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create and activate an action plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show details of a specific plan
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// Show a patient's currently active plan
    #[command(alias = "a")]
    Active(ActivePlanArgs),
}

/// List a plan's reminders in sequence order
#[derive(Args)]
pub struct ListRemindersArgs {
    /// Plan whose reminders to list
    pub plan_id: u64,
}

impl From<ListRemindersArgs> for ListReminders {
    fn from(val: ListRemindersArgs) -> Self {
        ListReminders {
            plan_id: val.plan_id,
        }
    }
}

/// Check in on a reminder
///
/// A late check-in re-anchors the next reminder to tomorrow at the original
/// time-of-day; a check-in on a later calendar day also extends the plan by
/// one occurrence so no dose is silently dropped.
#[derive(Args)]
pub struct CheckInArgs {
    /// ID of the reminder to check in
    pub id: u64,
    /// Check-in instant (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<Timestamp>,
}

impl From<CheckInArgs> for CheckIn {
    fn from(val: CheckInArgs) -> Self {
        CheckIn {
            reminder_id: val.id,
            at: val.at,
        }
    }
}

/// List reminders that are due
#[derive(Args)]
pub struct DueArgs {
    /// Evaluate due-ness at this instant (RFC 3339) instead of now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<Timestamp>,
}

#[derive(Subcommand)]
pub enum ReminderCommands {
    /// List a plan's reminders in sequence order
    #[command(aliases = ["l", "ls"])]
    List(ListRemindersArgs),
    /// Check in on a reminder
    #[command(aliases = ["c", "done"])]
    CheckIn(CheckInArgs),
    /// List reminders that are due
    #[command(alias = "d")]
    Due(DueArgs),
}

/// Activate plans from a note-extraction payload
///
/// Reads the extraction service's output (JSON, possibly wrapped in prose)
/// and activates one plan per extracted action. Checklist items are printed
/// for the caller but not scheduled.
#[derive(Args)]
pub struct ExtractArgs {
    /// Patient the extracted plans are for
    pub patient_id: u64,
    /// Clinical note the payload was extracted from
    #[arg(long)]
    pub note: Option<u64>,
    /// Date of the first occurrence (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<Date>,
    /// Read the payload from this file instead of standard input
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Run the notification dispatch service
#[derive(Args)]
pub struct RunArgs {
    /// Run a single sweep cycle and exit instead of serving
    #[arg(long)]
    pub once: bool,
    /// Seconds between sweep cycles
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,
}

/// Command handler that owns the scheduler and the terminal renderer.
pub struct Cli {
    scheduler: Scheduler,
    renderer: TerminalRenderer,
}

impl Cli {
    /// Create a new CLI handler
    pub fn new(scheduler: Scheduler, renderer: TerminalRenderer) -> Self {
        Self {
            scheduler,
            renderer,
        }
    }

    /// Handle plan-related commands
    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let params = args.into_params()?;
                let plan = self
                    .scheduler
                    .create_plan(&params)
                    .await
                    .context("Failed to create plan")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => {
                let params: Id = args.into();
                let plan = self
                    .scheduler
                    .get_plan(&params)
                    .await
                    .context("Failed to get plan")?;
                match plan {
                    Some(plan) => self.renderer.render(&plan.to_string()),
                    None => self
                        .renderer
                        .render(&format!("Plan with ID {} not found.\n", params.id)),
                }
            }
            PlanCommands::Active(args) => {
                let plan = self
                    .scheduler
                    .active_plan_for_patient(args.patient_id)
                    .await
                    .context("Failed to get active plan")?;
                match plan {
                    Some(plan) => self.renderer.render(&plan.to_string()),
                    None => self.renderer.render(&format!(
                        "No active plan for patient {}.\n",
                        args.patient_id
                    )),
                }
            }
        }
    }

    /// Handle reminder-related commands
    pub async fn handle_reminder_command(&self, command: ReminderCommands) -> Result<()> {
        match command {
            ReminderCommands::List(args) => {
                let reminders = self
                    .scheduler
                    .list_reminders(&args.into())
                    .await
                    .context("Failed to list reminders")?;
                self.renderer.render(&Reminders(reminders).to_string())
            }
            ReminderCommands::CheckIn(args) => {
                let outcome = self
                    .scheduler
                    .check_in(&args.into())
                    .await
                    .context("Failed to check in")?;
                self.renderer.render(&CheckInResult(outcome).to_string())
            }
            ReminderCommands::Due(args) => {
                let due = self
                    .scheduler
                    .due_reminders(args.at)
                    .await
                    .context("Failed to list due reminders")?;
                self.renderer.render(&Reminders(due).to_string())
            }
        }
    }

    /// Activate plans from an extraction payload
    pub async fn extract(&self, args: ExtractArgs) -> Result<()> {
        let raw = match &args.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read payload from stdin")?;
                buffer
            }
        };

        let note = parse_extraction(&raw).context("Failed to parse extraction payload")?;
        let start_date = args.start_date.unwrap_or_else(today_utc);

        let mut output = String::new();
        if !note.checklist_items.is_empty() {
            output.push_str("# Checklist\n\n");
            for item in &note.checklist_items {
                output.push_str(&format!("- [ ] {}\n", item.task));
            }
            output.push('\n');
        }

        for action in note.action_plans {
            let params = action.into_create_plan(args.patient_id, args.note, start_date);
            let plan = self
                .scheduler
                .create_plan(&params)
                .await
                .context("Failed to create extracted plan")?;
            output.push_str(&CreateResult::new(plan).to_string());
        }

        if output.is_empty() {
            output.push_str("Nothing to schedule.\n");
        }

        self.renderer.render(&output)
    }

    /// List plans and render them
    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let summaries = self
            .scheduler
            .list_plans(params)
            .await
            .context("Failed to list plans")?;
        self.renderer.render(&PlanSummaries(summaries).to_string())
    }
}
