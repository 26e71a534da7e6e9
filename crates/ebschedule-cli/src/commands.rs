use std::io::Write;
use std::path::Path;

use anyhow::Context;
use ebschedule_client::{HttpScheduler, SchedulerClient};
use ebschedule_diff::{text, to_document, Labeled, Normalizer};
use ebschedule_types::{CreateScheduleGroupInput, GetScheduleGroupInput};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::*;
use crate::config::FileConfig;
use crate::input::prepare_input_schedule;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    if let Command::Version = cli.command {
        return cmd_version(&mut stdout);
    }

    let config = FileConfig::load(cli.config.as_deref())?.with_overrides(cli.endpoint, cli.region);
    let normalizer = Normalizer::new(config.normalize.clone()).context("load normalize settings")?;
    let client = HttpScheduler::new(&config.client).context("configure scheduler client")?;
    debug!(endpoint = %client.base_url(), "using scheduler endpoint");

    execute(cli.command, &client, &normalizer, &mut stdout).await
}

pub async fn execute<W: Write>(
    command: Command,
    client: &dyn SchedulerClient,
    normalizer: &Normalizer,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Diff(args) => cmd_diff(&args.schedule, client, normalizer, out).await,
        Command::Update(args) => cmd_update(&args, client, out).await,
        Command::Version => cmd_version(out),
    }
}

fn cmd_version<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

async fn cmd_diff<W: Write>(
    path: &Path,
    client: &dyn SchedulerClient,
    normalizer: &Normalizer,
    out: &mut W,
) -> anyhow::Result<()> {
    let schedule = prepare_input_schedule(path).context("prepare input schedule")?;

    let current = match client.get_schedule(&schedule.lookup()).await {
        Ok(current) => Some(current),
        Err(err) if err.is_not_found() => {
            debug!(error = %err, "schedule does not exist yet");
            None
        }
        Err(err) => return Err(err).context("get schedule"),
    };

    let to_label = path.display().to_string();
    let from = current
        .as_ref()
        .map(|c| Labeled::new(c.arn.as_deref().unwrap_or_default(), c));
    let diff = normalizer
        .diff(from, Labeled::new(&to_label, &schedule))
        .context("diff schedule")?;
    write!(out, "{diff}")?;
    Ok(())
}

async fn cmd_update<W: Write>(
    args: &UpdateArgs,
    client: &dyn SchedulerClient,
    out: &mut W,
) -> anyhow::Result<()> {
    let schedule = prepare_input_schedule(&args.schedule).context("prepare input schedule")?;
    let group_name = schedule.group_name.clone().unwrap_or_default();

    let group = GetScheduleGroupInput { name: schedule.group_name.clone() };
    match client.get_schedule_group(&group).await {
        Ok(_) => {}
        Err(err) if err.is_not_found() && args.create_schedule_group => {
            info!(group = %group_name, "schedule group does not exist, creating it");
            let created = client
                .create_schedule_group(&CreateScheduleGroupInput {
                    name: schedule.group_name.clone(),
                    ..Default::default()
                })
                .await
                .context("create schedule group")?;
            // A failure to print the group result does not stop the schedule update.
            let _ = output_result(&created, out);
        }
        Err(err) => return Err(err).context("get schedule group"),
    }

    let name = schedule.name.clone().unwrap_or_default();
    match client.get_schedule(&schedule.lookup()).await {
        Ok(_) => {
            let updated = client
                .update_schedule(&schedule.into())
                .await
                .context("update schedule")?;
            info!(group = %group_name, schedule = %name, "updated schedule");
            output_result(&updated, out)
        }
        Err(err) if err.is_not_found() => {
            let created = client
                .create_schedule(&schedule)
                .await
                .context("create schedule")?;
            info!(group = %group_name, schedule = %name, "created schedule");
            output_result(&created, out)
        }
        Err(err) => Err(err).context("get schedule"),
    }
}

/// Print an API result as a `---` separated block document.
fn output_result<T: Serialize, W: Write>(result: &T, out: &mut W) -> anyhow::Result<()> {
    let doc = to_document(result).context("convert result")?;
    writeln!(out, "---")?;
    write!(out, "{}", text::render(&doc))?;
    Ok(())
}
