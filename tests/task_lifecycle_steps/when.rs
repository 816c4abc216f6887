//! When steps for task lifecycle BDD scenarios.

use std::time::Duration;

use super::world::{TaskLifecycleWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use rstest_bdd_macros::when;
use tasktrack::task::domain::TaskStatus;

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const POLL_LIMIT: Duration = Duration::from_secs(5);

#[when("a task is submitted")]
fn submit_task(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let started = Utc::now();
    let submission = run_async(world.service()?.submit()).wrap_err("submit task")?;
    world.submitted_at = Some(started);
    world.submitted.push(submission.guid());
    world.pending_run = Some(submission.into_run());
    Ok(())
}

#[when("{count:usize} tasks are submitted")]
fn submit_many(world: &mut TaskLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let service = world.service()?.clone();
    let submissions = run_async(async move {
        let mut joins = Vec::with_capacity(count);
        for _ in 0..count {
            let submitting = service.clone();
            joins.push(tokio::spawn(async move { submitting.submit().await }));
        }
        let mut guids = Vec::with_capacity(count);
        for join in joins {
            let submission = join.await.wrap_err("join submission")??;
            guids.push(submission.guid());
        }
        Ok::<_, eyre::Report>(guids)
    })?;
    world.submitted.extend(submissions);
    Ok(())
}

#[when("the task run is awaited")]
fn await_run(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let run = world
        .pending_run
        .take()
        .ok_or_else(|| eyre::eyre!("no pending run in scenario world"))?;
    let status = run_async(run.wait()).wrap_err("await task run")?;
    world.last_run_status = Some(status);
    Ok(())
}

#[when(r#"the task is polled until it reports "{status}""#)]
fn poll_until(world: &mut TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let guid = world.last_submitted()?.to_string();
    let service = world.service()?;

    let outcome = run_async(async {
        let deadline = tokio::time::Instant::now() + POLL_LIMIT;
        loop {
            let snapshot = service.query(&guid).await?;
            if snapshot.status == target {
                return Ok(snapshot);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(eyre::eyre!(
                    "task {guid} still {} after polling for {target}",
                    snapshot.status
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    })?;
    world.last_query = Some(Ok(outcome));
    Ok(())
}

#[when(r#"the status of "{text}" is queried"#)]
fn query_status(world: &mut TaskLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    let result = run_async(world.service()?.query(&text));
    world.last_query = Some(result);
    Ok(())
}
