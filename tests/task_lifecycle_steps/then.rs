//! Then steps for task lifecycle BDD scenarios.

use std::collections::HashSet;

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tasktrack::task::{
    domain::{TaskGuid, TaskStatus},
    services::TaskServiceError,
};

fn expected_status(status: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))
}

#[then("the submitted identifier is a canonical GUID")]
fn identifier_is_canonical(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let text = world.last_submitted()?.to_string();
    let reparsed = TaskGuid::parse(&text).wrap_err("reparse submitted identifier")?;
    if text.len() != 36 || reparsed.to_string() != text {
        return Err(eyre::eyre!("identifier {text} is not canonical"));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let guid = world.last_submitted()?.to_string();
    let snapshot = run_async(world.service()?.query(&guid)).wrap_err("query task status")?;
    if snapshot.status != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            snapshot.status
        ));
    }
    Ok(())
}

#[then("the task timestamp is not before the submission")]
fn timestamp_not_before_submission(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let submitted_at = world
        .submitted_at
        .ok_or_else(|| eyre::eyre!("missing submission time"))?;
    let snapshot = match world.last_query.as_ref() {
        Some(Ok(snapshot)) => snapshot,
        other => return Err(eyre::eyre!("expected a successful query, got {other:?}")),
    };
    if snapshot.timestamp < submitted_at {
        return Err(eyre::eyre!(
            "timestamp {} precedes submission at {submitted_at}",
            snapshot.timestamp
        ));
    }
    Ok(())
}

#[then(r#"the run reports "{status}""#)]
fn run_reports(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let reported = world
        .last_run_status
        .ok_or_else(|| eyre::eyre!("task run was not awaited"))?;
    if reported != expected {
        return Err(eyre::eyre!("expected run to report {expected}, got {reported}"));
    }
    Ok(())
}

#[then("all submitted identifiers are distinct")]
fn identifiers_distinct(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let unique: HashSet<TaskGuid> = world.submitted.iter().copied().collect();
    if unique.len() != world.submitted.len() {
        return Err(eyre::eyre!(
            "{} submissions produced {} distinct identifiers",
            world.submitted.len(),
            unique.len()
        ));
    }
    Ok(())
}

#[then("the store holds {count:usize} tasks")]
fn store_holds(world: &TaskLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = world.repository.len().wrap_err("count stored tasks")?;
    if stored != count {
        return Err(eyre::eyre!("expected {count} stored tasks, found {stored}"));
    }
    Ok(())
}

#[then("the query fails with a malformed identifier error")]
fn query_fails_malformed(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_query
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing query result"))?;
    if !matches!(result, Err(TaskServiceError::MalformedIdentifier(_))) {
        return Err(eyre::eyre!(
            "expected MalformedIdentifier error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the query fails with a not found error")]
fn query_fails_not_found(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_query
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing query result"))?;
    if !matches!(result, Err(TaskServiceError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}
