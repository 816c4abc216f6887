//! Given steps for task lifecycle BDD scenarios.

use std::time::Duration;

use super::world::TaskLifecycleWorld;
use rstest_bdd_macros::given;

#[given("a task service whose tasks take {millis:u64} milliseconds")]
fn task_service_with_duration(world: &mut TaskLifecycleWorld, millis: u64) {
    world.configure(Duration::from_millis(millis));
}
