use std::future::Future;

use crate::error::RunError;

/// What to do when a unit of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop the whole batch after the failing unit finishes.
    FailFast,
    /// Record the failure and keep going.
    BestEffort,
}

/// One deployable unit of a batch, grouped and ordered by `priority`.
#[derive(Debug, Clone)]
pub struct BatchUnit<T> {
    pub name: String,
    pub priority: Option<i64>,
    pub payload: T,
}

/// Structured outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Group units by priority, ascending, units without a priority last.
/// The stable sort preserves discovery order within each group.
pub fn priority_groups<T>(mut units: Vec<BatchUnit<T>>) -> Vec<(Option<i64>, Vec<BatchUnit<T>>)> {
    units.sort_by_key(|u| match u.priority {
        Some(p) => (0, p),
        None => (1, 0),
    });
    let mut groups: Vec<(Option<i64>, Vec<BatchUnit<T>>)> = Vec::new();
    for unit in units {
        match groups.last_mut() {
            Some((priority, members)) if *priority == unit.priority => members.push(unit),
            _ => groups.push((unit.priority, vec![unit])),
        }
    }
    groups
}

/// Run `action` for every unit, priority group by priority group.
///
/// Every member of a group completes before the next group starts; within
/// a group, members run sequentially in the order they were discovered.
pub async fn run_batch<T, F, Fut>(
    units: Vec<BatchUnit<T>>,
    policy: BatchPolicy,
    mut action: F,
) -> BatchReport
where
    F: FnMut(BatchUnit<T>) -> Fut,
    Fut: Future<Output = Result<(), RunError>>,
{
    let mut report = BatchReport::default();
    'groups: for (priority, group) in priority_groups(units) {
        match priority {
            Some(p) => tracing::info!("Priority group {} ({} unit(s))", p, group.len()),
            None => tracing::info!("Unprioritized group ({} unit(s))", group.len()),
        }
        for unit in group {
            let name = unit.name.clone();
            match action(unit).await {
                Ok(()) => report.succeeded.push(name),
                Err(e) => {
                    tracing::error!("'{}' failed: {}", name, e);
                    report.failed.push((name, e.to_string()));
                    if policy == BatchPolicy::FailFast {
                        break 'groups;
                    }
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn unit(name: &str, priority: Option<i64>) -> BatchUnit<()> {
        BatchUnit {
            name: name.to_string(),
            priority,
            payload: (),
        }
    }

    #[test]
    fn groups_are_ascending_with_unprioritized_last() {
        let groups = priority_groups(vec![
            unit("c", Some(2)),
            unit("x", None),
            unit("a", Some(1)),
            unit("b", Some(1)),
        ]);
        let keys: Vec<Option<i64>> = groups.iter().map(|(p, _)| *p).collect();
        assert_eq!(keys, vec![Some(1), Some(2), None]);
        let first: Vec<&str> = groups[0].1.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(first, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn lower_priority_group_completes_before_next_begins() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let log = order.clone();
        let report = run_batch(
            vec![unit("a", Some(1)), unit("b", Some(1)), unit("c", Some(2))],
            BatchPolicy::BestEffort,
            move |u| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(u.name);
                    Ok(())
                }
            },
        )
        .await;
        assert!(report.ok());
        let order = order.lock().unwrap().clone();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn best_effort_collects_failures_and_continues() {
        let report = run_batch(
            vec![unit("a", Some(1)), unit("b", Some(1)), unit("c", Some(2))],
            BatchPolicy::BestEffort,
            |u| async move {
                if u.name == "b" {
                    Err(RunError::Config("boom".into()))
                } else {
                    Ok(())
                }
            },
        )
        .await;
        assert_eq!(report.succeeded, vec!["a", "c"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "b");
    }

    #[tokio::test]
    async fn fail_fast_stops_after_the_failing_unit() {
        let report = run_batch(
            vec![unit("a", Some(1)), unit("b", Some(1)), unit("c", Some(2))],
            BatchPolicy::FailFast,
            |u| async move {
                if u.name == "a" {
                    Err(RunError::Config("boom".into()))
                } else {
                    Ok(())
                }
            },
        )
        .await;
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 1);
    }
}
