//! Task scheduling
//!
//! Fields run concurrently; the rules of one field run one after another in
//! declaration order. A field that stops early skips the rest of its rules
//! once one of them reports errors, without touching other fields.
//!
//! Results come back indexed by position, field declaration order first and
//! rule order second, whatever order the validators finish in.

use std::future::Future;

use futures_util::future::join_all;
use tracing::debug;

use rulebook_core::{ErrorRecord, Result};

use crate::task::{Series, Task};

/// Run every task in `series` through `worker`.
///
/// `stops_early(field)` decides whether a field short-circuits on its first
/// failing rule. The returned list has one entry per task that ran.
///
/// # Errors
///
/// The first worker error, in positional order. Other fields still run to
/// completion before it is returned.
pub(crate) async fn run_series<'a, S, W, Fut>(
    series: &'a Series,
    stops_early: S,
    worker: W,
) -> Result<Vec<Vec<ErrorRecord>>>
where
    S: Fn(&str) -> bool,
    W: Fn(&'a Task) -> Fut,
    Fut: Future<Output = Result<Vec<ErrorRecord>>>,
{
    let worker = &worker;
    let fields = series.iter().map(|(field, tasks)| {
        let stop = stops_early(field);
        async move {
            let mut results = Vec::with_capacity(tasks.len());
            for (index, task) in tasks.iter().enumerate() {
                let errors = worker(task).await?;
                let failed = !errors.is_empty();
                results.push(errors);
                if stop && failed {
                    let skipped = tasks.len() - index - 1;
                    if skipped > 0 {
                        debug!(field = %field, skipped, "field stopped at first error");
                    }
                    break;
                }
            }
            Ok::<_, rulebook_core::SchemaError>(results)
        }
    });

    let mut results = Vec::new();
    for field in join_all(fields).await {
        results.extend(field?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use rulebook_core::{Descriptor, Rule, ValidateOptions};
    use serde_json::json;

    use crate::registry::Registry;
    use crate::task::build_series;

    fn series(rules: &Descriptor) -> Series {
        let source = json!({});
        let (series, _) =
            build_series(rules, &source, &ValidateOptions::default(), &Registry::default()).unwrap();
        series
    }

    fn descriptor() -> Descriptor {
        Descriptor::new()
            .field("slow", [Rule::string().message("slow 1"), Rule::string().message("slow 2")])
            .field("fast", [Rule::string().message("fast 1"), Rule::string().message("fast 2")])
    }

    // Fails every task with its rule message after a delay per field.
    async fn fail_after_delay(task: &Task, log: &Mutex<Vec<String>>) -> Result<Vec<ErrorRecord>> {
        let delay = if task.rule.field == "slow" { 20 } else { 1 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        let message = task.rule.message.clone().unwrap_or_default();
        log.lock().unwrap().push(message.clone());
        Ok(vec![ErrorRecord::for_rule(&task.rule, message)])
    }

    fn messages(results: &[Vec<ErrorRecord>]) -> Vec<&str> {
        results.iter().flatten().map(|e| e.message.as_str()).collect()
    }

    #[tokio::test]
    async fn test_results_follow_declaration_order() {
        let rules = descriptor();
        let series = series(&rules);
        let log = Mutex::new(Vec::new());

        let results = run_series(&series, |_| false, |task| fail_after_delay(task, &log))
            .await
            .unwrap();

        assert_eq!(messages(&results), vec!["slow 1", "slow 2", "fast 1", "fast 2"]);
        // The fast field finished first.
        assert_eq!(log.lock().unwrap()[0], "fast 1");
    }

    #[tokio::test]
    async fn test_stopping_field_skips_later_rules() {
        let rules = descriptor();
        let series = series(&rules);
        let log = Mutex::new(Vec::new());

        let results = run_series(&series, |field| field == "slow", |task| fail_after_delay(task, &log))
            .await
            .unwrap();

        assert_eq!(messages(&results), vec!["slow 1", "fast 1", "fast 2"]);
        assert!(!log.lock().unwrap().contains(&"slow 2".to_string()));
    }

    #[tokio::test]
    async fn test_passing_rules_do_not_stop() {
        let rules = descriptor();
        let series = series(&rules);
        let calls = Arc::new(Mutex::new(0));

        let results = run_series(&series, |_| true, |_task| {
            let calls = Arc::clone(&calls);
            async move {
                *calls.lock().unwrap() += 1;
                Ok(Vec::new())
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(*calls.lock().unwrap(), 4);
    }

    #[test]
    fn test_empty_series() {
        let series = Series::new();
        let results =
            tokio_test::block_on(run_series(&series, |_| true, |_task| async { Ok(Vec::new()) }))
                .unwrap();
        assert!(results.is_empty());
    }
}
