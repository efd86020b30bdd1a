//! Worker loop cycles against a real store and a scripted executor.

mod common;

use std::sync::Arc;

use serde_json::json;
use vanguard::adapters::executors::{MockExecutor, MockResponse};
use vanguard::domain::models::StepStatus;
use vanguard::domain::ports::{MissionStore, StepExecutor, StepStore};
use vanguard::services::fault_breaker::FaultBreakerConfig;
use vanguard::services::worker::{TickOutcome, Worker, WorkerConfig};

use common::{seed_mission, setup_stores};

fn worker_config(failure_threshold: u32, cool_down: chrono::Duration) -> WorkerConfig {
    WorkerConfig {
        breaker: FaultBreakerConfig {
            failure_threshold,
            cool_down,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_tick_claims_executes_and_completes() {
    let (steps, missions) = setup_stores().await;
    let (_, seeded) = seed_mission(&steps, &missions, "happy-path", 1).await;

    let executor = Arc::new(MockExecutor::with_default_response(MockResponse::success(
        json!({"answer": 42}),
    )));
    let mut worker = Worker::new(
        "worker-0",
        steps.clone(),
        executor.clone() as Arc<dyn StepExecutor>,
        WorkerConfig::default(),
    );

    let outcome = worker.tick().await.expect("tick failed");
    match outcome {
        TickOutcome::Completed {
            step_id,
            succeeded,
            signal,
        } => {
            assert_eq!(step_id, seeded[0].id);
            assert!(succeeded);
            assert!(signal.is_finalized());
        }
        other => panic!("expected a completion, got {other:?}"),
    }
    assert_eq!(executor.call_count(), 1);

    let step = steps
        .get(seeded[0].id)
        .await
        .expect("get step")
        .expect("step missing");
    assert_eq!(step.status, StepStatus::Succeeded);
    assert_eq!(step.claimed_by.as_deref(), Some("worker-0"));
    assert_eq!(step.output, Some(json!({"answer": 42})));
}

#[tokio::test]
async fn test_tick_is_idle_on_empty_queue() {
    let (steps, _missions) = setup_stores().await;
    let executor = Arc::new(MockExecutor::new());
    let mut worker = Worker::new(
        "worker-0",
        steps,
        executor.clone() as Arc<dyn StepExecutor>,
        WorkerConfig::default(),
    );

    assert_eq!(worker.tick().await.expect("tick failed"), TickOutcome::Idle);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_failures_open_breaker_and_throttle() {
    let (steps, missions) = setup_stores().await;
    seed_mission(&steps, &missions, "all-failing", 5).await;

    let executor = Arc::new(MockExecutor::with_default_response(MockResponse::failure(
        "provider down",
    )));
    let mut worker = Worker::new(
        "worker-0",
        steps.clone(),
        executor.clone() as Arc<dyn StepExecutor>,
        worker_config(3, chrono::Duration::minutes(5)),
    );

    for _ in 0..3 {
        let outcome = worker.tick().await.expect("tick failed");
        assert!(matches!(
            outcome,
            TickOutcome::Completed {
                succeeded: false,
                ..
            }
        ));
    }

    // Breaker opened on the third consecutive failure; no further claims.
    assert_eq!(
        worker.tick().await.expect("tick failed"),
        TickOutcome::Throttled
    );
    assert_eq!(executor.call_count(), 3);

    // Failed steps are still reported to the store as terminal.
    let step = steps
        .pending_candidates(10)
        .await
        .expect("pending candidates");
    assert_eq!(step.len(), 2);
}

#[tokio::test]
async fn test_breaker_recovers_after_cool_down() {
    let (steps, missions) = setup_stores().await;
    let (_, seeded) = seed_mission(&steps, &missions, "recovery", 2).await;

    let executor = Arc::new(MockExecutor::new());
    executor
        .set_response_for_step(seeded[0].id, MockResponse::failure("flaky"))
        .await;

    let mut worker = Worker::new(
        "worker-0",
        steps.clone(),
        executor.clone() as Arc<dyn StepExecutor>,
        worker_config(1, chrono::Duration::milliseconds(50)),
    );

    let outcome = worker.tick().await.expect("tick failed");
    assert!(matches!(
        outcome,
        TickOutcome::Completed {
            succeeded: false,
            ..
        }
    ));
    assert_eq!(
        worker.tick().await.expect("tick failed"),
        TickOutcome::Throttled
    );

    tokio::time::sleep(std::time::Duration::from_millis(80)).await;

    // Half-open probe succeeds and closes the breaker again.
    let outcome = worker.tick().await.expect("tick failed");
    match outcome {
        TickOutcome::Completed {
            step_id, succeeded, ..
        } => {
            assert_eq!(step_id, seeded[1].id);
            assert!(succeeded);
        }
        other => panic!("expected a completion, got {other:?}"),
    }
    assert!(!worker.breaker().is_open());
}

#[tokio::test]
async fn test_two_workers_split_the_queue_without_overlap() {
    let (steps, missions) = setup_stores().await;
    let (mission, _) = seed_mission(&steps, &missions, "shared-queue", 6).await;

    let executor: Arc<dyn StepExecutor> = Arc::new(MockExecutor::new());
    let mut alpha = Worker::new(
        "worker-alpha",
        steps.clone(),
        executor.clone(),
        WorkerConfig::default(),
    );
    let mut beta = Worker::new(
        "worker-beta",
        steps.clone(),
        executor.clone(),
        WorkerConfig::default(),
    );

    let mut finalized = 0;
    loop {
        let a = alpha.tick().await.expect("alpha tick");
        let b = beta.tick().await.expect("beta tick");
        for outcome in [&a, &b] {
            if let TickOutcome::Completed { signal, .. } = outcome {
                if signal.is_finalized() {
                    finalized += 1;
                }
            }
        }
        if a == TickOutcome::Idle && b == TickOutcome::Idle {
            break;
        }
    }
    assert_eq!(finalized, 1);

    let missions_after = missions
        .get(mission.id)
        .await
        .expect("get mission")
        .expect("mission missing");
    assert!(missions_after.finalized_at.is_some());

    // Every step was completed by exactly one of the two workers.
    let all = steps
        .list(vanguard::domain::ports::StepFilter::default())
        .await
        .expect("list steps");
    assert_eq!(all.len(), 6);
    for step in all {
        assert_eq!(step.status, StepStatus::Succeeded);
        let holder = step.claimed_by.as_deref().expect("holder missing");
        assert!(holder == "worker-alpha" || holder == "worker-beta");
    }
}
