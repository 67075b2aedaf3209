// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Executor tests: step ordering, error propagation, and cancellation.

use std::sync::Arc;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use feedhub_core::error::{AppError, ErrorCode};
use feedhub_core::machine::{self, Step, StepFuture};

/// Bundle a workflow under test threads through its steps. The trace is
/// shared so a test can inspect it even when the bundle is dropped on the
/// error path.
#[derive(Debug)]
struct TraceArgs {
    trace: Arc<Mutex<Vec<&'static str>>>,
    counter: u32,
}

impl TraceArgs {
    fn new() -> (Self, Arc<Mutex<Vec<&'static str>>>) {
        let trace = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                trace: trace.clone(),
                counter: 0,
            },
            trace,
        )
    }

    fn record(&self, name: &'static str) {
        self.trace.lock().unwrap().push(name);
    }
}

fn step_a(args: TraceArgs) -> StepFuture<TraceArgs> {
    Box::pin(async move {
        args.record("a");
        Ok((args, Some(Step(step_b))))
    })
}

fn step_b(args: TraceArgs) -> StepFuture<TraceArgs> {
    Box::pin(async move {
        args.record("b");
        Ok((args, None))
    })
}

fn step_failing(args: TraceArgs) -> StepFuture<TraceArgs> {
    Box::pin(async move {
        args.record("failing");
        Err(AppError::invalid("nope"))
    })
}

fn step_increment(mut args: TraceArgs) -> StepFuture<TraceArgs> {
    Box::pin(async move {
        args.counter += 1;
        Ok((args, Some(Step(step_assert_incremented))))
    })
}

fn step_assert_incremented(args: TraceArgs) -> StepFuture<TraceArgs> {
    Box::pin(async move {
        // The previous step's mutation must already be visible here.
        assert_eq!(args.counter, 1);
        args.record("saw_increment");
        Ok((args, None))
    })
}

#[tokio::test]
async fn test_runs_steps_in_order_until_none() {
    let cancel = CancellationToken::new();
    let (args, trace) = TraceArgs::new();

    let result = machine::run(&cancel, args, Some(Step(step_a))).await;

    assert!(result.is_ok());
    assert_eq!(*trace.lock().unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_error_stops_the_sequence() {
    let cancel = CancellationToken::new();
    let (args, trace) = TraceArgs::new();

    let err = machine::run(&cancel, args, Some(Step(step_failing)))
        .await
        .expect_err("step error must propagate");

    assert_eq!(err.code, ErrorCode::Invalid);
    assert_eq!(err.message.render(), "nope");
    // Only the failing step ran; nothing after it.
    assert_eq!(*trace.lock().unwrap(), vec!["failing"]);
}

#[tokio::test]
async fn test_none_start_is_a_no_op() {
    let cancel = CancellationToken::new();
    let (mut args, trace) = TraceArgs::new();
    args.counter = 42;

    let args = machine::run(&cancel, args, None).await.expect("no-op");

    assert_eq!(args.counter, 42);
    assert!(trace.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_pre_cancelled_token_runs_no_steps() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (args, trace) = TraceArgs::new();

    let err = machine::run(&cancel, args, Some(Step(step_a)))
        .await
        .expect_err("cancelled before the first step");

    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(err.status_code(), 500);
    assert!(trace.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_step_mutation_is_visible_to_the_next_step() {
    let cancel = CancellationToken::new();
    let (args, trace) = TraceArgs::new();

    let args = machine::run(&cancel, args, Some(Step(step_increment)))
        .await
        .expect("run");

    assert_eq!(args.counter, 1);
    assert_eq!(*trace.lock().unwrap(), vec!["saw_increment"]);
}
