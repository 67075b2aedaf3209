// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Generic sequential workflow executor.
//!
//! This factors "what changes state" (the business steps) away from "how the
//! sequence is driven and interrupted". A workflow is a chain of [`Step`]s;
//! each step owns the argument bundle for the duration of its call, does its
//! work, and either names the next step or terminates the sequence. The
//! executor drives the chain, checking the cancellation token once per
//! iteration and stopping at the first error.
//!
//! The executor performs no retries and no compensation: side effects a
//! failed step already made stay in place, and any per-step atomicity comes
//! from the store collaborator's own transaction.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

/// Future returned by one step invocation.
pub type StepFuture<T> =
    Pin<Box<dyn Future<Output = Result<(T, Option<Step<T>>)>> + Send>>;

/// One unit of work in a workflow.
///
/// A step takes the argument bundle by value and resolves to the updated
/// bundle plus the next step, or `None` to terminate with success, or an
/// [`AppError`] to terminate the sequence immediately.
///
/// Termination is only guaranteed if every step eventually returns `None`
/// or a different step; a step that unconditionally returns itself loops
/// forever. The executor does not guard against that.
pub struct Step<T>(pub fn(T) -> StepFuture<T>);

impl<T> Clone for Step<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Step<T> {}

/// Drive a workflow from `start` until a step terminates it or fails.
///
/// A `None` start is a no-op: the args come back untouched. Otherwise the
/// loop checks `cancel` before invoking each step; once cancelled, no
/// further step runs, even if the previous iteration already selected one.
/// A step that is already executing is never preempted.
///
/// # Errors
///
/// Returns the first step error unchanged, or an internal "workflow
/// cancelled" error when the token fires between steps. The argument bundle
/// is owned by the invocation and dropped on the error path.
pub async fn run<T: Send>(
    cancel: &CancellationToken,
    args: T,
    start: Option<Step<T>>,
) -> Result<T> {
    let Some(mut current) = start else {
        return Ok(args);
    };

    let mut args = args;
    loop {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        let (next_args, next) = (current.0)(args).await?;
        args = next_args;

        match next {
            Some(step) => current = step,
            None => return Ok(args),
        }
    }
}

/// Error returned when the sequence stops at the cancellation check.
///
/// Cancellation is not a client fault, so it surfaces as internal; the
/// boundary maps it to a 500 like any other non-business failure.
pub fn cancelled() -> AppError {
    AppError::internal("workflow cancelled")
}
