// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sign-up and sign-in workflows.
//!
//! Both entry points pre-validate synchronously, aggregating every missing
//! field into one invalid-input error, then run their step sequence through
//! the executor:
//!
//! - sign-up: `check_available` → `create_auth_and_user` → `issue_token`
//! - sign-in: `lookup` → `verify_password` → `issue_token`
//!
//! The sign-in failure message is identical for an unknown email and a
//! wrong password; the response must not reveal which part was wrong.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::auth::{Auth, AuthStore};
use crate::error::{
    AppError, MSG_EMAIL_REQUIRED, MSG_INVALID_CREDENTIALS, MSG_NAME_REQUIRED,
    MSG_PASSWORD_REQUIRED, MSG_USER_EXISTS,
};
use crate::hash;
use crate::machine::{self, Step, StepFuture};
use crate::token::TokenSigner;

/// Default bearer token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Sign-up / sign-in workflows over an [`AuthStore`].
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    signer: TokenSigner,
    token_ttl_hours: i64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish_non_exhaustive()
    }
}

/// Argument bundle threaded through one authentication workflow invocation.
///
/// Owned exclusively by the in-flight invocation; each step takes it by
/// value and hands it to the next.
struct AuthArgs {
    store: Arc<dyn AuthStore>,
    signer: TokenSigner,
    token_ttl_hours: i64,
    /// The identity being created (sign-up) or matched against (sign-in).
    auth: Auth,
    /// The stored identity found by the sign-in lookup step.
    matched: Option<Auth>,
}

impl AuthService {
    /// Create a service with the default token lifetime.
    pub fn new(store: Arc<dyn AuthStore>, signer: TokenSigner) -> Self {
        Self {
            store,
            signer,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }

    /// Override the bearer token lifetime.
    pub fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }

    /// Register a new identity and subject profile; returns a bearer token.
    ///
    /// # Errors
    ///
    /// Invalid-input for missing fields (all aggregated) or an email that
    /// already has an identity; internal for store or hashing failure.
    #[instrument(skip_all, fields(email = %auth.basic.email))]
    pub async fn sign_up(
        &self,
        cancel: &CancellationToken,
        auth: Auth,
    ) -> Result<String, AppError> {
        validate_sign_up(&auth)?;

        let args = self.args(auth);
        let args = machine::run(cancel, args, Some(Step(check_available))).await?;

        info!(user_id = args.auth.user_id, "identity created");
        take_token(args)
    }

    /// Authenticate an existing identity; returns a bearer token.
    ///
    /// # Errors
    ///
    /// Invalid-input for missing fields; unauthorized (one shared message)
    /// for an unknown email or a wrong password; internal otherwise.
    #[instrument(skip_all, fields(email = %auth.basic.email))]
    pub async fn sign_in(
        &self,
        cancel: &CancellationToken,
        auth: Auth,
    ) -> Result<String, AppError> {
        validate_sign_in(&auth)?;

        let args = self.args(auth);
        let args = machine::run(cancel, args, Some(Step(lookup))).await?;

        debug!(user_id = args.auth.user_id, "identity authenticated");
        take_token(args)
    }

    fn args(&self, auth: Auth) -> AuthArgs {
        AuthArgs {
            store: self.store.clone(),
            signer: self.signer.clone(),
            token_ttl_hours: self.token_ttl_hours,
            auth,
            matched: None,
        }
    }
}

fn take_token(args: AuthArgs) -> Result<String, AppError> {
    args.auth
        .token
        .ok_or_else(|| AppError::internal("workflow finished without a token"))
}

fn validate_sign_up(auth: &Auth) -> Result<(), AppError> {
    let mut errs = BTreeMap::new();

    if auth.basic.email.is_empty() {
        errs.insert("email".to_string(), MSG_EMAIL_REQUIRED.to_string());
    }

    if auth.basic.password.is_empty() {
        errs.insert("password".to_string(), MSG_PASSWORD_REQUIRED.to_string());
    }

    if auth.user.as_ref().is_none_or(|u| u.name.is_empty()) {
        errs.insert("name".to_string(), MSG_NAME_REQUIRED.to_string());
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid_fields(errs))
    }
}

fn validate_sign_in(auth: &Auth) -> Result<(), AppError> {
    let mut errs = BTreeMap::new();

    if auth.basic.email.is_empty() {
        errs.insert("email".to_string(), MSG_EMAIL_REQUIRED.to_string());
    }

    if auth.basic.password.is_empty() {
        errs.insert("password".to_string(), MSG_PASSWORD_REQUIRED.to_string());
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid_fields(errs))
    }
}

// ============================================================================
// Sign-up steps
// ============================================================================

/// Fast-path uniqueness check; the store constraint is the real guard.
fn check_available(args: AuthArgs) -> StepFuture<AuthArgs> {
    Box::pin(async move {
        if args
            .store
            .find_by_email(&args.auth.basic.email)
            .await?
            .is_some()
        {
            return Err(AppError::invalid(MSG_USER_EXISTS));
        }

        Ok((args, Some(Step(create_auth_and_user))))
    })
}

/// Hash the password, then create subject and identity in one store call.
fn create_auth_and_user(mut args: AuthArgs) -> StepFuture<AuthArgs> {
    Box::pin(async move {
        args.auth.basic.password = hash::hash(&args.auth.basic.password)?;
        args.store.create_auth_and_user(&mut args.auth).await?;

        Ok((args, Some(Step(issue_token))))
    })
}

// ============================================================================
// Sign-in steps
// ============================================================================

fn lookup(mut args: AuthArgs) -> StepFuture<AuthArgs> {
    Box::pin(async move {
        match args.store.find_by_email(&args.auth.basic.email).await? {
            // Same message as a password mismatch; do not reveal which.
            None => Err(AppError::unauthorized(MSG_INVALID_CREDENTIALS)),
            Some(found) => {
                args.matched = Some(found);
                Ok((args, Some(Step(verify_password))))
            }
        }
    })
}

fn verify_password(mut args: AuthArgs) -> StepFuture<AuthArgs> {
    Box::pin(async move {
        let matched = args
            .matched
            .as_ref()
            .ok_or_else(|| AppError::internal("lookup step recorded no match"))?;

        hash::verify(&args.auth.basic.password, &matched.basic.password)?;

        args.auth.user_id = matched.user_id;
        Ok((args, Some(Step(issue_token))))
    })
}

// ============================================================================
// Shared final step
// ============================================================================

fn issue_token(mut args: AuthArgs) -> StepFuture<AuthArgs> {
    Box::pin(async move {
        let expires_at = Utc::now() + Duration::hours(args.token_ttl_hours);
        let token = args.signer.sign(args.auth.user_id, expires_at)?;

        args.auth.token = Some(token);
        Ok((args, None))
    })
}
