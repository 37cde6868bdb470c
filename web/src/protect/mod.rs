//! Authorization rules for the store's resources.
//!
//! Each submodule holds the middleware for one resource. The middleware builds a list
//! of [`Predicate`]s and hands them to [`authorize`], which answers 403 as soon as one
//! of them fails. These run inside `require_auth`, so an authenticated account is
//! always available.

pub(crate) mod purchases;
pub(crate) mod toys;

use crate::{AppState, ErrorResponse};
use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{accounts, purchase as PurchaseApi, Id, Role};
use log::*;

/// Trait representing a single authorization rule.
///
/// Implementors answer **"is the authenticated account allowed to proceed?"**.
/// The rule receives:
/// * shared application state (`AppState`)
/// * the authenticated [`domain::accounts::Model`]
/// * any additional [`Id`] parameters supplied by the caller.
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, account: &accounts::Model, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] implementation with the concrete arguments that the rule
/// should receive when evaluated.
/// ```rust,ignore
/// let checks = vec![
///     Predicate::new(AccountOwnsPurchase, vec![purchase_id]),
/// ];
/// ```
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, account: &accounts::Model) -> bool {
        self.predicate
            .eval(app_state, account, self.args.clone())
            .await
    }
}

/// Axum middleware that enforces one or more [`Predicate`]s.
///
/// Each predicate is evaluated in the order supplied; if any rule returns
/// `false` the request is aborted with **403 FORBIDDEN**. When all rules
/// pass the wrapped handler (`next`) is executed.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_account: accounts::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> Response {
    for check in checks {
        if !check.check(app_state, &authenticated_account).await {
            info!(
                "Account {} ({}) denied {} {}",
                authenticated_account.id,
                authenticated_account.role,
                request.method(),
                request.uri().path()
            );
            return ErrorResponse::forbidden().into_response();
        }
    }
    next.run(request).await
}

/// Passes when the account holds one of the listed roles.
pub struct AccountHasAnyRole(pub &'static [Role]);

#[async_trait]
impl Check for AccountHasAnyRole {
    async fn eval(&self, _app_state: &AppState, account: &accounts::Model, _args: Vec<Id>) -> bool {
        self.0.contains(&account.role)
    }
}

/// Passes when the purchase `args[0]` was made by the account. Administrators may read
/// any purchase. An unknown purchase fails for everyone else, so probing ids reveals
/// nothing.
pub struct AccountOwnsPurchase;

#[async_trait]
impl Check for AccountOwnsPurchase {
    async fn eval(&self, app_state: &AppState, account: &accounts::Model, args: Vec<Id>) -> bool {
        if account.role == Role::Administrator {
            return true;
        }
        let Some(purchase_id) = args.first().copied() else {
            return false;
        };
        match PurchaseApi::find_by_id(app_state.db_conn_ref(), purchase_id).await {
            Ok(purchase) => purchase.account_id == account.id,
            Err(e) => {
                debug!("Purchase {purchase_id} not readable by account {}: {e}", account.id);
                false
            }
        }
    }
}
