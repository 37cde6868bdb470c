use crate::extractors::authenticated_account::AuthenticatedAccount;
use crate::protect::{authorize, AccountHasAnyRole, Predicate};
use crate::AppState;
use axum::{extract::Request, extract::State, middleware::Next, response::IntoResponse};
use domain::Role;

const CATALOG_EDITORS: &[Role] = &[Role::Employee, Role::Administrator];
const CATALOG_OWNERS: &[Role] = &[Role::Administrator];

/// Checks that the authenticated account may add toys or change them.
pub(crate) async fn edit(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(AccountHasAnyRole(CATALOG_EDITORS), vec![])];
    authorize(&app_state, account, request, next, checks).await
}

/// Checks that the authenticated account may remove toys from the catalog.
pub(crate) async fn delete(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(AccountHasAnyRole(CATALOG_OWNERS), vec![])];
    authorize(&app_state, account, request, next, checks).await
}
