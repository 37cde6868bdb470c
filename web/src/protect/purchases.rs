use crate::extractors::{authenticated_account::AuthenticatedAccount, request_data::PathParam};
use crate::protect::{authorize, AccountOwnsPurchase, Predicate};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::Id;

/// Checks that the authenticated account made the purchase, or is an administrator.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    PathParam(purchase_id): PathParam<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(AccountOwnsPurchase, vec![purchase_id])];
    authorize(&app_state, account, request, next, checks).await
}
