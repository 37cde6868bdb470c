use crate::error::Error;
use crate::{purchases, Id, IntoQueryFilterMap};
use entity_api::purchase as purchase_api;
use sea_orm::DatabaseConnection;

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<purchases::Model, Error> {
    Ok(purchase_api::find_by_id(db, id).await?)
}

/// Purchases matching `params`, oldest first.
pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<purchases::Model>, Error> {
    Ok(purchase_api::find_by(db, params.into_query_filter_map()).await?)
}
