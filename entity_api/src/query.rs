use crate::{error::Error, QueryFilterMap};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, IdenStatic, QueryFilter, QueryOrder};

/// Records of `E` whose columns equal the values in `query_filter_map`, sorted
/// ascending by `order_by`.
///
/// Keys that don't name a column of `E` are ignored.
pub async fn find_by<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
    order_by: C,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    let select = C::iter().fold(E::find(), |select, column| {
        match query_filter_map.get(column.as_str()) {
            Some(value) => select.filter(column.eq(value)),
            None => select,
        }
    });

    Ok(select.order_by_asc(order_by).all(db).await?)
}
