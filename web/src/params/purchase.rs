use domain::{Id, IntoQueryFilterMap, QueryFilterMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Only purchases of this toy
    #[param(value_type = Option<String>, format = Uuid)]
    pub(crate) toy_id: Option<Id>,
}

impl IndexParams {
    /// Restricts the listing to purchases made by `account_id`.
    pub(crate) fn for_account(self, account_id: Id) -> AccountPurchasesParams {
        AccountPurchasesParams {
            account_id,
            toy_id: self.toy_id,
        }
    }
}

pub(crate) struct AccountPurchasesParams {
    account_id: Id,
    toy_id: Option<Id>,
}

impl IntoQueryFilterMap for AccountPurchasesParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "account_id".to_string(),
            Some(Value::Uuid(Some(Box::new(self.account_id)))),
        );
        if let Some(toy_id) = self.toy_id {
            query_filter_map.insert(
                "toy_id".to_string(),
                Some(Value::Uuid(Some(Box::new(toy_id)))),
            );
        }

        query_filter_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_always_scoped_to_the_account() {
        let account_id = Id::new_v4();

        let filters = IndexParams::default()
            .for_account(account_id)
            .into_query_filter_map();

        assert_eq!(
            filters.get("account_id"),
            Some(Value::Uuid(Some(Box::new(account_id))))
        );
        assert_eq!(filters.get("toy_id"), None);
    }

    #[test]
    fn toy_filter_is_optional() {
        let toy_id = Id::new_v4();

        let filters = IndexParams {
            toy_id: Some(toy_id),
        }
        .for_account(Id::new_v4())
        .into_query_filter_map();

        assert_eq!(filters.get("toy_id"), Some(Value::Uuid(Some(Box::new(toy_id)))));
    }
}
