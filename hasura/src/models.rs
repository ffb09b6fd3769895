//! Query strings and their response schemas, one pair per operation.
//!
//! Hasura answers every query with an ad hoc shape; each one gets an explicit
//! `Deserialize` struct here so nothing downstream touches untyped json.

use serde::Deserialize;
use serde_json::Value;

pub const ORDER_STATUS_QUERY: &str = r#"
    query orderStatus($id: uuid!) {
        orders_by_pk(id: $id) {
            id
            status_history
            cancelled
        }
    }
"#;

pub const UPDATE_STATUS_MUTATION: &str = r#"
    mutation updateOrderStatus($id: uuid!, $history: jsonb!) {
        update_orders_by_pk(pk_columns: {id: $id}, _set: {status_history: $history}) {
            id
        }
    }
"#;

#[derive(Deserialize)]
pub struct OrderStatusData {
    pub orders_by_pk: Option<OrderRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    /// Raw `status_history` column; null for orders placed before the
    /// column existed.
    #[serde(default)]
    pub status_history: Value,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Deserialize)]
pub struct UpdateStatusData {
    pub update_orders_by_pk: Option<UpdatedOrder>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatedOrder {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_response_shape() {
        let data: OrderStatusData = serde_json::from_value(json!({
            "orders_by_pk": {
                "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "status_history": {
                    "0": {"isCompleted": true, "completedAt": "2024-01-01T10:00:00Z"},
                    "1": {"isCompleted": false, "completedAt": null},
                    "2": {"isCompleted": false, "completedAt": null},
                },
                "cancelled": false,
            }
        }))
        .unwrap();

        let order = data.orders_by_pk.unwrap();
        assert!(!order.cancelled);
        assert_eq!(order.status_history["0"]["isCompleted"], json!(true));
    }

    #[test]
    fn test_missing_order_and_missing_column() {
        let data: OrderStatusData = serde_json::from_value(json!({ "orders_by_pk": null })).unwrap();
        assert!(data.orders_by_pk.is_none());

        let data: OrderStatusData = serde_json::from_value(json!({
            "orders_by_pk": { "id": "o1" }
        }))
        .unwrap();
        let order = data.orders_by_pk.unwrap();
        assert!(order.status_history.is_null());
        assert!(!order.cancelled);
    }
}
