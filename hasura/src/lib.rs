//! # Hasura Gateway
//!
//! Every read and write the product does goes through one managed GraphQL
//! endpoint. This crate is the single place that talks to it: a thin
//! `fetch_from_hasura` wrapper plus the typed query/response pairs in
//! [`models`].
//!
//! GraphQL reports failures inside a 200 body (`errors: [...]`), so the
//! wrapper decodes the envelope itself and surfaces those as
//! [`GatewayError::Graphql`] instead of handing callers a half-valid `data`.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;

pub mod models;

use models::{
    ORDER_STATUS_QUERY, OrderRecord, OrderStatusData, UPDATE_STATUS_MUTATION, UpdateStatusData,
    UpdatedOrder,
};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("request to hasura failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hasura returned errors: {0}")]
    Graphql(String),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<EnvelopeError>>,
}

#[derive(Deserialize)]
struct EnvelopeError {
    message: String,
}

pub async fn fetch_from_hasura<T: DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: &str,
    admin_secret: &str,
    query: &str,
    variables: Value,
) -> Result<T, GatewayError> {
    let payload = json!({ "query": query, "variables": variables });

    let response = client
        .post(endpoint)
        .header("x-hasura-admin-secret", admin_secret)
        .json(&payload)
        .send()
        .await?;

    let envelope: Envelope = response.json().await?;
    decode(envelope)
}

fn decode<T: DeserializeOwned>(envelope: Envelope) -> Result<T, GatewayError> {
    if let Some(errors) = envelope.errors {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(GatewayError::Graphql(messages.join("; ")));
    }

    let data = envelope
        .data
        .ok_or_else(|| GatewayError::Graphql("response carried neither data nor errors".to_string()))?;

    Ok(serde_json::from_value(data)?)
}

pub async fn get_order_status(
    client: &reqwest::Client,
    endpoint: &str,
    admin_secret: &str,
    order_id: &str,
) -> Result<Option<OrderRecord>, GatewayError> {
    let data: OrderStatusData = fetch_from_hasura(
        client,
        endpoint,
        admin_secret,
        ORDER_STATUS_QUERY,
        json!({ "id": order_id }),
    )
    .await?;

    Ok(data.orders_by_pk)
}

/// Writes the storage-form history back onto the order. `None` means the
/// order id matched nothing.
pub async fn update_order_status(
    client: &reqwest::Client,
    endpoint: &str,
    admin_secret: &str,
    order_id: &str,
    history: &Value,
) -> Result<Option<UpdatedOrder>, GatewayError> {
    let data: UpdateStatusData = fetch_from_hasura(
        client,
        endpoint,
        admin_secret,
        UPDATE_STATUS_MUTATION,
        json!({ "id": order_id, "history": history }),
    )
    .await?;

    Ok(data.update_orders_by_pk)
}
