//! Order and bid endpoints.
//!
//! Lifecycle moves go through a single `transition/` endpoint that takes the
//! transition name plus any extra fields the transition needs.

use fret_core::orders::{BidDraft, CargoType, FreightOrder, OrderAssignment, OrderBid, OrderDraft, OrderStatus};
use fret_core::Page;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{ApiClient, Result};

/// Transition name for cancelling an order.
pub const CANCEL_TRANSITION: &str = "cancel";

/// Filters for the order list.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OrderFilters {
    /// Only orders in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Only this cargo kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<CargoType>,
    /// Pickup city, exact match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_city: Option<String>,
    /// Delivery city, exact match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_city: Option<String>,
    /// Free-text search over reference, description and addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Sort field, `-` prefix for descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Serialize)]
struct Rating<'a> {
    rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

fn transition_body(transition: &str, data: Option<Map<String, Value>>) -> Value {
    let mut body = data.unwrap_or_default();
    let _ = body.insert("transition".into(), Value::String(transition.to_string()));
    Value::Object(body)
}

impl ApiClient {
    /// `GET orders/`.
    pub async fn orders(&self, filters: &OrderFilters) -> Result<Page<FreightOrder>> {
        let builder = self
            .gateway()
            .request(reqwest::Method::GET, &self.url("orders/"))
            .query(filters);
        self.gateway().send_json(builder).await
    }

    /// `GET orders/{id}/`.
    pub async fn order(&self, id: &str) -> Result<FreightOrder> {
        self.gateway().get_json(&self.url(&format!("orders/{id}/"))).await
    }

    /// Create an order in draft state.
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<FreightOrder> {
        self.gateway().post_json(&self.url("orders/"), draft).await
    }

    /// Patch the set fields of `draft` onto an order.
    pub async fn update_order(&self, id: &str, draft: &OrderDraft) -> Result<FreightOrder> {
        self.gateway()
            .patch_json(&self.url(&format!("orders/{id}/")), draft)
            .await
    }

    /// Publish a draft to the marketplace.
    #[tracing::instrument(skip(self))]
    pub async fn post_order(&self, id: &str) -> Result<FreightOrder> {
        self.gateway()
            .post_json(&self.url(&format!("orders/{id}/post/")), &Map::new())
            .await
    }

    /// Apply a named lifecycle transition. Fields in `data` are sent next to
    /// the transition name; a `transition` key in `data` is overridden.
    #[tracing::instrument(skip(self, data))]
    pub async fn transition_order(
        &self,
        id: &str,
        transition: &str,
        data: Option<Map<String, Value>>,
    ) -> Result<FreightOrder> {
        self.gateway()
            .post_json(
                &self.url(&format!("orders/{id}/transition/")),
                &transition_body(transition, data),
            )
            .await
    }

    /// Cancel an order, optionally giving a reason.
    pub async fn cancel_order(&self, id: &str, reason: Option<&str>) -> Result<FreightOrder> {
        let data = reason.map(|r| {
            let mut m = Map::new();
            let _ = m.insert("reason".into(), Value::String(r.to_string()));
            m
        });
        self.transition_order(id, CANCEL_TRANSITION, data).await
    }

    /// Shipper confirms the cargo arrived.
    pub async fn confirm_delivery(&self, id: &str) -> Result<FreightOrder> {
        self.gateway()
            .post_json(&self.url(&format!("orders/{id}/confirm-delivery/")), &Map::new())
            .await
    }

    /// Rate the driver of a delivered order.
    pub async fn rate_delivery(&self, id: &str, rating: u8, comment: Option<&str>) -> Result<FreightOrder> {
        self.gateway()
            .post_json(&self.url(&format!("orders/{id}/rate/")), &Rating { rating, comment })
            .await
    }

    /// `GET orders/{order_id}/bids/`.
    pub async fn bids(&self, order_id: &str) -> Result<Page<OrderBid>> {
        self.gateway()
            .get_json(&self.url(&format!("orders/{order_id}/bids/")))
            .await
    }

    /// Submit a bid on an order.
    pub async fn submit_bid(&self, order_id: &str, bid: &BidDraft) -> Result<OrderBid> {
        self.gateway()
            .post_json(&self.url(&format!("orders/{order_id}/bids/")), bid)
            .await
    }

    /// Accept a bid, assigning its driver to the order.
    #[tracing::instrument(skip(self))]
    pub async fn accept_bid(&self, order_id: &str, bid_id: &str) -> Result<OrderAssignment> {
        self.gateway()
            .post_json(
                &self.url(&format!("orders/{order_id}/bids/{bid_id}/accept/")),
                &Map::new(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use crate::test_support::client_for;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn order_json(id: &str, status: &str) -> Value {
        json!({
            "id": id, "reference": "FRT-0001", "status": status,
            "cargo_type": "GENERAL", "weight_kg": "800.00"
        })
    }

    #[test]
    fn transition_name_wins_over_data() {
        let mut data = Map::new();
        let _ = data.insert("transition".into(), json!("bogus"));
        let _ = data.insert("note".into(), json!("gate 3"));
        assert_eq!(
            transition_body("pickup", Some(data)),
            json!({"transition": "pickup", "note": "gate 3"})
        );
        assert_eq!(transition_body("deliver", None), json!({"transition": "deliver"}));
    }

    #[test]
    fn empty_filters_serialize_to_nothing() {
        let v = serde_json::to_value(OrderFilters::default()).unwrap();
        assert_eq!(v, json!({}));
    }

    #[tokio::test]
    async fn list_with_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/orders/"))
            .and(query_param("status", "BIDDING"))
            .and(query_param("pickup_city", "Dakar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2, "next": "http://x/api/v1/orders/?page=2", "previous": null,
                "results": [order_json("o1", "BIDDING")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let filters = OrderFilters {
            status: Some(OrderStatus::Bidding),
            pickup_city: Some("Dakar".into()),
            ..Default::default()
        };
        let page = client_for(&server).orders(&filters).await.unwrap();
        assert!(page.has_next());
        assert_eq!(page.results[0].status, OrderStatus::Bidding);
    }

    #[tokio::test]
    async fn create_and_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/"))
            .and(body_json(json!({"cargo_type": "BULK", "weight_kg": 500.0})))
            .respond_with(ResponseTemplate::new(201).set_body_json(order_json("o9", "DRAFT")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o9/post/"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o9", "POSTED")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let draft = OrderDraft {
            cargo_type: Some(CargoType::Bulk),
            weight_kg: Some(500.0),
            ..Default::default()
        };
        let created = client.create_order(&draft).await.unwrap();
        assert_eq!(created.status, OrderStatus::Draft);
        let posted = client.post_order(&created.id).await.unwrap();
        assert_eq!(posted.status, OrderStatus::Posted);
    }

    #[tokio::test]
    async fn cancel_sends_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/transition/"))
            .and(body_json(json!({"transition": "cancel", "reason": "truck broke down"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o1", "CANCELLED")))
            .expect(1)
            .mount(&server)
            .await;

        let order = client_for(&server)
            .cancel_order("o1", Some("truck broke down"))
            .await
            .unwrap();
        assert!(order.status.is_terminal());
    }

    #[tokio::test]
    async fn invalid_transition_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/transition/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid transition"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .transition_order("o1", "deliver", None)
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Status { status, ref body } if status == 400 && body.contains("Invalid transition"));
    }

    #[tokio::test]
    async fn rate_without_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/rate/"))
            .and(body_json(json!({"rating": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o1", "COMPLETED")))
            .expect(1)
            .mount(&server)
            .await;

        let order = client_for(&server).rate_delivery("o1", 5, None).await.unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn bid_then_accept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/bids/"))
            .and(body_json(json!({"amount_xof": 90000.0, "message": "Disponible demain"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "b1", "order": "o1", "driver": "d1",
                "amount_xof": "90000.00", "status": "PENDING"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/bids/b1/accept/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a1", "order": "o1", "driver": "d1", "bid": "b1",
                "agreed_price_xof": "90000.00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let bid = client
            .submit_bid(
                "o1",
                &BidDraft {
                    amount_xof: 90_000.0,
                    message: Some("Disponible demain".into()),
                    estimated_pickup: None,
                },
            )
            .await
            .unwrap();
        let assignment = client.accept_bid("o1", &bid.id).await.unwrap();
        assert_eq!(assignment.bid.as_deref(), Some("b1"));
        assert_eq!(assignment.driver, "d1");
    }

    #[tokio::test]
    async fn bids_page_and_confirm_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/orders/o1/bids/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 0, "next": null, "previous": null, "results": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/o1/confirm-delivery/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o1", "DELIVERED")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.bids("o1").await.unwrap().results.is_empty());
        assert_eq!(
            client.confirm_delivery("o1").await.unwrap().status,
            OrderStatus::Delivered
        );
    }
}
