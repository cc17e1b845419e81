//! Paginated list fetching and retry mutations.
//!
//! Implements the dashboard's "load more" semantics: a fetch either replaces
//! the current list wholesale (first load, filter change, page jump) or, when
//! the requested page is exactly the one the server said comes next, appends
//! to the already-accumulated content.

use chrono::SecondsFormat;
use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use crate::gateway::{Gateway, GatewayResult};
use crate::types::{DeliveryAttempt, Event, EventDelivery, Filter, Page};

/// List fetcher and retry dispatcher over a [`Gateway`].
pub struct Fetcher<'g> {
    gateway: &'g Gateway,
}

impl<'g> Fetcher<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self { gateway }
    }

    /// Fetches a page of events, merging onto `existing` per [`merge_page`].
    ///
    /// # Errors
    /// Propagates the gateway error unmodified; no automatic retry.
    pub async fn events(
        &self,
        page: u32,
        filter: &Filter,
        existing: Option<Page<Event>>,
    ) -> GatewayResult<Page<Event>> {
        let query = self.list_query(page, filter);
        let fresh = self
            .gateway
            .request(Method::GET, "/events", &query, None)
            .await?;
        Ok(merge_page(existing, page, fresh))
    }

    /// Fetches a page of event deliveries, merging onto `existing`.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified; no automatic retry.
    pub async fn deliveries(
        &self,
        page: u32,
        filter: &Filter,
        existing: Option<Page<EventDelivery>>,
    ) -> GatewayResult<Page<EventDelivery>> {
        let mut query = self.list_query(page, filter);
        for status in &filter.statuses {
            query.push(("status", status.as_str().to_string()));
        }
        let fresh = self
            .gateway
            .request(Method::GET, "/eventdeliveries", &query, None)
            .await?;
        Ok(merge_page(existing, page, fresh))
    }

    /// Fetches a single event by id.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn event(&self, event_id: &str) -> GatewayResult<Event> {
        let path = format!("/events/{event_id}");
        let query = vec![("groupID", self.gateway.session().project_id.clone())];
        self.gateway.request(Method::GET, &path, &query, None).await
    }

    /// Fetches a single delivery by id.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn delivery(&self, delivery_id: &str) -> GatewayResult<EventDelivery> {
        let path = format!("/eventdeliveries/{delivery_id}");
        let query = vec![("groupID", self.gateway.session().project_id.clone())];
        self.gateway.request(Method::GET, &path, &query, None).await
    }

    /// Fetches every recorded attempt for a delivery, oldest first.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn delivery_attempts(
        &self,
        delivery_id: &str,
    ) -> GatewayResult<Vec<DeliveryAttempt>> {
        let path = format!("/eventdeliveries/{delivery_id}/deliveryattempts");
        let query = vec![("groupID", self.gateway.session().project_id.clone())];
        self.gateway.request(Method::GET, &path, &query, None).await
    }

    /// Fetches the sibling deliveries of an event (first page, unfiltered).
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn event_deliveries(&self, event_id: &str) -> GatewayResult<Vec<EventDelivery>> {
        let query = vec![
            ("groupID", self.gateway.session().project_id.clone()),
            ("eventId", event_id.to_string()),
        ];
        let page: Page<EventDelivery> = self
            .gateway
            .request(Method::GET, "/eventdeliveries", &query, None)
            .await?;
        Ok(page.content)
    }

    /// Re-dispatches a single delivery.
    ///
    /// Carries an `Idempotency-Key` so a duplicate submission of the same
    /// logical click is a server-side no-op.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn resend(&self, delivery_id: &str) -> GatewayResult<String> {
        let path = format!("/eventdeliveries/{delivery_id}/resend");
        let key = Uuid::new_v4().to_string();
        self.gateway
            .execute(Method::PUT, &path, None, |builder| {
                builder.header("Idempotency-Key", key)
            })
            .await
    }

    /// Re-dispatches a batch of deliveries in one request.
    ///
    /// # Errors
    /// Propagates the gateway error unmodified.
    pub async fn batch_retry(&self, delivery_ids: &[String]) -> GatewayResult<String> {
        let body = json!({ "ids": delivery_ids });
        let key = Uuid::new_v4().to_string();
        self.gateway
            .execute(Method::POST, "/eventdeliveries/batchretry", Some(&body), |builder| {
                builder.header("Idempotency-Key", key)
            })
            .await
    }

    /// Query parameters shared by both list endpoints.
    fn list_query(&self, page: u32, filter: &Filter) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("groupID", self.gateway.session().project_id.clone()),
            ("page", page.to_string()),
            ("sort", filter.sort.as_str().to_string()),
        ];
        if let Some(per_page) = filter.per_page {
            query.push(("perPage", per_page.to_string()));
        }
        if let Some(start) = filter.start_date {
            query.push(("startDate", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(end) = filter.end_date {
            query.push(("endDate", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(q) = &filter.query {
            if !q.trim().is_empty() {
                query.push(("query", q.trim().to_string()));
            }
        }
        if let Some(app_id) = &filter.app_id {
            query.push(("appId", app_id.clone()));
        }
        query
    }
}

/// Applies the append-or-replace rule for a freshly fetched page.
///
/// When the caller holds `existing` and asked for exactly the page the server
/// reported as `next`, the fresh content is appended onto the existing
/// content and the fresh pagination metadata wins. In every other case the
/// fresh page replaces the prior state wholesale. Empty fresh content merges
/// or replaces the same way; it is never an error.
pub fn merge_page<T>(existing: Option<Page<T>>, requested_page: u32, fresh: Page<T>) -> Page<T> {
    match existing {
        Some(mut existing) if existing.pagination.next == Some(requested_page) => {
            existing.content.extend(fresh.content);
            Page {
                content: existing.content,
                pagination: fresh.pagination,
            }
        }
        _ => fresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pagination;

    fn page(content: Vec<&str>, page: u32, next: Option<u32>) -> Page<String> {
        Page {
            content: content.into_iter().map(String::from).collect(),
            pagination: Pagination {
                page,
                per_page: 2,
                next,
                total_page: 3,
                total: 6,
            },
        }
    }

    /// Test: requesting the server-reported next page appends content and
    /// adopts the new pagination metadata.
    #[test]
    fn test_merge_appends_on_next_page() {
        let existing = page(vec!["a", "b"], 1, Some(2));
        let fresh = page(vec!["c", "d"], 2, Some(3));

        let merged = merge_page(Some(existing), 2, fresh);
        assert_eq!(merged.content, vec!["a", "b", "c", "d"]);
        assert_eq!(merged.pagination.page, 2);
        assert_eq!(merged.pagination.next, Some(3));
    }

    /// Test: requesting any page other than `next` replaces wholesale
    /// (first load, filter change, page jump).
    #[test]
    fn test_merge_replaces_on_non_next_page() {
        let existing = page(vec!["a", "b"], 1, Some(2));
        let fresh = page(vec!["x", "y"], 1, Some(2));

        let merged = merge_page(Some(existing), 1, fresh.clone());
        assert_eq!(merged, fresh);
    }

    /// Test: no existing state means the fresh page is taken verbatim.
    #[test]
    fn test_merge_without_existing() {
        let fresh = page(vec!["a"], 1, Some(2));
        let merged = merge_page(None, 1, fresh.clone());
        assert_eq!(merged, fresh);
    }

    /// Test: an empty fresh page still appends (to nothing new) or replaces;
    /// downstream grouping of an empty list is valid, never an error.
    #[test]
    fn test_merge_empty_fresh_page() {
        let existing = page(vec!["a", "b"], 1, Some(2));
        let fresh = page(vec![], 2, None);

        let merged = merge_page(Some(existing), 2, fresh);
        assert_eq!(merged.content, vec!["a", "b"]);
        assert_eq!(merged.pagination.next, None);

        let replaced = merge_page(Some(page(vec!["a"], 1, Some(2))), 1, page(vec![], 1, None));
        assert!(replaced.content.is_empty());
    }

    /// Test: existing state on the last page (no `next`) never merges.
    #[test]
    fn test_merge_last_page_never_appends() {
        let existing = page(vec!["a", "b"], 3, None);
        let fresh = page(vec!["c"], 1, Some(2));

        let merged = merge_page(Some(existing), 1, fresh.clone());
        assert_eq!(merged, fresh);
    }
}
