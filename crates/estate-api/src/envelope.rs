// Resource envelope and list normalization
//
// Every backend response is supposed to look like
// `{ success, data?, message?, pagination? }`. List endpoints are less
// disciplined: depending on the handler they answer with a bare array,
// an envelope around an array, an envelope around a keyed object, or a
// keyed object with no envelope at all. `ListResponse` names each of
// those shapes and `normalize` folds them into one `Listing`.

use serde::{Deserialize, Serialize};

// ── Envelope ─────────────────────────────────────────────────────────

/// Pagination block sent next to (or inside) list payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub pages: Option<u32>,
}

/// The universal `{ success, data, message, pagination }` response shape.
///
/// `data` is only meaningful when `success` is `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }

    /// The payload when `success` is set and `data` is present; otherwise
    /// whatever message the backend sent.
    pub fn into_payload(self) -> Result<T, Option<String>> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message),
        }
    }

    /// `Ok` for a successful envelope regardless of payload (deletes and
    /// other fire-and-forget mutations).
    pub fn into_ack(self) -> Result<Option<String>, Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(self.message)
        }
    }
}

// ── List shapes ──────────────────────────────────────────────────────

/// A list keyed by resource name, e.g. `{ "projects": [...], "total": 12 }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyedList<T> {
    #[serde(
        alias = "projects",
        alias = "data",
        alias = "news",
        alias = "products",
        alias = "careers",
        alias = "contacts",
        alias = "results"
    )]
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub pagination: Option<Pagination>,
}

/// What can sit inside `data` of a list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Keyed(KeyedList<T>),
}

/// Every list response shape the backend has been seen to produce.
///
/// Variant order matters for untagged matching: `Enveloped` requires a
/// `success` field, so a keyed object without one falls through to `Keyed`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ success, data: [...] | { projects: [...], ... }, pagination? }`
    Enveloped(Envelope<ListPayload<T>>),
    /// `{ projects: [...], total, page?, limit? }`
    Keyed(KeyedList<T>),
}

/// Normalized list: always `{ items, total, page, limit }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
        }
    }
}

impl<T> Listing<T> {
    /// Number of pages implied by `total` and `limit`.
    pub fn pages(&self) -> u64 {
        if self.limit == 0 {
            return u64::from(!self.items.is_empty());
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

/// Why a list response could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// `success: false`, with the backend message if any.
    Rejected(Option<String>),
    /// `success: true` but no `data`.
    MissingData(Option<String>),
}

fn count(items: usize) -> u64 {
    u64::try_from(items).unwrap_or(u64::MAX)
}

impl<T> KeyedList<T> {
    fn into_listing(self, outer: Option<Pagination>, page: u32, limit: u32) -> Listing<T> {
        let pagination = self.pagination.or(outer).unwrap_or_default();
        let total = self
            .total
            .or(pagination.total)
            .unwrap_or_else(|| count(self.items.len()));
        Listing {
            total,
            page: self.page.or(pagination.page).unwrap_or(page),
            limit: self.limit.or(pagination.limit).unwrap_or(limit),
            items: self.items,
        }
    }
}

impl<T> ListResponse<T> {
    /// Fold any accepted shape into a `Listing`.
    ///
    /// `page` and `limit` are the values that were requested; they fill in
    /// whatever the backend left out.
    pub fn normalize(self, page: u32, limit: u32) -> Result<Listing<T>, ListError> {
        match self {
            Self::Bare(items) => Ok(Listing {
                total: count(items.len()),
                page,
                limit,
                items,
            }),
            Self::Keyed(keyed) => Ok(keyed.into_listing(None, page, limit)),
            Self::Enveloped(envelope) => {
                if !envelope.success {
                    return Err(ListError::Rejected(envelope.message));
                }
                match envelope.data {
                    None => Err(ListError::MissingData(envelope.message)),
                    Some(ListPayload::Items(items)) => {
                        let pagination = envelope.pagination.unwrap_or_default();
                        Ok(Listing {
                            total: pagination.total.unwrap_or_else(|| count(items.len())),
                            page: pagination.page.unwrap_or(page),
                            limit: pagination.limit.unwrap_or(limit),
                            items,
                        })
                    }
                    Some(ListPayload::Keyed(keyed)) => {
                        Ok(keyed.into_listing(envelope.pagination, page, limit))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: String,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: "p1".into() }, Item { id: "p2".into() }]
    }

    fn parse(value: serde_json::Value) -> ListResponse<Item> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn equivalent_shapes_normalize_identically() {
        let expected = Listing {
            items: items(),
            total: 2,
            page: 1,
            limit: 10,
        };

        let bare = parse(json!([{ "id": "p1" }, { "id": "p2" }]));
        assert!(matches!(bare, ListResponse::Bare(_)));

        let enveloped = parse(json!({
            "success": true,
            "data": [{ "id": "p1" }, { "id": "p2" }],
            "pagination": { "page": 1, "limit": 10, "total": 2, "pages": 1 }
        }));
        assert!(matches!(enveloped, ListResponse::Enveloped(_)));

        let keyed = parse(json!({
            "projects": [{ "id": "p1" }, { "id": "p2" }],
            "total": 2
        }));
        assert!(matches!(keyed, ListResponse::Keyed(_)));

        for shape in [bare, enveloped, keyed] {
            assert_eq!(shape.normalize(1, 10).unwrap(), expected);
        }
    }

    #[test]
    fn keyed_payload_inside_envelope() {
        let response = parse(json!({
            "success": true,
            "data": {
                "projects": [{ "id": "p1" }, { "id": "p2" }],
                "total": 17,
                "page": 2,
                "limit": 2
            }
        }));
        let listing = response.normalize(1, 10).unwrap();
        assert_eq!(listing.total, 17);
        assert_eq!(listing.page, 2);
        assert_eq!(listing.limit, 2);
        assert_eq!(listing.pages(), 9);
    }

    #[test]
    fn nested_pagination_wins_over_requested_values() {
        let response = parse(json!({
            "success": true,
            "data": {
                "data": [{ "id": "p1" }],
                "pagination": { "page": 3, "limit": 1, "total": 5 }
            }
        }));
        let listing = response.normalize(1, 10).unwrap();
        assert_eq!((listing.total, listing.page, listing.limit), (5, 3, 1));
    }

    #[test]
    fn rejected_envelope_carries_message() {
        let response = parse(json!({ "success": false, "message": "Không có quyền" }));
        assert_eq!(
            response.normalize(1, 10).unwrap_err(),
            ListError::Rejected(Some("Không có quyền".into()))
        );
    }

    #[test]
    fn success_without_data_is_missing() {
        let response = parse(json!({ "success": true }));
        assert_eq!(
            response.normalize(1, 10).unwrap_err(),
            ListError::MissingData(None)
        );
    }

    #[test]
    fn payload_requires_success_and_data() {
        let ok: Envelope<u32> = serde_json::from_value(json!({ "success": true, "data": 7 })).unwrap();
        assert_eq!(ok.into_payload(), Ok(7));

        let empty: Envelope<u32> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(empty.into_payload(), Err(None));

        let failed: Envelope<u32> =
            serde_json::from_value(json!({ "success": false, "data": 7, "message": "nope" }))
                .unwrap();
        assert_eq!(failed.into_payload(), Err(Some("nope".into())));
    }
}
