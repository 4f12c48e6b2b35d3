//! Fluent checks over an [`ApiResponse`].
//!
//! Each check returns `Result<Self, HarnessError>` so a case reads as a chain:
//!
//! ```ignore
//! harness.send(&spec).await?
//!     .assert_success::<Vec<Item>>()?
//!     .has_len(5)?
//!     .count_is(5)?;
//! ```

use std::collections::HashSet;
use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::client::ApiResponse;
use crate::config::AuthExpectation;
use crate::error::{ContractViolation, HarnessError};
use crate::pagination;
use crate::types::{Envelope, ErrorBody, Item, MetaOnly, Pagination, Rating};

fn check<T: PartialEq + Debug>(resp: &ApiResponse, what: &str, expected: T, actual: T) -> Result<(), HarnessError> {
    if expected == actual {
        return Ok(());
    }
    Err(ContractViolation::new(&resp.url, what, format!("{:?}", expected), format!("{:?}", actual), &resp.body).into())
}

fn violation(resp: &ApiResponse, what: &str, expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> HarnessError {
    ContractViolation::new(&resp.url, what, expected, actual, &resp.body).into()
}

impl ApiResponse {
    pub fn assert_status(&self, expected: u16) -> Result<&Self, HarnessError> {
        check(self, "status code", expected, self.status)?;
        Ok(self)
    }

    /// Status 200, `meta.status == 200`, `meta.msg == "OK"`, `meta.response_id`
    /// present. Decodes `data` as `D` for the checks that follow.
    pub fn assert_success<D: DeserializeOwned>(self) -> Result<Checked<D>, HarnessError> {
        self.assert_status(200)?;
        let envelope: Envelope<D> = self.json()?;
        check(&self, "meta.status", 200, envelope.meta.status)?;
        check(&self, "meta.msg", "OK", envelope.meta.msg.as_str())?;
        if envelope.meta.response_id.is_none() {
            return Err(violation(&self, "meta.response_id", "a string", "null"));
        }
        Ok(Checked { response: self, envelope })
    }

    /// Status 200 and `meta.msg == "OK"` only; for answers that are valid but
    /// not guaranteed to carry a response id.
    pub fn assert_ok<D: DeserializeOwned>(self) -> Result<Checked<D>, HarnessError> {
        self.assert_status(200)?;
        let envelope: Envelope<D> = self.json()?;
        check(&self, "meta.msg", "OK", envelope.meta.msg.as_str())?;
        Ok(Checked { response: self, envelope })
    }

    /// Rejected request: expected status and top-level `message`.
    pub fn assert_auth_failure(&self, expected: AuthExpectation) -> Result<&Self, HarnessError> {
        self.assert_status(expected.status)?;
        let body: ErrorBody = self.json()?;
        check(self, "message", expected.message, body.message.as_str())?;
        Ok(self)
    }

    /// Error status carrying an envelope `meta` block.
    pub fn assert_meta_error(&self, status: u16, msg: &str) -> Result<&Self, HarnessError> {
        self.assert_status(status)?;
        let body: MetaOnly = self.json()?;
        check(self, "meta.msg", msg, body.meta.msg.as_str())?;
        Ok(self)
    }
}

/// A response that passed an envelope check, with its decoded body.
#[derive(Debug, Clone)]
pub struct Checked<D> {
    pub response: ApiResponse,
    pub envelope: Envelope<D>,
}

impl<D> Checked<D> {
    pub fn pagination(&self) -> Result<Pagination, HarnessError> {
        self.envelope.pagination.ok_or_else(|| violation(&self.response, "pagination", "an object", "absent"))
    }

    pub fn total_count(&self) -> Result<u64, HarnessError> { Ok(self.pagination()?.total_count) }

    pub fn count_is(self, expected: u64) -> Result<Self, HarnessError> {
        check(&self.response, "pagination.count", expected, self.pagination()?.count)?;
        Ok(self)
    }

    pub fn offset_is(self, expected: u64) -> Result<Self, HarnessError> {
        check(&self.response, "pagination.offset", expected, self.pagination()?.offset)?;
        Ok(self)
    }

    pub fn total_count_is(self, expected: u64) -> Result<Self, HarnessError> {
        check(&self.response, "pagination.total_count", expected, self.total_count()?)?;
        Ok(self)
    }

    pub fn total_count_at_least(self, floor: u64) -> Result<Self, HarnessError> {
        let total = self.total_count()?;
        if total < floor {
            return Err(violation(&self.response, "pagination.total_count", format!(">= {}", floor), total));
        }
        Ok(self)
    }

    pub fn pagination_is(self, expected: Pagination) -> Result<Self, HarnessError> {
        check(&self.response, "pagination", expected, self.pagination()?)?;
        Ok(self)
    }
}

impl Checked<Vec<Item>> {
    pub fn items(&self) -> &[Item] { &self.envelope.data }

    pub fn ids(&self) -> Vec<String> { self.items().iter().map(|i| i.id.clone()).collect() }

    pub fn has_len(self, expected: usize) -> Result<Self, HarnessError> {
        check(&self.response, "data size", expected, self.items().len())?;
        Ok(self)
    }

    pub fn is_empty(self) -> Result<Self, HarnessError> { self.has_len(0) }

    /// Empty `data` and every pagination field zero.
    pub fn is_zeroed(self) -> Result<Self, HarnessError> {
        self.is_empty()?.pagination_is(Pagination::default())
    }

    pub fn first_id_is(self, expected: &str) -> Result<Self, HarnessError> {
        let first = self.items().first().map(|i| i.id.as_str()).unwrap_or("<none>");
        check(&self.response, "data[0].id", expected, first)?;
        Ok(self)
    }

    /// No item rated outside what a `rating` filter allows.
    pub fn ratings_within(self, rating: Rating) -> Result<Self, HarnessError> {
        let offenders: Vec<String> = self
            .items()
            .iter()
            .filter(|i| !i.rating().is_some_and(|r| rating.permits(r)))
            .map(|i| format!("{}={}", i.id, i.rating))
            .collect();
        if !offenders.is_empty() {
            let allowed: Vec<&str> = rating.allowed().iter().map(|r| r.as_str()).collect();
            return Err(violation(&self.response, "data[].rating", format!("one of {:?}", allowed), offenders.join(", ")));
        }
        Ok(self)
    }

    /// Count matches `data`, stays within `limit`, and echoes `offset`.
    pub fn consistent_with(self, limit: Option<u32>, offset: Option<u64>) -> Result<Self, HarnessError> {
        let problems = pagination::consistency_problems(&self.pagination()?, self.items().len(), limit, offset);
        if !problems.is_empty() {
            return Err(violation(&self.response, "pagination consistency", "consistent", problems.join("; ")));
        }
        Ok(self)
    }

    /// No id here also appears in `earlier`.
    pub fn disjoint_from(self, earlier: &[String]) -> Result<Self, HarnessError> {
        let ids = self.ids();
        let dupes = pagination::overlapping_ids(&[earlier, ids.as_slice()]);
        if !dupes.is_empty() {
            let union: HashSet<&String> = earlier.iter().chain(ids.iter()).collect();
            return Err(violation(
                &self.response,
                "page overlap",
                format!("{} unique ids", earlier.len() + ids.len()),
                format!("{} unique ids, repeated: {}", union.len(), dupes.join(", ")),
            ));
        }
        Ok(self)
    }
}

impl Checked<Item> {
    pub fn item(&self) -> &Item { &self.envelope.data }

    pub fn id_is(self, expected: &str) -> Result<Self, HarnessError> {
        check(&self.response, "data.id", expected, self.item().id.as_str())?;
        Ok(self)
    }

    pub fn kind_is(self, expected: &str) -> Result<Self, HarnessError> {
        check(&self.response, "data.type", expected, self.item().kind.as_str())?;
        Ok(self)
    }

    pub fn rating_is(self, expected: Rating) -> Result<Self, HarnessError> {
        check(&self.response, "data.rating", Some(expected), self.item().rating())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resp(status: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse { url: "https://h/v1/gifs/trending?api_key=***".into(), status, body: body.to_string() }
    }

    fn page(ids_ratings: &[(&str, &str)], p: (u64, u64, u64)) -> ApiResponse {
        let data: Vec<_> = ids_ratings.iter().map(|(id, r)| json!({"id": id, "type": "gif", "rating": r})).collect();
        resp(200, json!({
            "data": data,
            "pagination": {"total_count": p.0, "count": p.1, "offset": p.2},
            "meta": {"status": 200, "msg": "OK", "response_id": "abc"}
        }))
    }

    #[test]
    fn success_envelope_passes() {
        let c = page(&[("a", "g"), ("b", "pg")], (100, 2, 0)).assert_success::<Vec<Item>>().unwrap();
        let c = c.has_len(2).unwrap().count_is(2).unwrap().total_count_at_least(2).unwrap();
        assert_eq!(c.ids(), ["a", "b"]);
    }

    #[test]
    fn count_over_requested_limit_is_inconsistent() {
        let ids: Vec<(String, &str)> = (0..10).map(|i| (format!("t{i}"), "g")).collect();
        let ids: Vec<(&str, &str)> = ids.iter().map(|(id, r)| (id.as_str(), *r)).collect();
        let ok = page(&ids, (120, 10, 0)).assert_success::<Vec<Item>>().unwrap();
        assert!(ok.clone().consistent_with(Some(10), Some(0)).is_ok());
        let err = ok.consistent_with(Some(5), Some(0)).unwrap_err();
        assert!(err.to_string().contains("exceeds limit 5"), "{err}");
    }

    #[test]
    fn null_response_id_fails_envelope() {
        let r = resp(200, json!({"data": [], "meta": {"status": 200, "msg": "OK", "response_id": null}}));
        let err = r.assert_success::<Vec<Item>>().unwrap_err();
        assert!(matches!(err, HarnessError::Contract(ref v) if v.check == "meta.response_id"));
    }

    #[test]
    fn wrong_status_fails_before_decoding() {
        let r = ApiResponse { url: "u".into(), status: 500, body: "oops".into() };
        let err = r.assert_success::<Vec<Item>>().unwrap_err();
        assert!(matches!(err, HarnessError::Contract(ref v) if v.check == "status code"));
    }

    #[test]
    fn auth_failure_matches_message() {
        let r = resp(403, json!({"message": "Invalid authentication credentials"}));
        assert!(r.assert_auth_failure(AuthExpectation { status: 403, message: "Invalid authentication credentials" }).is_ok());
        let err = r.assert_auth_failure(AuthExpectation { status: 401, message: "Unauthorized" }).unwrap_err();
        assert!(matches!(err, HarnessError::Contract(ref v) if v.check == "status code"));
    }

    #[test]
    fn rating_filter_rejects_stricter_items() {
        let ok = page(&[("a", "g"), ("b", "pg")], (2, 2, 0)).assert_success::<Vec<Item>>().unwrap();
        assert!(ok.clone().ratings_within(Rating::Pg).is_ok());
        let err = ok.ratings_within(Rating::G).unwrap_err();
        assert!(matches!(err, HarnessError::Contract(ref v) if v.actual == "b=pg"));
    }

    #[test]
    fn rating_filter_rejects_unknown_ratings() {
        let c = page(&[("a", "y")], (1, 1, 0)).assert_success::<Vec<Item>>().unwrap();
        assert!(c.ratings_within(Rating::R).is_err());
    }

    #[test]
    fn zeroed_page() {
        let c = page(&[], (0, 0, 0)).assert_success::<Vec<Item>>().unwrap();
        assert!(c.is_zeroed().is_ok());
        let c = page(&[], (10, 0, 20)).assert_success::<Vec<Item>>().unwrap();
        assert!(c.is_zeroed().is_err());
    }

    #[test]
    fn overlapping_pages_fail() {
        let first = vec!["a".to_string(), "b".to_string()];
        let second = page(&[("b", "g"), ("c", "g")], (10, 2, 2)).assert_success::<Vec<Item>>().unwrap();
        let err = second.disjoint_from(&first).unwrap_err();
        assert!(matches!(err, HarnessError::Contract(ref v) if v.actual.contains("3 unique ids")));
    }

    #[test]
    fn single_item_checks() {
        let r = resp(200, json!({
            "data": {"id": "zdIGTIdD1mi4", "type": "gif", "rating": "g"},
            "meta": {"status": 200, "msg": "OK", "response_id": "x"}
        }));
        let c = r.assert_success::<Item>().unwrap();
        assert!(c.id_is("zdIGTIdD1mi4").unwrap().kind_is("gif").unwrap().rating_is(Rating::G).is_ok());
    }

    #[test]
    fn meta_error_for_not_found() {
        let r = resp(404, json!({"data": [], "meta": {"status": 404, "msg": "Not Found", "response_id": "x"}}));
        assert!(r.assert_meta_error(404, "Not Found").is_ok());
    }
}
