use crate::error::HarnessError;
use crate::request::{Endpoint, RequestSpec};
use crate::types::Item;
use crate::Harness;

fn search(h: &Harness) -> RequestSpec { h.authed(Endpoint::StickerSearch) }

fn search_for(h: &Harness, term: &str) -> RequestSpec { search(h).query(term) }

pub(super) async fn sticker_search_no_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_missing_key(h, Endpoint::StickerSearch).await
}

pub(super) async fn sticker_search_invalid_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_invalid_key(h, Endpoint::StickerSearch).await
}

// No `q`: valid request, nothing matches.
pub(super) async fn sticker_search_empty_search_term(h: &Harness) -> Result<(), HarnessError> {
    h.send(&search(h))
        .await?
        .assert_ok::<Vec<Item>>()?
        .is_empty()?
        .count_is(0)?
        .total_count_is(0)?;
    Ok(())
}

pub(super) async fn sticker_search_limit(h: &Harness) -> Result<(), HarnessError> {
    super::expect_limit(h, search_for(h, &h.config().search_term), 5).await
}

pub(super) async fn sticker_search_limit_ceiling(h: &Harness) -> Result<(), HarnessError> {
    super::expect_limit(h, search_for(h, &h.config().search_term), 100).await
}

pub(super) async fn sticker_search_limit_negative(h: &Harness) -> Result<(), HarnessError> {
    super::expect_zeroed(h, search(h).limit(-10)).await
}

pub(super) async fn sticker_search_offset_ordering(h: &Harness) -> Result<(), HarnessError> {
    super::expect_offset_ordering(h, search_for(h, &h.config().search_term)).await
}

pub(super) async fn sticker_search_offset_negative(h: &Harness) -> Result<(), HarnessError> {
    super::expect_zeroed(h, search(h).offset(-10)).await
}

// Unlike trending, the out-of-range offset and the real total are echoed back.
pub(super) async fn sticker_search_offset_beyond_total(h: &Harness) -> Result<(), HarnessError> {
    super::expect_offset_beyond_total(h, search_for(h, &h.config().overflow_search_term)).await
}

pub(super) async fn sticker_search_ratings(h: &Harness) -> Result<(), HarnessError> {
    super::expect_ratings_filtered(h, search_for(h, &h.config().rating_search_term)).await
}
