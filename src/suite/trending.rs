use crate::error::HarnessError;
use crate::request::{Endpoint, RequestSpec};
use crate::types::Item;
use crate::Harness;

/// Second page offset. Neighbouring pages drift too much between requests,
/// so the second page is taken well clear of the first.
const FAR_OFFSET: i64 = 40;
const PAGE: i64 = 10;

fn trending(h: &Harness) -> RequestSpec { h.authed(Endpoint::GifTrending) }

pub(super) async fn trending_no_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_missing_key(h, Endpoint::GifTrending).await
}

pub(super) async fn trending_invalid_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_invalid_key(h, Endpoint::GifTrending).await
}

pub(super) async fn trending_defaults(h: &Harness) -> Result<(), HarnessError> {
    let n = h.config().default_limit;
    h.send(&trending(h))
        .await?
        .assert_success::<Vec<Item>>()?
        .has_len(n as usize)?
        .total_count_at_least(u64::from(n))?
        .count_is(u64::from(n))?
        .offset_is(0)?;
    Ok(())
}

pub(super) async fn trending_limit(h: &Harness) -> Result<(), HarnessError> {
    super::expect_limit(h, trending(h), 5).await
}

pub(super) async fn trending_limit_ceiling(h: &Harness) -> Result<(), HarnessError> {
    super::expect_limit(h, trending(h), 100).await
}

pub(super) async fn trending_limit_negative(h: &Harness) -> Result<(), HarnessError> {
    super::expect_zeroed(h, trending(h).limit(-10)).await
}

pub(super) async fn trending_offset_pages_disjoint(h: &Harness) -> Result<(), HarnessError> {
    let first = h
        .send(&trending(h).limit(PAGE).offset(0))
        .await?
        .assert_success::<Vec<Item>>()?
        .has_len(PAGE as usize)?
        .count_is(PAGE as u64)?
        .offset_is(0)?
        .ids();
    h.send(&trending(h).limit(PAGE).offset(FAR_OFFSET))
        .await?
        .assert_success::<Vec<Item>>()?
        .has_len(PAGE as usize)?
        .count_is(PAGE as u64)?
        .offset_is(FAR_OFFSET as u64)?
        .disjoint_from(&first)?;
    Ok(())
}

pub(super) async fn trending_offset_ordering(h: &Harness) -> Result<(), HarnessError> {
    super::expect_offset_ordering(h, trending(h)).await
}

pub(super) async fn trending_offset_negative(h: &Harness) -> Result<(), HarnessError> {
    super::expect_zeroed(h, trending(h).offset(-10)).await
}

// Zeroes every pagination field, unlike sticker search.
pub(super) async fn trending_offset_beyond_total(h: &Harness) -> Result<(), HarnessError> {
    super::expect_offset_beyond_total(h, trending(h)).await
}

pub(super) async fn trending_ratings(h: &Harness) -> Result<(), HarnessError> {
    super::expect_ratings_filtered(h, trending(h)).await
}
