use crate::error::HarnessError;
use crate::request::Endpoint;
use crate::types::Item;
use crate::Harness;

fn known_gif(h: &Harness) -> Endpoint { Endpoint::GifById(h.config().known_gif_id.clone()) }

pub(super) async fn gif_by_id_returns_gif(h: &Harness) -> Result<(), HarnessError> {
    let id = &h.config().known_gif_id;
    h.send(&h.authed(known_gif(h)))
        .await?
        .assert_success::<Item>()?
        .kind_is("gif")?
        .id_is(id)?
        .rating_is(h.config().known_gif_rating)?;
    Ok(())
}

pub(super) async fn gif_by_id_no_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_missing_key(h, known_gif(h)).await
}

pub(super) async fn gif_by_id_invalid_api_key(h: &Harness) -> Result<(), HarnessError> {
    super::expect_invalid_key(h, known_gif(h)).await
}

pub(super) async fn gif_by_id_not_found(h: &Harness) -> Result<(), HarnessError> {
    let unknown = Endpoint::GifById(format!("{}XXXX", h.config().known_gif_id));
    h.send(&h.authed(unknown)).await?.assert_meta_error(404, "Not Found")?;
    Ok(())
}
