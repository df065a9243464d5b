use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::Error;

/// JSON body extractor that funnels both malformed bodies and failed
/// validation through the crate error type, so clients always see a 400
/// with the Portuguese message instead of axum's default rejection.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(error = %rejection, "request body rejected");
            Error::BadRequest("Corpo do pedido inválido".to_string())
        })?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}
