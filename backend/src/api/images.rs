//! Image resolution proxy.
//!
//! Exposes the enricher's search behind the API so browser clients never see
//! provider credentials.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DomainError, ResolvedImage};

use super::error::ApiResult;
use super::SharedImageEnricher;

/// Query string of the resolve call.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResolveImageQuery {
    /// Search phrase, e.g. `rooftop beehive`.
    pub query: String,
}

/// Resolve a search phrase to one attributed landscape image.
#[utoipa::path(
    get,
    path = "/api/images/resolve",
    params(ResolveImageQuery),
    responses(
        (status = 200, description = "Best matching image", body = ResolvedImage),
        (status = 400, description = "Blank query"),
        (status = 404, description = "No image matched")
    ),
    tags = ["images"],
    operation_id = "resolveImage"
)]
#[get("/api/images/resolve")]
pub async fn resolve_image(
    enricher: web::Data<SharedImageEnricher>,
    query: web::Query<ResolveImageQuery>,
) -> ApiResult<web::Json<ResolvedImage>> {
    let phrase = query.into_inner().query;
    if phrase.trim().is_empty() {
        return Err(DomainError::invalid_request("query must not be empty").into());
    }
    match enricher.resolve(phrase.trim()).await {
        Some(image) => Ok(web::Json(image)),
        None => Err(DomainError::not_found(format!("no image matched {phrase:?}")).into()),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use super::*;
    use crate::domain::ports::{FixtureImageSearch, ImageHit, ImageSearch, ImageSearchError};
    use crate::domain::ImageEnricher;

    struct SingleHitSearch;

    #[async_trait::async_trait]
    impl ImageSearch for SingleHitSearch {
        async fn search(&self, query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
            Ok(Some(ImageHit {
                url: "https://images.example/hive.jpg".to_owned(),
                alt: query.to_owned(),
                author_name: "Sam Photographer".to_owned(),
                author_url: "https://photos.example/@sam".to_owned(),
                download_location: None,
            }))
        }

        async fn record_download(&self, _location: &str) -> Result<(), ImageSearchError> {
            Ok(())
        }
    }

    fn enricher(search: Arc<dyn ImageSearch>) -> web::Data<SharedImageEnricher> {
        web::Data::new(ImageEnricher::new(search, Duration::from_secs(5)))
    }

    #[actix_web::test]
    async fn resolves_a_hit_with_attribution() {
        let app = test::init_service(
            App::new()
                .app_data(enricher(Arc::new(SingleHitSearch)))
                .service(resolve_image),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/images/resolve?query=rooftop%20beehive")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["authorName"], "Sam Photographer");
        assert_eq!(body["alt"], "rooftop beehive");
    }

    #[actix_web::test]
    async fn a_blank_query_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(enricher(Arc::new(SingleHitSearch)))
                .service(resolve_image),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/images/resolve?query=%20")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn an_empty_result_maps_to_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(enricher(Arc::new(FixtureImageSearch)))
                .service(resolve_image),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/images/resolve?query=nothing")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
