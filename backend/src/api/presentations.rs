//! Presentation API handlers.
//!
//! Thin adapter over the store, pipeline, and export services. Creation
//! returns immediately with the pending document; the generation pipeline
//! runs as a detached task and settles the document on its own.

use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::TemplateRepository;
use crate::domain::{
    DomainError, LayoutKind, PresentationDocument, PresentationRequest, PresentationSummary,
    SlideContent, ThemeKind,
};

use super::error::ApiResult;
use super::{SharedExportService, SharedGenerationPipeline, SharedPresentationStore};

/// PPTX media type served by the export endpoint.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Body of the create call.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreatePresentationDto {
    #[schema(example = "Urban beekeeping")]
    pub topic: String,
    #[schema(example = 6)]
    pub slide_count: usize,
    pub theme: ThemeKind,
    /// Explicit layout per slide; omitted to let the generator draw one.
    #[serde(default)]
    pub layout_mix: Option<Vec<LayoutKind>>,
    /// Template whose slide skeletons prescribe the layout mix.
    #[serde(default)]
    pub template_id: Option<Uuid>,
}

/// Body of the reorder call.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ReorderDto {
    /// Every current slide id exactly once, in the desired order.
    pub order: Vec<Uuid>,
}

/// Create a presentation and start its generation pipeline.
#[utoipa::path(
    post,
    path = "/api/presentations",
    request_body = CreatePresentationDto,
    responses(
        (status = 201, description = "Pending presentation created", body = PresentationDocument),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced template does not exist")
    ),
    tags = ["presentations"],
    operation_id = "createPresentation"
)]
#[post("/api/presentations")]
pub async fn create_presentation(
    store: web::Data<SharedPresentationStore>,
    templates: web::Data<dyn TemplateRepository>,
    pipeline: web::Data<SharedGenerationPipeline>,
    body: web::Json<CreatePresentationDto>,
) -> ApiResult<HttpResponse> {
    let dto = body.into_inner();
    let mut request = PresentationRequest {
        topic: dto.topic,
        slide_count: dto.slide_count,
        theme: dto.theme,
        layout_mix: dto.layout_mix,
        template_id: dto.template_id,
    };

    // A referenced template prescribes the deck shape unless an explicit
    // layout mix overrides it.
    if let Some(template_id) = request.template_id {
        if request.layout_mix.is_none() {
            let template = templates
                .find_by_id(&template_id)
                .await
                .map_err(|error| DomainError::internal(error.to_string()))?
                .ok_or_else(|| DomainError::not_found(format!("no template {template_id}")))?;
            request.slide_count = template.slides.len();
            request.layout_mix = Some(template.layout_mix());
        }
    }

    let document = store.create(&request).await?;
    info!(presentation_id = %document.id, topic = %document.topic, "presentation accepted");
    pipeline.into_inner().spawn(document.id, request);
    Ok(HttpResponse::Created().json(document))
}

/// List presentation summaries, newest first.
#[utoipa::path(
    get,
    path = "/api/presentations",
    responses(
        (status = 200, description = "Presentation summaries", body = [PresentationSummary])
    ),
    tags = ["presentations"],
    operation_id = "listPresentations"
)]
#[get("/api/presentations")]
pub async fn list_presentations(
    store: web::Data<SharedPresentationStore>,
) -> ApiResult<web::Json<Vec<PresentationSummary>>> {
    Ok(web::Json(store.list().await?))
}

/// Fetch one presentation document.
#[utoipa::path(
    get,
    path = "/api/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 200, description = "Presentation document", body = PresentationDocument),
        (status = 404, description = "Unknown presentation")
    ),
    tags = ["presentations"],
    operation_id = "getPresentation"
)]
#[get("/api/presentations/{id}")]
pub async fn get_presentation(
    store: web::Data<SharedPresentationStore>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<PresentationDocument>> {
    Ok(web::Json(store.get(path.into_inner()).await?))
}

/// Replace one slide's content.
#[utoipa::path(
    patch,
    path = "/api/presentations/{id}/slides/{slide_id}",
    params(
        ("id" = Uuid, Path, description = "Presentation id"),
        ("slide_id" = Uuid, Path, description = "Slide id")
    ),
    request_body = SlideContent,
    responses(
        (status = 200, description = "Updated document", body = PresentationDocument),
        (status = 400, description = "Content validation failed"),
        (status = 404, description = "Unknown presentation or slide"),
        (status = 409, description = "Presentation is still generating")
    ),
    tags = ["presentations"],
    operation_id = "patchSlide"
)]
#[patch("/api/presentations/{id}/slides/{slide_id}")]
pub async fn patch_slide(
    store: web::Data<SharedPresentationStore>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<SlideContent>,
) -> ApiResult<web::Json<PresentationDocument>> {
    let (id, slide_id) = path.into_inner();
    let document = store.patch_slide(id, slide_id, body.into_inner()).await?;
    Ok(web::Json(document))
}

/// Reorder slides.
#[utoipa::path(
    put,
    path = "/api/presentations/{id}/order",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = ReorderDto,
    responses(
        (status = 200, description = "Updated document", body = PresentationDocument),
        (status = 400, description = "Order is not a permutation of the slide ids"),
        (status = 404, description = "Unknown presentation"),
        (status = 409, description = "Presentation is still generating")
    ),
    tags = ["presentations"],
    operation_id = "reorderSlides"
)]
#[put("/api/presentations/{id}/order")]
pub async fn reorder_slides(
    store: web::Data<SharedPresentationStore>,
    path: web::Path<Uuid>,
    body: web::Json<ReorderDto>,
) -> ApiResult<web::Json<PresentationDocument>> {
    let document = store
        .reorder_slides(path.into_inner(), &body.into_inner().order)
        .await?;
    Ok(web::Json(document))
}

/// Delete a presentation.
#[utoipa::path(
    delete,
    path = "/api/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 204, description = "Presentation deleted"),
        (status = 404, description = "Unknown presentation")
    ),
    tags = ["presentations"],
    operation_id = "deletePresentation"
)]
#[delete("/api/presentations/{id}")]
pub async fn delete_presentation(
    store: web::Data<SharedPresentationStore>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    store.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Export a ready presentation as a PPTX attachment.
#[utoipa::path(
    get,
    path = "/api/presentations/{id}/export/pptx",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 200, description = "PPTX archive", content_type = PPTX_CONTENT_TYPE),
        (status = 404, description = "Unknown presentation"),
        (status = 409, description = "Presentation has no completed content"),
        (status = 500, description = "Rendering failed")
    ),
    tags = ["presentations"],
    operation_id = "exportPresentationPptx"
)]
#[get("/api/presentations/{id}/export/pptx")]
pub async fn export_pptx(
    exporter: web::Data<SharedExportService>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deck = exporter.export_pptx(path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(PPTX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", deck.filename),
        ))
        .body(deck.bytes))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{
        FixtureImageFetcher, FixtureImageSearch, FixtureTemplateRepository, FixtureTextGenerator,
        ImageFetcher, ImageSearch, PresentationRepository, TemplateRepository, TextGenerator,
    };
    use crate::domain::ports::FixturePresentationRepository;
    use crate::domain::{
        ContentGenerator, ExportService, GenerationPipeline, ImageEnricher, PresentationStore,
    };
    use std::time::Duration;

    struct Services {
        store: web::Data<SharedPresentationStore>,
        templates: web::Data<dyn TemplateRepository>,
        pipeline: web::Data<SharedGenerationPipeline>,
        exporter: web::Data<SharedExportService>,
    }

    fn services() -> Services {
        let repository: Arc<dyn PresentationRepository> =
            Arc::new(FixturePresentationRepository::new());
        let store = PresentationStore::new(Arc::clone(&repository));
        let generator: Arc<dyn TextGenerator> = Arc::new(FixtureTextGenerator);
        let search: Arc<dyn ImageSearch> = Arc::new(FixtureImageSearch);
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(FixtureImageFetcher);
        let pipeline = GenerationPipeline::new(
            ContentGenerator::new(generator),
            ImageEnricher::new(search, Duration::from_secs(5)),
            store.repository(),
            store.locks(),
        );
        let exporter = ExportService::new(store.clone(), fetcher);
        let templates: Arc<dyn TemplateRepository> = Arc::new(FixtureTemplateRepository);
        Services {
            store: web::Data::new(store),
            templates: web::Data::from(templates),
            pipeline: web::Data::new(pipeline),
            exporter: web::Data::new(exporter),
        }
    }

    async fn app(
        services: &Services,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(services.store.clone())
                .app_data(services.templates.clone())
                .app_data(services.pipeline.clone())
                .app_data(services.exporter.clone())
                .service(create_presentation)
                .service(list_presentations)
                .service(get_presentation)
                .service(patch_slide)
                .service(reorder_slides)
                .service(delete_presentation)
                .service(export_pptx),
        )
        .await
    }

    #[actix_web::test]
    async fn create_returns_a_pending_document() {
        let services = services();
        let app = app(&services).await;

        let req = test::TestRequest::post()
            .uri("/api/presentations")
            .set_json(json!({
                "topic": "Urban beekeeping",
                "slideCount": 4,
                "theme": "dark",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["topic"], "Urban beekeeping");
        assert_eq!(body["state"], "pending");
    }

    #[actix_web::test]
    async fn create_rejects_out_of_range_slide_counts() {
        let services = services();
        let app = app(&services).await;

        let req = test::TestRequest::post()
            .uri("/api/presentations")
            .set_json(json!({
                "topic": "Urban beekeeping",
                "slideCount": 2,
                "theme": "dark",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn create_with_unknown_template_is_not_found() {
        let services = services();
        let app = app(&services).await;

        let req = test::TestRequest::post()
            .uri("/api/presentations")
            .set_json(json!({
                "topic": "Urban beekeeping",
                "slideCount": 4,
                "theme": "dark",
                "templateId": Uuid::new_v4(),
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn get_unknown_presentation_is_not_found() {
        let services = services();
        let app = app(&services).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/presentations/{}", Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn mutations_conflict_while_the_document_is_pending() {
        let services = services();
        let app = app(&services).await;

        let request = PresentationRequest {
            topic: "Volcanoes".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Dark,
            layout_mix: None,
            template_id: None,
        };
        let document = services
            .store
            .create(&request)
            .await
            .expect("document persists");

        let req = test::TestRequest::put()
            .uri(&format!("/api/presentations/{}/order", document.id))
            .set_json(json!({ "order": [] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "conflict");
    }

    #[actix_web::test]
    async fn delete_reports_not_found_for_unknown_ids() {
        let services = services();
        let app = app(&services).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/presentations/{}", Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn export_of_a_pending_document_conflicts() {
        let services = services();
        let app = app(&services).await;

        let request = PresentationRequest {
            topic: "Volcanoes".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Dark,
            layout_mix: None,
            template_id: None,
        };
        let document = services
            .store
            .create(&request)
            .await
            .expect("document persists");

        let req = test::TestRequest::get()
            .uri(&format!("/api/presentations/{}/export/pptx", document.id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_ready");
    }

    #[actix_web::test]
    async fn export_of_a_ready_document_serves_an_attachment() {
        let services = services();
        let app = app(&services).await;

        let request = PresentationRequest {
            topic: "Volcanoes".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Dark,
            layout_mix: None,
            template_id: None,
        };
        let document = services
            .store
            .create(&request)
            .await
            .expect("document persists");
        services
            .pipeline
            .run(document.id, request)
            .await
            .expect("pipeline settles ready");

        let req = test::TestRequest::get()
            .uri(&format!("/api/presentations/{}/export/pptx", document.id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("attachment header")
            .to_str()
            .expect("ascii header");
        assert!(disposition.contains("Volcanoes.pptx"));
        let body = test::read_body(res).await;
        // Zip archives start with the local-file-header signature.
        assert_eq!(&body[..2], b"PK");
    }

    #[actix_web::test]
    async fn patch_and_reorder_flow_round_trips() {
        let services = services();
        let app = app(&services).await;

        let request = PresentationRequest {
            topic: "Volcanoes".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Dark,
            layout_mix: None,
            template_id: None,
        };
        let document = services
            .store
            .create(&request)
            .await
            .expect("document persists");
        services
            .pipeline
            .run(document.id, request)
            .await
            .expect("pipeline settles ready");
        let ready = services
            .store
            .get(document.id)
            .await
            .expect("document loads");
        let slide_id = ready.slides[0].id;

        let req = test::TestRequest::patch()
            .uri(&format!(
                "/api/presentations/{}/slides/{slide_id}",
                document.id
            ))
            .set_json(json!({
                "layout": "text_only",
                "title": "Edited",
                "bullets": ["New"],
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let mut order: Vec<Uuid> = ready.slides.iter().map(|s| s.id).collect();
        order.reverse();
        let req = test::TestRequest::put()
            .uri(&format!("/api/presentations/{}/order", document.id))
            .set_json(json!({ "order": order }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["slides"][3]["title"], "Edited");
    }
}
