//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and the schemas of the payloads
//! they exchange. The generated document serves external tooling; no UI is
//! bundled with the server.

use utoipa::OpenApi;

use crate::api::presentations::{CreatePresentationDto, ReorderDto};
use crate::domain::{
    DomainError, ErrorCode, GenerationState, ImageSlot, PresentationDocument, PresentationSummary,
    ResolvedImage, Slide, SlideContent, ThemeKind,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presentation generator API",
        description = "Topic-to-slides generation, editing, and PPTX export."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::presentations::create_presentation,
        crate::api::presentations::list_presentations,
        crate::api::presentations::get_presentation,
        crate::api::presentations::patch_slide,
        crate::api::presentations::reorder_slides,
        crate::api::presentations::delete_presentation,
        crate::api::presentations::export_pptx,
        crate::api::images::resolve_image,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        CreatePresentationDto,
        ReorderDto,
        PresentationDocument,
        PresentationSummary,
        GenerationState,
        Slide,
        SlideContent,
        ImageSlot,
        ResolvedImage,
        ThemeKind,
        DomainError,
        ErrorCode,
    )),
    tags(
        (name = "presentations", description = "Presentation lifecycle and export"),
        (name = "images", description = "Image resolution proxy"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
