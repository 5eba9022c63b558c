//! Backend entry-point: wires adapters into the domain services and serves
//! the REST API.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::api::health::{live, ready, HealthState};
use backend::api::images::resolve_image;
use backend::api::presentations::{
    create_presentation, delete_presentation, export_pptx, get_presentation, list_presentations,
    patch_slide, reorder_slides,
};
use backend::config::AppConfig;
use backend::domain::ports::{
    ImageFetcher, ImageSearch, PresentationRepository, TemplateRepository, TextGenerator,
};
use backend::domain::{
    ContentGenerator, ExportService, GenerationPipeline, ImageEnricher, LayoutKind,
    PresentationStore, PresentationTemplate, TemplateSlideSpec,
};
use backend::middleware::Trace;
use backend::outbound::persistence::{
    DbPool, DieselPresentationRepository, DieselTemplateRepository, PoolConfig,
};
use backend::outbound::{HttpImageFetcher, OpenRouterClient, OpenRouterSettings, UnsplashClient};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;
    let repository: Arc<dyn PresentationRepository> =
        Arc::new(DieselPresentationRepository::new(pool.clone()));
    let templates: Arc<dyn TemplateRepository> = Arc::new(DieselTemplateRepository::new(pool));

    let mut settings = OpenRouterSettings::new(
        config.openrouter_base_url.clone(),
        &config.openrouter_api_key,
    );
    if let Some(model) = &config.openrouter_model {
        settings.model = model.clone();
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(
        OpenRouterClient::new(settings, config.generation_timeout).map_err(std::io::Error::other)?,
    );
    let search: Arc<dyn ImageSearch> = Arc::new(
        UnsplashClient::new(
            config.unsplash_base_url.clone(),
            &config.unsplash_access_key,
            config.image_query_timeout,
        )
        .map_err(std::io::Error::other)?,
    );
    let fetcher: Arc<dyn ImageFetcher> =
        Arc::new(HttpImageFetcher::new(config.image_fetch_timeout).map_err(std::io::Error::other)?);

    let store = PresentationStore::new(repository);
    let pipeline = web::Data::new(GenerationPipeline::new(
        ContentGenerator::new(generator),
        ImageEnricher::new(Arc::clone(&search), config.image_query_timeout),
        store.repository(),
        store.locks(),
    ));
    let enricher = web::Data::new(ImageEnricher::new(search, config.image_query_timeout));
    let exporter = web::Data::new(ExportService::new(store.clone(), fetcher));
    let store = web::Data::new(store);

    seed_default_templates(templates.as_ref()).await;
    let templates: web::Data<dyn TemplateRepository> = web::Data::from(templates);

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(templates.clone())
            .app_data(pipeline.clone())
            .app_data(exporter.clone())
            .app_data(enricher.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(create_presentation)
            .service(list_presentations)
            .service(get_presentation)
            .service(patch_slide)
            .service(reorder_slides)
            .service(delete_presentation)
            .service(export_pptx)
            .service(resolve_image)
            .service(ready)
            .service(live)
    })
    .bind(config.bind_address.as_str())?;

    health_state.mark_ready();
    info!(address = %config.bind_address, "server listening");
    server.run().await
}

/// Install the stock templates on an empty database. Failures are logged and
/// never block startup; templates are a convenience, not a dependency.
async fn seed_default_templates(templates: &dyn TemplateRepository) {
    let existing = match templates.list().await {
        Ok(existing) => existing,
        Err(error) => {
            warn!(%error, "template listing failed, skipping seed");
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }

    for template in default_templates() {
        match templates.save(&template).await {
            Ok(()) => info!(title = %template.title, "seeded template"),
            Err(error) => warn!(title = %template.title, %error, "template seed failed"),
        }
    }
}

fn default_templates() -> Vec<PresentationTemplate> {
    let text = |layout| TemplateSlideSpec {
        layout,
        placeholders: vec!["title".to_owned(), "bullets".to_owned()],
    };
    let imaged = |layout| TemplateSlideSpec {
        layout,
        placeholders: vec!["title".to_owned(), "bullets".to_owned(), "image".to_owned()],
    };

    [
        PresentationTemplate::new(
            "Classic overview",
            vec![
                text(LayoutKind::TextOnly),
                imaged(LayoutKind::ImageRight),
                imaged(LayoutKind::ImageLeft),
                text(LayoutKind::GridLayout),
                text(LayoutKind::TextOnly),
            ],
        ),
        PresentationTemplate::new(
            "Visual story",
            vec![
                imaged(LayoutKind::ImageTop),
                imaged(LayoutKind::SplitContent),
                imaged(LayoutKind::ImageLeft),
                imaged(LayoutKind::ImageRight),
                text(LayoutKind::GridLayout),
                text(LayoutKind::TextOnly),
            ],
        ),
    ]
    .into_iter()
    .filter_map(|template| match template {
        Ok(template) => Some(template),
        Err(error) => {
            warn!(%error, "stock template is invalid");
            None
        }
    })
    .collect()
}
