use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use pipegrid::assemble::Layout;
use pipegrid::config::Params;
use pipegrid::render;
use pipegrid::section::{Section, default_sections, sections_from_data};
use pipegrid::{Viewport, route::RoutedPath};

#[derive(Deserialize)]
struct LayoutRequest {
    seed: Option<u64>,
    width: Option<f64>,
    height: Option<f64>,
    mobile: Option<bool>,
    /// Explicit section list; wins over `data`.
    sections: Option<Vec<Section>>,
    /// Site data document to derive sections from.
    data: Option<serde_json::Value>,
    params: Option<Params>,
    cell_px: Option<usize>,
}

#[derive(Serialize)]
struct LayoutResponse {
    cols: usize,
    rows: usize,
    layout: Layout,
    paths: Vec<RoutedPath>,
    png: String,
    text: String,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn build_response(req: LayoutRequest) -> Result<LayoutResponse, (StatusCode, String)> {
    let seed = req.seed.unwrap_or(42);
    let viewport = Viewport {
        width: req.width.unwrap_or(1280.0),
        height: req.height.unwrap_or(720.0),
        is_mobile: req.mobile.unwrap_or(false),
    };
    let params = req.params.unwrap_or_default().bounded();
    let sections = match (req.sections, req.data) {
        (Some(sections), _) => sections,
        (None, Some(data)) => sections_from_data(&data),
        (None, None) => default_sections(),
    };

    let (layout, timings) = pipegrid::generate(seed, viewport, &sections, &params)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let cell_px = req.cell_px.unwrap_or(32).clamp(4, 256);
    let (w, h) = render::raster_size(&layout, cell_px);
    let png = encode_png(&render::render_rgba(&layout, cell_px), w, h)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(LayoutResponse {
        cols: layout.dims.cols,
        rows: layout.dims.rows,
        paths: layout.paths.clone(),
        text: render::render_text(&layout),
        png,
        timings: timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect(),
        layout,
    })
}

async fn layout_handler(
    Json(req): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, (StatusCode, String)> {
    let response = tokio::task::spawn_blocking(move || build_response(req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    Ok(Json(response))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/layout", post(layout_handler))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("pipegrid server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
