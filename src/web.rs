use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::badge::BadgeSheet;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::render::{HtmlRenderer, Renderer, Template};
use crate::schedule::EventIndex;
use crate::wcif::{parse_competition, Competition};

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const LOGO_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "svg"];

/// An uploaded competition together with the event index built from it.
pub struct Upload {
    pub competition: Competition,
    pub index: EventIndex,
}

// In-memory storage for the last upload and generated documents
pub struct AppState {
    pub config: Config,
    pub upload: Mutex<Option<Upload>>,
    pub logo: Mutex<Option<String>>,
    pub artifacts: Mutex<HashMap<Template, Vec<u8>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            upload: Mutex::new(None),
            logo: Mutex::new(None),
            artifacts: Mutex::new(HashMap::new()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Deserialize)]
pub struct LogoQuery {
    filename: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    success: bool,
    persons: usize,
    activities: usize,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    success: bool,
    badges: usize,
    guests: usize,
    skipped_assignments: usize,
    skipped_persons: Vec<String>,
}

/// Keeps only the final path component and checks the image extension.
fn sanitize_logo_name(raw: &str) -> Result<String> {
    let name = Path::new(raw.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid logo file name: {:?}", raw)))?;
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !LOGO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Logo must be one of {}",
            LOGO_EXTENSIONS.join(", ")
        )));
    }
    Ok(name.to_string())
}

// Logo upload endpoint
async fn upload_logo(
    query: web::Query<LogoQuery>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let name = sanitize_logo_name(&query.filename)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Logo file is empty".to_string()));
    }

    std::fs::create_dir_all(&state.config.static_dir)?;
    std::fs::write(state.config.static_dir.join(&name), &body)?;
    tracing::info!(file = %name, bytes = body.len(), "Stored logo");

    *lock(&state.logo) = Some(name.clone());
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "filename": name})))
}

// Competition JSON upload endpoint
async fn upload_wcif(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let competition = parse_competition(&body)?;
    // Built once per upload and reused by every generate call.
    let index = EventIndex::build(&competition.schedule)?;

    let response = UploadResponse {
        success: true,
        persons: competition.persons.len(),
        activities: index.len(),
    };
    tracing::info!(
        competition = %competition.name,
        persons = response.persons,
        activities = response.activities,
        "Competition uploaded"
    );

    *lock(&state.upload) = Some(Upload { competition, index });
    lock(&state.artifacts).clear();
    Ok(HttpResponse::Ok().json(response))
}

// Badge generation endpoint
async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let logo = lock(&state.logo).clone();
    let sheet = {
        let upload = lock(&state.upload);
        let upload = upload
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Upload a competition JSON first".to_string()))?;
        BadgeSheet::from_index(&upload.competition, &upload.index, state.config.failure_policy, logo)?
    };

    let renderer = HtmlRenderer::new("/static/");
    let mut artifacts = HashMap::new();
    for template in Template::ALL {
        artifacts.insert(template, renderer.render(template, &sheet)?);
    }
    *lock(&state.artifacts) = artifacts;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        success: true,
        badges: sheet.badges.len(),
        guests: sheet.badges.iter().filter(|b| b.guests > 0).count(),
        skipped_assignments: sheet.skipped_assignments,
        skipped_persons: sheet.skipped_persons,
    }))
}

// Generated document download endpoint
async fn download(file: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let template = Template::ALL
        .into_iter()
        .find(|t| t.file_name() == file.as_str())
        .ok_or_else(|| AppError::NotFound(file.to_string()))?;

    let artifacts = lock(&state.artifacts);
    let bytes = artifacts
        .get(&template)
        .ok_or_else(|| AppError::NotFound(format!("{} has not been generated yet", file)))?;
    Ok(HttpResponse::Ok()
        .content_type(template.content_type())
        .body(bytes.clone()))
}

// HTML page handler
async fn index() -> HttpResponse {
    let html = include_str!("../templates/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

/// Registers all routes; shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .route("/", web::get().to(index))
        .route("/api/logo", web::post().to(upload_logo))
        .route("/api/wcif", web::post().to(upload_wcif))
        .route("/api/generate", web::post().to(generate))
        .route("/api/{file}", web::get().to(download));
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.static_dir)?;
    let port = config.port;
    let app_state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", app_state.config.static_dir.clone()))
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
