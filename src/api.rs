//! Web API Module
//!
//! Thin JSON host over the learning engine for the SkillSpark frontend.
//! Request validation happens here; the engine only ever sees requests
//! that already passed it.

use crate::config::{AppConfig, EngineConfig};
use crate::learning::{
    available_skills, sample_projects, supported_languages, AuthError, ChatSession,
    IdentityProvider, LearningEngine, LearningError, LearningSummary, Lesson, LoadingFlag,
    LogNotifier, MockIdentityProvider, Notifier, ProfileUpdate, Project, ResumeExport,
    RoadmapRequest, RoadmapSource, SessionManager, SqliteStateStore, StateStore, StaticCatalog,
};
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state. The engine is the single owner of the
/// roadmap tree; handlers reach it only through its operations.
pub struct AppState {
    pub engine: Mutex<LearningEngine>,
    pub sessions: Mutex<SessionManager>,
    pub chat: Mutex<ChatSession>,
    /// Readable while a roadmap generation holds the engine lock
    pub loading: LoadingFlag,
    pub projects: Vec<Project>,
}

impl AppState {
    /// Wire the default collaborators and restore persisted state
    pub fn new(config: &AppConfig) -> Result<Self, LearningError> {
        let store: Arc<dyn StateStore> =
            Arc::new(SqliteStateStore::new(config.database_path.clone())?);
        let source: Arc<dyn RoadmapSource> =
            Arc::new(StaticCatalog::with_latency(config.catalog_latency));
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(MockIdentityProvider::with_latency(config.identity_latency));

        let mut state = Self::with_collaborators(
            config.engine.clone(),
            source,
            store,
            Arc::new(LogNotifier),
            identity,
        );
        state.engine.get_mut().restore()?;
        if let Err(e) = state.sessions.get_mut().restore() {
            warn!("Could not restore session: {}", e);
        }
        Ok(state)
    }

    pub fn with_collaborators(
        config: EngineConfig,
        source: Arc<dyn RoadmapSource>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let engine = LearningEngine::new(config, source, store.clone(), notifier.clone());
        let loading = engine.loading_flag();
        Self {
            engine: Mutex::new(engine),
            sessions: Mutex::new(SessionManager::new(identity, store, notifier)),
            chat: Mutex::new(ChatSession::new()),
            loading,
            projects: sample_projects(),
        }
    }
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Deserialize)]
pub struct SubmitQuizRequest {
    /// One entry per question; `null` for unanswered
    pub answers: Vec<Option<usize>>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

fn learning_error_response(e: &LearningError) -> HttpResponse {
    let body = ApiResponse::<()>::error(&e.to_string());
    match e {
        LearningError::Validation(_) => HttpResponse::BadRequest().json(body),
        LearningError::StageNotFound(_) => HttpResponse::NotFound().json(body),
        LearningError::StageLocked(_) => HttpResponse::Conflict().json(body),
        LearningError::Catalog(_) => HttpResponse::BadGateway().json(body),
        LearningError::Store(_) => HttpResponse::InternalServerError().json(body),
    }
}

/// Resolve a stage the learner is allowed to work on
fn open_stage(
    engine: &LearningEngine,
    skill_id: &str,
    stage_id: &str,
) -> Result<(), LearningError> {
    match engine.stage_locked(skill_id, stage_id) {
        None => Err(LearningError::StageNotFound(format!("{}/{}", skill_id, stage_id))),
        Some(true) => Err(LearningError::StageLocked(stage_id.to_string())),
        Some(false) => Ok(()),
    }
}

fn auth_error_response(e: &AuthError) -> HttpResponse {
    match e {
        AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
            HttpResponse::Unauthorized().json(ApiResponse::<()>::error(&e.to_string()))
        }
        AuthError::MissingName => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(&e.to_string()))
        }
        AuthError::Store(_) | AuthError::Serialization(_) => {
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error(&e.to_string()))
        }
    }
}

// ============================================================
// API HANDLERS
// ============================================================

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "SkillSpark API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn get_skill_choices() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(available_skills()))
}

async fn get_languages() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(supported_languages()))
}

/// Validate the request, then generate a new roadmap
async fn generate_roadmap(
    data: web::Data<Arc<AppState>>,
    req: web::Json<RoadmapRequest>,
) -> impl Responder {
    let request = req.into_inner();
    if let Err(e) = request.validate() {
        return learning_error_response(&e);
    }

    let mut engine = data.engine.lock().await;
    match engine.generate_roadmap(request).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(engine.snapshot().clone())),
        Err(e) => HttpResponse::BadGateway().json(ApiResponse::<()>::error(&format!(
            "Failed to generate roadmap: {}",
            e
        ))),
    }
}

async fn get_roadmap(data: web::Data<Arc<AppState>>) -> impl Responder {
    let engine = data.engine.lock().await;
    HttpResponse::Ok().json(ApiResponse::success(engine.snapshot().clone()))
}

async fn get_loading(data: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "loading": data.loading.is_loading()
    })))
}

/// Lessons of an open stage in the learner's preferred language
async fn list_lessons(
    data: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (skill_id, stage_id) = path.into_inner();
    let engine = data.engine.lock().await;
    if let Err(e) = open_stage(&engine, &skill_id, &stage_id) {
        return learning_error_response(&e);
    }

    let lessons: Vec<Lesson> = engine
        .skill(&skill_id)
        .and_then(|skill| skill.stage(&stage_id))
        .map(|stage| {
            stage
                .lessons_in_language(engine.preferred_language())
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    HttpResponse::Ok().json(ApiResponse::success(lessons))
}

/// Complete a lesson. Locked stages are refused before the engine sees the
/// call, so the streak only counts lessons the learner could open.
async fn complete_lesson(
    data: web::Data<Arc<AppState>>,
    path: web::Path<(String, String, String)>,
) -> impl Responder {
    let (skill_id, stage_id, lesson_id) = path.into_inner();
    let mut engine = data.engine.lock().await;
    if let Some(true) = engine.stage_locked(&skill_id, &stage_id) {
        return learning_error_response(&LearningError::StageLocked(stage_id));
    }
    engine.complete_lesson(&skill_id, &stage_id, &lesson_id);

    match engine.skill(&skill_id) {
        Some(skill) => HttpResponse::Ok().json(ApiResponse::success(skill.clone())),
        None => HttpResponse::NotFound().json(ApiResponse::<()>::error("Skill not found")),
    }
}

async fn submit_quiz(
    data: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
    req: web::Json<SubmitQuizRequest>,
) -> impl Responder {
    let (skill_id, stage_id) = path.into_inner();
    let mut engine = data.engine.lock().await;

    match engine.submit_quiz(&skill_id, &stage_id, &req.answers) {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(outcome)),
        Err(e) => learning_error_response(&e),
    }
}

async fn get_summary(data: web::Data<Arc<AppState>>) -> impl Responder {
    let engine = data.engine.lock().await;
    let summary = LearningSummary::from_skills(engine.skills(), engine.streak());
    HttpResponse::Ok().json(ApiResponse::success(summary))
}

async fn send_chat(
    data: web::Data<Arc<AppState>>,
    req: web::Json<ChatRequest>,
) -> impl Responder {
    let mut chat = data.chat.lock().await;
    if chat.send(&req.message).is_none() {
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error("Message is empty"));
    }
    HttpResponse::Ok().json(ApiResponse::success(chat.history().to_vec()))
}

async fn login(data: web::Data<Arc<AppState>>, req: web::Json<LoginRequest>) -> impl Responder {
    let mut sessions = data.sessions.lock().await;
    match sessions.login(&req.email, &req.password).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(user)),
        Err(e) => auth_error_response(&e),
    }
}

async fn register(
    data: web::Data<Arc<AppState>>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    let mut sessions = data.sessions.lock().await;
    match sessions
        .register(&req.email, &req.password, &req.first_name, &req.last_name)
        .await
    {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(user)),
        Err(e) => auth_error_response(&e),
    }
}

async fn logout(data: web::Data<Arc<AppState>>) -> impl Responder {
    let mut sessions = data.sessions.lock().await;
    match sessions.logout() {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success("Signed out")),
        Err(e) => auth_error_response(&e),
    }
}

/// Update the profile and push the preferred language into the engine
async fn update_profile(
    data: web::Data<Arc<AppState>>,
    req: web::Json<ProfileUpdate>,
) -> impl Responder {
    let change = {
        let mut sessions = data.sessions.lock().await;
        match sessions.update_profile(req.into_inner()).await {
            Ok(change) => change,
            Err(e) => return auth_error_response(&e),
        }
    };

    if let Some(language) = &change.preferred_language {
        data.engine.lock().await.set_preferred_language(language);
    }
    HttpResponse::Ok().json(ApiResponse::success(change))
}

async fn export_resume(data: web::Data<Arc<AppState>>) -> impl Responder {
    let user = match data.sessions.lock().await.current_user().cloned() {
        Some(user) => user,
        None => return auth_error_response(&AuthError::NotAuthenticated),
    };

    let engine = data.engine.lock().await;
    let resume = ResumeExport::new(&user, engine.skills(), &data.projects);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(resume.file_name())],
        })
        .body(resume.render_html())
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

/// Register all routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/api/catalog/skills", web::get().to(get_skill_choices))
        .route("/api/catalog/languages", web::get().to(get_languages))
        .route("/api/roadmap", web::post().to(generate_roadmap))
        .route("/api/roadmap", web::get().to(get_roadmap))
        .route("/api/roadmap/loading", web::get().to(get_loading))
        .route(
            "/api/roadmap/{skill_id}/{stage_id}/lessons",
            web::get().to(list_lessons),
        )
        .route(
            "/api/roadmap/{skill_id}/{stage_id}/lessons/{lesson_id}/complete",
            web::post().to(complete_lesson),
        )
        .route(
            "/api/roadmap/{skill_id}/{stage_id}/quiz",
            web::post().to(submit_quiz),
        )
        .route("/api/summary", web::get().to(get_summary))
        .route("/api/chat", web::post().to(send_chat))
        .route("/api/auth/login", web::post().to(login))
        .route("/api/auth/register", web::post().to(register))
        .route("/api/auth/logout", web::post().to(logout))
        .route("/api/profile", web::put().to(update_profile))
        .route("/api/resume", web::get().to(export_resume));
}

/// Configure and run the API server
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = Arc::new(
        AppState::new(&config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );

    info!("SkillSpark API starting at http://{}:{}", config.host, config.port);
    info!("Quiz passing score: {}%", config.engine.passing_score);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
