pub mod cache;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::cache::ListCache;
use crate::mailer::{HttpMailer, Mailer};
use crate::models::candidate::Candidate;
use crate::models::course::Course;
use crate::services::{
    blog_service::BlogService, candidate_service::CandidateService,
    communication_service::CommunicationService, course_service::CourseService,
    export_service::ExportService, notification_service::NotificationService,
    template_service::TemplateService, user_service::UserService,
};

/// Unfiltered course lists stay valid for a minute; candidates change more
/// often and get half that.
pub const COURSE_CACHE_TTL: Duration = Duration::from_secs(60);
pub const CANDIDATE_CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub course_service: CourseService,
    pub candidate_service: CandidateService,
    pub blog_service: BlogService,
    pub notification_service: NotificationService,
    pub template_service: TemplateService,
    pub user_service: UserService,
    pub communication_service: CommunicationService,
    pub export_service: ExportService,
    pub course_cache: ListCache<Course>,
    pub candidate_cache: ListCache<Candidate>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let mailer: Arc<dyn Mailer> =
            Arc::new(HttpMailer::from_config(crate::config::get_config()));
        Self::with_mailer(pool, mailer)
    }

    /// Same wiring with the outbound transport swapped; integration tests
    /// use this to avoid real provider calls.
    pub fn with_mailer(pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        let notification_service = NotificationService::new(pool.clone());
        let communication_service =
            CommunicationService::new(pool.clone(), mailer.clone(), notification_service.clone());

        Self {
            course_service: CourseService::new(pool.clone()),
            candidate_service: CandidateService::new(pool.clone()),
            blog_service: BlogService::new(pool.clone()),
            template_service: TemplateService::new(pool.clone()),
            user_service: UserService::new(pool.clone()),
            export_service: ExportService::new(pool.clone()),
            notification_service,
            communication_service,
            course_cache: ListCache::new(COURSE_CACHE_TTL),
            candidate_cache: ListCache::new(CANDIDATE_CACHE_TTL),
            mailer,
            pool,
        }
    }
}
