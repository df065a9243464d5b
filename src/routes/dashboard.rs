use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::dashboard_dto::{DashboardStats, StatusCount},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let total_courses = state.course_service.count().await?;
    let total_candidates = state.candidate_service.count().await?;
    let total_students = state.candidate_service.count_students().await?;
    let total_blog_posts = state.blog_service.count().await?;
    let published_posts = state.blog_service.count_published().await?;
    let unread_notifications = state.notification_service.unread_count().await?;
    let recent_applications = state.candidate_service.count_recent_week().await?;
    let candidates_by_status = state
        .candidate_service
        .status_counts()
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

    Ok(Json(DashboardStats {
        total_courses,
        total_candidates,
        total_students,
        total_blog_posts,
        published_posts,
        unread_notifications,
        recent_applications,
        candidates_by_status,
    }))
}
