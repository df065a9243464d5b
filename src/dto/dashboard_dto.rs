use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: CandidateStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_courses: i64,
    pub total_candidates: i64,
    pub total_students: i64,
    pub total_blog_posts: i64,
    pub published_posts: i64,
    pub unread_notifications: i64,
    pub recent_applications: i64,
    pub candidates_by_status: Vec<StatusCount>,
}
