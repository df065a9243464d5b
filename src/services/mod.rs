pub mod blog_service;
pub mod candidate_service;
pub mod communication_service;
pub mod course_service;
pub mod export_service;
pub mod notification_service;
pub mod template_service;
pub mod user_service;
