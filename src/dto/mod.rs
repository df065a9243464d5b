pub mod blog_dto;
pub mod candidate_dto;
pub mod communication_dto;
pub mod course_dto;
pub mod dashboard_dto;
pub mod notification_dto;
pub mod template_dto;
pub mod user_dto;
