pub mod admin_users;
pub mod auth;
pub mod blog;
pub mod candidates;
pub mod communication;
pub mod courses;
pub mod dashboard;
pub mod email_templates;
pub mod export;
pub mod health;
pub mod notifications;
pub mod students;
