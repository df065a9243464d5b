pub mod blog_post;
pub mod candidate;
pub mod course;
pub mod email_template;
pub mod notification;
pub mod user;
