pub mod crypto;
pub mod template;
