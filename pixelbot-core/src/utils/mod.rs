pub mod template;
pub mod time;
