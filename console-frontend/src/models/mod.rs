pub mod forms;
pub mod namespace;
pub mod organization;
pub mod short_url;
pub mod user;
