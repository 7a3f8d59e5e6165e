pub mod list;
pub mod sequelpro;
