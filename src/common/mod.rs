pub mod config;
pub mod csrf;
pub mod error;
pub mod location;
pub mod logging;
pub mod router;
pub mod token;
pub mod urls;
