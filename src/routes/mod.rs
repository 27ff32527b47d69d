pub mod constants;
pub mod health_check; // Public for OpenAPI annotations
pub mod register; // Public for OpenAPI annotations

pub use health_check::*;
pub use register::*;
