pub mod cache_handlers;
pub mod generation_handlers;
pub mod job_handlers;
pub mod profile_handlers;
pub mod system_handlers;

pub use cache_handlers::*;
pub use generation_handlers::*;
pub use job_handlers::*;
pub use profile_handlers::*;
pub use system_handlers::*;
