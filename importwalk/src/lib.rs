// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    WalkOptions, expand_path, parse_selector, record_walk, render_order, render_walk,
};
