pub mod error;
pub mod loader;
pub mod location;
pub mod predicate;
pub mod traverse;
pub mod visitor;

pub use error::{BoxError, Hook, ScanError};
pub use loader::{FsLoader, Loader, MemoryLoader};
pub use predicate::Predicate;
pub use traverse::{ImportMap, traverse};
pub use visitor::{
    ElementHandle, EnterDetail, HookResult, ImportDetail, ImportLink, NoopVisitor, VisitDetail,
    Visitor,
};

// Re-exported so callers can name documents and CSS selectors without a
// direct scraper dependency.
pub use scraper::{ElementRef, Html, Selector};
