pub mod helper;
pub mod hooks;
pub mod trace;

pub use helper::VisitorHelper;
pub use hooks::Hooks;
pub use trace::{TraceEvent, TraceRecorder, TraceSummary, generate_trace_report, spanning_order};

pub use importwalk_scanner::loader::file_exists;
pub use importwalk_scanner::predicate as predicates;
pub use importwalk_scanner::{
    ElementHandle, EnterDetail, FsLoader, HookResult, Html, ImportDetail, ImportLink, ImportMap,
    Loader, MemoryLoader, NoopVisitor, Predicate, ScanError, Selector, VisitDetail, Visitor,
};
