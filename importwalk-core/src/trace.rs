use importwalk_scanner::{
    ElementHandle, EnterDetail, HookResult, Html, ImportDetail, VisitDetail, Visitor,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const TEXT_PREVIEW_LEN: usize = 60;

/// One hook invocation, as recorded by [`TraceRecorder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "lowercase")]
pub enum TraceEvent {
    Enter {
        path: PathBuf,
        /// Document containing the import link that led here.
        via: Option<PathBuf>,
        depth: usize,
    },
    Import {
        path: PathBuf,
        location: PathBuf,
        href: String,
        is_local: bool,
        depth: usize,
    },
    Visit {
        path: PathBuf,
        index: usize,
        tag: String,
        text: String,
        depth: usize,
    },
}

impl TraceEvent {
    /// The document the event happened in.
    pub fn path(&self) -> &Path {
        match self {
            TraceEvent::Enter { path, .. }
            | TraceEvent::Import { path, .. }
            | TraceEvent::Visit { path, .. } => path,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TraceEvent::Enter { depth, .. }
            | TraceEvent::Import { depth, .. }
            | TraceEvent::Visit { depth, .. } => *depth,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub documents: usize,
    pub local_imports: usize,
    pub remote_imports: usize,
    pub visits: usize,
}

impl TraceSummary {
    pub fn from_events(events: &[TraceEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            match event {
                TraceEvent::Enter { .. } => summary.documents += 1,
                TraceEvent::Import { is_local: true, .. } => summary.local_imports += 1,
                TraceEvent::Import { is_local: false, .. } => summary.remote_imports += 1,
                TraceEvent::Visit { .. } => summary.visits += 1,
            }
        }
        summary
    }
}

/// Visitor that records every hook call in order.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
    depths: HashMap<PathBuf, usize>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    fn depth_of(&self, path: &Path) -> usize {
        self.depths.get(path).copied().unwrap_or(0)
    }
}

impl Visitor for TraceRecorder {
    fn enter(&mut self, _document: &mut Html, detail: EnterDetail<'_>) -> HookResult {
        let via = detail.link.map(|link| link.path().to_path_buf());
        let depth = via.as_deref().map_or(0, |parent| self.depth_of(parent) + 1);
        self.depths.insert(detail.path.to_path_buf(), depth);

        self.events.push(TraceEvent::Enter {
            path: detail.path.to_path_buf(),
            via,
            depth,
        });
        Ok(())
    }

    fn import(&mut self, _element: ElementHandle<'_>, detail: ImportDetail<'_>) -> HookResult {
        self.events.push(TraceEvent::Import {
            path: detail.path.to_path_buf(),
            location: detail.location.to_path_buf(),
            href: detail.href.to_string(),
            is_local: detail.is_local,
            depth: self.depth_of(detail.path),
        });
        Ok(())
    }

    fn visit(&mut self, element: ElementHandle<'_>, detail: VisitDetail<'_>) -> HookResult {
        let text = element.text().split_whitespace().collect::<Vec<_>>().join(" ");
        self.events.push(TraceEvent::Visit {
            path: detail.path.to_path_buf(),
            index: detail.index,
            tag: element.name().to_string(),
            text,
            depth: self.depth_of(detail.path),
        });
        Ok(())
    }
}

/// Entered documents, in spanning-tree order.
pub fn spanning_order(events: &[TraceEvent]) -> Vec<&Path> {
    events
        .iter()
        .filter_map(|event| match event {
            TraceEvent::Enter { path, .. } => Some(path.as_path()),
            _ => None,
        })
        .collect()
}

pub fn events_to_json(events: &[TraceEvent]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(events)
}

/// Generate a human-readable report from recorded events
pub fn generate_trace_report(events: &[TraceEvent]) -> String {
    let summary = TraceSummary::from_events(events);

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Documents entered: {}\n", summary.documents));
    report.push_str(&format!(
        "  Imports found: {} ({} local, {} remote)\n",
        summary.local_imports + summary.remote_imports,
        summary.local_imports,
        summary.remote_imports
    ));
    report.push_str(&format!("  Elements visited: {}\n", summary.visits));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if events.is_empty() {
        report.push_str("Nothing traversed.\n");
        return report;
    }

    report.push_str("## Spanning tree\n");
    for event in events {
        let indent = "  ".repeat(event.depth() + 1);
        let line = match event {
            TraceEvent::Enter { path, .. } => format!("{}> {}", indent, path.display()),
            TraceEvent::Import {
                href,
                location,
                is_local: true,
                ..
            } => format!("{}  import {} ({})", indent, href, location.display()),
            TraceEvent::Import {
                href,
                is_local: false,
                ..
            } => format!("{}  import {} (remote, not followed)", indent, href),
            TraceEvent::Visit {
                index, tag, text, ..
            } => {
                if text.is_empty() {
                    format!("{}  [{}] <{}>", indent, index, tag)
                } else {
                    format!("{}  [{}] <{}> {}", indent, index, tag, preview(text))
                }
            }
        };
        report.push_str(&line);
        report.push('\n');
    }

    report
}

fn preview(text: &str) -> String {
    if text.chars().count() <= TEXT_PREVIEW_LEN {
        text.to_string()
    } else {
        let cut: String = text.chars().take(TEXT_PREVIEW_LEN).collect();
        format!("{}...", cut)
    }
}
