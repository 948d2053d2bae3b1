use importwalk_scanner::error::{Result, ScanError};
use importwalk_scanner::location::absolutize;
use importwalk_scanner::predicate::{Or, import_link};
use importwalk_scanner::{FsLoader, ImportMap, Loader, NoopVisitor, Predicate, Visitor, traverse};
use std::path::Path;
use tracing::info;

/// Walks the spanning tree of an HTML Imports graph.
///
/// Every `enter` and `omit` call on one helper shares a single import map, so
/// a document reached by an earlier call is never entered again. Calling
/// `omit` first therefore prunes those branches from a later `enter`.
pub struct VisitorHelper<V, L = FsLoader> {
    visitor: V,
    loader: L,
    predicate: Or,
    imports: ImportMap,
}

impl<V: Visitor> VisitorHelper<V> {
    /// A helper that only selects import links.
    pub fn new(visitor: V) -> Self {
        let mut predicate = Or::default();
        predicate.push(import_link());

        Self {
            visitor,
            loader: FsLoader,
            predicate,
            imports: ImportMap::new(),
        }
    }
}

impl<V: Visitor, L: Loader> VisitorHelper<V, L> {
    /// Also select elements matching `predicate`; they are passed to `visit`.
    pub fn with_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicate.push(predicate);
        self
    }

    pub fn with_predicates(
        mut self,
        predicates: impl IntoIterator<Item = Box<dyn Predicate>>,
    ) -> Self {
        for predicate in predicates {
            self.predicate.push_boxed(predicate);
        }
        self
    }

    /// Read documents through `loader` instead of the filesystem.
    pub fn with_loader<L2: Loader>(self, loader: L2) -> VisitorHelper<V, L2> {
        VisitorHelper {
            visitor: self.visitor,
            loader,
            predicate: self.predicate,
            imports: self.imports,
        }
    }

    /// Traverse and visit the spanning tree starting at `entry`.
    pub fn enter(&mut self, entry: impl AsRef<Path>) -> Result<&mut Self> {
        let entry = resolve_entry(entry.as_ref())?;
        info!("Entering import graph at {}", entry.display());

        traverse(
            &mut self.visitor,
            &self.loader,
            &entry,
            &self.predicate,
            &mut self.imports,
            None,
        )?;

        info!("Traversal complete. {} documents traversed", self.imports.len());
        Ok(self)
    }

    /// Traverse without visiting, marking every reached document as done.
    ///
    /// Caller predicates are ignored; only import links are followed.
    pub fn omit(&mut self, entry: impl AsRef<Path>) -> Result<&mut Self> {
        let entry = resolve_entry(entry.as_ref())?;
        info!("Omitting import graph at {}", entry.display());

        traverse(
            &mut NoopVisitor,
            &self.loader,
            &entry,
            &import_link(),
            &mut self.imports,
            None,
        )?;

        info!("Omit complete. {} documents traversed", self.imports.len());
        Ok(self)
    }

    pub fn imports(&self) -> &ImportMap {
        &self.imports
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }
}

fn resolve_entry(entry: &Path) -> Result<std::path::PathBuf> {
    absolutize(entry).map_err(|source| ScanError::Entry {
        path: entry.to_path_buf(),
        source,
    })
}
