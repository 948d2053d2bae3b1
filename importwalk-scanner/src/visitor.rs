//! The hook contract between the traversal engine and its callers.
//!
//! Every hook has a no-op default, so a visitor only implements the hooks it
//! cares about. Hooks may mutate the document they are handed; detaching an
//! import link from inside `import` stops the engine from following it.

use crate::error::BoxError;
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub type HookResult = std::result::Result<(), BoxError>;

/// A parsed document shared between the import map and live import links.
pub type SharedDocument = Rc<RefCell<Html>>;

/// Passed to [`Visitor::enter`].
#[derive(Debug, Clone, Copy)]
pub struct EnterDetail<'a> {
    /// Absolute path of the entered document.
    pub path: &'a Path,
    /// The import link that led here; `None` for the traversal root.
    pub link: Option<&'a ImportLink>,
}

/// Passed to [`Visitor::import`].
#[derive(Debug, Clone, Copy)]
pub struct ImportDetail<'a> {
    /// Absolute path of the document containing the link.
    pub path: &'a Path,
    /// `href` resolved against `path`.
    pub location: &'a Path,
    /// The raw `href` attribute.
    pub href: &'a str,
    /// Whether the engine will follow this link.
    pub is_local: bool,
}

/// Passed to [`Visitor::visit`].
#[derive(Debug, Clone, Copy)]
pub struct VisitDetail<'a> {
    pub path: &'a Path,
    /// Zero-based position among the visited elements of `path`. Import
    /// links do not consume an index.
    pub index: usize,
}

pub trait Visitor {
    fn enter(&mut self, _document: &mut Html, _detail: EnterDetail<'_>) -> HookResult {
        Ok(())
    }

    fn import(&mut self, _element: ElementHandle<'_>, _detail: ImportDetail<'_>) -> HookResult {
        Ok(())
    }

    fn visit(&mut self, _element: ElementHandle<'_>, _detail: VisitDetail<'_>) -> HookResult {
        Ok(())
    }
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn enter(&mut self, document: &mut Html, detail: EnterDetail<'_>) -> HookResult {
        (**self).enter(document, detail)
    }

    fn import(&mut self, element: ElementHandle<'_>, detail: ImportDetail<'_>) -> HookResult {
        (**self).import(element, detail)
    }

    fn visit(&mut self, element: ElementHandle<'_>, detail: VisitDetail<'_>) -> HookResult {
        (**self).visit(element, detail)
    }
}

/// A visitor whose hooks all do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVisitor;

impl Visitor for NoopVisitor {}

/// Mutable access to one matched element and the document that owns it.
pub struct ElementHandle<'a> {
    document: &'a mut Html,
    id: NodeId,
}

impl<'a> ElementHandle<'a> {
    pub(crate) fn new(document: &'a mut Html, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn element(&self) -> ElementRef<'_> {
        self.document
            .tree
            .get(self.id)
            .and_then(ElementRef::wrap)
            .expect("element handle points at an element of its own document")
    }

    pub fn name(&self) -> &str {
        self.element().value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element().value().attr(name)
    }

    /// Concatenated text content of the element.
    pub fn text(&self) -> String {
        self.element().text().collect()
    }

    pub fn is_attached(&self) -> bool {
        is_attached(self.document, self.id)
    }

    /// Remove the element from its parent.
    ///
    /// Detaching an import link during the `import` hook prevents the link
    /// from being followed.
    pub fn detach(&mut self) {
        if let Some(mut node) = self.document.tree.get_mut(self.id) {
            node.detach();
        }
    }

    pub fn document(&self) -> &Html {
        self.document
    }

    pub fn document_mut(&mut self) -> &mut Html {
        self.document
    }
}

impl fmt::Debug for ElementHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// The `<link rel="import">` element through which a document was reached.
///
/// Only lent to [`Visitor::enter`], while the containing document is not
/// borrowed by the engine. It cannot be cloned out of the hook; keep
/// [`ImportLink::id`] and [`ImportLink::path`] instead.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<importwalk_scanner::ImportLink>();
/// ```
pub struct ImportLink {
    document: SharedDocument,
    id: NodeId,
    path: PathBuf,
    href: String,
}

impl ImportLink {
    pub(crate) fn new(document: SharedDocument, id: NodeId, path: PathBuf, href: String) -> Self {
        Self {
            document,
            id,
            path,
            href,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Absolute path of the document containing the link.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// The document containing the link.
    pub fn document(&self) -> Ref<'_, Html> {
        self.document.borrow()
    }

    pub fn is_attached(&self) -> bool {
        is_attached(&self.document.borrow(), self.id)
    }

    pub fn detach(&self) {
        if let Some(mut node) = self.document.borrow_mut().tree.get_mut(self.id) {
            node.detach();
        }
    }
}

impl fmt::Debug for ImportLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportLink")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("href", &self.href)
            .finish()
    }
}

pub(crate) fn is_attached(document: &Html, id: NodeId) -> bool {
    document
        .tree
        .get(id)
        .is_some_and(|node| node.parent().is_some())
}
