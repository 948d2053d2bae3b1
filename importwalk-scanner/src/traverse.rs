//! Spanning-tree traversal of the HTML Imports graph.
//!
//! Import links form a directed graph whose nodes are documents. Walking it
//! depth-first in document order, and entering each document at most once,
//! yields the spanning tree that fixes the order in which imported documents
//! are processed.

use crate::error::{Hook, Result, ScanError};
use crate::loader::Loader;
use crate::location::{is_local, resolve};
use crate::predicate::{Predicate, import_href};
use crate::visitor::{
    ElementHandle, EnterDetail, ImportDetail, ImportLink, SharedDocument, VisitDetail, Visitor,
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Documents already traversed, keyed by absolute path.
///
/// Grows monotonically; presence of a path is what stops a cycle.
#[derive(Default)]
pub struct ImportMap {
    documents: HashMap<PathBuf, SharedDocument>,
    order: Vec<PathBuf>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&SharedDocument> {
        self.documents.get(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Traversed paths in the order they were first reached.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    fn insert(&mut self, path: PathBuf, document: SharedDocument) {
        if self.documents.insert(path.clone(), document).is_none() {
            self.order.push(path);
        }
    }
}

impl std::fmt::Debug for ImportMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.order).finish()
    }
}

/// All elements of `document` matching `predicate`, in document order.
pub fn query_all(document: &Html, predicate: &dyn Predicate) -> Vec<NodeId> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| predicate.matches(element))
        .map(|element| element.id())
        .collect()
}

/// Traverse the import graph from `path`, dispatching hooks to `visitor`.
///
/// `path` must be absolute and normalized. `link` is the import link that led
/// to `path`, or `None` at the root. Returns without loading anything when
/// `path` is already in `imports` or when `link` has been detached.
pub fn traverse(
    visitor: &mut dyn Visitor,
    loader: &dyn Loader,
    path: &Path,
    predicate: &dyn Predicate,
    imports: &mut ImportMap,
    link: Option<&ImportLink>,
) -> Result<()> {
    if imports.contains(path) {
        debug!("Skipping {} (already traversed)", path.display());
        return Ok(());
    }
    if let Some(link) = link
        && !link.is_attached()
    {
        debug!(
            "Skipping {} (import link in {} was detached)",
            path.display(),
            link.path().display()
        );
        return Ok(());
    }

    debug!("Entering {}", path.display());
    let markup = loader.load(path)?;
    let document: SharedDocument = Rc::new(RefCell::new(Html::parse_document(&markup)));
    // Registered before any hook runs so that self and mutual imports stop here.
    imports.insert(path.to_path_buf(), Rc::clone(&document));

    visitor
        .enter(&mut document.borrow_mut(), EnterDetail { path, link })
        .map_err(|source| hook_error(Hook::Enter, path, source))?;

    let matched = query_all(&document.borrow(), predicate);
    debug!("Matched {} elements in {}", matched.len(), path.display());

    let mut index = 0;
    for id in matched {
        let href = import_href_of(&document.borrow(), id);

        match href {
            Some(href) => {
                let location = resolve(path, &href);
                let is_local = is_local(&href);

                visitor
                    .import(
                        ElementHandle::new(&mut document.borrow_mut(), id),
                        ImportDetail {
                            path,
                            location: &location,
                            href: &href,
                            is_local,
                        },
                    )
                    .map_err(|source| hook_error(Hook::Import, path, source))?;

                if !is_local {
                    debug!("Not following remote import {}", href);
                    continue;
                }

                let link = ImportLink::new(Rc::clone(&document), id, path.to_path_buf(), href);
                traverse(visitor, loader, &location, predicate, imports, Some(&link))?;
            }
            None => {
                visitor
                    .visit(
                        ElementHandle::new(&mut document.borrow_mut(), id),
                        VisitDetail { path, index },
                    )
                    .map_err(|source| hook_error(Hook::Visit, path, source))?;
                index += 1;
            }
        }
    }

    Ok(())
}

fn import_href_of(document: &Html, id: NodeId) -> Option<String> {
    document
        .tree
        .get(id)
        .and_then(ElementRef::wrap)
        .and_then(|element| import_href(&element))
        .map(str::to_string)
}

fn hook_error(hook: Hook, path: &Path, source: crate::error::BoxError) -> ScanError {
    ScanError::Hook {
        hook,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use crate::predicate::{has_tag_name, import_link, or};
    use crate::visitor::{HookResult, NoopVisitor};

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Visitor for Log {
        fn enter(&mut self, _document: &mut Html, detail: EnterDetail<'_>) -> HookResult {
            self.0.push(format!("enter {}", detail.path.display()));
            Ok(())
        }

        fn import(&mut self, _element: ElementHandle<'_>, detail: ImportDetail<'_>) -> HookResult {
            self.0.push(format!(
                "import {} -> {} local={}",
                detail.path.display(),
                detail.location.display(),
                detail.is_local
            ));
            Ok(())
        }

        fn visit(&mut self, element: ElementHandle<'_>, detail: VisitDetail<'_>) -> HookResult {
            self.0.push(format!(
                "visit {} {}#{}",
                detail.path.display(),
                element.name(),
                detail.index
            ));
            Ok(())
        }
    }

    fn link(href: &str) -> String {
        format!(r#"<link rel="import" href="{href}">"#)
    }

    fn run(loader: &MemoryLoader, entry: &str, predicate: &dyn Predicate) -> Vec<String> {
        let mut log = Log::default();
        let mut imports = ImportMap::new();
        traverse(
            &mut log,
            loader,
            Path::new(entry),
            predicate,
            &mut imports,
            None,
        )
        .unwrap();
        log.0
    }

    #[test]
    fn test_mutual_imports_terminate() {
        let loader = MemoryLoader::new()
            .with_document("/a.html", link("b.html"))
            .with_document("/b.html", link("a.html"));

        let log = run(&loader, "/a.html", &import_link());
        assert_eq!(
            log,
            vec![
                "enter /a.html",
                "import /a.html -> /b.html local=true",
                "enter /b.html",
                "import /b.html -> /a.html local=true",
            ]
        );
    }

    #[test]
    fn test_self_import() {
        let loader = MemoryLoader::new().with_document("/a.html", link("./a.html"));

        let log = run(&loader, "/a.html", &import_link());
        assert_eq!(
            log,
            vec!["enter /a.html", "import /a.html -> /a.html local=true"]
        );
    }

    #[test]
    fn test_visit_index_skips_imports() {
        let loader = MemoryLoader::new()
            .with_document(
                "/a.html",
                format!("<script>1</script>{}<script>2</script>", link("b.html")),
            )
            .with_document("/b.html", "<script>3</script>");
        let predicate = or([import_link().boxed(), has_tag_name("script").boxed()]);

        let log = run(&loader, "/a.html", &predicate);
        assert_eq!(
            log,
            vec![
                "enter /a.html",
                "visit /a.html script#0",
                "import /a.html -> /b.html local=true",
                "enter /b.html",
                "visit /b.html script#0",
                "visit /a.html script#1",
            ]
        );
    }

    #[test]
    fn test_remote_import_not_loaded() {
        // The loader has no remote documents; loading one would fail.
        let loader = MemoryLoader::new().with_document(
            "/a.html",
            format!(
                "{}{}",
                link("http://example.com/x.html"),
                link("//cdn.example.com/y.html")
            ),
        );

        let log = run(&loader, "/a.html", &import_link());
        assert_eq!(log.len(), 3);
        assert!(log[1].ends_with("local=false"));
        assert!(log[2].ends_with("local=false"));
    }

    #[test]
    fn test_empty_href_reported_not_followed() {
        let loader = MemoryLoader::new().with_document("/a.html", link(""));

        let log = run(&loader, "/a.html", &import_link());
        assert_eq!(log, vec!["enter /a.html", "import /a.html -> / local=false"]);
    }

    #[test]
    fn test_detached_link_is_not_followed() {
        struct Veto;

        impl Visitor for Veto {
            fn import(
                &mut self,
                mut element: ElementHandle<'_>,
                _detail: ImportDetail<'_>,
            ) -> HookResult {
                element.detach();
                assert!(!element.is_attached());
                Ok(())
            }
        }

        // b.html is absent: following the link would be a load error.
        let loader = MemoryLoader::new().with_document("/a.html", link("b.html"));
        let mut imports = ImportMap::new();
        traverse(
            &mut Veto,
            &loader,
            Path::new("/a.html"),
            &import_link(),
            &mut imports,
            None,
        )
        .unwrap();

        assert_eq!(imports.len(), 1);
        assert!(!imports.contains(Path::new("/b.html")));
    }

    #[test]
    fn test_link_identity_outlives_enter_hook() {
        #[derive(Default)]
        struct KeepLink {
            kept: Option<(NodeId, PathBuf)>,
            seen_in_parent: Vec<bool>,
        }

        impl Visitor for KeepLink {
            fn enter(&mut self, _document: &mut Html, detail: EnterDetail<'_>) -> HookResult {
                if let Some(link) = detail.link {
                    assert!(link.is_attached());
                    assert!(link.document().tree.get(link.id()).is_some());
                    self.kept = Some((link.id(), link.path().to_path_buf()));
                }
                Ok(())
            }

            fn visit(&mut self, element: ElementHandle<'_>, detail: VisitDetail<'_>) -> HookResult {
                if let Some((id, path)) = &self.kept
                    && path == detail.path
                {
                    self.seen_in_parent
                        .push(crate::visitor::is_attached(element.document(), *id));
                }
                Ok(())
            }
        }

        let loader = MemoryLoader::new()
            .with_document("/a.html", format!("{}<script>a</script>", link("b.html")))
            .with_document("/b.html", "<p>b</p>");
        let predicate = or([import_link().boxed(), has_tag_name("script").boxed()]);
        let mut visitor = KeepLink::default();
        let mut imports = ImportMap::new();
        traverse(
            &mut visitor,
            &loader,
            Path::new("/a.html"),
            &predicate,
            &mut imports,
            None,
        )
        .unwrap();

        assert_eq!(visitor.kept.map(|(_, path)| path), Some(PathBuf::from("/a.html")));
        assert_eq!(visitor.seen_in_parent, vec![true]);
    }

    #[test]
    fn test_already_traversed_path_is_skipped() {
        let loader = MemoryLoader::new().with_document("/a.html", "<p>a</p>");
        let mut imports = ImportMap::new();
        let mut log = Log::default();

        let entry = Path::new("/a.html");
        traverse(&mut NoopVisitor, &loader, entry, &import_link(), &mut imports, None).unwrap();
        traverse(&mut log, &loader, entry, &import_link(), &mut imports, None).unwrap();

        assert!(log.0.is_empty());
        assert_eq!(imports.paths().collect::<Vec<_>>(), vec![Path::new("/a.html")]);
    }

    #[test]
    fn test_load_error_keeps_registered_documents() {
        let loader = MemoryLoader::new().with_document("/a.html", link("missing.html"));
        let mut imports = ImportMap::new();

        let err = traverse(
            &mut NoopVisitor,
            &loader,
            Path::new("/a.html"),
            &import_link(),
            &mut imports,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, ScanError::Load { ref path, .. } if path == Path::new("/missing.html")));
        assert!(imports.contains(Path::new("/a.html")));
    }

    #[test]
    fn test_hook_error_propagates() {
        struct Failing;

        impl Visitor for Failing {
            fn visit(
                &mut self,
                _element: ElementHandle<'_>,
                _detail: VisitDetail<'_>,
            ) -> HookResult {
                Err("boom".into())
            }
        }

        let loader = MemoryLoader::new().with_document("/a.html", "<script></script>");
        let mut imports = ImportMap::new();
        let err = traverse(
            &mut Failing,
            &loader,
            Path::new("/a.html"),
            &has_tag_name("script"),
            &mut imports,
            None,
        )
        .unwrap_err();

        match err {
            ScanError::Hook { hook, path, source } => {
                assert_eq!(hook, Hook::Visit);
                assert_eq!(path, PathBuf::from("/a.html"));
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_query_all_document_order() {
        let document = Html::parse_document(
            "<head><script>1</script></head><body><div><script>2</script></div><script>3</script></body>",
        );
        let ids = query_all(&document, &has_tag_name("script"));
        let texts: Vec<String> = ids
            .into_iter()
            .filter_map(|id| document.tree.get(id).and_then(ElementRef::wrap))
            .map(|element| element.text().collect())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }
}
