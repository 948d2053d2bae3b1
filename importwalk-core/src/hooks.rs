use importwalk_scanner::{
    ElementHandle, EnterDetail, HookResult, Html, ImportDetail, VisitDetail, Visitor,
};

pub type EnterHook<'h> = Box<dyn FnMut(&mut Html, EnterDetail<'_>) -> HookResult + 'h>;
pub type ImportHook<'h> = Box<dyn FnMut(ElementHandle<'_>, ImportDetail<'_>) -> HookResult + 'h>;
pub type VisitHook<'h> = Box<dyn FnMut(ElementHandle<'_>, VisitDetail<'_>) -> HookResult + 'h>;

/// A visitor assembled from closures. Hooks that are not set do nothing.
#[derive(Default)]
pub struct Hooks<'h> {
    enter: Option<EnterHook<'h>>,
    import: Option<ImportHook<'h>>,
    visit: Option<VisitHook<'h>>,
}

impl<'h> Hooks<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Html, EnterDetail<'_>) -> HookResult + 'h,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    pub fn on_import<F>(mut self, hook: F) -> Self
    where
        F: FnMut(ElementHandle<'_>, ImportDetail<'_>) -> HookResult + 'h,
    {
        self.import = Some(Box::new(hook));
        self
    }

    pub fn on_visit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(ElementHandle<'_>, VisitDetail<'_>) -> HookResult + 'h,
    {
        self.visit = Some(Box::new(hook));
        self
    }
}

impl Visitor for Hooks<'_> {
    fn enter(&mut self, document: &mut Html, detail: EnterDetail<'_>) -> HookResult {
        match self.enter.as_mut() {
            Some(hook) => hook(document, detail),
            None => Ok(()),
        }
    }

    fn import(&mut self, element: ElementHandle<'_>, detail: ImportDetail<'_>) -> HookResult {
        match self.import.as_mut() {
            Some(hook) => hook(element, detail),
            None => Ok(()),
        }
    }

    fn visit(&mut self, element: ElementHandle<'_>, detail: VisitDetail<'_>) -> HookResult {
        match self.visit.as_mut() {
            Some(hook) => hook(element, detail),
            None => Ok(()),
        }
    }
}
