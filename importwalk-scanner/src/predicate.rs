//! Element predicates and their combinators.
//!
//! A predicate decides whether an element is selected by a traversal. The
//! engine always runs `or(import_link(), caller predicates...)` and then
//! re-tests each match with [`import_href`] to tell imports from visits.

use scraper::{ElementRef, Selector};

pub trait Predicate {
    fn matches(&self, element: &ElementRef<'_>) -> bool;

    fn boxed(self) -> Box<dyn Predicate>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<F> Predicate for F
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self(element)
    }
}

impl Predicate for Selector {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        Selector::matches(self, element)
    }
}

#[derive(Debug, Clone)]
pub struct HasTagName(String);

impl Predicate for HasTagName {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().name() == self.0
    }
}

#[derive(Debug, Clone)]
pub struct HasAttr(String);

impl Predicate for HasAttr {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().attr(&self.0).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct HasAttrValue {
    name: String,
    value: String,
}

impl Predicate for HasAttrValue {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().attr(&self.name) == Some(self.value.as_str())
    }
}

/// True iff every sub-predicate is true. An empty conjunction is true.
#[derive(Default)]
pub struct And(Vec<Box<dyn Predicate>>);

impl And {
    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.0.push(Box::new(predicate));
    }
}

impl Predicate for And {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.0.iter().all(|predicate| predicate.matches(element))
    }
}

/// True iff any sub-predicate is true. An empty disjunction is false.
#[derive(Default)]
pub struct Or(Vec<Box<dyn Predicate>>);

impl Or {
    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.0.push(Box::new(predicate));
    }

    pub fn push_boxed(&mut self, predicate: Box<dyn Predicate>) {
        self.0.push(predicate);
    }
}

impl Predicate for Or {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.0.iter().any(|predicate| predicate.matches(element))
    }
}

/// Selects `<link rel="import" href>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsImportLink;

impl Predicate for IsImportLink {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        import_href(element).is_some()
    }
}

pub fn has_tag_name(name: impl Into<String>) -> HasTagName {
    HasTagName(name.into())
}

pub fn has_attr(name: impl Into<String>) -> HasAttr {
    HasAttr(name.into())
}

pub fn has_attr_value(name: impl Into<String>, value: impl Into<String>) -> HasAttrValue {
    HasAttrValue {
        name: name.into(),
        value: value.into(),
    }
}

pub fn and(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> And {
    And(predicates.into_iter().collect())
}

pub fn or(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> Or {
    Or(predicates.into_iter().collect())
}

pub fn import_link() -> IsImportLink {
    IsImportLink
}

/// The `href` of an import link, or `None` if `element` is not one.
///
/// `rel` is compared to `import` ignoring ASCII case. A present but empty
/// `href` still counts.
pub fn import_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    if value.name() != "link" {
        return None;
    }
    let rel = value.attr("rel")?;
    if !rel.eq_ignore_ascii_case("import") {
        return None;
    }
    value.attr("href")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_has_tag_name() {
        let document = Html::parse_document("<script>1</script><p>x</p>");
        assert!(has_tag_name("script").matches(&first(&document, "script")));
        assert!(!has_tag_name("script").matches(&first(&document, "p")));
    }

    #[test]
    fn test_has_attr_and_value() {
        let document = Html::parse_document(r#"<div data-role="main"></div><div></div>"#);
        let tagged = first(&document, "div[data-role]");
        let plain = first(&document, "div:not([data-role])");

        assert!(has_attr("data-role").matches(&tagged));
        assert!(!has_attr("data-role").matches(&plain));
        assert!(has_attr_value("data-role", "main").matches(&tagged));
        assert!(!has_attr_value("data-role", "MAIN").matches(&tagged));
    }

    #[test]
    fn test_and_or() {
        let document = Html::parse_document(r#"<script src="x.js"></script>"#);
        let script = first(&document, "script");

        let both = and([has_tag_name("script").boxed(), has_attr("src").boxed()]);
        assert!(both.matches(&script));

        let neither = and([has_tag_name("script").boxed(), has_attr("nomodule").boxed()]);
        assert!(!neither.matches(&script));

        let either = or([has_tag_name("style").boxed(), has_attr("src").boxed()]);
        assert!(either.matches(&script));

        assert!(and([]).matches(&script));
        assert!(!or([]).matches(&script));
    }

    fn says_hi(element: &ElementRef<'_>) -> bool {
        element.text().any(|t| t == "hi")
    }

    #[test]
    fn test_selector_and_fn_predicates() {
        let document = Html::parse_document(r#"<p class="note">hi</p><p>bye</p>"#);
        let p = first(&document, "p.note");
        let other = first(&document, "p:not(.note)");

        assert!(Predicate::matches(&Selector::parse("p.note").unwrap(), &p));
        assert!(!Predicate::matches(&Selector::parse("p.note").unwrap(), &other));
        assert!(Predicate::matches(&says_hi, &p));
        assert!(!Predicate::matches(&says_hi, &other));
    }

    #[test]
    fn test_import_href_classification() {
        let document = Html::parse_document(
            r#"<link rel="IMPORT" href="a.html">
               <link rel="stylesheet" href="s.css">
               <link rel="import">
               <link rel="import" href="">"#,
        );
        let selector = Selector::parse("link").unwrap();
        let links: Vec<_> = document.select(&selector).collect();

        assert_eq!(import_href(&links[0]), Some("a.html"));
        assert_eq!(import_href(&links[1]), None);
        assert_eq!(import_href(&links[2]), None);
        assert_eq!(import_href(&links[3]), Some(""));
        assert!(import_link().matches(&links[0]));
        assert!(!import_link().matches(&links[1]));
    }
}
