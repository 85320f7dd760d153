//! Declarative element selectors.
//!
//! Selector vocabulary lives in data tables ([`crate::vocab`]) rather than in
//! detector logic. Each [`Selector`] renders to CSS for `querySelectorAll` and
//! can also be evaluated directly against any [`PageView`], so headless pages
//! and the browser agree on what matches. Attribute comparisons are ASCII
//! case-insensitive (the CSS `i` flag).

use crate::page::PageView;

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Elements with this tag name.
    Tag(&'static str),
    /// Elements carrying this class token.
    Class(&'static str),
    /// Attribute value contains `needle`.
    AttrContains { tag: Option<&'static str>, attr: &'static str, needle: &'static str },
    /// Attribute value equals `value`.
    AttrEquals { tag: Option<&'static str>, attr: &'static str, value: &'static str },
    /// Both selectors match the same element. The second must not carry a tag.
    Both(&'static Selector, &'static Selector),
    /// Any of the listed selectors matches (a CSS selector list).
    Any(&'static [Selector]),
}

impl Selector {
    /// CSS text for `querySelectorAll`.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Tag(tag) => (*tag).to_owned(),
            Self::Class(class) => format!(".{class}"),
            Self::AttrContains { tag, attr, needle } => {
                format!("{}[{attr}*=\"{needle}\" i]", tag.unwrap_or_default())
            }
            Self::AttrEquals { tag, attr, value } => format!("{}[{attr}=\"{value}\" i]", tag.unwrap_or_default()),
            Self::Both(first, second) => format!("{}{}", first.to_css(), second.to_css()),
            Self::Any(list) => list.iter().map(Selector::to_css).collect::<Vec<_>>().join(", "),
        }
    }

    /// Whether `element` on `page` matches.
    pub fn matches<P: PageView + ?Sized>(&self, page: &P, element: &P::Element) -> bool {
        match self {
            Self::Tag(tag) => page.tag_name(element).eq_ignore_ascii_case(tag),
            Self::Class(class) => page.class_list(element).iter().any(|c| c == class),
            Self::AttrContains { tag, attr, needle } => {
                tag_matches(page, element, *tag)
                    && page
                        .attribute(element, attr)
                        .is_some_and(|value| value.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
            }
            Self::AttrEquals { tag, attr, value } => {
                tag_matches(page, element, *tag)
                    && page
                        .attribute(element, attr)
                        .is_some_and(|actual| actual.eq_ignore_ascii_case(value))
            }
            Self::Both(first, second) => first.matches(page, element) && second.matches(page, element),
            Self::Any(list) => list.iter().any(|selector| selector.matches(page, element)),
        }
    }
}

fn tag_matches<P: PageView + ?Sized>(page: &P, element: &P::Element, tag: Option<&str>) -> bool {
    tag.is_none_or(|tag| page.tag_name(element).eq_ignore_ascii_case(tag))
}
