//! Element locators and handles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy + expression used to resolve UI elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "using", content = "value", rename_all = "snake_case")]
pub enum Locator {
    /// Accessibility id (content-desc on Android, accessibilityIdentifier on iOS)
    AccessibilityId(String),
    /// Resource id / DOM id
    Id(String),
    /// XPath expression
    XPath(String),
    /// CSS selector (web and webview contexts)
    Css(String),
    /// Widget class / tag name
    ClassName(String),
    /// Element name attribute
    Name(String),
    /// Anchor text (web and webview contexts)
    LinkText(String),
}

impl Locator {
    pub fn accessibility_id<S: Into<String>>(value: S) -> Self {
        Locator::AccessibilityId(value.into())
    }

    pub fn id<S: Into<String>>(value: S) -> Self {
        Locator::Id(value.into())
    }

    pub fn xpath<S: Into<String>>(value: S) -> Self {
        Locator::XPath(value.into())
    }

    pub fn css<S: Into<String>>(value: S) -> Self {
        Locator::Css(value.into())
    }

    pub fn class_name<S: Into<String>>(value: S) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn name<S: Into<String>>(value: S) -> Self {
        Locator::Name(value.into())
    }

    pub fn link_text<S: Into<String>>(value: S) -> Self {
        Locator::LinkText(value.into())
    }

    /// W3C / Appium strategy name
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::AccessibilityId(_) => "accessibility id",
            Locator::Id(_) => "id",
            Locator::XPath(_) => "xpath",
            Locator::Css(_) => "css selector",
            Locator::ClassName(_) => "class name",
            Locator::Name(_) => "name",
            Locator::LinkText(_) => "link text",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::AccessibilityId(v)
            | Locator::Id(v)
            | Locator::XPath(v)
            | Locator::Css(v)
            | Locator::ClassName(v)
            | Locator::Name(v)
            | Locator::LinkText(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Driver-issued reference to a resolved element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: String,
    locator: Option<Locator>,
}

impl ElementHandle {
    pub fn new<S: Into<String>>(id: S, locator: Option<Locator>) -> Self {
        Self {
            id: id.into(),
            locator,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Locator the element was resolved from, if known
    pub fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Some(locator) => write!(f, "[{}] {}", self.id, locator),
            None => write!(f, "[{}]", self.id),
        }
    }
}
