//! Accessible role and name resolution.
//!
//! Controls are located the way assistive technology sees them: by ARIA role
//! and accessible name. The same rules are implemented twice, once in Rust for
//! scripted pages and once as a JavaScript snippet evaluated inside Chromium,
//! so both drivers agree on what "the Waze button" means.

use serde::{Deserialize, Serialize};

/// ARIA roles the suite can locate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    /// `button`
    Button,
    /// `link`
    Link,
    /// `heading`
    Heading,
    /// `textbox`
    Textbox,
}

impl AriaRole {
    /// Every role the suite can locate, in token-list order
    pub const ALL: [Self; 4] = [Self::Button, Self::Link, Self::Heading, Self::Textbox];

    /// Role token as written in a `role` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Textbox => "textbox",
        }
    }

    /// Parse a role token
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "button" => Some(Self::Button),
            "link" => Some(Self::Link),
            "heading" => Some(Self::Heading),
            "textbox" => Some(Self::Textbox),
            _ => None,
        }
    }

    /// CSS selector for elements that carry this role implicitly
    #[must_use]
    pub const fn implicit_selector(self) -> &'static str {
        match self {
            Self::Button => {
                "button, input[type=button], input[type=submit], input[type=reset], input[type=image]"
            }
            Self::Link => "a[href], area[href]",
            Self::Heading => "h1, h2, h3, h4, h5, h6",
            Self::Textbox => "textarea, input:not([type]), input[type=text], input[type=email], input[type=search], input[type=tel], input[type=url]",
        }
    }
}

impl std::fmt::Display for AriaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse runs of whitespace and trim, as accessible name computation does
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What a driver reports for one element matching a role query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Computed accessible name
    pub name: String,
    /// Whether the element is rendered visibly
    pub visible: bool,
}

impl ElementState {
    /// Create a new element state
    #[must_use]
    pub fn new(name: impl Into<String>, visible: bool) -> Self {
        Self {
            name: name.into(),
            visible,
        }
    }
}

/// A DOM element description for scripted pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibleElement {
    /// Tag name, lowercase
    pub tag: String,
    /// `type` attribute for inputs
    pub input_type: Option<String>,
    /// Explicit `role` attribute
    pub role: Option<String>,
    /// `aria-label`
    pub aria_label: Option<String>,
    /// Text of the elements referenced by `aria-labelledby`
    pub labelled_by_text: Option<String>,
    /// `value` attribute (inputs)
    pub value: Option<String>,
    /// `alt` attribute (image inputs)
    pub alt: Option<String>,
    /// Name from content: descendant text and image `alt`, minus
    /// `aria-hidden` subtrees
    pub text: String,
    /// `title` attribute
    pub title: Option<String>,
    /// Rendered with a non-empty box and not `visibility: hidden`
    pub visible: bool,
}

impl AccessibleElement {
    /// Create an element with a tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            visible: true,
            ..Self::default()
        }
    }

    /// A visible `<button>` with text content
    #[must_use]
    pub fn button(text: impl Into<String>) -> Self {
        Self::new("button").with_text(text)
    }

    /// Set the input type
    #[must_use]
    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into().to_ascii_lowercase());
        self
    }

    /// Set the explicit role attribute
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set `aria-label`
    #[must_use]
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// Set the `aria-labelledby` resolved text
    #[must_use]
    pub fn with_labelled_by(mut self, text: impl Into<String>) -> Self {
        self.labelled_by_text = Some(text.into());
        self
    }

    /// Set the value attribute
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the alt attribute
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the title attribute
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Role the element exposes, explicit role first
    ///
    /// A blank `role` attribute is ignored. Otherwise the first token found
    /// in [`AriaRole::ALL`] wins, and a list with no known token exposes no
    /// locatable role.
    #[must_use]
    pub fn computed_role(&self) -> Option<AriaRole> {
        if let Some(explicit) = self.role.as_deref().filter(|r| !r.trim().is_empty()) {
            return explicit.split_whitespace().find_map(AriaRole::parse);
        }
        match (self.tag.as_str(), self.input_type.as_deref()) {
            ("button", _) => Some(AriaRole::Button),
            ("input", Some("button" | "submit" | "reset" | "image")) => Some(AriaRole::Button),
            ("input", None | Some("text" | "email" | "search" | "tel" | "url"))
            | ("textarea", _) => Some(AriaRole::Textbox),
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", _) => Some(AriaRole::Heading),
            // Scripted pages only model anchors that carry an href
            ("a" | "area", _) => Some(AriaRole::Link),
            _ => None,
        }
    }

    /// Accessible name, normalized
    #[must_use]
    pub fn accessible_name(&self) -> String {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(normalize_name)
                .filter(|name| !name.is_empty())
        };

        if let Some(name) = non_empty(&self.labelled_by_text) {
            return name;
        }
        if let Some(name) = non_empty(&self.aria_label) {
            return name;
        }
        if self.tag == "input" {
            let from_attr = match self.input_type.as_deref() {
                Some("image") => non_empty(&self.alt),
                Some("button" | "submit" | "reset") => non_empty(&self.value),
                _ => None,
            };
            if let Some(name) = from_attr {
                return name;
            }
        }
        let text = normalize_name(&self.text);
        if !text.is_empty() {
            return text;
        }
        non_empty(&self.title).unwrap_or_default()
    }

    /// Snapshot reported to the locator
    #[must_use]
    pub fn state(&self) -> ElementState {
        ElementState::new(self.accessible_name(), self.visible)
    }
}

/// JavaScript expression returning `[{name, visible}]` for every element with
/// `role` whose accessible name equals `name` exactly.
///
/// Mirrors [`AccessibleElement::computed_role`] and
/// [`AccessibleElement::accessible_name`].
#[must_use]
pub fn role_query_script(role: AriaRole, name: &str) -> String {
    let role_token = role.as_str();
    let implicit = role.implicit_selector();
    let known: Vec<&str> = AriaRole::ALL.iter().map(|r| r.as_str()).collect();
    format!(
        r#"(() => {{
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
  const known = {known:?};
  const textOf = (node) => {{
    if (node.nodeType === Node.TEXT_NODE) return node.textContent;
    if (node.nodeType !== Node.ELEMENT_NODE) return '';
    if (node.getAttribute('aria-hidden') === 'true') return '';
    if (['SCRIPT', 'STYLE'].includes(node.tagName)) return '';
    if (node.tagName === 'IMG') return ' ' + (node.getAttribute('alt') || '') + ' ';
    return Array.from(node.childNodes).map(textOf).join('');
  }};
  const nameOf = (el) => {{
    const ids = el.getAttribute('aria-labelledby');
    if (ids) {{
      const text = norm(ids.split(/\s+/).map((id) => {{
        const ref = document.getElementById(id);
        return ref ? textOf(ref) : '';
      }}).join(' '));
      if (text) return text;
    }}
    const label = norm(el.getAttribute('aria-label'));
    if (label) return label;
    if (el.tagName === 'INPUT') {{
      const type = (el.getAttribute('type') || '').toLowerCase();
      if (type === 'image' && norm(el.getAttribute('alt'))) return norm(el.getAttribute('alt'));
      if (['button', 'submit', 'reset'].includes(type) && norm(el.value)) return norm(el.value);
    }}
    const text = norm(Array.from(el.childNodes).map(textOf).join(''));
    if (text) return text;
    return norm(el.getAttribute('title'));
  }};
  const isVisible = (el) => {{
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden';
  }};
  const roleOf = (el) => {{
    const explicit = el.getAttribute('role');
    if (explicit && explicit.trim()) {{
      return explicit.toLowerCase().trim().split(/\s+/).find((t) => known.includes(t)) || null;
    }}
    return el.matches({implicit:?}) ? {role_token:?} : null;
  }};
  const candidates = Array.from(document.querySelectorAll('[role], ' + {implicit:?}));
  return candidates
    .filter((el) => roleOf(el) === {role_token:?})
    .map((el) => ({{ name: nameOf(el), visible: isVisible(el) }}))
    .filter((el) => el.name === {name:?});
}})()"#
    )
}
