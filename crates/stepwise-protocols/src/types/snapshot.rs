//! Point-in-time inventory of the interactive elements on a page.

use serde::{Deserialize, Serialize};

/// Bounding box for an element, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One interactive element as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    /// Position in document order.
    pub index: usize,
    /// Lowercase tag name.
    pub tag: String,
    /// Visible text (or value for buttons rendered from inputs).
    #[serde(default)]
    pub text: String,
    /// The `aria-label` attribute, exactly as present on the element.
    #[serde(default)]
    pub aria_label: Option<String>,
    /// Text of an associated `<label>` element. Usable for matching, but no
    /// attribute carries it.
    #[serde(default)]
    pub label: Option<String>,
    /// The `alt` attribute of an image. Images report it as their text too.
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub input_type: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

impl ElementInfo {
    pub fn new(index: usize, tag: impl Into<String>) -> Self {
        Self {
            index,
            tag: tag.into().to_ascii_lowercase(),
            visible: true,
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Explicit ARIA role, or the implicit role of the tag.
    pub fn effective_role(&self) -> Option<String> {
        if let Some(role) = non_empty(&self.role) {
            return Some(role.to_ascii_lowercase());
        }
        let implicit = match self.tag.as_str() {
            "a" => "link",
            "button" => "button",
            "select" => "combobox",
            "textarea" => "textbox",
            "img" => "img",
            "input" => match self.input_type.as_deref().unwrap_or("text") {
                "submit" | "button" | "reset" | "image" => "button",
                "checkbox" => "checkbox",
                "radio" => "radio",
                _ => "textbox",
            },
            _ => return None,
        };
        Some(implicit.to_string())
    }

    pub fn aria_label(&self) -> Option<&str> {
        non_empty(&self.aria_label)
    }

    /// Attribute label first, then the associated `<label>` text.
    pub fn accessible_label(&self) -> Option<&str> {
        self.aria_label().or_else(|| non_empty(&self.label))
    }

    pub fn alt(&self) -> Option<&str> {
        non_empty(&self.alt)
    }

    pub fn placeholder(&self) -> Option<&str> {
        non_empty(&self.placeholder)
    }

    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn input_type(&self) -> Option<&str> {
        non_empty(&self.input_type)
    }

    /// First class name, if any.
    pub fn first_class(&self) -> Option<&str> {
        self.class.as_deref()?.split_whitespace().next()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Inventory of interactive elements, captured fresh for every resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub elements: Vec<ElementInfo>,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: ElementInfo) -> Self {
        self.elements.push(element);
        self
    }
}
