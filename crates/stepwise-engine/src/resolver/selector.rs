//! Locator generation for a matched element.

use stepwise_protocols::ElementInfo;

use super::text::collapse;

/// Build the most stable locator the element's attributes allow.
///
/// Priority: id, accessible label, name, image alt, short exact text,
/// placeholder, explicit role, input type, first class, bare tag.
pub fn generate_selector(element: &ElementInfo, short_text_limit: usize) -> String {
    let tag = if element.tag.is_empty() {
        "*"
    } else {
        element.tag.as_str()
    };

    if let Some(id) = element.id() {
        return if is_css_ident(id) {
            format!("#{}", id)
        } else {
            format!("[id={}]", quote(id))
        };
    }
    if let Some(label) = element.aria_label() {
        return format!("{}[aria-label={}]", tag, quote(label));
    }
    if let Some(name) = element.name() {
        return format!("{}[name={}]", tag, quote(name));
    }
    if let Some(alt) = element.alt() {
        return format!("{}[alt={}]", tag, quote(alt));
    }

    let text = collapse(&element.text);
    if !text.is_empty() && text.chars().count() < short_text_limit {
        return format!("text={}", quote(&text));
    }

    if let Some(placeholder) = element.placeholder() {
        return format!("{}[placeholder={}]", tag, quote(placeholder));
    }
    if let Some(role) = element.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        return format!("{}[role={}]", tag, quote(role));
    }
    if let Some(input_type) = element.input_type() {
        return format!("{}[type={}]", tag, quote(input_type));
    }
    if let Some(class) = element.first_class() {
        return if is_css_ident(class) {
            format!("{}.{}", tag, class)
        } else {
            format!("{}[class~={}]", tag, quote(class))
        };
    }

    tag.to_string()
}

/// Double-quoted string with backslashes and quotes escaped.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn is_css_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => true,
        Some('-') => matches!(chars.clone().next(), Some(c) if !c.is_ascii_digit()),
        _ => false,
    };
    first_ok && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
