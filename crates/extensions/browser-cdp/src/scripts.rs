//! JavaScript evaluated inside the page.
//!
//! Every operation is a self-contained expression: a shared locator prelude
//! followed by an operation body, with arguments embedded as JSON literals.
//! Results come back by value and are decoded into the small structs below.

use serde::Deserialize;
use serde_json::Value;

/// Locator engine shared by all element operations.
///
/// Supports plain CSS, `css=`, `id=`, `xpath=`, bare XPath (`//`, `(//`) and
/// `text="..."` which matches elements whose whitespace-collapsed text equals
/// the literal, keeping only the innermost matches. Images compare their `alt`.
const LOCATOR_PRELUDE: &str = r#"
const __norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
const __visible = (el) => {
  if (!el || !el.isConnected) return false;
  const style = window.getComputedStyle(el);
  if (style.visibility === 'hidden' || style.display === 'none' || Number(style.opacity) === 0) return false;
  const rect = el.getBoundingClientRect();
  return rect.width > 0 && rect.height > 0;
};
const __find = (locator) => {
  const raw = locator.trim();
  if (raw.startsWith('xpath=') || raw.startsWith('//') || raw.startsWith('(//')) {
    const expr = raw.startsWith('xpath=') ? raw.slice(6) : raw;
    const snap = document.evaluate(expr, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    const out = [];
    for (let i = 0; i < snap.snapshotLength; i++) {
      const node = snap.snapshotItem(i);
      if (node && node.nodeType === 1) out.push(node);
    }
    return out;
  }
  if (raw.startsWith('text=')) {
    let wanted = raw.slice(5);
    const quoted = /^"((?:[^"\\]|\\.)*)"$/s.exec(wanted);
    wanted = __norm(quoted ? quoted[1].replace(/\\(.)/g, '$1') : wanted);
    const textOf = (el) => {
      if (el instanceof HTMLImageElement) return el.alt;
      if (el instanceof HTMLInputElement) return el.type === 'image' ? el.alt : el.value;
      return el.innerText ?? el.textContent;
    };
    const hits = Array.from(document.querySelectorAll('body *')).filter((el) => __norm(textOf(el)) === wanted);
    return hits.filter((el) => !hits.some((other) => other !== el && el.contains(other)));
  }
  if (raw.startsWith('id=')) {
    const el = document.getElementById(raw.slice(3));
    return el ? [el] : [];
  }
  const css = raw.startsWith('css=') ? raw.slice(4) : raw;
  return Array.from(document.querySelectorAll(css));
};
const __first = (locator) => {
  const all = __find(locator);
  return all.find(__visible) || all[0] || null;
};
"#;

/// Collects the interactive-element inventory for the resolver.
const INVENTORY_BODY: &str = r#"
const selector = 'button, a, input, textarea, select, img, [role], [aria-label], [contenteditable="true"]';
const seen = new Set();
const elements = [];
for (const el of document.querySelectorAll(selector)) {
  if (seen.has(el)) continue;
  seen.add(el);
  if (el instanceof HTMLInputElement && el.type === 'hidden') continue;
  const tag = el.tagName.toLowerCase();
  const attr = (name) => { const v = el.getAttribute(name); return v === null || v === '' ? null : v; };
  let text = __norm(el.innerText ?? el.textContent);
  if (!text && el instanceof HTMLInputElement && ['submit', 'button', 'reset'].includes(el.type)) text = __norm(el.value);
  const alt = tag === 'img' || (el instanceof HTMLInputElement && el.type === 'image') ? attr('alt') : null;
  if (!text && alt) text = __norm(alt);
  const label = el.labels && el.labels.length ? __norm(el.labels[0].innerText) || null : null;
  const rect = el.getBoundingClientRect();
  elements.push({
    index: elements.length,
    tag,
    text: text.slice(0, 200),
    ariaLabel: attr('aria-label'),
    label,
    alt,
    placeholder: attr('placeholder'),
    role: attr('role'),
    id: attr('id'),
    name: attr('name'),
    type: attr('type'),
    class: attr('class'),
    visible: __visible(el),
    bounds: { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
  });
}
return { url: window.location.href, title: document.title, elements };
"#;

/// Scrolls the best match into view and reports its state.
const PROBE_BODY: &str = r#"
const all = __find(locator);
const el = all.find(__visible) || all[0] || null;
if (!el) return { count: 0, visible: false, enabled: false, x: 0, y: 0 };
const visible = __visible(el);
if (visible) el.scrollIntoView({ block: 'center', inline: 'center' });
const rect = el.getBoundingClientRect();
return {
  count: all.length,
  visible,
  enabled: !el.disabled && el.getAttribute('aria-disabled') !== 'true',
  x: rect.x + rect.width / 2,
  y: rect.y + rect.height / 2,
};
"#;

/// Focuses the element and clears any existing value before typing.
const CLEAR_BODY: &str = r#"
const el = __first(locator);
if (!el) return false;
el.focus();
if (el instanceof HTMLInputElement || el instanceof HTMLTextAreaElement) {
  el.select();
  el.value = '';
  el.dispatchEvent(new Event('input', { bubbles: true }));
} else if (el.isContentEditable) {
  el.textContent = '';
}
return true;
"#;

/// Picks an option by value, falling back to its visible label.
const SELECT_BODY: &str = r#"
const el = __first(locator);
if (!el) return 'missing';
if (!(el instanceof HTMLSelectElement)) return 'not-select';
const options = Array.from(el.options);
const option = options.find((o) => o.value === value) || options.find((o) => __norm(o.text) === __norm(value));
if (!option) return 'no-option';
el.value = option.value;
el.dispatchEvent(new Event('input', { bubbles: true }));
el.dispatchEvent(new Event('change', { bubbles: true }));
return 'ok';
"#;

/// Text of the element, or of the whole page when no locator is given.
const TEXT_BODY: &str = r#"
if (locator === null) return document.body ? document.body.innerText : '';
const el = __first(locator);
if (!el) return null;
if (el instanceof HTMLInputElement || el instanceof HTMLTextAreaElement || el instanceof HTMLSelectElement) return el.value;
return el.innerText ?? el.textContent ?? '';
"#;

/// Decoded result of [`probe`]: match count plus the best match's state and center.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Probe {
    pub count: usize,
    pub visible: bool,
    pub enabled: bool,
    pub x: f64,
    pub y: f64,
}

impl Probe {
    pub fn attached(&self) -> bool {
        self.count > 0
    }

    /// Visible and enabled: safe to click or type into.
    pub fn actionable(&self) -> bool {
        self.attached() && self.visible && self.enabled
    }
}

/// Outcome of [`select_option`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectOutcome {
    Ok,
    Missing,
    NotSelect,
    NoOption,
}

fn literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Wrap an operation body in an IIFE with the locator prelude in scope.
fn wrap(params: &[(&str, String)], body: &str) -> String {
    let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();
    let values: Vec<&str> = params.iter().map(|(_, value)| value.as_str()).collect();
    format!(
        "(({}) => {{{}{}}})({})",
        names.join(", "),
        LOCATOR_PRELUDE,
        body,
        values.join(", ")
    )
}

pub fn inventory() -> String {
    wrap(&[], INVENTORY_BODY)
}

pub fn probe(locator: &str) -> String {
    wrap(&[("locator", literal(locator))], PROBE_BODY)
}

pub fn focus_and_clear(locator: &str) -> String {
    wrap(&[("locator", literal(locator))], CLEAR_BODY)
}

pub fn select_option(locator: &str, value: &str) -> String {
    wrap(
        &[("locator", literal(locator)), ("value", literal(value))],
        SELECT_BODY,
    )
}

pub fn text_of(locator: Option<&str>) -> String {
    wrap(&[("locator", literal(&locator))], TEXT_BODY)
}

/// Decode a by-value evaluation result into `T`.
pub fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
#[path = "scripts_tests.rs"]
mod tests;
