//! Rendering resolved values to text

use std::collections::HashMap;
use std::fmt::Display;

use crate::host::{Collider, Host, Value, Vector2};

use super::helpers::{HelperContext, HelperTable};

/// Numeric output options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatOptions {
    /// Decimal places for floating point output
    pub decimals: usize,
    /// When false, floats are printed at full precision
    pub round_values: bool,
    /// Simulation frames per second, for unit conversions
    pub frame_rate: f32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 2,
            round_values: true,
            frame_rate: 60.0,
        }
    }
}

/// Upper bound on decimal places; the formatter rejects precisions past `u16::MAX`
pub const MAX_DECIMALS: usize = 32;

/// Fixed-precision text for a float, or its shortest form when not rounding.
///
/// `decimals` is clamped to [`MAX_DECIMALS`].
pub fn format_float<T: Display>(value: T, options: &FormatOptions) -> String {
    if options.round_values {
        format!("{:.*}", options.decimals.min(MAX_DECIMALS), value)
    } else {
        value.to_string()
    }
}

pub fn format_vector<T: Display>(x: T, y: T, options: &FormatOptions) -> String {
    format!(
        "({}, {})",
        format_float(x, options),
        format_float(y, options)
    )
}

/// Formats values by runtime kind, after an optional helper transform
pub struct ValueFormatter<'a> {
    host: &'a dyn Host,
    helpers: &'a HelperTable,
    options: FormatOptions,
}

impl<'a> ValueFormatter<'a> {
    pub fn new(host: &'a dyn Host, helpers: &'a HelperTable, options: FormatOptions) -> Self {
        Self {
            host,
            helpers,
            options,
        }
    }

    /// Format `value`, trying `helper` first when it names a known transform.
    ///
    /// A known helper that rejects the value falls back to default formatting
    /// with a note naming the helper.
    pub fn format(&self, value: &Value, helper: Option<&str>) -> String {
        if value.is_null() {
            return String::new();
        }

        let mut rejected_by = None;
        if let Some((name, transform)) = helper.and_then(|h| self.helpers.get(h).map(|f| (h, f))) {
            let ctx = HelperContext {
                options: self.options,
                host: self.host,
            };
            match transform(value, &ctx) {
                Some(text) => return text,
                None => rejected_by = Some(name),
            }
        }

        let text = self.auto_format(value);
        match rejected_by {
            Some(name) => format!("{},\n not a valid parameter of {}", text, name),
            None => text,
        }
    }

    /// Default formatting by value kind
    pub fn auto_format(&self, value: &Value) -> String {
        match value {
            Value::Vector2(v) => format_vector(v.x, v.y, &self.options),
            Value::Vector2Double(v) => format_vector(v.x, v.y, &self.options),
            Value::Float(f) => format_float(f, &self.options),
            Value::Double(d) => format_float(d, &self.options),
            Value::Object(obj) if obj.type_def().is_entity() => match obj.stable_id() {
                Some(id) => format!("{}[{}]", obj, id),
                None => obj.to_string(),
            },
            Value::List(items) => {
                if !items.is_empty() && items.iter().all(Value::is_scene_object) {
                    compressed_list(items, ",\n ")
                } else {
                    join_list(items, ", ")
                }
            }
            Value::Collider(collider) => collider_to_string(collider, 1),
            other => other.to_string(),
        }
    }
}

fn join_list(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Group equal element texts in first-seen order, `text * count` for repeats
fn compressed_list(items: &[Value], separator: &str) -> String {
    let mut groups: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for item in items {
        let text = item.to_string();
        match index.get(&text) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(text.clone(), groups.len());
                groups.push((text, 1));
            }
        }
    }

    groups
        .into_iter()
        .map(|(text, count)| {
            if count == 1 {
                text
            } else {
                format!("{} * {}", text, count)
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Render a collider; composite lists recurse at most `depth` levels
pub fn collider_to_string(collider: &Collider, depth: usize) -> String {
    match collider {
        Collider::Hitbox {
            left,
            right,
            top,
            bottom,
        } => format!("Hitbox=[{},{}]×[{},{}]", left, right, top, bottom),
        Collider::Circle { radius, offset } => {
            if *offset == Vector2::ZERO {
                format!("Circle=radius {}", radius)
            } else {
                format!("Circle=radius {}, offset {}", radius, offset)
            }
        }
        Collider::List(children) if depth > 0 => {
            let inner = children
                .iter()
                .map(|child| collider_to_string(child, depth - 1))
                .collect::<Vec<_>>()
                .join("; ");
            format!("ColliderList: {{{}}}", inner)
        }
        Collider::List(_) => collider.to_string(),
    }
}
