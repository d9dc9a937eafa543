//! Helper transforms applied to a resolved value before default formatting
//!
//! A helper is named by the last member of an expression, e.g.
//! `{Player.dashCooldownTimer.toFrame()}`. It returns `None` when the value
//! is not something it can transform.

use std::collections::BTreeMap;
use std::fmt;

use crate::host::{Host, Value};

use super::format::{format_vector, FormatOptions};

pub const TO_FRAME: &str = "toFrame()";
pub const TO_PIXEL_PER_FRAME: &str = "toPixelPerFrame()";
pub const GET_ASSEMBLY: &str = "GetAssembly()";

/// What a helper can see besides the value itself
pub struct HelperContext<'a> {
    pub options: FormatOptions,
    pub host: &'a dyn Host,
}

pub type HelperFn = fn(&Value, &HelperContext<'_>) -> Option<String>;

/// Table of helper transforms by name
#[derive(Clone)]
pub struct HelperTable {
    helpers: BTreeMap<String, HelperFn>,
}

impl Default for HelperTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(TO_FRAME, to_frame);
        table.register(TO_PIXEL_PER_FRAME, to_pixel_per_frame);
        table.register(GET_ASSEMBLY, get_assembly);
        table
    }
}

impl HelperTable {
    /// Create a table with the built-in helpers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table without any helpers
    pub fn empty() -> Self {
        Self {
            helpers: BTreeMap::new(),
        }
    }

    /// Register a helper; the name includes the call parentheses
    pub fn register(&mut self, name: impl Into<String>, helper: HelperFn) {
        self.helpers.insert(name.into(), helper);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(|s| s.as_str())
    }
}

impl fmt::Debug for HelperTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.helpers.keys()).finish()
    }
}

/// Seconds to frames at the configured frame rate
fn to_frame(value: &Value, ctx: &HelperContext<'_>) -> Option<String> {
    match value {
        Value::Float(seconds) => {
            let frames = (*seconds as f64 * ctx.options.frame_rate as f64).round() as i64;
            Some(frames.to_string())
        }
        _ => None,
    }
}

/// Per-second speed to per-frame speed
fn to_pixel_per_frame(value: &Value, ctx: &HelperContext<'_>) -> Option<String> {
    let frame_rate = ctx.options.frame_rate;
    match value {
        Value::Float(speed) => Some((speed / frame_rate).to_string()),
        Value::Vector2(v) => Some(format_vector(v.x / frame_rate, v.y / frame_rate, &ctx.options)),
        _ => None,
    }
}

/// Module that declares the value's type, or the type itself for type values
fn get_assembly(value: &Value, ctx: &HelperContext<'_>) -> Option<String> {
    match value {
        Value::Type(ty) => Some(ty.module().to_string()),
        other => ctx.host.type_of(other).map(|ty| ty.module().to_string()),
    }
}
