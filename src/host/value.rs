//! Runtime values produced by member access on the host

use std::fmt;

use super::object::ObjectRef;
use super::types::{TypeKind, TypeRef};

/// Single-precision 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X:{} Y:{}}}", self.x, self.y)
    }
}

/// Double-precision 2D vector, used for sub-pixel positions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2Double {
    pub x: f64,
    pub y: f64,
}

impl Vector2Double {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vector2> for Vector2Double {
    fn from(v: Vector2) -> Self {
        Self {
            x: v.x as f64,
            y: v.y as f64,
        }
    }
}

impl fmt::Display for Vector2Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X:{} Y:{}}}", self.x, self.y)
    }
}

/// Collision shape attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    /// Axis-aligned box given by its edges
    Hitbox {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    },
    /// Circle with an offset from the owning entity
    Circle { radius: f32, offset: Vector2 },
    /// Composite of other colliders
    List(Vec<Collider>),
}

impl Collider {
    /// Build a hitbox from size and offset, the way hosts usually store it
    pub fn hitbox(width: f32, height: f32, x: f32, y: f32) -> Self {
        Collider::Hitbox {
            left: x,
            right: x + width,
            top: y,
            bottom: y + height,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Collider::Circle {
            radius,
            offset: Vector2::ZERO,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Collider::Hitbox { .. } => "Monocle.Hitbox",
            Collider::Circle { .. } => "Monocle.Circle",
            Collider::List(_) => "Monocle.ColliderList",
        }
    }
}

impl fmt::Display for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A value flowing through a member chain
///
/// `Null` stands for "the referenced thing does not currently exist" and is
/// never treated as an error.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Vector2(Vector2),
    Vector2Double(Vector2Double),
    /// Live object owned by the host
    Object(ObjectRef),
    /// A type handle, e.g. returned by a `GetType()` style method
    Type(TypeRef),
    List(Vec<Value>),
    Collider(Collider),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_vector2(&self) -> Option<Vector2> {
        match self {
            Value::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this value is a live object of entity or component kind
    pub fn is_scene_object(&self) -> bool {
        self.as_object().is_some_and(|obj| {
            matches!(
                obj.type_def().kind(),
                TypeKind::Entity | TypeKind::Component
            )
        })
    }

    /// Full name of the runtime type, used to look the type up on the host
    pub fn type_name(&self) -> String {
        let name = match self {
            Value::Null => "null",
            Value::Bool(_) => "System.Boolean",
            Value::Int(_) => "System.Int64",
            Value::Float(_) => "System.Single",
            Value::Double(_) => "System.Double",
            Value::Str(_) => "System.String",
            Value::Vector2(_) => "Microsoft.Xna.Framework.Vector2",
            Value::Vector2Double(_) => "TAS.Utils.Vector2Double",
            Value::Object(obj) => return obj.type_def().full_name().to_string(),
            Value::Type(_) => "System.Type",
            Value::List(_) => "System.Collections.Generic.List",
            Value::Collider(c) => c.type_name(),
        };
        name.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Vector2(v) => write!(f, "{}", v),
            Value::Vector2Double(v) => write!(f, "{}", v),
            Value::Object(obj) => write!(f, "{}", obj),
            Value::Type(ty) => f.write_str(ty.full_name()),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Collider(c) => write!(f, "{}", c),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vector2(v)
    }
}

impl From<Vector2Double> for Value {
    fn from(v: Vector2Double) -> Self {
        Value::Vector2Double(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Collider> for Value {
    fn from(c: Collider) -> Self {
        Value::Collider(c)
    }
}
