//! In-memory host
//!
//! `World` keeps a type universe, a flat list of live objects and an optional
//! scene/session pair. It backs the command line tool and the tests, and
//! doubles as a reference for embedding the engine into a real simulation.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::object::{Object, ObjectRef};
use super::types::{TypeBuilder, TypeDef, TypeRef};
use super::value::{Collider, Value, Vector2, Vector2Double};
use super::Host;

/// Slot holding the sub-pixel remainder added to `Position` for exact positions
pub const MOVEMENT_COUNTER_SLOT: &str = "MovementCounter";

const CORE_MODULE: &str = "System.Private.CoreLib";
const GAME_MODULE: &str = "Celeste";

#[derive(Debug, Default)]
pub struct World {
    types: Vec<TypeRef>,
    by_name: HashMap<String, TypeRef>,
    objects: Vec<ObjectRef>,
    tracked: HashSet<String>,
    scene: Option<ObjectRef>,
    session: Option<ObjectRef>,
    methods_disabled: bool,
}

impl World {
    /// Create a world containing only the built-in value types
    pub fn new() -> Self {
        let mut world = Self::default();
        for ty in builtin_types() {
            world.register_type(&ty);
        }
        world
    }

    /// Add a type to the universe; a later type with the same full name shadows the earlier one
    pub fn register_type(&mut self, ty: &TypeRef) {
        self.types.push(Rc::clone(ty));
        self.by_name.insert(ty.full_name().to_string(), Rc::clone(ty));
    }

    /// Find a registered type by its full name
    pub fn find_type(&self, full_name: &str) -> Option<&TypeRef> {
        self.by_name.get(full_name)
    }

    /// Index objects of `ty` (and its subtypes) for [`Host::tracked`] lookups
    pub fn track(&mut self, ty: &TypeRef) {
        self.tracked.insert(ty.key());
    }

    pub fn spawn(&mut self, object: Object) -> ObjectRef {
        let object = object.into_ref();
        self.objects.push(Rc::clone(&object));
        object
    }

    pub fn despawn(&mut self, object: &ObjectRef) {
        self.objects.retain(|o| !Rc::ptr_eq(o, object));
    }

    /// Enter a scene; `None` leaves it (and drops the session)
    pub fn set_scene(&mut self, scene: Option<ObjectRef>) {
        if scene.is_none() {
            self.session = None;
        }
        self.scene = scene;
    }

    pub fn set_session(&mut self, session: Option<ObjectRef>) {
        self.session = session;
    }

    pub fn set_methods_disabled(&mut self, disabled: bool) {
        self.methods_disabled = disabled;
    }
}

impl Host for World {
    fn types(&self) -> Vec<TypeRef> {
        self.types.clone()
    }

    fn type_of(&self, value: &Value) -> Option<TypeRef> {
        match value {
            Value::Null => None,
            Value::Object(obj) => Some(Rc::clone(obj.type_def())),
            other => self.by_name.get(&other.type_name()).cloned(),
        }
    }

    fn tracked(&self, ty: &TypeDef) -> Option<Vec<ObjectRef>> {
        if !self.tracked.contains(&ty.key()) {
            return None;
        }
        Some(
            self.objects
                .iter()
                .filter(|o| o.type_def().is_same_or_subtype_of(ty))
                .cloned()
                .collect(),
        )
    }

    fn objects(&self) -> Vec<ObjectRef> {
        self.objects.clone()
    }

    fn scene(&self) -> Option<Value> {
        self.scene.clone().map(Value::Object)
    }

    fn session(&self) -> Option<Value> {
        self.session.clone().map(Value::Object)
    }

    fn scene_type(&self) -> Option<TypeRef> {
        self.scene.as_ref().map(|s| Rc::clone(s.type_def()))
    }

    fn session_type(&self) -> Option<TypeRef> {
        self.session.as_ref().map(|s| Rc::clone(s.type_def()))
    }

    fn methods_disabled(&self) -> bool {
        self.methods_disabled
    }

    fn exact_position(&self, object: &ObjectRef) -> Option<Vector2Double> {
        let position = Vector2Double::from(object.get("Position").as_vector2()?);
        let remainder = Vector2Double::from(
            object
                .get(MOVEMENT_COUNTER_SLOT)
                .as_vector2()
                .unwrap_or(Vector2::ZERO),
        );
        Some(Vector2Double::new(
            position.x + remainder.x,
            position.y + remainder.y,
        ))
    }
}

fn hitbox_edge(value: &Value, edge: impl Fn(f32, f32, f32, f32) -> f32) -> Value {
    match value {
        Value::Collider(Collider::Hitbox {
            left,
            right,
            top,
            bottom,
        }) => Value::Float(edge(*left, *right, *top, *bottom)),
        _ => Value::Null,
    }
}

fn builtin_types() -> Vec<TypeRef> {
    let vector2 = TypeBuilder::new("Microsoft.Xna.Framework.Vector2", "FNA")
        .field_fn("X", |v| match v {
            Value::Vector2(v) => Value::Float(v.x),
            _ => Value::Null,
        })
        .field_fn("Y", |v| match v {
            Value::Vector2(v) => Value::Float(v.y),
            _ => Value::Null,
        })
        .static_field("Zero", Value::Vector2(Vector2::ZERO))
        .static_field("One", Value::Vector2(Vector2::ONE))
        .method("Length", 0, |v| match v {
            Value::Vector2(v) => Value::Float(v.length()),
            _ => Value::Null,
        })
        .build();

    let vector2_double = TypeBuilder::new("TAS.Utils.Vector2Double", "CelesteTAS")
        .field_fn("X", |v| match v {
            Value::Vector2Double(v) => Value::Double(v.x),
            _ => Value::Null,
        })
        .field_fn("Y", |v| match v {
            Value::Vector2Double(v) => Value::Double(v.y),
            _ => Value::Null,
        })
        .build();

    let string = TypeBuilder::new("System.String", CORE_MODULE)
        .getter("Length", |v| match v {
            Value::Str(s) => Value::Int(s.chars().count() as i64),
            _ => Value::Null,
        })
        .build();

    let list = TypeBuilder::new("System.Collections.Generic.List", CORE_MODULE)
        .getter("Count", |v| match v {
            Value::List(items) => Value::Int(items.len() as i64),
            _ => Value::Null,
        })
        .build();

    let hitbox = TypeBuilder::new("Monocle.Hitbox", GAME_MODULE)
        .getter("Left", |v| hitbox_edge(v, |l, _, _, _| l))
        .getter("Right", |v| hitbox_edge(v, |_, r, _, _| r))
        .getter("Top", |v| hitbox_edge(v, |_, _, t, _| t))
        .getter("Bottom", |v| hitbox_edge(v, |_, _, _, b| b))
        .getter("Width", |v| hitbox_edge(v, |l, r, _, _| r - l))
        .getter("Height", |v| hitbox_edge(v, |_, _, t, b| b - t))
        .build();

    let circle = TypeBuilder::new("Monocle.Circle", GAME_MODULE)
        .field_fn("Radius", |v| match v {
            Value::Collider(Collider::Circle { radius, .. }) => Value::Float(*radius),
            _ => Value::Null,
        })
        .getter("Position", |v| match v {
            Value::Collider(Collider::Circle { offset, .. }) => Value::Vector2(*offset),
            _ => Value::Null,
        })
        .build();

    let collider_list = TypeBuilder::new("Monocle.ColliderList", GAME_MODULE)
        .field_fn("colliders", |v| match v {
            Value::Collider(Collider::List(children)) => {
                Value::List(children.iter().cloned().map(Value::Collider).collect())
            }
            _ => Value::Null,
        })
        .build();

    vec![
        vector2,
        vector2_double,
        string,
        list,
        hitbox,
        circle,
        collider_list,
        TypeBuilder::new("System.Boolean", CORE_MODULE).build(),
        TypeBuilder::new("System.Int64", CORE_MODULE).build(),
        TypeBuilder::new("System.Single", CORE_MODULE).build(),
        TypeBuilder::new("System.Double", CORE_MODULE).build(),
        TypeBuilder::new("System.Type", CORE_MODULE).build(),
    ]
}
