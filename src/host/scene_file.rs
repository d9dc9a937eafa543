//! TOML scene description for populating a [`World`]
//!
//! ```toml
//! [[types]]
//! name = "Monocle.Entity"
//! module = "Celeste"
//! kind = "entity"
//! fields = ["Position"]
//!
//! [[types]]
//! name = "Celeste.Player"
//! module = "Celeste"
//! extends = "Monocle.Entity"
//! fields = ["Speed"]
//! statics = { MaxRun = 90.0 }
//!
//! [[objects]]
//! type = "Celeste.Player"
//! id = "1a:0"
//! values = { Position = [12.345, -6.7], Speed = [90.0, 0.0] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::object::Object;
use super::types::{TypeBuilder, TypeKind, TypeRef};
use super::value::{Collider, Value, Vector2};
use super::world::World;

/// Errors that can occur when loading a scene file
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown type '{name}'")]
    UnknownType { name: String },
    #[error("circular base type chain through '{name}'")]
    CircularBase { name: String },
    #[error("unsupported value for '{key}'")]
    UnsupportedValue { key: String },
}

/// Parsed scene file
#[derive(Debug, Default, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub types: Vec<TypeSpec>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    pub scene: Option<ObjectSpec>,
    pub session: Option<ObjectSpec>,
    /// Types indexed for fast lookup
    #[serde(default)]
    pub track: Vec<String>,
    #[serde(default)]
    pub methods_disabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    pub module: String,
    pub extends: Option<String>,
    pub kind: Option<KindSpec>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub statics: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    Plain,
    Entity,
    Component,
}

impl From<KindSpec> for TypeKind {
    fn from(kind: KindSpec) -> Self {
        match kind {
            KindSpec::Plain => TypeKind::Plain,
            KindSpec::Entity => TypeKind::Entity,
            KindSpec::Component => TypeKind::Component,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ObjectSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, toml::Value>,
}

impl SceneFile {
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(content.as_str())
    }

    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Build a world from this description
    pub fn into_world(self) -> Result<World, SceneError> {
        let mut world = World::new();

        let specs: HashMap<&str, &TypeSpec> =
            self.types.iter().map(|t| (t.name.as_str(), t)).collect();
        let mut built: HashMap<String, TypeRef> = HashMap::new();
        for spec in &self.types {
            let mut visiting = Vec::new();
            build_type(spec, &specs, &mut built, &mut visiting, &mut world)?;
        }

        for name in &self.track {
            let ty = lookup_type(&world, name)?;
            world.track(&ty);
        }

        for spec in &self.objects {
            let object = build_object(&world, spec)?;
            world.spawn(object);
        }

        if let Some(spec) = &self.scene {
            let scene = build_object(&world, spec)?.into_ref();
            world.set_scene(Some(scene));
        }
        if let Some(spec) = &self.session {
            let session = build_object(&world, spec)?.into_ref();
            world.set_session(Some(session));
        }

        world.set_methods_disabled(self.methods_disabled);
        log::debug!(
            "loaded scene: {} types, {} objects",
            self.types.len(),
            self.objects.len()
        );
        Ok(world)
    }
}

fn build_type(
    spec: &TypeSpec,
    specs: &HashMap<&str, &TypeSpec>,
    built: &mut HashMap<String, TypeRef>,
    visiting: &mut Vec<String>,
    world: &mut World,
) -> Result<TypeRef, SceneError> {
    if let Some(ty) = built.get(&spec.name) {
        return Ok(ty.clone());
    }
    if visiting.contains(&spec.name) {
        return Err(SceneError::CircularBase {
            name: spec.name.clone(),
        });
    }
    visiting.push(spec.name.clone());

    let mut builder = TypeBuilder::new(&spec.name, &spec.module);
    if let Some(base_name) = &spec.extends {
        let base = match specs.get(base_name.as_str()) {
            Some(base_spec) => build_type(base_spec, specs, built, visiting, world)?,
            None => lookup_type(world, base_name)?,
        };
        builder = builder.extends(&base);
    }
    if let Some(kind) = spec.kind {
        builder = builder.kind(kind.into());
    }
    for field in &spec.fields {
        builder = builder.field(field);
    }
    for (name, raw) in &spec.statics {
        builder = builder.static_field(name, convert_value(name, raw)?);
    }

    let ty = builder.build();
    world.register_type(&ty);
    built.insert(spec.name.clone(), ty.clone());
    visiting.pop();
    Ok(ty)
}

fn lookup_type(world: &World, name: &str) -> Result<TypeRef, SceneError> {
    world
        .find_type(name)
        .cloned()
        .ok_or_else(|| SceneError::UnknownType {
            name: name.to_string(),
        })
}

fn build_object(world: &World, spec: &ObjectSpec) -> Result<Object, SceneError> {
    let ty = lookup_type(world, &spec.type_name)?;
    let mut object = Object::new(&ty);
    if let Some(id) = &spec.id {
        object = object.with_stable_id(id);
    }
    for (key, raw) in &spec.values {
        object = object.with(key, convert_value(key, raw)?);
    }
    Ok(object)
}

/// Convert a TOML value into a host value.
///
/// Two-number arrays become vectors; tables describe colliders.
fn convert_value(key: &str, raw: &toml::Value) -> Result<Value, SceneError> {
    let unsupported = || SceneError::UnsupportedValue {
        key: key.to_string(),
    };
    match raw {
        toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        toml::Value::Integer(i) => Ok(Value::Int(*i)),
        toml::Value::Float(f) => Ok(Value::Float(*f as f32)),
        toml::Value::String(s) => Ok(Value::Str(s.clone())),
        toml::Value::Array(items) => {
            if let Some(v) = as_vector(items) {
                return Ok(Value::Vector2(v));
            }
            items
                .iter()
                .map(|item| convert_value(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
        toml::Value::Table(table) => convert_collider(table)
            .map(Value::Collider)
            .ok_or_else(unsupported),
        toml::Value::Datetime(_) => Err(unsupported()),
    }
}

fn convert_collider(table: &toml::Table) -> Option<Collider> {
    if let Some(toml::Value::Array(edges)) = table.get("hitbox") {
        let edges: Vec<f32> = edges.iter().filter_map(as_number).collect();
        if let [left, right, top, bottom] = edges.as_slice() {
            return Some(Collider::Hitbox {
                left: *left,
                right: *right,
                top: *top,
                bottom: *bottom,
            });
        }
        return None;
    }
    if let Some(radius) = table.get("circle").and_then(as_number) {
        let offset = match table.get("offset") {
            Some(toml::Value::Array(items)) => as_vector(items)?,
            Some(_) => return None,
            None => Vector2::ZERO,
        };
        return Some(Collider::Circle { radius, offset });
    }
    if let Some(toml::Value::Array(children)) = table.get("colliders") {
        let children = children
            .iter()
            .map(|child| match child {
                toml::Value::Table(t) => convert_collider(t),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        return Some(Collider::List(children));
    }
    None
}

fn as_number(value: &toml::Value) -> Option<f32> {
    match value {
        toml::Value::Float(f) => Some(*f as f32),
        toml::Value::Integer(i) => Some(*i as f32),
        _ => None,
    }
}

fn as_vector(items: &[toml::Value]) -> Option<Vector2> {
    match items {
        [x, y] => Some(Vector2::new(as_number(x)?, as_number(y)?)),
        _ => None,
    }
}
