//! Type definitions and per-type member tables
//!
//! Hosts describe their type universe with [`TypeBuilder`]. Each member is a
//! name mapped to an accessor closure; instance accessors receive the current
//! value as receiver, static accessors receive `None`.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::value::Value;

/// Shared handle to a type definition
pub type TypeRef = Rc<TypeDef>;

/// Accessor closure backing a member
pub type Accessor = Rc<dyn Fn(Option<&Value>) -> Value>;

/// Broad category of a type, inherited by subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKind {
    #[default]
    Plain,
    /// Instances live in the scene graph
    Entity,
    /// Instances are attached to entities
    Component,
}

/// What kind of member an accessor implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Getter,
    Field,
    Method { parameters: usize, returns_void: bool },
}

/// A single member of a type
#[derive(Clone)]
pub struct Member {
    name: String,
    kind: MemberKind,
    is_static: bool,
    access: Accessor,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Invoke the accessor. Static members ignore `receiver`.
    pub fn invoke(&self, receiver: Option<&Value>) -> Value {
        if self.is_static {
            (self.access)(None)
        } else {
            (self.access)(receiver)
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// A host type: name, declaring module, base type and member tables
pub struct TypeDef {
    full_name: String,
    module: String,
    kind: TypeKind,
    base: Option<TypeRef>,
    getters: HashMap<String, Member>,
    fields: HashMap<String, Member>,
    methods: HashMap<String, Member>,
}

impl TypeDef {
    /// Fully qualified name, e.g. `Celeste.Player`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Short name after the last namespace or nesting separator
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit(['.', '+'])
            .next()
            .unwrap_or(&self.full_name)
    }

    /// Name of the declaring module (assembly)
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    /// Registry key: `full_name@module`
    pub fn key(&self) -> String {
        format!("{}@{}", self.full_name, self.module)
    }

    pub fn is_entity(&self) -> bool {
        self.kind == TypeKind::Entity
    }

    /// Identity comparison by full name and module
    pub fn is(&self, other: &TypeDef) -> bool {
        self.full_name == other.full_name && self.module == other.module
    }

    pub fn is_same_or_subtype_of(&self, other: &TypeDef) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.is(other) {
                return true;
            }
            current = ty.base.as_deref();
        }
        false
    }

    /// Same as [`is_same_or_subtype_of`](Self::is_same_or_subtype_of) but by full name
    pub fn derives_from(&self, full_name: &str) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.full_name == full_name {
                return true;
            }
            current = ty.base.as_deref();
        }
        false
    }

    /// Look up a property-style getter, including inherited ones
    pub fn getter(&self, name: &str) -> Option<&Member> {
        self.lookup(name, |ty| &ty.getters)
    }

    /// Look up a field, including inherited ones
    pub fn field(&self, name: &str) -> Option<&Member> {
        self.lookup(name, |ty| &ty.fields)
    }

    /// Look up a method by bare name (without parentheses), including inherited ones
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.lookup(name, |ty| &ty.methods)
    }

    fn lookup<'a>(
        &'a self,
        name: &str,
        table: impl Fn(&'a TypeDef) -> &'a HashMap<String, Member>,
    ) -> Option<&'a Member> {
        let mut current = Some(self);
        while let Some(ty) = current {
            if let Some(member) = table(ty).get(name) {
                return Some(member);
            }
            current = ty.base.as_deref();
        }
        None
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("full_name", &self.full_name)
            .field("module", &self.module)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Builder for [`TypeDef`]
///
/// # Example
///
/// ```rust
/// use custom_info::host::{TypeBuilder, TypeKind, Value};
///
/// let entity = TypeBuilder::new("Monocle.Entity", "Celeste")
///     .kind(TypeKind::Entity)
///     .field("Position")
///     .build();
/// let player = TypeBuilder::new("Celeste.Player", "Celeste")
///     .extends(&entity)
///     .field("Speed")
///     .static_field("MaxRun", Value::Float(90.0))
///     .build();
///
/// assert!(player.is_entity());
/// assert!(player.field("Position").is_some());
/// ```
pub struct TypeBuilder {
    def: TypeDef,
}

impl TypeBuilder {
    pub fn new(full_name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            def: TypeDef {
                full_name: full_name.into(),
                module: module.into(),
                kind: TypeKind::Plain,
                base: None,
                getters: HashMap::new(),
                fields: HashMap::new(),
                methods: HashMap::new(),
            },
        }
    }

    /// Derive from `base`, inheriting its members and kind
    pub fn extends(mut self, base: &TypeRef) -> Self {
        self.def.kind = base.kind;
        self.def.base = Some(Rc::clone(base));
        self
    }

    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.def.kind = kind;
        self
    }

    /// Instance field stored in the object's slot of the same name
    pub fn field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let slot = name.clone();
        self.field_fn(name, move |receiver| match receiver.as_object() {
            Some(obj) => obj.get(&slot),
            None => Value::Null,
        })
    }

    /// Instance field computed from the receiver
    pub fn field_fn(mut self, name: impl Into<String>, f: impl Fn(&Value) -> Value + 'static) -> Self {
        let accessor = instance_accessor(f);
        self.insert_field(name.into(), accessor, false);
        self
    }

    pub fn static_field(mut self, name: impl Into<String>, value: Value) -> Self {
        let accessor: Accessor = Rc::new(move |_| value.clone());
        self.insert_field(name.into(), accessor, true);
        self
    }

    /// Instance getter; also reachable as the zero-argument method `get_{name}`
    pub fn getter(mut self, name: impl Into<String>, f: impl Fn(&Value) -> Value + 'static) -> Self {
        let accessor = instance_accessor(f);
        self.insert_getter(name.into(), accessor, false);
        self
    }

    pub fn static_getter(mut self, name: impl Into<String>, f: impl Fn() -> Value + 'static) -> Self {
        let accessor: Accessor = Rc::new(move |_| f());
        self.insert_getter(name.into(), accessor, true);
        self
    }

    /// Instance method returning a value
    pub fn method(
        mut self,
        name: impl Into<String>,
        parameters: usize,
        f: impl Fn(&Value) -> Value + 'static,
    ) -> Self {
        let kind = MemberKind::Method {
            parameters,
            returns_void: false,
        };
        self.insert_method(name.into(), kind, instance_accessor(f), false);
        self
    }

    pub fn static_method(
        mut self,
        name: impl Into<String>,
        parameters: usize,
        f: impl Fn() -> Value + 'static,
    ) -> Self {
        let kind = MemberKind::Method {
            parameters,
            returns_void: false,
        };
        self.insert_method(name.into(), kind, Rc::new(move |_| f()), true);
        self
    }

    /// Instance method without a return value
    pub fn void_method(mut self, name: impl Into<String>, parameters: usize) -> Self {
        let kind = MemberKind::Method {
            parameters,
            returns_void: true,
        };
        self.insert_method(name.into(), kind, Rc::new(|_| Value::Null), false);
        self
    }

    pub fn build(self) -> TypeRef {
        Rc::new(self.def)
    }

    fn insert_field(&mut self, name: String, access: Accessor, is_static: bool) {
        let member = Member {
            name: name.clone(),
            kind: MemberKind::Field,
            is_static,
            access,
        };
        self.def.fields.insert(name, member);
    }

    fn insert_getter(&mut self, name: String, access: Accessor, is_static: bool) {
        let method_kind = MemberKind::Method {
            parameters: 0,
            returns_void: false,
        };
        self.insert_method(format!("get_{}", name), method_kind, Rc::clone(&access), is_static);
        let member = Member {
            name: name.clone(),
            kind: MemberKind::Getter,
            is_static,
            access,
        };
        self.def.getters.insert(name, member);
    }

    fn insert_method(&mut self, name: String, kind: MemberKind, access: Accessor, is_static: bool) {
        let member = Member {
            name: name.clone(),
            kind,
            is_static,
            access,
        };
        self.def.methods.insert(name, member);
    }
}

fn instance_accessor(f: impl Fn(&Value) -> Value + 'static) -> Accessor {
    Rc::new(move |receiver| match receiver {
        Some(value) => f(value),
        None => Value::Null,
    })
}
