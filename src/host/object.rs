//! Live objects owned by the host

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::types::TypeRef;
use super::value::Value;

/// Shared handle to a live object
pub type ObjectRef = Rc<Object>;

/// An instance of a host type
///
/// Slot values are mutable through a shared handle so the host can advance
/// the scene between renders.
pub struct Object {
    ty: TypeRef,
    stable_id: Option<String>,
    slots: RefCell<BTreeMap<String, Value>>,
}

impl Object {
    pub fn new(ty: &TypeRef) -> Self {
        Self {
            ty: Rc::clone(ty),
            stable_id: None,
            slots: RefCell::new(BTreeMap::new()),
        }
    }

    /// Attach the identifier the host assigned when loading the object
    pub fn with_stable_id(mut self, id: impl Into<String>) -> Self {
        self.stable_id = Some(id.into());
        self
    }

    pub fn with(self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.slots.borrow_mut().insert(slot.into(), value.into());
        self
    }

    pub fn into_ref(self) -> ObjectRef {
        Rc::new(self)
    }

    pub fn type_def(&self) -> &TypeRef {
        &self.ty
    }

    pub fn stable_id(&self) -> Option<&str> {
        self.stable_id.as_deref()
    }

    /// Read a slot; missing slots read as null
    pub fn get(&self, slot: &str) -> Value {
        self.slots.borrow().get(slot).cloned().unwrap_or_default()
    }

    pub fn set(&self, slot: impl Into<String>, value: impl Into<Value>) {
        self.slots.borrow_mut().insert(slot.into(), value.into());
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.ty.full_name())
            .field("stable_id", &self.stable_id)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ty.full_name())
    }
}
