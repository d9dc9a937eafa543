//! Boundary to the running simulation
//!
//! The engine never touches simulation internals directly. Everything it needs
//! is reached through [`Host`]: the type universe, the live object directory,
//! the current scene and session, and the method-call policy.

mod object;
mod scene_file;
mod types;
mod value;
mod world;

pub use object::{Object, ObjectRef};
pub use scene_file::{SceneError, SceneFile};
pub use types::{Accessor, Member, MemberKind, TypeBuilder, TypeDef, TypeKind, TypeRef};
pub use value::{Collider, Value, Vector2, Vector2Double};
pub use world::World;

/// Capabilities the engine consumes from the host
pub trait Host {
    /// Every known type, used to (re)build the type registry
    fn types(&self) -> Vec<TypeRef>;

    /// Runtime type of a value, if the host knows it
    fn type_of(&self, value: &Value) -> Option<TypeRef>;

    /// Indexed lookup of live objects of `ty` and its subtypes.
    ///
    /// Returns `None` when `ty` is not indexed; the caller then scans
    /// [`objects`](Self::objects).
    fn tracked(&self, _ty: &TypeDef) -> Option<Vec<ObjectRef>> {
        None
    }

    /// All live objects in the current scene
    fn objects(&self) -> Vec<ObjectRef>;

    /// The top-level scene singleton, present only while a simulation runs
    fn scene(&self) -> Option<Value>;

    /// The session of the current scene
    fn session(&self) -> Option<Value>;

    fn scene_type(&self) -> Option<TypeRef>;

    fn session_type(&self) -> Option<TypeRef>;

    /// Whether side-effecting method calls are currently disallowed
    fn methods_disabled(&self) -> bool {
        false
    }

    /// Sub-unit position of an object, beyond what its stored position exposes
    fn exact_position(&self, _object: &ObjectRef) -> Option<Vector2Double> {
        None
    }
}
