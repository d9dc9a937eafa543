//! Member chain evaluation against host types and values

use std::rc::Rc;

use thiserror::Error;

use crate::config::PrecisionOverrides;
use crate::host::{Host, Member, MemberKind, TypeRef, Value};

use super::parser::split_call;

/// A member chain step that could not be evaluated
///
/// The `Display` text is rendered in place of the expression branch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    #[error("{token}: Calling methods is illegal when tas is running.")]
    MethodsDisabled { token: String },

    #[error("{token}: Only method without parameters is supported")]
    HasParameters { token: String },

    #[error("{token}: Method return void is not supported")]
    ReturnsVoid { token: String },

    #[error("{type_name}.{token} member not found")]
    NotFound { type_name: String, token: String },
}

/// Walks member chains using the host's member tables
pub struct MemberEvaluator<'a> {
    host: &'a dyn Host,
    overrides: &'a PrecisionOverrides,
}

impl<'a> MemberEvaluator<'a> {
    pub fn new(host: &'a dyn Host, overrides: &'a PrecisionOverrides) -> Self {
        Self { host, overrides }
    }

    /// Whether `token` names a static getter, field or method of `ty`
    pub fn is_static_member(&self, ty: &TypeRef, token: &str) -> bool {
        if let Some(getter) = ty.getter(token) {
            return getter.is_static();
        }
        if let Some(field) = ty.field(token) {
            return field.is_static();
        }
        split_call(token)
            .and_then(|(name, _)| ty.method(name))
            .is_some_and(Member::is_static)
    }

    /// Evaluate `chain` starting at `ty`, with `instance` as the receiver.
    ///
    /// Members are probed as getter, then field, then zero-argument method.
    /// `Ok(None)` means a step produced null, or an instance member was
    /// reached without an instance.
    pub fn evaluate(
        &self,
        ty: &TypeRef,
        instance: Option<Value>,
        chain: &[String],
    ) -> Result<Option<Value>, MemberError> {
        let mut current_type = Some(Rc::clone(ty));
        let mut current = instance;

        for token in chain {
            let next = match &current_type {
                Some(ty) => self.step(ty, current.as_ref(), token)?,
                None => {
                    // The host gave no type for this value
                    let type_name = current.as_ref().map(Value::type_name).unwrap_or_default();
                    return Err(MemberError::NotFound {
                        type_name,
                        token: token.clone(),
                    });
                }
            };

            let Some(value) = next.filter(|v| !v.is_null()) else {
                return Ok(None);
            };
            current_type = self.host.type_of(&value);
            current = Some(value);
        }

        Ok(current)
    }

    fn step(
        &self,
        ty: &TypeRef,
        receiver: Option<&Value>,
        token: &str,
    ) -> Result<Option<Value>, MemberError> {
        if let Some(getter) = ty.getter(token) {
            return Ok(self.invoke(getter, receiver, token));
        }

        if let Some(field) = ty.field(token) {
            return Ok(self.invoke(field, receiver, token));
        }

        if let Some((name, args)) = split_call(token) {
            if let Some(method) = ty.method(name) {
                return self.call(method, receiver, token, args);
            }
        }

        let type_name = match receiver.and_then(|r| self.host.type_of(r)) {
            Some(runtime) => runtime.full_name().to_string(),
            None => ty.full_name().to_string(),
        };
        Err(MemberError::NotFound {
            type_name,
            token: token.to_string(),
        })
    }

    fn call(
        &self,
        method: &Member,
        receiver: Option<&Value>,
        token: &str,
        args: &str,
    ) -> Result<Option<Value>, MemberError> {
        if self.host.methods_disabled() {
            return Err(MemberError::MethodsDisabled {
                token: token.to_string(),
            });
        }
        let (parameters, returns_void) = match method.kind() {
            MemberKind::Method {
                parameters,
                returns_void,
            } => (parameters, returns_void),
            MemberKind::Getter | MemberKind::Field => (0, false),
        };
        if !args.trim().is_empty() || parameters > 0 {
            return Err(MemberError::HasParameters {
                token: token.to_string(),
            });
        }
        if returns_void {
            return Err(MemberError::ReturnsVoid {
                token: token.to_string(),
            });
        }
        Ok(self.invoke(method, receiver, token))
    }

    fn invoke(&self, member: &Member, receiver: Option<&Value>, token: &str) -> Option<Value> {
        if member.is_static() {
            return Some(member.invoke(None));
        }
        let receiver = receiver?;
        if let Some(exact) = self.exact_position(receiver, token) {
            return Some(exact);
        }
        Some(member.invoke(Some(receiver)))
    }

    /// Higher-precision position for configured host types and member tokens
    fn exact_position(&self, receiver: &Value, token: &str) -> Option<Value> {
        if !self.overrides.members.iter().any(|m| m == token) {
            return None;
        }
        let object = receiver.as_object()?;
        let matches_type = self
            .overrides
            .types
            .iter()
            .any(|name| object.type_def().derives_from(name));
        if !matches_type {
            return None;
        }
        self.host.exact_position(object).map(Value::Vector2Double)
    }
}
