//! Argument synthesizer: a "reasonable default" value for any requested type.
//!
//! The policy is a three-tier lookup, first match wins:
//!
//! | Tier | Requested type | Value |
//! |------|----------------|-------|
//! | `Primitive` | `boolean`, `char`, `int`, ... | canonical zero (`false`, placeholder char, `0`, `0.0`) |
//! | `WellKnown` | `String` and the primitive wrappers | empty / zero value in the wrapper |
//! | `StandIn` | anything else | behavior-less stand-in implementing the type's surface |
//!
//! Synthesis never fails: an unknown type name still gets a stand-in, just one
//! with an empty surface.

use coverage_types::{
    MethodSignature, Object, PrimitiveKind, StandInHandler, TypeRef, Value,
};
use serde::Serialize;
use std::sync::Arc;

use crate::registry::TypeLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisTier {
    Primitive,
    WellKnown,
    StandIn,
}

/// A value manufactured for one parameter slot.
#[derive(Debug, Clone)]
pub struct SynthesizedArgument {
    pub value: Value,
    pub tier: SynthesisTier,
}

/// Default-constructible value types, in lookup order.
static WELL_KNOWN_DEFAULTS: [(TypeRef, fn() -> Value); 9] = [
    (TypeRef::Text, || Value::Text(String::new())),
    (TypeRef::Boxed(PrimitiveKind::Bool), || Value::boxed_zero(PrimitiveKind::Bool)),
    (TypeRef::Boxed(PrimitiveKind::Char), || Value::boxed_zero(PrimitiveKind::Char)),
    (TypeRef::Boxed(PrimitiveKind::Byte), || Value::boxed_zero(PrimitiveKind::Byte)),
    (TypeRef::Boxed(PrimitiveKind::Short), || Value::boxed_zero(PrimitiveKind::Short)),
    (TypeRef::Boxed(PrimitiveKind::Int), || Value::boxed_zero(PrimitiveKind::Int)),
    (TypeRef::Boxed(PrimitiveKind::Long), || Value::boxed_zero(PrimitiveKind::Long)),
    (TypeRef::Boxed(PrimitiveKind::Float), || Value::boxed_zero(PrimitiveKind::Float)),
    (TypeRef::Boxed(PrimitiveKind::Double), || Value::boxed_zero(PrimitiveKind::Double)),
];

/// Tier 2 lookup.
pub fn well_known_default(ty: &TypeRef) -> Option<Value> {
    WELL_KNOWN_DEFAULTS
        .iter()
        .find(|(known, _)| known == ty)
        .map(|(_, make)| make())
}

/// Type-appropriate default for a return slot: zero/empty for primitives and
/// well-known types, `()` for `void`, null for object types.
pub fn default_return(ty: &TypeRef) -> Value {
    match ty {
        TypeRef::Unit => Value::Unit,
        TypeRef::Primitive(kind) => Value::zero(*kind),
        TypeRef::Named(_) => Value::Null,
        other => well_known_default(other).unwrap_or(Value::Null),
    }
}

/// Stand-in handler that does no work and answers every call with
/// [`default_return`] for the method's declared return type.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl StandInHandler for NoOpHandler {
    fn handle(&self, signature: &MethodSignature, _args: &[Value]) -> Value {
        default_return(&signature.returns)
    }
}

pub struct ArgumentSynthesizer<'a> {
    loader: &'a dyn TypeLoader,
    handler: Arc<dyn StandInHandler>,
}

impl<'a> ArgumentSynthesizer<'a> {
    pub fn new(loader: &'a dyn TypeLoader) -> Self {
        Self {
            loader,
            handler: Arc::new(NoOpHandler),
        }
    }

    /// Replace the handler every stand-in produced by this synthesizer dispatches to.
    pub fn with_handler(mut self, handler: Arc<dyn StandInHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn synthesize(&self, ty: &TypeRef) -> SynthesizedArgument {
        if let TypeRef::Primitive(kind) = ty {
            return SynthesizedArgument {
                value: Value::zero(*kind),
                tier: SynthesisTier::Primitive,
            };
        }
        if let Some(value) = well_known_default(ty) {
            return SynthesizedArgument {
                value,
                tier: SynthesisTier::WellKnown,
            };
        }
        let value = match ty {
            TypeRef::Named(name) => Value::Object(self.stand_in_for(name)),
            // Unit never names a real parameter slot; answer in kind.
            _ => Value::Unit,
        };
        SynthesizedArgument {
            value,
            tier: SynthesisTier::StandIn,
        }
    }

    /// One fresh value per parameter, in order.
    pub fn synthesize_all(&self, params: &[TypeRef]) -> Vec<Value> {
        params.iter().map(|p| self.synthesize(p).value).collect()
    }

    /// Stand-in impersonating `name`, exposing the loaded type's surface when
    /// the type is known.
    pub fn stand_in_for(&self, name: &str) -> Object {
        match self.loader.find_type(name) {
            Some(ty) => Object::stand_in(
                name,
                ty.supertypes().to_vec(),
                ty.surface(),
                Arc::clone(&self.handler),
            ),
            None => {
                tracing::trace!(type_name = name, "stand-in for unloaded type");
                Object::stand_in(
                    name,
                    Vec::<String>::new(),
                    Vec::new(),
                    Arc::clone(&self.handler),
                )
            }
        }
    }
}
