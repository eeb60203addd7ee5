//! Runtime values passed to and returned from exercised members.
//!
//! [`Object`] is the receiver handle for method calls. It either wraps real
//! state produced by a constructor body, or it is a stand-in: an object with a
//! capability surface (the method signatures of the type it impersonates) whose
//! every call is routed to a [`StandInHandler`] instead of user code.

use crate::descriptor::MethodSignature;
use crate::fault::Fault;
use crate::type_ref::{PrimitiveKind, TypeRef};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Fixed placeholder used wherever a `char` has to be made up.
pub const PLACEHOLDER_CHAR: char = 'a';

/// Dispatch target for calls made on a stand-in object.
///
/// Implementations must not perform work on behalf of the impersonated type;
/// they only return a value matching `signature.returns`.
pub trait StandInHandler: Send + Sync {
    fn handle(&self, signature: &MethodSignature, args: &[Value]) -> Value;
}

#[derive(Clone)]
pub enum Value {
    Unit,
    /// Absent object reference.
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// A primitive inside its wrapper type.
    Boxed(Box<Value>),
    Text(String),
    Object(Object),
}

impl Value {
    /// Canonical zero-equivalent of a primitive kind.
    pub fn zero(kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char(PLACEHOLDER_CHAR),
            PrimitiveKind::Byte => Value::Byte(0),
            PrimitiveKind::Short => Value::Short(0),
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
        }
    }

    /// The zero value boxed in its wrapper type.
    pub fn boxed_zero(kind: PrimitiveKind) -> Value {
        Value::Boxed(Box::new(Value::zero(kind)))
    }

    /// Primitive kind of this value, looking through one level of boxing.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Bool),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::Boxed(inner) => inner.primitive_kind(),
            _ => None,
        }
    }

    /// Whether this value satisfies a slot declared as `ty`.
    pub fn is_assignable_to(&self, ty: &TypeRef) -> bool {
        match (self, ty) {
            (Value::Unit, TypeRef::Unit) => true,
            (Value::Null, TypeRef::Boxed(_) | TypeRef::Text | TypeRef::Named(_)) => true,
            (Value::Boxed(inner), TypeRef::Boxed(kind)) => {
                !matches!(inner.as_ref(), Value::Boxed(_)) && inner.primitive_kind() == Some(*kind)
            }
            (Value::Text(_), TypeRef::Text) => true,
            (Value::Object(object), TypeRef::Named(name)) => object.is_a(name),
            (Value::Boxed(_), _) => false,
            (value, TypeRef::Primitive(kind)) => value.primitive_kind() == Some(*kind),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unboxed() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.unboxed() {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self.unboxed() {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.unboxed() {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    fn unboxed(&self) -> &Value {
        match self {
            Value::Boxed(inner) => inner,
            other => other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Boxed(a), Value::Boxed(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.same_object(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Byte(i) => write!(f, "{}", i),
            Value::Short(i) => write!(f, "{}", i),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(i) => write!(f, "{}L", i),
            Value::Float(x) => write!(f, "{:?}f", x),
            Value::Double(x) => write!(f, "{:?}", x),
            Value::Boxed(inner) => write!(f, "{}", inner),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Object(o) => write!(f, "{:?}", o),
        }
    }
}

#[derive(Clone)]
enum Repr {
    Real(Arc<dyn Any + Send + Sync>),
    StandIn {
        surface: Arc<[MethodSignature]>,
        handler: Arc<dyn StandInHandler>,
    },
}

/// Handle to an instance of a described type.
///
/// Cloning is cheap and shares the underlying state.
#[derive(Clone)]
pub struct Object {
    class: Arc<str>,
    supertypes: Arc<[String]>,
    repr: Repr,
}

impl Object {
    /// Wrap state produced by a constructor body.
    pub fn new(
        class: impl Into<Arc<str>>,
        supertypes: impl Into<Arc<[String]>>,
        state: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            class: class.into(),
            supertypes: supertypes.into(),
            repr: Repr::Real(state),
        }
    }

    /// Create a behavior-less stand-in impersonating `class`.
    pub fn stand_in(
        class: impl Into<Arc<str>>,
        supertypes: impl Into<Arc<[String]>>,
        surface: Vec<MethodSignature>,
        handler: Arc<dyn StandInHandler>,
    ) -> Self {
        Self {
            class: class.into(),
            supertypes: supertypes.into(),
            repr: Repr::StandIn {
                surface: surface.into(),
                handler,
            },
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    pub fn is_stand_in(&self) -> bool {
        matches!(self.repr, Repr::StandIn { .. })
    }

    /// True when the object's class, or one of its declared supertypes, is `name`.
    pub fn is_a(&self, name: &str) -> bool {
        &*self.class == name || self.supertypes.iter().any(|s| s == name)
    }

    /// Borrow the real state as `T`. Always `None` for stand-ins.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.repr {
            Repr::Real(state) => state.downcast_ref::<T>(),
            Repr::StandIn { .. } => None,
        }
    }

    /// Method signatures a stand-in answers to. Empty for real objects.
    pub fn surface(&self) -> &[MethodSignature] {
        match &self.repr {
            Repr::Real(_) => &[],
            Repr::StandIn { surface, .. } => &surface[..],
        }
    }

    /// Route a call to the stand-in handler. `None` for real objects.
    pub fn dispatch_stand_in(&self, signature: &MethodSignature, args: &[Value]) -> Option<Value> {
        match &self.repr {
            Repr::Real(_) => None,
            Repr::StandIn { handler, .. } => Some(handler.handle(signature, args)),
        }
    }

    /// Call a stand-in by method name, as a caller holding only the object would.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, Fault> {
        let signature = self
            .surface()
            .iter()
            .find(|s| s.name == method && s.params.len() == args.len())
            .ok_or_else(|| Fault::Abstract {
                member: format!("{}.{}", self.class, method),
            })?;
        self.dispatch_stand_in(signature, args)
            .ok_or_else(|| Fault::Abstract {
                member: format!("{}.{}", self.class, method),
            })
    }

    fn same_object(&self, other: &Object) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Real(a), Repr::Real(b)) => Arc::ptr_eq(a, b),
            (Repr::StandIn { surface: a, .. }, Repr::StandIn { surface: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_stand_in() {
            write!(f, "<stand-in {}>", self.class)
        } else {
            write!(f, "<{}>", self.class)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoZero;

    impl StandInHandler for EchoZero {
        fn handle(&self, signature: &MethodSignature, _args: &[Value]) -> Value {
            match &signature.returns {
                TypeRef::Primitive(kind) => Value::zero(*kind),
                _ => Value::Null,
            }
        }
    }

    fn shape_stand_in() -> Object {
        Object::stand_in(
            "geo.Shape",
            Vec::<String>::new(),
            vec![MethodSignature::new(
                "area",
                vec![],
                TypeRef::Primitive(PrimitiveKind::Double),
            )],
            Arc::new(EchoZero),
        )
    }

    #[test]
    fn test_primitive_assignability() {
        for kind in PrimitiveKind::ALL {
            let zero = Value::zero(kind);
            assert!(zero.is_assignable_to(&TypeRef::Primitive(kind)));
            assert!(!zero.is_assignable_to(&TypeRef::Boxed(kind)));
            assert!(Value::boxed_zero(kind).is_assignable_to(&TypeRef::Boxed(kind)));
            assert!(!Value::boxed_zero(kind).is_assignable_to(&TypeRef::Primitive(kind)));
        }
        assert!(!Value::Int(0).is_assignable_to(&TypeRef::Primitive(PrimitiveKind::Long)));
    }

    #[test]
    fn test_null_only_fills_reference_slots() {
        assert!(Value::Null.is_assignable_to(&TypeRef::Text));
        assert!(Value::Null.is_assignable_to(&TypeRef::named("a.B")));
        assert!(Value::Null.is_assignable_to(&TypeRef::Boxed(PrimitiveKind::Int)));
        assert!(!Value::Null.is_assignable_to(&TypeRef::Primitive(PrimitiveKind::Int)));
    }

    #[test]
    fn test_object_assignable_through_supertypes() {
        let object = Object::new(
            "geo.Circle",
            vec!["geo.Shape".to_string()],
            Arc::new(1.5f64),
        );
        let value = Value::Object(object.clone());
        assert!(value.is_assignable_to(&TypeRef::named("geo.Circle")));
        assert!(value.is_assignable_to(&TypeRef::named("geo.Shape")));
        assert!(!value.is_assignable_to(&TypeRef::named("geo.Square")));
        assert_eq!(object.downcast_ref::<f64>(), Some(&1.5));
        assert!(object.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_stand_in_calls_return_defaults() {
        let shape = shape_stand_in();
        assert!(shape.is_stand_in());
        assert!(shape.downcast_ref::<f64>().is_none());
        assert_eq!(shape.call("area", &[]).unwrap(), Value::Double(0.0));
        assert!(matches!(
            shape.call("perimeter", &[]),
            Err(Fault::Abstract { .. })
        ));
    }

    #[test]
    fn test_accessors_see_through_boxing() {
        assert_eq!(Value::boxed_zero(PrimitiveKind::Bool).as_bool(), Some(false));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::boxed_zero(PrimitiveKind::Double).as_double(), Some(0.0));
        assert_eq!(Value::Double(1.5).as_double(), Some(1.5));
        assert_eq!(Value::Float(1.5).as_double(), None);
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn test_value_equality_is_identity_for_objects() {
        let a = Value::Object(shape_stand_in());
        let b = Value::Object(shape_stand_in());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
