//! Constructor, method and type descriptors.
//!
//! Descriptors are the read-only signature metadata the engine introspects,
//! paired with the closures that actually run when a member is invoked. The
//! engine only depends on the [`Invokable`] capability; [`TypeDescriptor`] is
//! the stock implementation, assembled with [`TypeDescriptorBuilder`].
//!
//! ```ignore
//! let counter = TypeDescriptor::builder("demo.Counter")
//!     .constructor(vec![], |_| Ok(Counter::default()))
//!     .method::<Counter, _>("increment", vec![], TypeRef::Unit, |c, _| {
//!         c.bump();
//!         Ok(Value::Unit)
//!     })
//!     .build();
//! ```

use crate::fault::Fault;
use crate::type_ref::{TypeRef, Visibility};
use crate::value::{Object, Value};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Body of a constructor: turns arguments into fresh state.
pub type ConstructorFn =
    Arc<dyn Fn(&[Value]) -> Result<Arc<dyn Any + Send + Sync>, Fault> + Send + Sync>;

/// Body of a method: runs against a receiver.
pub type MethodFn = Arc<dyn Fn(&Object, &[Value]) -> Result<Value, Fault> + Send + Sync>;

/// Name, parameter list and return type of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub returns: TypeRef,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>, returns: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_params(f, &self.params)?;
        write!(f, "): {}", self.returns)
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[TypeRef]) -> fmt::Result {
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p)?;
    }
    Ok(())
}

/// Arity and assignability check shared by constructors and methods.
fn check_args(member: &str, params: &[TypeRef], args: &[Value]) -> Result<(), Fault> {
    if params.len() != args.len() {
        return Err(Fault::ArityMismatch {
            member: member.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }
    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        if !arg.is_assignable_to(param) {
            return Err(Fault::ArgumentMismatch {
                member: member.to_string(),
                index,
                expected: param.clone(),
            });
        }
    }
    Ok(())
}

/// One advertised way of creating an instance of its owning type.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    owner: Arc<str>,
    supertypes: Arc<[String]>,
    params: Vec<TypeRef>,
    visibility: Visibility,
    body: ConstructorFn,
}

impl ConstructorDescriptor {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Human-readable signature, e.g. `demo.Wallet(int, String)`.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// Create an instance, honoring the declared visibility.
    pub fn new_instance(&self, args: &[Value]) -> Result<Object, Fault> {
        if !self.visibility.is_public() {
            return Err(Fault::Inaccessible {
                member: self.signature(),
                visibility: self.visibility,
            });
        }
        self.new_instance_unchecked(args)
    }

    /// Create an instance regardless of visibility.
    ///
    /// Arguments are still checked against the parameter list before the body runs.
    pub fn new_instance_unchecked(&self, args: &[Value]) -> Result<Object, Fault> {
        check_args(&self.owner, &self.params, args)?;
        let state = (self.body)(args)?;
        Ok(Object::new(
            Arc::clone(&self.owner),
            Arc::clone(&self.supertypes),
            state,
        ))
    }
}

impl fmt::Display for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.owner)?;
        write_params(f, &self.params)?;
        write!(f, ")")
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// One declared method of a type.
#[derive(Clone)]
pub struct MethodDescriptor {
    owner: Arc<str>,
    signature: MethodSignature,
    visibility: Visibility,
    synthetic: bool,
    body: Option<MethodFn>,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.signature.params
    }

    pub fn returns(&self) -> &TypeRef {
        &self.signature.returns
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Compiler-generated plumbing rather than user logic.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Declared without a body.
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// `Owner.name`, used in diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.signature.name)
    }

    /// Invoke, honoring the declared visibility.
    pub fn invoke(&self, receiver: &Object, args: &[Value]) -> Result<Value, Fault> {
        if !self.visibility.is_public() {
            return Err(Fault::Inaccessible {
                member: self.qualified_name(),
                visibility: self.visibility,
            });
        }
        self.invoke_unchecked(receiver, args)
    }

    /// Invoke regardless of visibility.
    ///
    /// Stand-in receivers never reach the body; their handler answers instead.
    pub fn invoke_unchecked(&self, receiver: &Object, args: &[Value]) -> Result<Value, Fault> {
        check_args(&self.qualified_name(), &self.signature.params, args)?;
        if let Some(value) = receiver.dispatch_stand_in(&self.signature, args) {
            return Ok(value);
        }
        match &self.body {
            Some(body) => body(receiver, args),
            None => Err(Fault::Abstract {
                member: self.qualified_name(),
            }),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("owner", &self.owner)
            .field("signature", &self.signature)
            .field("visibility", &self.visibility)
            .field("synthetic", &self.synthetic)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

/// Whether a type can be instantiated through its own constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Concrete,
    Abstract,
    Interface,
}

/// Introspection capability the exerciser requires from a loaded type.
pub trait Invokable: Send + Sync {
    /// Fully-qualified display name.
    fn name(&self) -> &str;

    /// Interface or abstract type: instances come from stand-ins only.
    fn is_abstract(&self) -> bool;

    /// Names of declared supertypes (implemented interfaces, base types).
    fn supertypes(&self) -> &[String];

    fn constructors(&self) -> &[ConstructorDescriptor];

    fn methods(&self) -> &[MethodDescriptor];

    /// Signatures a stand-in for this type answers to.
    fn surface(&self) -> Vec<MethodSignature> {
        self.methods()
            .iter()
            .filter(|m| !m.is_synthetic())
            .map(|m| m.signature().clone())
            .collect()
    }
}

/// Stock [`Invokable`] implementation.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: Arc<str>,
    kind: TypeKind,
    supertypes: Arc<[String]>,
    constructors: Vec<ConstructorDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

impl Invokable for TypeDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_abstract(&self) -> bool {
        !matches!(self.kind, TypeKind::Concrete)
    }

    fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }
}

struct PendingConstructor {
    params: Vec<TypeRef>,
    visibility: Visibility,
    body: ConstructorFn,
}

struct PendingMethod {
    signature: MethodSignature,
    visibility: Visibility,
    synthetic: bool,
    body: Option<MethodFn>,
}

/// Builder for [`TypeDescriptor`].
///
/// Members are kept in declaration order; the owner name and supertypes are
/// stamped onto every member at [`build`](Self::build).
pub struct TypeDescriptorBuilder {
    name: String,
    kind: TypeKind,
    supertypes: Vec<String>,
    constructors: Vec<PendingConstructor>,
    methods: Vec<PendingMethod>,
}

impl TypeDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Concrete,
            supertypes: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(mut self) -> Self {
        self.kind = TypeKind::Interface;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.kind = TypeKind::Abstract;
        self
    }

    pub fn implements(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Public constructor producing state of type `T`.
    pub fn constructor<T, F>(self, params: Vec<TypeRef>, body: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> Result<T, Fault> + Send + Sync + 'static,
    {
        self.constructor_with(Visibility::Public, params, body)
    }

    pub fn constructor_with<T, F>(
        mut self,
        visibility: Visibility,
        params: Vec<TypeRef>,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> Result<T, Fault> + Send + Sync + 'static,
    {
        let body: ConstructorFn = Arc::new(move |args: &[Value]| {
            body(args).map(|state| Arc::new(state) as Arc<dyn Any + Send + Sync>)
        });
        self.constructors.push(PendingConstructor {
            params,
            visibility,
            body,
        });
        self
    }

    /// Public method whose body receives the receiver's state as `&T`.
    pub fn method<T, F>(self, name: &str, params: Vec<TypeRef>, returns: TypeRef, body: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &[Value]) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        self.method_with(Visibility::Public, name, params, returns, body)
    }

    pub fn method_with<T, F>(
        mut self,
        visibility: Visibility,
        name: &str,
        params: Vec<TypeRef>,
        returns: TypeRef,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &[Value]) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        let method = name.to_string();
        let body: MethodFn = Arc::new(move |receiver: &Object, args: &[Value]| {
            let state = receiver
                .downcast_ref::<T>()
                .ok_or_else(|| Fault::ReceiverMismatch {
                    method: method.clone(),
                    class: receiver.class_name().to_string(),
                })?;
            body(state, args)
        });
        self.methods.push(PendingMethod {
            signature: MethodSignature::new(name, params, returns),
            visibility,
            synthetic: false,
            body: Some(body),
        });
        self
    }

    /// Method with no body, as declared by interfaces and abstract types.
    pub fn abstract_method(mut self, name: &str, params: Vec<TypeRef>, returns: TypeRef) -> Self {
        self.methods.push(PendingMethod {
            signature: MethodSignature::new(name, params, returns),
            visibility: Visibility::Public,
            synthetic: false,
            body: None,
        });
        self
    }

    /// Compiler-generated member (bridge/accessor plumbing).
    pub fn synthetic_method<T, F>(
        mut self,
        name: &str,
        params: Vec<TypeRef>,
        returns: TypeRef,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &[Value]) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        self = self.method_with(Visibility::Package, name, params, returns, body);
        if let Some(last) = self.methods.last_mut() {
            last.synthetic = true;
        }
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let name: Arc<str> = self.name.into();
        let supertypes: Arc<[String]> = self.supertypes.into();
        let constructors = self
            .constructors
            .into_iter()
            .map(|c| ConstructorDescriptor {
                owner: Arc::clone(&name),
                supertypes: Arc::clone(&supertypes),
                params: c.params,
                visibility: c.visibility,
                body: c.body,
            })
            .collect();
        let methods = self
            .methods
            .into_iter()
            .map(|m| MethodDescriptor {
                owner: Arc::clone(&name),
                signature: m.signature,
                visibility: m.visibility,
                synthetic: m.synthetic,
                body: m.body,
            })
            .collect();
        TypeDescriptor {
            name,
            kind: self.kind,
            supertypes,
            constructors,
            methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ref::PrimitiveKind;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct Account {
        balance: AtomicI64,
    }

    fn account_type() -> TypeDescriptor {
        TypeDescriptor::builder("bank.Account")
            .implements("bank.Ledger")
            .constructor(vec![], |_| Ok(Account::default()))
            .constructor_with(
                Visibility::Private,
                vec![TypeRef::Primitive(PrimitiveKind::Long)],
                |args| {
                    let opening = args[0].as_long().unwrap_or_default();
                    Ok(Account {
                        balance: AtomicI64::new(opening),
                    })
                },
            )
            .method::<Account, _>(
                "deposit",
                vec![TypeRef::Primitive(PrimitiveKind::Long)],
                TypeRef::Primitive(PrimitiveKind::Long),
                |acct, args| {
                    let amount = args[0].as_long().unwrap_or_default();
                    Ok(Value::Long(acct.balance.fetch_add(amount, Ordering::SeqCst) + amount))
                },
            )
            .method_with::<Account, _>(
                Visibility::Private,
                "audit",
                vec![],
                TypeRef::Unit,
                |_, _| Err(Fault::raised("audit trail unavailable")),
            )
            .abstract_method("close", vec![], TypeRef::Unit)
            .build()
    }

    #[test]
    fn test_builder_stamps_owner_and_order() {
        let ty = account_type();
        assert_eq!(ty.name(), "bank.Account");
        assert!(!ty.is_abstract());
        assert_eq!(ty.constructors().len(), 2);
        assert_eq!(ty.constructors()[0].owner(), "bank.Account");
        let names: Vec<&str> = ty.methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["deposit", "audit", "close"]);
        assert_eq!(ty.constructors()[1].signature(), "bank.Account(long)");
    }

    #[test]
    fn test_kind_follows_builder_flags() {
        assert_eq!(account_type().kind(), TypeKind::Concrete);
        let ledger = TypeDescriptor::builder("bank.Ledger").interface().build();
        assert_eq!(ledger.kind(), TypeKind::Interface);
        assert!(ledger.is_abstract());
        let base = TypeDescriptor::builder("bank.Base").abstract_type().build();
        assert_eq!(base.kind(), TypeKind::Abstract);
        assert!(base.is_abstract());
    }

    #[test]
    fn test_checked_access_rejects_private_members() {
        let ty = account_type();
        let private_ctor = &ty.constructors()[1];
        let err = private_ctor.new_instance(&[Value::Long(5)]).unwrap_err();
        assert!(matches!(err, Fault::Inaccessible { .. }));

        let account = private_ctor.new_instance_unchecked(&[Value::Long(5)]).unwrap();
        assert!(account.is_a("bank.Ledger"));

        let audit = &ty.methods()[1];
        assert!(matches!(
            audit.invoke(&account, &[]),
            Err(Fault::Inaccessible { .. })
        ));
        assert_eq!(
            audit.invoke_unchecked(&account, &[]),
            Err(Fault::raised("audit trail unavailable"))
        );
    }

    #[test]
    fn test_invoke_checks_arguments_before_body() {
        let ty = account_type();
        let account = ty.constructors()[0].new_instance(&[]).unwrap();
        let deposit = &ty.methods()[0];

        assert_eq!(deposit.invoke(&account, &[Value::Long(7)]), Ok(Value::Long(7)));
        assert!(matches!(
            deposit.invoke(&account, &[]),
            Err(Fault::ArityMismatch { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            deposit.invoke(&account, &[Value::Int(7)]),
            Err(Fault::ArgumentMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_abstract_method_on_real_object_faults() {
        let ty = account_type();
        let account = ty.constructors()[0].new_instance(&[]).unwrap();
        let close = &ty.methods()[2];
        assert!(close.is_abstract());
        assert!(matches!(
            close.invoke(&account, &[]),
            Err(Fault::Abstract { .. })
        ));
    }

    #[test]
    fn test_receiver_mismatch_is_a_fault() {
        let ty = account_type();
        let foreign = Object::new("bank.Other", Vec::<String>::new(), Arc::new(3u8));
        let deposit = &ty.methods()[0];
        assert!(matches!(
            deposit.invoke(&foreign, &[Value::Long(1)]),
            Err(Fault::ReceiverMismatch { .. })
        ));
    }

    #[test]
    fn test_surface_skips_synthetic_members() {
        let ty = TypeDescriptor::builder("demo.Pair")
            .constructor(vec![], |_| Ok(()))
            .method::<(), _>("first", vec![], TypeRef::Text, |_, _| Ok(Value::Text("a".into())))
            .synthetic_method::<(), _>("access$000", vec![], TypeRef::Unit, |_, _| Ok(Value::Unit))
            .build();
        assert!(ty.methods()[1].is_synthetic());
        let surface = ty.surface();
        assert_eq!(surface.len(), 1);
        assert_eq!(surface[0].to_string(), "first(): String");
    }
}
