//! Shared types for the super-coverage workspace.
//!
//! This crate is the reflective model the exerciser works against. A type that
//! wants to be exercised is described once with a [`TypeDescriptor`] (its
//! constructors and methods as closures over [`Value`]s) and handed to the
//! engine behind the [`Invokable`] capability. The engine never sees concrete
//! Rust types.
//!
//! ## Modules
//!
//! - [`type_ref`]: parameter/return type identities ([`TypeRef`], [`PrimitiveKind`])
//! - [`value`]: runtime values, objects and stand-ins
//! - [`descriptor`]: constructor/method/type descriptors and the builder
//! - [`fault`]: failures raised while constructing or invoking
//! - [`env_utils`]: environment variable parsing helpers

pub mod descriptor;
pub mod env_utils;
pub mod fault;
pub mod type_ref;
pub mod value;

pub use descriptor::{
    ConstructorDescriptor, ConstructorFn, Invokable, MethodDescriptor, MethodFn, MethodSignature,
    TypeDescriptor, TypeDescriptorBuilder, TypeKind,
};
pub use fault::Fault;
pub use type_ref::{PrimitiveKind, TypeRef, Visibility};
pub use value::{Object, StandInHandler, Value, PLACEHOLDER_CHAR};
