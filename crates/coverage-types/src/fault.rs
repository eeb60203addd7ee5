//! Failures raised while constructing objects or invoking methods.
//!
//! A `Fault` never escapes a single constructor or method attempt: the engine
//! records it and moves on.

use crate::type_ref::{TypeRef, Visibility};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// Checked access to a member that is not public.
    Inaccessible { member: String, visibility: Visibility },
    /// Wrong number of arguments for the member's parameter list.
    ArityMismatch {
        member: String,
        expected: usize,
        actual: usize,
    },
    /// An argument is not assignable to its declared parameter type.
    ArgumentMismatch {
        member: String,
        index: usize,
        expected: TypeRef,
    },
    /// The receiver's state is not the Rust type the method body expects.
    ReceiverMismatch { method: String, class: String },
    /// Invoking a method that has no body on a real object.
    Abstract { member: String },
    /// The body itself reported an error.
    Raised(String),
    /// The body panicked.
    Panicked(String),
}

impl Fault {
    pub fn raised(message: impl Into<String>) -> Self {
        Fault::Raised(message.into())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Inaccessible { member, visibility } => {
                write!(f, "{} is {} and was accessed without bypass", member, visibility)
            }
            Fault::ArityMismatch {
                member,
                expected,
                actual,
            } => write!(
                f,
                "{} expects {} argument(s), got {}",
                member, expected, actual
            ),
            Fault::ArgumentMismatch {
                member,
                index,
                expected,
            } => write!(
                f,
                "argument {} of {} is not assignable to {}",
                index, member, expected
            ),
            Fault::ReceiverMismatch { method, class } => {
                write!(f, "{} cannot be invoked on an instance of {}", method, class)
            }
            Fault::Abstract { member } => write!(f, "{} has no implementation", member),
            Fault::Raised(message) => write!(f, "raised: {}", message),
            Fault::Panicked(message) => write!(f, "panicked: {}", message),
        }
    }
}

impl std::error::Error for Fault {}
