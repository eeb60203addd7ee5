//! Instance constructor: turns a loaded type into zero or more instances.
//!
//! Every declared constructor is attempted independently, visibility ignored.
//! Interfaces and abstract types are not constructed at all; they yield a
//! single stand-in instead.
//!
//! ## Single-parameter injection
//!
//! A constructor taking exactly one parameter is usually a wrapper around a
//! cooperating object. Before falling back to the synthesizer, the parameter
//! type is built for real:
//!
//! 1. through its zero-argument constructor, if it has one;
//! 2. otherwise through one of its own single-parameter constructors, applying
//!    the same rule to that parameter, at most `injection_depth` levels deep.
//!
//! Multi-parameter constructors always get plain synthesized arguments.

use coverage_types::{ConstructorDescriptor, Fault, Invokable, Object, TypeRef, Value};

use crate::registry::TypeLoader;
use crate::synthesizer::ArgumentSynthesizer;
use crate::utils::contain;

/// Outcome of one constructor attempt (or of standing in for an abstract type).
pub struct ConstructionAttempt {
    /// Constructor signature, or the type name for stand-ins.
    pub constructor: String,
    pub stand_in: bool,
    pub outcome: Result<Object, Fault>,
}

pub struct InstanceConstructor<'a> {
    loader: &'a dyn TypeLoader,
    synthesizer: &'a ArgumentSynthesizer<'a>,
    injection_depth: usize,
}

impl<'a> InstanceConstructor<'a> {
    pub fn new(
        loader: &'a dyn TypeLoader,
        synthesizer: &'a ArgumentSynthesizer<'a>,
        injection_depth: usize,
    ) -> Self {
        Self {
            loader,
            synthesizer,
            injection_depth,
        }
    }

    /// One attempt per declared constructor, or a single stand-in for
    /// interface/abstract types.
    pub fn construct(&self, ty: &dyn Invokable) -> Vec<ConstructionAttempt> {
        if ty.is_abstract() {
            return vec![ConstructionAttempt {
                constructor: ty.name().to_string(),
                stand_in: true,
                outcome: Ok(self.synthesizer.stand_in_for(ty.name())),
            }];
        }
        ty.constructors().iter().map(|c| self.attempt(c)).collect()
    }

    pub fn attempt(&self, ctor: &ConstructorDescriptor) -> ConstructionAttempt {
        let outcome = contain(|| {
            let args = self.arguments_for(ctor);
            ctor.new_instance_unchecked(&args)
        });
        ConstructionAttempt {
            constructor: ctor.signature(),
            stand_in: false,
            outcome,
        }
    }

    fn arguments_for(&self, ctor: &ConstructorDescriptor) -> Vec<Value> {
        match ctor.params() {
            [single] => vec![self.inject(single, 0)],
            params => self.synthesizer.synthesize_all(params),
        }
    }

    /// Value for the sole parameter of a single-parameter constructor.
    pub fn inject(&self, ty: &TypeRef, depth: usize) -> Value {
        match self.construct_dependency(ty, depth) {
            Some(object) => Value::Object(object),
            None => self.synthesizer.synthesize(ty).value,
        }
    }

    fn construct_dependency(&self, ty: &TypeRef, depth: usize) -> Option<Object> {
        let name = ty.type_name()?;
        if depth >= self.injection_depth {
            return None;
        }
        let dependency = self.loader.find_type(name)?;
        if dependency.is_abstract() {
            return None;
        }

        let constructors = dependency.constructors();
        if let Some(default_ctor) = constructors.iter().find(|c| c.params().is_empty()) {
            match contain(|| default_ctor.new_instance_unchecked(&[])) {
                Ok(object) => return Some(object),
                Err(fault) => {
                    tracing::debug!(
                        dependency = name,
                        %fault,
                        "default constructor failed during injection"
                    );
                }
            }
        }

        for ctor in constructors.iter().filter(|c| c.params().len() == 1) {
            let arg = self.inject(&ctor.params()[0], depth + 1);
            match contain(|| ctor.new_instance_unchecked(&[arg])) {
                Ok(object) => return Some(object),
                Err(fault) => {
                    tracing::debug!(constructor = %ctor, depth, %fault, "chained injection failed");
                }
            }
        }
        None
    }
}
