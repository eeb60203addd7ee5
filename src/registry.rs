//! Type loading.
//!
//! The locator turns discovered source paths into fully-qualified type names;
//! a [`TypeLoader`] turns those names into [`Invokable`] handles. The stock
//! loader is [`TypeRegistry`], an ordered in-process table that the embedding
//! test populates before running a pass.

use anyhow::{anyhow, Result};
use coverage_types::Invokable;
use std::collections::BTreeMap;
use std::sync::Arc;

pub trait TypeLoader: Send + Sync {
    /// Look up a type by fully-qualified name.
    fn find_type(&self, name: &str) -> Option<Arc<dyn Invokable>>;

    /// Like [`find_type`](Self::find_type), but an unknown name is an error.
    fn load_type(&self, name: &str) -> Result<Arc<dyn Invokable>> {
        self.find_type(name)
            .ok_or_else(|| anyhow!("could not load type {}", name))
    }
}

#[derive(Default, Clone)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<dyn Invokable>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its own name, replacing any earlier entry.
    pub fn register(&mut self, ty: impl Invokable + 'static) -> &mut Self {
        let ty: Arc<dyn Invokable> = Arc::new(ty);
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, ty: impl Invokable + 'static) -> Self {
        self.register(ty);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Invokable>> {
        self.types.get(name)
    }

    /// Registered types in name order.
    pub fn iter_types(&self) -> impl Iterator<Item = &Arc<dyn Invokable>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeLoader for TypeRegistry {
    fn find_type(&self, name: &str) -> Option<Arc<dyn Invokable>> {
        self.types.get(name).cloned()
    }
}

impl<L: TypeLoader + ?Sized> TypeLoader for Arc<L> {
    fn find_type(&self, name: &str) -> Option<Arc<dyn Invokable>> {
        (**self).find_type(name)
    }
}
