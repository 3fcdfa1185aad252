//! Constructing types
//!
//! A `Class` names the type an object was built from and knows how to build
//! another one. Instances point at their class the way JS instances point at
//! a prototype; the class's initializer plays the role of the constructor
//! body.

use crate::error::ValueResult;
use crate::object::{JsObject, ObjectData, ObjectRef};
use crate::value::Value;
use std::sync::Arc;

/// Constructor body: initializes a freshly allocated instance from arguments
pub type Initializer = Arc<dyn Fn(&ObjectRef, &[Value]) -> ValueResult<()> + Send + Sync>;

/// A named constructing type
pub struct Class {
    name: Arc<str>,
    initializer: Option<Initializer>,
}

impl Class {
    /// Create a class whose constructor takes no arguments and does nothing
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name),
            initializer: None,
        })
    }

    /// Create a class with a constructor body
    pub fn with_initializer(
        name: &str,
        initializer: impl Fn(&ObjectRef, &[Value]) -> ValueResult<()> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name),
            initializer: Some(Arc::new(initializer)),
        })
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `new Class(...args)`: allocate an ordinary instance and run the
    /// initializer on it.
    pub fn construct(self: &Arc<Self>, args: &[Value]) -> ValueResult<ObjectRef> {
        let instance = self.instantiate_uninitialized();
        if let Some(init) = &self.initializer {
            init(&instance, args)?;
        }
        Ok(instance)
    }

    /// Allocate an ordinary instance of this class without running the
    /// initializer.
    pub fn instantiate_uninitialized(self: &Arc<Self>) -> ObjectRef {
        ObjectRef::new(JsObject::new(Some(self.clone()), ObjectData::Ordinary))
    }
}

impl std::fmt::Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[class {}]", self.name)
    }
}
