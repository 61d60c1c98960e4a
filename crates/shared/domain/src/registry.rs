//! Type-erased container for initialized feature state held by the server.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Feature state that can be shared across request handlers.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Human readable name for startup logs.
    fn slice_name(&self) -> &'static str {
        std::any::type_name::<Self>().rsplit("::").next().unwrap_or("slice")
    }
}

#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        let name = state.slice_name();
        Self { id: TypeId::of::<T>(), name, state: Box::new(state) }
    }

    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
