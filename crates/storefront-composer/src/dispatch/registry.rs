use std::collections::HashMap;
use std::sync::Arc;

use storefront_core::error::{Result, StorefrontError};

use super::contract::BlockRenderer;

/// Collects renderers at startup. Duplicate ids are a configuration error.
#[derive(Default)]
pub struct RegistryBuilder {
    renderers: HashMap<String, Arc<dyn BlockRenderer>>,
    order: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the renderer's own `block_type()`.
    pub fn register(&mut self, renderer: Arc<dyn BlockRenderer>) -> Result<&mut Self> {
        let block_type = renderer.block_type();
        self.register_as(block_type, renderer)
    }

    /// Register under an explicit id (aliases share one renderer).
    pub fn register_as(
        &mut self,
        block_type: &str,
        renderer: Arc<dyn BlockRenderer>,
    ) -> Result<&mut Self> {
        let block_type = block_type.trim();
        if block_type.is_empty() {
            return Err(StorefrontError::BadRequest(
                "block type id must not be empty".into(),
            ));
        }
        if self.renderers.contains_key(block_type) {
            return Err(StorefrontError::DuplicateBlockType(block_type.to_string()));
        }
        self.renderers.insert(block_type.to_string(), renderer);
        self.order.push(block_type.to_string());
        Ok(self)
    }

    /// Freeze into an immutable lookup table.
    pub fn build(self) -> BlockRegistry {
        BlockRegistry {
            renderers: self.renderers,
            order: self.order,
        }
    }
}

/// Immutable block-type -> renderer table, shared read-only across renders.
pub struct BlockRegistry {
    renderers: HashMap<String, Arc<dyn BlockRenderer>>,
    order: Vec<String>,
}

impl BlockRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// `None` is a normal outcome: unknown or retired types render nothing.
    pub fn resolve(&self, block_type: &str) -> Option<Arc<dyn BlockRenderer>> {
        self.renderers.get(block_type).cloned()
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.renderers.contains_key(block_type)
    }

    /// Registered ids in registration order.
    pub fn list_types(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
