//! Compiled template cache
//!
//! Keyed on the literal template string. Entries are evicted oldest first
//! once the cache is full.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, PoisonError, RwLock},
};

use mailmerge_engine::CompiledTemplate;

#[derive(Default)]
struct Inner {
    templates: HashMap<String, Arc<CompiledTemplate>>,
    order: VecDeque<String>,
}

/// A bounded, thread-safe map from template source to compiled template
pub struct TemplateCache {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn get(&self, template: &str) -> Option<Arc<CompiledTemplate>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.templates.get(template).cloned()
    }

    /// Stores a compiled template, returning the shared copy kept by the cache
    pub fn insert(&self, template: &str, compiled: CompiledTemplate) -> Arc<CompiledTemplate> {
        let compiled = Arc::new(compiled);
        if self.capacity == 0 {
            return compiled;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = inner.templates.get(template) {
            return existing.clone();
        }
        while inner.templates.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else { break };
            inner.templates.remove(&oldest);
            log::debug!("evicted compiled template of {} bytes", oldest.len());
        }
        inner.templates.insert(template.to_string(), compiled.clone());
        inner.order.push_back(template.to_string());
        compiled
    }

    /// Returns the cached template, compiling and storing it on a miss
    pub fn get_or_compile<E>(
        &self,
        template: &str,
        compile: impl FnOnce(&str) -> Result<CompiledTemplate, E>,
    ) -> Result<Arc<CompiledTemplate>, E> {
        if let Some(compiled) = self.get(template) {
            log::debug!("template cache hit");
            return Ok(compiled);
        }
        let compiled = compile(template)?;
        Ok(self.insert(template, compiled))
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.templates.clear();
        inner.order.clear();
    }
}
