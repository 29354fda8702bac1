//! Library that fails on demand
//!
//! Wraps a `MemoryLibrary` and turns every call into a `CoreError::Library`
//! while switched off, for exercising error paths in queues and menus.

use crate::error::{CoreError, Result};
use crate::memory::MemoryLibrary;
use crate::traits::Library;
use crate::types::{Filter, FilterField, OrderBy, SongField, SongId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// `MemoryLibrary` with an off switch
///
/// Clones share the switch, so keep one clone and hand the other out.
#[derive(Debug, Clone)]
pub struct FlakyLibrary {
    inner: Arc<MemoryLibrary>,
    failing: Arc<AtomicBool>,
}

impl FlakyLibrary {
    pub fn new(inner: MemoryLibrary) -> Self {
        Self {
            inner: Arc::new(inner),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every following call fail (or succeed again)
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CoreError::library("library unavailable"))
        } else {
            Ok(())
        }
    }
}

impl Library for FlakyLibrary {
    fn get_list(
        &self,
        filter: &Filter,
        order_by: OrderBy,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<SongId>> {
        self.check()?;
        self.inner.get_list(filter, order_by, limit, offset)
    }

    fn get_count(&self, filter: &Filter) -> Result<usize> {
        self.check()?;
        self.inner.get_count(filter)
    }

    fn get_by_id(&self, ids: &[SongId], field: SongField) -> Result<HashMap<SongId, String>> {
        self.check()?;
        self.inner.get_by_id(ids, field)
    }

    fn get_values(&self, field: FilterField, filter: &Filter) -> Result<Vec<String>> {
        self.check()?;
        self.inner.get_values(field, filter)
    }
}
