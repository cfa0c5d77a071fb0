//! Heap management for the host runtime.
//!
//! Tracks native allocations against an optional byte limit and owns the
//! registrations of native-class objects so their finalize hooks run when
//! the objects become unreachable. Collection happens whenever the embedder
//! calls [`Heap::collect`]; hooks must not rely on promptness or ordering.

use crate::host::error::JErrorType;
use crate::host::object::{JsObject, JsObjectType};
use std::rc::Rc;

/// Configuration for the heap manager.
#[derive(Debug, Clone)]
pub struct HeapConfig {
    /// Maximum heap size in bytes. None means unlimited.
    pub max_bytes: Option<usize>,
}

impl HeapConfig {
    /// Create a new heap configuration with no memory limit.
    pub fn unlimited() -> Self {
        HeapConfig { max_bytes: None }
    }

    /// Create a new heap configuration with a memory limit.
    pub fn with_limit(max_bytes: usize) -> Self {
        HeapConfig {
            max_bytes: Some(max_bytes),
        }
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// A registered native-class object together with the byte charge its
/// native state holds against the heap budget.
struct HeapCell {
    obj: JsObjectType,
    bytes: usize,
}

/// Heap manager: allocation accounting plus the sweep that drives finalize
/// hooks.
pub struct Heap {
    config: HeapConfig,
    allocated_bytes: usize,
    cells: Vec<HeapCell>,
}

impl Heap {
    /// Create a new heap with the given configuration.
    pub fn new(config: HeapConfig) -> Self {
        Heap {
            config,
            allocated_bytes: 0,
            cells: Vec::new(),
        }
    }

    /// Allocate memory on the heap.
    ///
    /// Returns an error if the allocation would exceed the memory limit.
    pub fn allocate(&mut self, bytes: usize) -> Result<(), JErrorType> {
        if let Some(max_bytes) = self.config.max_bytes {
            if self.allocated_bytes + bytes > max_bytes {
                return Err(JErrorType::RangeError("Out of memory".to_string()));
            }
        }
        self.allocated_bytes += bytes;
        Ok(())
    }

    /// Deallocate memory from the heap.
    pub fn deallocate(&mut self, bytes: usize) {
        self.allocated_bytes = self.allocated_bytes.saturating_sub(bytes);
    }

    /// Get the current allocated bytes.
    pub fn get_allocated(&self) -> usize {
        self.allocated_bytes
    }

    /// Get the maximum allowed bytes, if any.
    pub fn get_max_bytes(&self) -> Option<usize> {
        self.config.max_bytes
    }

    /// Check if allocation of the given size would succeed.
    pub fn can_allocate(&self, bytes: usize) -> bool {
        if let Some(max_bytes) = self.config.max_bytes {
            self.allocated_bytes + bytes <= max_bytes
        } else {
            true
        }
    }

    /// Get the remaining available bytes, if limited.
    pub fn available_bytes(&self) -> Option<usize> {
        self.config
            .max_bytes
            .map(|max| max.saturating_sub(self.allocated_bytes))
    }

    /// Put a constructed native-class object under collector management.
    /// `bytes` must already have been charged via [`Heap::allocate`]; the
    /// sweep releases it when the object is reclaimed.
    pub fn register(&mut self, obj: JsObjectType, bytes: usize) {
        self.cells.push(HeapCell { obj, bytes });
    }

    /// Number of registered objects that have not been reclaimed yet.
    pub fn live_objects(&self) -> usize {
        self.cells.len()
    }

    /// Sweep: every registered object with no remaining outside references
    /// is handed to its class finalize hook, its byte charge is released,
    /// and its registration dropped. Returns how many objects were
    /// reclaimed.
    pub fn collect(&mut self) -> usize {
        let cells = std::mem::replace(&mut self.cells, Vec::new());
        let mut kept = Vec::with_capacity(cells.len());
        let mut reclaimed_bytes = 0;
        let mut swept = 0;
        for cell in cells {
            // The registration itself holds one strong reference.
            if Rc::strong_count(&cell.obj) == 1 {
                finalize_cell(&cell.obj);
                reclaimed_bytes += cell.bytes;
                swept += 1;
            } else {
                kept.push(cell);
            }
        }
        self.cells = kept;
        self.deallocate(reclaimed_bytes);
        swept
    }
}

fn finalize_cell(obj: &JsObjectType) {
    let ops = (**obj).borrow().as_js_object().class_ops();
    if let Some(ops) = ops {
        ops.finalize(obj);
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        // Context teardown: everything still registered is finalized,
        // reachable or not. Registrations already swept by collect() are
        // gone, so no object sees its hook twice from here.
        let cells = std::mem::replace(&mut self.cells, Vec::new());
        for cell in cells {
            finalize_cell(&cell.obj);
        }
    }
}
