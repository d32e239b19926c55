//! Symbol lookup caches
//!
//! [`SymbolCache`] is the per-task state owned by the caller and borrowed by
//! every resolution. Its only content is the object-runtime [`MethodCache`].

use crashsym_common::{Address, SymbolError};

/// Number of direct-mapped slots in a [`MethodCache`].
pub const METHOD_CACHE_SLOTS: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    image_id: u64,
    pc: Address,
    index: usize,
    valid: bool,
}

/// Direct-mapped cache of method table matches, keyed by image and pc.
///
/// Storage is allocated once by [`init`](Self::init). [`lookup`](Self::lookup)
/// and [`insert`](Self::insert) never allocate, so they are safe to use while
/// handling a crash. A freed cache misses on every lookup.
#[derive(Debug)]
pub struct MethodCache {
    slots: Vec<Slot>,
}

impl MethodCache {
    /// Allocate the cache's slots.
    ///
    /// # Errors
    /// Returns [`SymbolError::NoMemory`] if the slots cannot be allocated.
    pub fn init() -> Result<Self, SymbolError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(METHOD_CACHE_SLOTS).map_err(|_| SymbolError::NoMemory)?;
        slots.resize(METHOD_CACHE_SLOTS, Slot::default());
        Ok(Self { slots })
    }

    /// Release the cache's slots. Safe to call more than once.
    pub fn free(&mut self) {
        self.slots = Vec::new();
    }

    /// Method table index previously recorded for `pc` in `image_id`.
    #[must_use]
    pub fn lookup(&self, image_id: u64, pc: Address) -> Option<usize> {
        let slot = self.slots.get(self.slot_index(image_id, pc)?)?;
        (slot.valid && slot.image_id == image_id && slot.pc == pc).then_some(slot.index)
    }

    /// Record the method table index matched for `pc`, evicting whatever shared
    /// its slot.
    pub fn insert(&mut self, image_id: u64, pc: Address, index: usize) {
        let Some(slot_index) = self.slot_index(image_id, pc) else {
            return;
        };
        if let Some(slot) = self.slots.get_mut(slot_index) {
            *slot = Slot { image_id, pc, index, valid: true };
        }
    }

    fn slot_index(&self, image_id: u64, pc: Address) -> Option<usize> {
        let len = u64::try_from(self.slots.len()).ok().filter(|&len| len > 0)?;
        let key = pc ^ image_id.rotate_left(32);
        usize::try_from(key % len).ok()
    }
}

/// Per-task symbolication state.
///
/// Created once with [`init`](Self::init) and released with
/// [`free`](Self::free). Resolution borrows it for the duration of a single
/// lookup; it must not be used from two execution contexts at once.
#[derive(Debug)]
pub struct SymbolCache {
    methods: MethodCache,
}

impl SymbolCache {
    /// Initialize the nested method cache.
    ///
    /// # Errors
    /// Propagates whatever error the method cache reports.
    pub fn init() -> Result<Self, SymbolError> {
        Ok(Self { methods: MethodCache::init()? })
    }

    /// Release the nested method cache.
    pub fn free(mut self) {
        self.methods.free();
    }

    pub fn method_cache_mut(&mut self) -> &mut MethodCache {
        &mut self.methods
    }
}
