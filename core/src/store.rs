use alloc::string::{String, ToString};

/// Single-key string storage the board writes its state into.
///
/// Writes are fire-and-forget, a store that fails to persist should log
/// and carry on, the board keeps working from memory.
pub trait StateStore {
    fn load(&self) -> Option<String>;
    fn save(&mut self, value: &str);
    fn clear(&mut self);
}

/// In-memory store, used headless and in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    value: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            writes: 0,
        }
    }

    /// Number of saves since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn save(&mut self, value: &str) {
        self.value = Some(value.to_string());
        self.writes += 1;
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&mut self, value: &str) {
        (**self).save(value)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}
