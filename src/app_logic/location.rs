/*
 * The URL fragment seam. A browser host backs this with `location.hash` and
 * `history.replaceState`; the headless driver and tests use
 * `InMemoryLocation`. Writes always replace the current entry and never push
 * a new one, so sharing state does not pollute back/forward navigation.
 */
use std::sync::{Mutex, MutexGuard};

pub trait LocationOperations: Send + Sync {
    fn read_fragment(&self) -> String;
    fn replace_fragment(&self, fragment: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryLocation {
    fragment: Mutex<String>,
    #[cfg(test)]
    replace_count: Mutex<usize>,
}

impl InMemoryLocation {
    pub fn new(initial_fragment: &str) -> Self {
        InMemoryLocation {
            fragment: Mutex::new(initial_fragment.to_string()),
            #[cfg(test)]
            replace_count: Mutex::new(0),
        }
    }

    pub fn current(&self) -> String {
        lock(&self.fragment).clone()
    }

    #[cfg(test)]
    pub fn replace_count(&self) -> usize {
        *lock(&self.replace_count)
    }
}

impl LocationOperations for InMemoryLocation {
    fn read_fragment(&self) -> String {
        self.current()
    }

    fn replace_fragment(&self, fragment: &str) {
        *lock(&self.fragment) = fragment.to_string();
        #[cfg(test)]
        {
            *lock(&self.replace_count) += 1;
        }
        log::trace!("InMemoryLocation: Replaced fragment ({} chars).", fragment.len());
    }
}

// A poisoned lock still holds a usable string.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
