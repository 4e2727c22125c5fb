use core::cell::Cell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use portable_atomic::{AtomicU32, Ordering};

/// A generic thread-safe container for Blackboard-style data sharing.
///
/// Every write bumps a publication sequence number so readers can tell a
/// fresh snapshot from one they have already seen.
pub struct DataCell<T: Copy> {
    storage: Mutex<CriticalSectionRawMutex, Cell<T>>,
    sequence: AtomicU32,
}

impl<T: Copy> DataCell<T> {
    /// Create a new cell with an initial value.
    pub const fn new(init: T) -> Self {
        Self {
            storage: Mutex::new(Cell::new(init)),
            sequence: AtomicU32::new(0),
        }
    }

    /// Update the data in the cell (The "Write").
    pub fn update(&self, data: T) {
        self.storage.lock(|cell| {
            cell.set(data);
            self.sequence.fetch_add(1, Ordering::Relaxed);
        });
    }

    /// Read-modify-write under a single lock.
    pub fn modify<F: FnOnce(&mut T)>(&self, f: F) {
        self.storage.lock(|cell| {
            let mut value = cell.get();
            f(&mut value);
            cell.set(value);
            self.sequence.fetch_add(1, Ordering::Relaxed);
        });
    }

    /// Number of writes so far.
    pub fn sequence(&self) -> u32 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Fetch the latest data from the cell (The "Read").
    pub fn read(&self) -> T {
        self.storage.lock(|cell| cell.get())
    }

    /// Snapshot and the sequence number it was published under, read together.
    pub fn read_with_sequence(&self) -> (T, u32) {
        self.storage
            .lock(|cell| (cell.get(), self.sequence.load(Ordering::Relaxed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datacell_init() {
        let cell = DataCell::new(42);
        assert_eq!(cell.read(), 42);
        assert_eq!(cell.sequence(), 0);
    }

    #[test]
    fn test_datacell_update() {
        let cell = DataCell::new(0);
        cell.update(100);
        assert_eq!(cell.read_with_sequence(), (100, 1));
    }

    #[test]
    fn test_datacell_modify() {
        #[derive(Copy, Clone, Default, PartialEq, Debug)]
        struct MyData {
            a: i32,
            b: bool,
        }
        let cell = DataCell::new(MyData::default());
        cell.modify(|d| d.a += 5);
        cell.modify(|d| d.b = true);
        assert_eq!(cell.read(), MyData { a: 5, b: true });
        assert_eq!(cell.sequence(), 2);
    }
}
