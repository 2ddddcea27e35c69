//! A place for at most one object.

/// Storage for at most one `T`, constructed and destroyed explicitly.
///
/// A slot starts out empty. [`construct`](Self::construct) places a value into it and
/// [`destroy`](Self::destroy) drops the value, leaving the slot empty again. Dropping the slot drops
/// its contents.
///
/// [`Slot::new`] is `const`, so a slot can live in `static` storage behind a lock:
///
/// ```rust
/// use etools::Slot;
/// use std::sync::Mutex;
///
/// static LOGGER: Mutex<Slot<String>> = Mutex::new(Slot::new());
///
/// let mut logger = LOGGER.lock().unwrap();
/// logger.construct(String::from("uart0"));
/// assert_eq!(logger.get().map(String::as_str), Some("uart0"));
/// logger.destroy();
/// assert!(!logger.is_constructed());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot<T> {
    /// The object, if constructed.
    value: Option<T>,
}

impl<T> Slot<T> {
    /// Create an empty slot.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Place a value into an empty slot.
    ///
    /// Constructing into an occupied slot is a logic error. It panics in debug builds; in release
    /// builds the old value is dropped.
    #[inline]
    pub fn construct(&mut self, value: T) -> &mut T {
        debug_assert!(self.value.is_none(), "slot is already constructed");
        self.value.insert(value)
    }

    /// Like [`construct`](Self::construct), but with a constructor.
    #[inline]
    pub fn construct_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.construct(f())
    }

    /// Place a value into the slot, dropping the previous one, if any.
    #[inline]
    pub fn emplace(&mut self, value: T) -> &mut T {
        self.destroy();
        self.value.insert(value)
    }

    /// Like [`emplace`](Self::emplace), but with a constructor.
    ///
    /// The previous value is dropped before `f` runs.
    #[inline]
    pub fn emplace_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.destroy();
        self.value.insert(f())
    }

    /// The value, constructing it with `f` if the slot is empty.
    ///
    /// Unlike [`construct_with`](Self::construct_with), an existing value is kept and `f` is not
    /// called.
    #[inline]
    pub fn get_or_construct_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.value.get_or_insert_with(f)
    }

    /// Drop the value, if any.
    #[inline]
    pub fn destroy(&mut self) {
        self.value = None;
    }

    /// Move the value out, leaving the slot empty.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Whether the slot holds a value.
    #[inline]
    #[must_use]
    pub const fn is_constructed(&self) -> bool {
        self.value.is_some()
    }

    /// The value, if constructed.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Mutable access to the value, if constructed.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }
}

impl<T> Default for Slot<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts its drops.
    struct Tracked {
        value: u32,
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn tracked(value: u32, drops: &Rc<Cell<usize>>) -> Tracked {
        Tracked {
            value,
            drops: Rc::clone(drops),
        }
    }

    #[test]
    fn lifecycle() {
        let drops = Rc::new(Cell::new(0));
        let mut slot = Slot::new();
        assert!(!slot.is_constructed());
        assert!(slot.get().is_none());

        slot.construct(tracked(1, &drops));
        assert!(slot.is_constructed());
        assert_eq!(slot.get().map(|t| t.value), Some(1));

        slot.destroy();
        assert_eq!(drops.get(), 1);
        assert!(!slot.is_constructed());

        // Destroying an empty slot does nothing.
        slot.destroy();
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn replace() {
        let drops = Rc::new(Cell::new(0));
        let mut slot = Slot::new();
        slot.construct(tracked(1, &drops));
        slot.emplace(tracked(2, &drops));
        assert_eq!(drops.get(), 1);
        assert_eq!(slot.get().map(|t| t.value), Some(2));

        slot.emplace_with(|| {
            // The old value is gone before the new one is made.
            assert_eq!(drops.get(), 2);
            tracked(3, &drops)
        });
        assert_eq!(slot.get().map(|t| t.value), Some(3));

        drop(slot);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn get_or_construct() {
        let drops = Rc::new(Cell::new(0));
        let mut slot = Slot::new();
        assert_eq!(slot.get_or_construct_with(|| tracked(1, &drops)).value, 1);
        let value = slot.get_or_construct_with(|| unreachable!("slot is occupied")).value;
        assert_eq!(value, 1);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn take_and_mutate() {
        let mut slot = Slot::new();
        slot.construct_with(|| 5_u32);
        if let Some(value) = slot.get_mut() {
            *value += 1;
        }
        assert_eq!(slot.take(), Some(6));
        assert_eq!(slot.take(), None);
        assert_eq!(slot, Slot::default());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic = "slot is already constructed"]
    fn double_construct() {
        let mut slot = Slot::new();
        slot.construct(1_u8);
        slot.construct(2_u8);
    }

    #[test]
    fn in_static() {
        static SLOT: std::sync::Mutex<Slot<u64>> = std::sync::Mutex::new(Slot::new());
        let mut slot = SLOT.lock().unwrap();
        slot.emplace(7);
        assert_eq!(slot.get(), Some(&7));
        slot.destroy();
    }
}
