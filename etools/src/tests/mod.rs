use crate::{Backend, Mph, Registry, Variants};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

/// Shared drop counter.
type Drops = Rc<Cell<usize>>;

#[derive(Debug)]
enum Device {
    Gpio { pin: u8, drops: Drops },
    Uart { baud: u32, drops: Drops },
    Timer { drops: Drops },
}

#[derive(Clone)]
struct Config {
    value: u32,
    drops: Drops,
}

impl Variants for Device {
    type Key = u32;
    type Args = Config;

    fn index() -> &'static Mph<u32> {
        crate::mph!(u32; 0x4002_0000, 0x4001_1000, 0xe000_e010)
    }

    fn key(&self) -> u32 {
        match self {
            Self::Gpio { .. } => 0x4002_0000,
            Self::Uart { .. } => 0x4001_1000,
            Self::Timer { .. } => 0xe000_e010,
        }
    }

    fn construct(key: u32, Config { value, drops }: Config) -> Self {
        match key {
            0x4002_0000 => Self::Gpio {
                pin: u8::try_from(value).unwrap(),
                drops,
            },
            0x4001_1000 => Self::Uart { baud: value, drops },
            _ => Self::Timer { drops },
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        let (Self::Gpio { drops, .. } | Self::Uart { drops, .. } | Self::Timer { drops }) = self;
        drops.set(drops.get() + 1);
    }
}

const GPIO: u32 = 0x4002_0000;
const UART: u32 = 0x4001_1000;
const TIMER: u32 = 0xe000_e010;

/// Keys in the order their objects were dropped.
type Log = Rc<RefCell<Vec<u8>>>;

/// An object that records its own drop.
struct Layer {
    key: u8,
    log: Log,
}

impl Variants for Layer {
    type Key = u8;
    type Args = Log;

    fn index() -> &'static Mph<u8> {
        crate::mph!(u8; 1, 2, 3)
    }

    fn key(&self) -> u8 {
        self.key
    }

    fn construct(key: u8, log: Log) -> Self {
        Self { key, log }
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.key);
    }
}

fn config(value: u32, drops: &Drops) -> Config {
    Config {
        value,
        drops: Rc::clone(drops),
    }
}

#[test]
fn router() {
    let index = Device::index();
    assert_eq!(index.len(), 3);
    assert_eq!(index.backend(), Backend::Fks);
    assert_eq!(index.lookup(GPIO), 0);
    assert_eq!(index.lookup(UART), 1);
    assert_eq!(index.lookup(TIMER), 2);
    assert_eq!(index.lookup(0), 3);
}

#[test]
fn unknown_keys() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    assert!(registry.construct(0x1234, config(0, &drops)).is_none());
    assert!(registry.emplace(0x1234, config(0, &drops)).is_none());
    assert!(registry.get(0x1234).is_none());
    assert!(!registry.contains(0x1234));
    registry.destroy(0x1234);
    assert!(registry.is_empty());
    // The arguments were dropped without constructing anything.
    assert_eq!(drops.get(), 0);
}

#[test]
fn dense_order() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    registry.construct(TIMER, config(0, &drops));
    registry.construct(GPIO, config(13, &drops));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.capacity(), 3);

    // Slot order, not insertion order, and the empty UART slot is skipped.
    let keys: Vec<u32> = registry.iter().map(Variants::key).collect();
    assert_eq!(keys, [GPIO, TIMER]);

    for device in registry.iter_mut() {
        if let Device::Gpio { pin, .. } = device {
            *pin += 1;
        }
    }
    assert!(matches!(registry.get(GPIO), Some(Device::Gpio { pin: 14, .. })));
}

#[test]
fn replace_and_destroy() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    registry.construct(UART, config(9_600, &drops));
    registry.emplace(UART, config(115_200, &drops));
    assert_eq!(drops.get(), 1);
    assert!(matches!(
        registry.get(UART),
        Some(Device::Uart { baud: 115_200, .. })
    ));

    if let Some(Device::Uart { baud, .. }) = registry.get_mut(UART) {
        *baud = 57_600;
    }
    let taken = registry.take(UART);
    assert!(matches!(taken, Some(Device::Uart { baud: 57_600, .. })));
    drop(taken);
    assert_eq!(drops.get(), 2);
    assert!(!registry.contains(UART));

    registry.construct(TIMER, config(0, &drops));
    registry.destroy(TIMER);
    registry.destroy(TIMER);
    assert_eq!(drops.get(), 3);
}

#[test]
fn construct_keeps_existing() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    registry.construct(UART, config(9_600, &drops));
    let again = registry.construct(UART, config(115_200, &drops));
    assert!(matches!(again, Some(Device::Uart { baud: 9_600, .. })));
    assert_eq!(drops.get(), 0);
    assert_eq!(registry.len(), 1);

    // Replacing goes through `emplace`.
    registry.emplace(UART, config(115_200, &drops));
    assert!(matches!(
        registry.get(UART),
        Some(Device::Uart { baud: 115_200, .. })
    ));
    assert_eq!(drops.get(), 1);
}

#[test]
fn teardown_is_reversed() {
    let log = Log::default();
    let mut registry = Registry::<Layer, 3>::new();
    for key in [2, 1, 3] {
        registry.construct(key, Rc::clone(&log));
    }
    drop(registry);
    assert_eq!(*log.borrow(), [3, 2, 1]);

    log.borrow_mut().clear();
    let mut registry = Registry::<Layer, 3>::new();
    registry.construct(1, Rc::clone(&log));
    registry.construct(3, Rc::clone(&log));
    registry.clear();
    assert_eq!(*log.borrow(), [3, 1]);
    assert!(registry.is_empty());
    drop(registry);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn insert() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    let timer = Device::construct(TIMER, config(0, &drops));
    assert!(registry.insert(timer).is_ok());
    assert!(registry.contains(TIMER));
    assert_eq!(drops.get(), 0);
}

#[test]
fn drop_all() {
    let drops = Drops::default();
    let mut registry = Registry::<Device, 3>::new();
    registry.construct(GPIO, config(1, &drops));
    registry.construct(UART, config(2, &drops));
    registry.construct(TIMER, config(3, &drops));
    drop(registry);
    assert_eq!(drops.get(), 3);

    let mut registry = Registry::<Device, 3>::default();
    registry.construct(GPIO, config(1, &drops));
    registry.clear();
    assert_eq!(drops.get(), 4);
    assert!(registry.is_empty());
}

#[test]
#[should_panic = "registry capacity must match the number of keys"]
fn wrong_capacity() {
    let _ = Registry::<Device, 4>::new();
}
