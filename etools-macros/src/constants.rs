use super::keys::KeyValue;

macro_rules! constants {
    ($path:expr, { $($name:path),* $(,)? }) => {
        match $path {
            $(stringify!($name) => KeyValue::Int(u64::from($name)),)*
            // Target-dependent, so it is resolved per pointer width.
            "usize::MAX" => KeyValue::PointerMax,
            "usize::MIN" => KeyValue::Int(0),
            _ => return None,
        }
    }
}

pub fn get_constant(path: &str) -> Option<KeyValue> {
    Some(constants!(path, {
        u8::MIN, u8::MAX,
        u16::MIN, u16::MAX,
        u32::MIN, u32::MAX,
        u64::MIN, u64::MAX,
    }))
}
