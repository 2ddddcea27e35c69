use etools::codegen::{CodeGenerator, Codegen};
use etools::{Fks, Llut, Mph, Width, DEFAULT_ALPHA};
use rapidhash::RapidRng;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// The generated tables are loaded on the target, not on the host running this script.
fn target_width() -> Width {
    match std::env::var("CARGO_CFG_TARGET_POINTER_WIDTH").as_deref() {
        Ok("16") => Width::W16,
        Ok("32") => Width::W32,
        _ => Width::W64,
    }
}

fn save<T: Codegen>(out_dir: &Path, name: &str, value: &T, heap: bool) {
    let mut gen = CodeGenerator::new();
    gen.set_heap(heap);
    write(out_dir, name, &gen.generate(value));
}

fn write(out_dir: &Path, name: &str, code: &impl Display) {
    std::fs::write(out_dir.join(name), code.to_string()).expect("Failed to write generated code");
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let width = target_width();

    // Distinct pseudo-random keys in a fixed order.
    let mut rng = RapidRng::new(0x243f_6a88_85a3_08d3);
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    while keys.len() < 5000 {
        let key = u32::try_from(rng.next() >> 32).unwrap();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    write(&out_dir, "keys.rs", &CodeGenerator::new().static_slice(&keys));

    let fks = Fks::try_from_keys_for_width(&keys, width).expect("Failed to build FKS table");
    save(&out_dir, "fks.rs", &fks, false);
    save(&out_dir, "fks_heap.rs", &fks, true);

    let mph = Mph::try_from_keys_for_width(&keys, DEFAULT_ALPHA, width)
        .expect("Failed to build MPH table");
    save(&out_dir, "mph.rs", &mph, false);

    // Every third byte value.
    let bytes: Vec<u8> = (0..=u8::MAX).step_by(3).collect();
    let llut = Llut::try_from_keys(&bytes).expect("Failed to build LLUT table");
    save(&out_dir, "llut.rs", &llut, false);
}
