//! Puts memory.x on the linker search path and adds the cortex-m-rt and
//! defmt link scripts when building for the MCU.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumb") {
        for script in ["link.x", "defmt.x"] {
            println!("cargo:rustc-link-arg-bins=-T{}", script);
            println!("cargo:rustc-link-arg-tests=-T{}", script);
        }
    }
}
