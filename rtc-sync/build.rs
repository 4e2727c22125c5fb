//! Puts `memory.x` where the linker can find it and adds the link scripts.
//! Re-runs only when `memory.x` changes.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();
    let has_rp2040 = env::var("CARGO_FEATURE_RP2040").is_ok();

    if !(target == "thumbv6m-none-eabi" && has_rp2040) {
        let error_msg = format!(
            "\n\x1b[1;31merror\x1b[0m: No chip or target selected!\n\n\
            Please use one of the aliases:\n\
            - For Pico (RP2040):   \x1b[1;32mcargo run-pico\x1b[0m   OR  \x1b[1;32mcargo build-pico\x1b[0m\n\
            \n\x1b[1;34mNote\x1b[0m: The current target is '{}' and rp2040={}\n",
            target, has_rp2040
        );
        panic!("{}", error_msg);
    }

    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rustc-link-arg-bins=--nmagic");
}
