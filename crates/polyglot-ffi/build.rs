use std::env;
use std::path::PathBuf;

// Regenerates include/polyglot.h from the exported items on every build.
fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR unset"));
    let header = crate_dir.join("include").join("polyglot.h");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
        .expect("cbindgen.toml is missing or malformed");
    if let Some(dir) = header.parent() {
        std::fs::create_dir_all(dir).expect("cannot create include/");
    }

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            bindings.write_to_file(&header);
        }
        Err(e) => panic!("cbindgen could not generate polyglot.h: {e}"),
    }

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");
}
