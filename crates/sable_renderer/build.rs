// Build script for linking the external batched sphere intersection routine.
//
// Only active with the `ispc` feature. Build the library with e.g.
//   ispc --pic --target=sse4,avx2 spheres_hit.ispc -o spheres_hit.o
//   ar -rcs libspheres_hit.a spheres_hit*.o
// and point SPHERES_HIT_LIB_DIR at the directory holding it.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SPHERES_HIT_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_ISPC").is_none() {
        return;
    }

    if let Ok(lib_dir) = std::env::var("SPHERES_HIT_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", lib_dir);
    }
    println!("cargo:rustc-link-lib=static=spheres_hit");
}
