// File: crates/storyline-core/build.rs
// Summary: Links the Windows system libraries Skia's font manager needs when painting frames.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // skia-safe's font manager calls RegOpenKeyExW / RegQueryInfoKeyW.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
