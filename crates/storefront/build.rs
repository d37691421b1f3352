//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (stylesheet and the
//! checkout script) so they can be served with immutable cache headers.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// A static asset that gets a hashed copy under `derived/`.
struct Asset {
    /// Path relative to the crate root.
    source: &'static str,
    /// File stem of the derived copy (`main` -> `main.<hash>.css`).
    stem: &'static str,
    extension: &'static str,
    /// Compile-time environment variable carrying the hash.
    env_var: &'static str,
}

const ASSETS: &[Asset] = &[
    Asset {
        source: "static/css/main.css",
        stem: "main",
        extension: "css",
        env_var: "CSS_HASH",
    },
    Asset {
        source: "static/js/checkout.js",
        stem: "checkout",
        extension: "js",
        env_var: "CHECKOUT_JS_HASH",
    },
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");

    for asset in ASSETS {
        hash_asset(Path::new(&manifest_dir), asset);
    }
}

/// Hash an asset and copy it to the sibling `derived/` directory.
///
/// Sets the asset's environment variable for use with `env!`.
fn hash_asset(manifest_dir: &Path, asset: &Asset) {
    let source_path = manifest_dir.join(asset.source);

    println!("cargo:rerun-if-changed={}", source_path.display());

    let content = match fs::read(&source_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", asset.source);
            println!("cargo:rustc-env={}=", asset.env_var);
            return;
        }
    };

    // First 8 hex chars of SHA256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env={}={short_hash}", asset.env_var);

    let Some(parent) = source_path.parent() else {
        return;
    };
    let derived_dir = parent.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");

    let derived_path = derived_dir.join(format!("{}.{short_hash}.{}", asset.stem, asset.extension));
    fs::copy(&source_path, &derived_path).expect("Failed to copy asset to derived directory");
}
