// ── Native entry‑point ──
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    techvision::preview::run()
}

// The web build starts from the library's `start` export.
#[cfg(target_arch = "wasm32")]
fn main() {}
