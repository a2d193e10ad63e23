//! # Voxel Streamer Entry Point
//!
//! Calls into the library's `run()` to drive a headless session.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_CONFIG=assets/world.json cargo run --release
//! ```

fn main() {
    voxel_streamer::run();
}
