//! # Voxel Chunk Demo Entry Point
//!
//! Calls into the library's `run()` function and maps its outcome to the exit code.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --frames 300
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_chunk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("voxel-chunk: {}", err);
            ExitCode::FAILURE
        }
    }
}
