use std::error::Error;
use std::path::Path;

use chip8vm::{Config, Emulator, CYCLES_PER_FRAME, HEIGHT, WIDTH};
use slog::{info, o};

const DEFAULT_FRAMES: usize = 600;

/// Headless runner: `chip8vm <ROM> [FRAMES]`. Runs the program for FRAMES frames (no key is
/// ever pressed) and prints the final screen.
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let rom = args
        .next()
        .ok_or("usage: chip8vm <ROM> [FRAMES]")?;
    let frames = match args.next() {
        Some(frames) => frames.parse()?,
        None => DEFAULT_FRAMES,
    };

    let config = Config::default();
    let logger = config.build_logger()?;
    let program = std::fs::read(Path::new(&rom))?;

    let mut emulator = Emulator::with_program(&program, &config, Some(logger.new(o!("rom" => rom))))?;
    for _ in 0..frames {
        emulator.run_frame(CYCLES_PER_FRAME)?;
    }
    info!(logger, "finished"; "frames" => frames, "pc" => format!("{:#05X}", emulator.snapshot().pc));

    let pixels = emulator.pixels();
    for row in pixels.chunks(WIDTH).take(HEIGHT) {
        let line: String = row.iter().map(|p| if *p == 1 { '#' } else { '.' }).collect();
        println!("{}", line);
    }

    Ok(())
}
