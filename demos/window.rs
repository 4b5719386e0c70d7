use chip8vm::{AsKeyboard, Config, Emulator, Key, CYCLES_PER_FRAME, HEIGHT, WIDTH};
use minifb::{Scale, ScaleMode, Window, WindowOptions};
use std::error::Error;
use std::time::Duration;

const ON: u32 = 0x00FF_FFFF;
const OFF: u32 = 0x0000_0000;

struct Keyboard<'a>(&'a Window);

impl AsKeyboard for Keyboard<'_> {
    fn keys_down(&self) -> Vec<Key> {
        self.0
            .get_keys()
            .unwrap_or_default()
            .iter()
            .filter_map(|key: &minifb::Key| match key {
                minifb::Key::Key1 => Some(Key::Key1),
                minifb::Key::Key2 => Some(Key::Key2),
                minifb::Key::Key3 => Some(Key::Key3),
                minifb::Key::Key4 => Some(Key::C),
                minifb::Key::Q => Some(Key::Key4),
                minifb::Key::W => Some(Key::Key5),
                minifb::Key::E => Some(Key::Key6),
                minifb::Key::R => Some(Key::D),
                minifb::Key::A => Some(Key::Key7),
                minifb::Key::S => Some(Key::Key8),
                minifb::Key::D => Some(Key::Key9),
                minifb::Key::F => Some(Key::E),
                minifb::Key::Z => Some(Key::A),
                minifb::Key::X => Some(Key::Key0),
                minifb::Key::C => Some(Key::B),
                minifb::Key::V => Some(Key::F),
                _ => None,
            })
            .collect()
    }
}

/// `cargo run --example window -- <ROM>`
fn main() -> Result<(), Box<dyn Error>> {
    let rom = std::env::args()
        .nth(1)
        .ok_or("usage: window <ROM>")?;

    let mut window: Window = Window::new(
        "Chip 8 Emulator (In Rust!)",
        WIDTH,
        HEIGHT,
        WindowOptions {
            resize: true,
            scale: Scale::X8,
            scale_mode: ScaleMode::UpperLeft,
            ..WindowOptions::default()
        },
    )
    .expect("Unable to create window");

    // Limit to max update rate. Timers tick once per frame, so this is about 60 Hz
    window.limit_update_rate(Some(Duration::from_millis(16)));

    let config = Config::default();
    let logger = config.build_logger()?;
    let program = std::fs::read(&rom)?;
    let mut emulator = Emulator::with_program(&program, &config, Some(logger))?;

    let mut buffer = vec![OFF; WIDTH * HEIGHT];
    while window.is_open() {
        emulator.handle_key_input(&Keyboard(&window));

        if emulator.run_frame(CYCLES_PER_FRAME)? {
            for (dst, pixel) in buffer.iter_mut().zip(emulator.pixels()) {
                *dst = if *pixel == 1 { ON } else { OFF };
            }
        }

        // always update so the window keeps polling input
        window.update_with_buffer(&buffer, WIDTH, HEIGHT).unwrap();
    }

    Ok(())
}
