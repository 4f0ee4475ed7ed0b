use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use sdl2::{
    event::Event,
    keyboard::Keycode,
    pixels::PixelFormatEnum,
    render::{Canvas, Texture},
    video::Window,
};

use chip8_vm::display::Display;
use chip8_vm::interpreter::Interpreter;

/// Pixels per Chip-8 pixel in the window.
const SCALE: u32 = 10;

/// The frame cadence the timers are specified against.
const FRAME_DURATION: Duration = Duration::from_micros(16_600);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path of the rom to load
    #[arg(value_name = "FILE")]
    rom_path: PathBuf,

    /// Instructions executed per 60 Hz frame
    #[arg(long, default_value_t = 10)]
    cycles_per_frame: u32,

    /// Fixed RNG seed, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

/// Maps the left-hand block of a QWERTY keyboard onto the hexadecimal keypad:
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// Q W E R   ->   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
/// ```
fn map_key(keycode: Keycode) -> Option<u8> {
    match keycode {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

fn render(canvas: &mut Canvas<Window>, texture: &mut Texture, display: &Display) -> Result<()> {
    let rgb: Vec<u8> = display
        .pixels()
        .iter()
        .flat_map(|&on| {
            let channel = if on { 0xFF } else { 0x00 };
            [channel; 3]
        })
        .collect();

    texture.update(None, &rgb, display.width() * 3)?;

    canvas.clear();
    canvas.copy(texture, None, None).map_err(anyhow::Error::msg)?;
    canvas.present();

    Ok(())
}

fn run_rom(cli: &Cli, bytes: &[u8]) -> Result<()> {
    let mut interpreter = match cli.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new(),
    };
    interpreter.load_rom(bytes)?;

    let width = interpreter.display().width() as u32;
    let height = interpreter.display().height() as u32;

    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let video = sdl.video().map_err(anyhow::Error::msg)?;

    let window = video
        .window("Chip-8 - ESC to exit", width * SCALE, height * SCALE)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().present_vsync().build()?;
    let texture_creator = canvas.texture_creator();
    let mut texture =
        texture_creator.create_texture_streaming(PixelFormatEnum::RGB24, width, height)?;

    let mut event_pump = sdl.event_pump().map_err(anyhow::Error::msg)?;
    let mut sound_was_active = false;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = map_key(keycode) {
                        interpreter.key_press(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = map_key(keycode) {
                        interpreter.key_release(key);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..cli.cycles_per_frame {
            interpreter.execute_cycle()?;
        }
        interpreter.tick_timers();

        if interpreter.sound_active() != sound_was_active {
            sound_was_active = !sound_was_active;
            debug!("sound {}", if sound_was_active { "on" } else { "off" });
        }

        render(&mut canvas, &mut texture, interpreter.display())?;

        std::thread::sleep(FRAME_DURATION);
    }

    Ok(())
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.rom_path)
        .with_context(|| format!("failed to read ROM {}", cli.rom_path.display()))?;

    run_rom(&cli, &bytes)
}
