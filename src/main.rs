use clap::Parser;
use error_iter::ErrorIter as _;
use pixels::{Error, Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::KeyCode;
use winit::window::{WindowBuilder, WindowButtons};
use winit_input_helper::WinitInputHelper;

mod chip8;
mod keymap;
mod opcode;

use chip8::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use keymap::KEYPAD;

const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 320;

const PIXEL_ON: [u8; 4] = [0x27, 0xbf, 0x68, 0xff];
const PIXEL_OFF: [u8; 4] = [0x21, 0x21, 0x25, 0xff];

#[derive(Parser)]
#[command(name = "chipkid")]
#[command(about = "A CHIP-8 interpreter")]
struct Args {
    #[arg(long, help = "ROM file to load")]
    rom: Option<String>,

    #[arg(long, default_value_t = 9, help = "Instruction steps per 60 Hz frame")]
    cycles: u32,

    #[arg(long, help = "Show instruction debug info")]
    debug: bool,
}

// draws the 16 font glyphs in two rows, then waits for a key and starts over
#[rustfmt::skip]
const FALLBACK_ROM: [u8; 32] = [
    0x00, 0xE0,    // 0x200: cls
    0x60, 0x00,    // 0x202: ld v0, 0       - glyph
    0x61, 0x00,    // 0x204: ld v1, 0       - x
    0x62, 0x00,    // 0x206: ld v2, 0       - y
    0xF0, 0x29,    // 0x208: ld f, v0       - (LOOP) i = glyph address
    0xD1, 0x25,    // 0x20A: drw v1, v2, 5
    0x71, 0x05,    // 0x20C: add v1, 5      - next column
    0x70, 0x01,    // 0x20E: add v0, 1      - next glyph
    0x30, 0x08,    // 0x210: se v0, 8       - first row full?
    0x12, 0x18,    // 0x212: jp 0x218
    0x61, 0x00,    // 0x214: ld v1, 0       - carriage return
    0x62, 0x0A,    // 0x216: ld v2, 10
    0x30, 0x10,    // 0x218: se v0, 0x10    - all 16 drawn?
    0x12, 0x08,    // 0x21A: jp 0x208
    0xF0, 0x0A,    // 0x21C: ld v0, k       - wait for a key
    0x12, 0x00,    // 0x21E: jp 0x200
];

fn main() -> Result<(), Error> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Off)
        .filter_module("chipkid", log::LevelFilter::Debug)
        .init();

    let args = Args::parse();

    let event_loop = EventLoop::new().unwrap();
    let mut input = WinitInputHelper::new();
    let window = {
        let size = LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64);
        WindowBuilder::new()
            .with_title("ChipKid")
            .with_inner_size(size)
            .with_min_inner_size(size)
            .with_max_inner_size(size)
            .with_resizable(false)
            .with_enabled_buttons(WindowButtons::CLOSE | WindowButtons::MINIMIZE)
            .build(&event_loop)
            .unwrap()
    };

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32, surface_texture)?
    };

    let rom = match args.rom.as_deref() {
        Some(path) => std::fs::read(path).unwrap_or_else(|err| {
            log::warn!("failed to read {path}: {err}, falling back to built-in rom");
            FALLBACK_ROM.to_vec()
        }),
        None => FALLBACK_ROM.to_vec(),
    };

    let mut machine = Chip8::new();
    machine.debug = args.debug;
    machine
        .load_rom(&rom)
        .map_err(|e| Error::UserDefined(Box::new(e)))?;

    let mut paused = false;
    let mut crashed = false;

    let res = event_loop.run(|event, elwt| {
        if let Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            ..
        } = event
        {
            if !paused && !crashed {
                for _ in 0..args.cycles {
                    if let Err(err) = machine.step() {
                        log_error("step", err);
                        crashed = true;
                        break;
                    }
                }
                if machine.tick_timers() {
                    log::info!("beep");
                }
            }

            draw_screen(&machine, pixels.frame_mut());
            if let Err(err) = pixels.render() {
                log_error("pixels.render", err);
                elwt.exit();
                return;
            }
        }

        if input.update(&event) {
            if input.key_pressed(KeyCode::Escape) || input.close_requested() {
                elwt.exit();
                return;
            }

            if input.key_pressed(KeyCode::Space) {
                paused = !paused;
            }

            if input.key_pressed(KeyCode::Tab) && paused && !crashed {
                if let Err(err) = machine.step() {
                    log_error("step", err);
                    crashed = true;
                }
            }

            for (code, key) in KEYPAD {
                machine.set_key(key, input.key_held(code));
            }

            window.request_redraw();
        }
    });
    res.map_err(|e| Error::UserDefined(Box::new(e)))
}

fn draw_screen(machine: &Chip8, frame: &mut [u8]) {
    for (pixel, &cell) in frame.chunks_exact_mut(4).zip(machine.framebuffer()) {
        let rgba = if cell == 1 { PIXEL_ON } else { PIXEL_OFF };
        pixel.copy_from_slice(&rgba);
    }
}

fn log_error<E: std::error::Error + 'static>(method_name: &str, err: E) {
    log::error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        log::error!("  Caused by: {source}");
    }
}
