use std::collections::VecDeque;

use log::debug;
use sdl2::event::Event;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::{FullscreenType, Window};
use sdl2::EventPump;

use super::{RenderEvent, Renderer};
use crate::game::Game;
use crate::grid::SIZE;
use crate::input::{Command, KeyBindings};

const BACKGROUND: Color = Color::RGB(187, 173, 160);
const EMPTY_CELL: Color = Color::RGB(205, 193, 180);
const DARK_TEXT: Color = Color::RGB(119, 110, 101);
const LIGHT_TEXT: Color = Color::RGB(249, 246, 242);

/// 3x5 glyphs for the digits 0-9, one bit per pixel, row-major from the top left.
const DIGITS: [u16; 10] = [
    0b111_101_101_101_111,
    0b010_110_010_010_111,
    0b111_001_111_100_111,
    0b111_001_111_001_111,
    0b101_101_111_001_001,
    0b111_100_111_001_111,
    0b111_100_111_101_111,
    0b111_001_010_010_010,
    0b111_101_111_101_111,
    0b111_101_111_001_111,
];

fn tile_color(value: u32) -> Color {
    match value {
        0 => EMPTY_CELL,
        2 => Color::RGB(238, 228, 218),
        4 => Color::RGB(237, 224, 200),
        8 => Color::RGB(242, 177, 121),
        16 => Color::RGB(245, 149, 99),
        32 => Color::RGB(246, 124, 95),
        64 => Color::RGB(246, 94, 59),
        128 => Color::RGB(237, 207, 114),
        256 => Color::RGB(237, 204, 97),
        512 => Color::RGB(237, 200, 80),
        1024 => Color::RGB(237, 197, 63),
        2048 => Color::RGB(237, 194, 46),
        _ => Color::RGB(60, 58, 50),
    }
}

/// Resolves an SDL key name ("Up", "W", ...) through the bindings. Escape always quits.
fn key_command(bindings: &KeyBindings, key_name: &str) -> Option<Command> {
    if key_name.eq_ignore_ascii_case("escape") {
        return Some(Command::Quit);
    }

    bindings.lookup(&key_name.to_lowercase()).ok()
}

#[derive(Debug, Clone)]
pub struct SdlConfig {
    pub tile_size: u32,
    pub vsync: bool,
    pub fullscreen: bool,
    pub bindings: KeyBindings,
}

impl SdlConfig {
    fn gap(&self) -> u32 {
        (self.tile_size / 8).max(1)
    }

    fn window_size(&self) -> u32 {
        SIZE as u32 * self.tile_size + (SIZE as u32 + 1) * self.gap()
    }
}

/// SDL2 window that draws the board and captures keyboard input
pub struct SdlRenderer {
    canvas: Canvas<Window>,
    events: EventPump,
    config: SdlConfig,
    commands: VecDeque<Command>,
    should_quit: bool,
    dirty: bool,
}

impl SdlRenderer {
    pub fn new(config: SdlConfig) -> Result<Self, String> {
        let context = sdl2::init()?;
        let video = context.video()?;
        let size = config.window_size();

        let mut window = video
            .window("2048", size, size)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        if config.fullscreen {
            window.set_fullscreen(FullscreenType::True)?;
        }

        let mut builder = window.into_canvas();

        if config.vsync {
            builder = builder.present_vsync();
        }

        let canvas = builder.build().map_err(|e| e.to_string())?;
        let events = context.event_pump()?;

        Ok(Self {
            canvas,
            events,
            config,
            commands: VecDeque::new(),
            should_quit: false,
            dirty: true,
        })
    }

    fn handle_events(&mut self) {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } => self.should_quit = true,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => match key_command(&self.config.bindings, &keycode.name()) {
                    Some(Command::Quit) => self.should_quit = true,
                    Some(command) => self.commands.push_back(command),
                    None => debug!("Unbound key {:?}", keycode),
                },
                _ => {}
            }
        }
    }

    fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let step = (self.config.tile_size + self.config.gap()) as i32;
        let gap = self.config.gap() as i32;

        Rect::new(
            gap + col as i32 * step,
            gap + row as i32 * step,
            self.config.tile_size,
            self.config.tile_size,
        )
    }

    fn draw_value(&mut self, rect: Rect, value: u32) -> Result<(), String> {
        let digits: Vec<usize> = value
            .to_string()
            .bytes()
            .map(|b| (b - b'0') as usize)
            .collect();

        // 3 pixels per glyph plus 1 spacing, with a one glyph-pixel margin on each side
        let columns = digits.len() as u32 * 4 + 1;
        let pixel = (rect.width() / columns).min(rect.height() / 9).max(1);
        let text_width = (digits.len() as u32 * 4 - 1) * pixel;
        let left = rect.x() + (rect.width() - text_width) as i32 / 2;
        let top = rect.y() + (rect.height() - 5 * pixel) as i32 / 2;

        let color = if value <= 4 { DARK_TEXT } else { LIGHT_TEXT };
        self.canvas.set_draw_color(color);

        for (index, &digit) in digits.iter().enumerate() {
            let glyph = DIGITS[digit];
            let x0 = left + (index as u32 * 4 * pixel) as i32;

            for bit in 0..15 {
                if glyph & (1 << (14 - bit)) != 0 {
                    let x = x0 + (bit % 3) as i32 * pixel as i32;
                    let y = top + (bit / 3) as i32 * pixel as i32;

                    self.canvas.fill_rect(Rect::new(x, y, pixel, pixel))?;
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self, game: &Game) -> Result<(), String> {
        self.canvas.set_draw_color(BACKGROUND);
        self.canvas.clear();

        for (row, col, value) in game.board().grid() {
            let rect = self.cell_rect(row, col);

            self.canvas.set_draw_color(tile_color(value));
            self.canvas.fill_rect(rect)?;

            if value != 0 {
                self.draw_value(rect, value)?;
            }
        }

        self.canvas
            .window_mut()
            .set_title(&format!("2048 - score {}", game.score()))
            .map_err(|e| e.to_string())?;

        self.canvas.present();
        Ok(())
    }
}

impl Renderer for SdlRenderer {
    type Error = String;

    fn initialize(&mut self, game: &Game) -> Result<(), Self::Error> {
        self.draw(game)
    }

    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        match event {
            RenderEvent::Turn(turn) => {
                for transition in turn.shift.transitions().iter().filter(|t| !t.is_stationary()) {
                    debug!("{:?} -> {:?}", transition.from, transition.to);
                }

                self.dirty |= turn.shift.moved();
            }
            _ => self.dirty = true,
        }

        Ok(())
    }

    fn update(&mut self, game: &Game) -> Result<(), Self::Error> {
        self.handle_events();

        if self.dirty && !self.should_quit {
            self.dirty = false;
            self.draw(game)?;
        }

        Ok(())
    }

    fn poll_command(&mut self) -> Option<Command> {
        self.handle_events();
        self.commands.pop_front()
    }

    fn should_quit(&mut self) -> bool {
        self.should_quit
    }

    fn finalize(&mut self, game: &Game) -> Result<(), Self::Error> {
        self.draw(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    #[test]
    fn keys_follow_bindings() {
        let bindings = KeyBindings::default();

        assert_eq!(key_command(&bindings, "Up"), Some(Command::Move(Direction::Up)));
        assert_eq!(key_command(&bindings, "D"), Some(Command::Move(Direction::Right)));
        assert_eq!(key_command(&bindings, "Escape"), Some(Command::Quit));
        assert_eq!(key_command(&bindings, "Space"), None);

        let mut custom = KeyBindings::default();
        custom.directions[Direction::Up] = vec!["i".to_string()];
        custom.quit = vec!["x".to_string()];

        assert_eq!(key_command(&custom, "I"), Some(Command::Move(Direction::Up)));
        assert_eq!(key_command(&custom, "X"), Some(Command::Quit));
        assert_eq!(key_command(&custom, "Q"), None);
        assert_eq!(key_command(&custom, "Escape"), Some(Command::Quit));
    }
}
