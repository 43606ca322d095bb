use crate::cli::AppConfig;
use crate::game::Game;
use crate::input::{Command, InputSource, LineInput, ScriptedInput};
use crate::render::text_renderer::TextRenderer;
use crate::render::trace_renderer::TraceRenderer;
use crate::render::{RenderEvent, Renderer};

#[cfg(feature = "visual")]
use crate::render::sdl_renderer::{SdlConfig, SdlRenderer};

use log::{debug, info};
use rand::rngs::OsRng;
use rand::Rng;
use std::fs::File;
use std::io::{self, BufWriter};
use std::thread;
use std::time::Duration;

type BoxedRenderer = Box<dyn Renderer<Error = String>>;

const FRAME: Duration = Duration::from_millis(16);

pub struct GameApp {
    config: AppConfig,
}

impl GameApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let seed = self.config.seed.unwrap_or_else(|| OsRng.gen());

        info!("Using seed: {}", seed);

        let mut game = Game::seeded(seed);
        let mut renderers = self.create_renderers()?;
        let mut input = self.create_input();

        for renderer in &mut renderers {
            renderer.initialize(&game)?;
        }

        emit(&mut renderers, &RenderEvent::Started, &game)?;

        // Main turn loop
        loop {
            if renderers.iter_mut().any(|r| r.should_quit()) {
                break;
            }

            let command = match renderers.iter_mut().find_map(|r| r.poll_command()) {
                Some(command) => command,
                None => match input.as_mut() {
                    Some(source) => match source.next_command() {
                        Some(command) => command,
                        None => break,
                    },
                    None => {
                        for renderer in &mut renderers {
                            renderer.update(&game)?;
                        }

                        thread::sleep(FRAME);
                        continue;
                    }
                },
            };

            match command {
                Command::Quit => break,
                Command::Restart => {
                    game.restart();
                    emit(&mut renderers, &RenderEvent::Restarted, &game)?;
                }
                Command::Move(direction) => {
                    let turn = game.play(direction)?;

                    emit(&mut renderers, &RenderEvent::Turn(turn), &game)?;

                    if game.is_over() {
                        info!("No moves left");
                        break;
                    }
                }
            }
        }

        emit(&mut renderers, &RenderEvent::Completed, &game)?;

        // Hold visualization if requested
        #[cfg(feature = "visual")]
        if let Some(delay) = self.config.renderer.hold {
            info!("Waiting for {} seconds", delay);
            thread::sleep(Duration::from_secs_f32(delay));
        }

        for renderer in &mut renderers {
            renderer.finalize(&game)?;
        }

        debug!("Moves per direction: {:?}", game.moves());
        debug!("Blocked moves per direction: {:?}", game.blocked());
        info!(
            "Game finished after {} turns with score {} (highest tile {})",
            game.turns(),
            game.score(),
            game.highest_tile()
        );

        Ok(())
    }

    fn create_input(&self) -> Option<Box<dyn InputSource>> {
        if let Some(moves) = &self.config.moves {
            return Some(Box::new(ScriptedInput::new(moves)));
        }

        #[cfg(feature = "visual")]
        if self.config.renderer.visual {
            return None;
        }

        let stdin = io::stdin().lock();
        Some(Box::new(LineInput::new(stdin, self.config.bindings.clone())))
    }

    fn create_renderers(&self) -> Result<Vec<BoxedRenderer>, Box<dyn std::error::Error>> {
        let mut renderers: Vec<BoxedRenderer> = Vec::new();

        #[cfg(feature = "visual")]
        let visual = self.config.renderer.visual;
        #[cfg(not(feature = "visual"))]
        let visual = false;

        // Add SDL2 renderer if requested
        #[cfg(feature = "visual")]
        if visual {
            let sdl_config = SdlConfig {
                tile_size: self.config.renderer.tile_size,
                vsync: self.config.renderer.vsync,
                fullscreen: self.config.renderer.fullscreen,
                bindings: self.config.bindings.clone(),
            };

            renderers.push(Box::new(SdlRenderer::new(sdl_config)?));
        }

        if !visual {
            renderers.push(Box::new(TextRenderer::new(io::stdout())));
        }

        // Add trace renderer if a trace path is specified
        if let Some(path) = &self.config.renderer.trace {
            let file = File::create(path)?;
            renderers.push(Box::new(TraceRenderer::new(BufWriter::new(file))));
        }

        Ok(renderers)
    }
}

fn emit(renderers: &mut [BoxedRenderer], event: &RenderEvent, game: &Game) -> Result<(), String> {
    for renderer in renderers.iter_mut() {
        renderer.handle_event(event)?;
        renderer.update(game)?;
    }

    Ok(())
}
