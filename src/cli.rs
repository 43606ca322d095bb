use crate::grid::Direction;
use crate::input::{parse_moves, KeyBindings, KeymapFile};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_keymap(s: &str) -> Result<KeyBindings, String> {
    let path = PathBuf::from(s);
    let file = File::open(path).map_err(|e| format!("Failed to open keymap file: {}", e))?;
    let reader = BufReader::new(file);
    let keymap: KeymapFile = serde_json::from_reader(reader)
        .map_err(|e| format!("Failed to parse keymap file: {}", e))?;
    Ok(keymap.into())
}

/// Directions given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moves(pub Vec<Direction>);

fn load_moves(s: &str) -> Result<Moves, String> {
    parse_moves(s).map(Moves).map_err(|e| e.to_string())
}

#[derive(Debug)]
pub struct RendererConfig {
    #[cfg(feature = "visual")]
    pub visual: bool,
    #[cfg(feature = "visual")]
    pub tile_size: u32,
    #[cfg(feature = "visual")]
    pub vsync: bool,
    #[cfg(feature = "visual")]
    pub fullscreen: bool,
    #[cfg(feature = "visual")]
    pub hold: Option<f32>,
    pub trace: Option<PathBuf>,
}

#[derive(Debug)]
pub struct AppConfig {
    pub seed: Option<u64>,
    pub moves: Option<Vec<Direction>>,
    pub bindings: KeyBindings,
    pub renderer: RendererConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "twenty48", about = "Play 2048 in the terminal")]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(parse(try_from_str), short, long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(
        parse(try_from_str = load_moves),
        short,
        long,
        help = "Play these moves (e.g. \"l,u,r\" or \"lur\") and exit"
    )]
    moves: Option<Moves>,

    #[structopt(parse(try_from_str = load_keymap), short, long, help = "JSON key bindings")]
    keymap: Option<KeyBindings>,

    #[structopt(parse(from_os_str), short, long, help = "Write every turn as JSON lines")]
    trace: Option<PathBuf>,

    #[cfg(feature = "visual")]
    #[structopt(short = "V", long, help = "Open a window to play in")]
    visual: bool,

    #[cfg(feature = "visual")]
    #[structopt(long, default_value = "100", help = "Tile size in pixels")]
    tile_size: u32,

    #[cfg(feature = "visual")]
    #[structopt(long, help = "Turns on vsync")]
    vsync: bool,

    #[cfg(feature = "visual")]
    #[structopt(long, help = "Hold the window for n seconds after finishing")]
    hold: Option<f32>,

    #[cfg(feature = "visual")]
    #[structopt(short, long, help = "Runs the application in full screen")]
    fullscreen: bool,

    #[structopt(long, possible_values = &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> Result<AppConfig, &'static str> {
        if matches!(&self.moves, Some(Moves(moves)) if moves.is_empty()) {
            return Err("No moves given");
        }

        Ok(AppConfig {
            seed: self.seed,
            moves: self.moves.map(|Moves(moves)| moves),
            bindings: self.keymap.unwrap_or_default(),
            renderer: RendererConfig {
                #[cfg(feature = "visual")]
                visual: self.visual,
                #[cfg(feature = "visual")]
                tile_size: self.tile_size,
                #[cfg(feature = "visual")]
                vsync: self.vsync,
                #[cfg(feature = "visual")]
                fullscreen: self.fullscreen,
                #[cfg(feature = "visual")]
                hold: self.hold,
                trace: self.trace,
            },
        })
    }
}
