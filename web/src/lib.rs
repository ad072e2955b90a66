use bingo_core::BoardConfig;
use clap::Parser;
use wasm_bindgen::prelude::*;

mod board;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of rows on the board
    #[arg(long, default_value_t = 5)]
    rows: u8,

    /// Number of columns on the board
    #[arg(long, default_value_t = 5)]
    cols: u8,

    /// Don't put a free space in the center
    #[arg(long)]
    no_free_space: bool,

    /// Where to fetch the phrase file from
    #[arg(long, default_value = "cells.txt")]
    phrases: String,
}

impl Args {
    fn from_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }

    fn board_props(&self) -> board::BoardProps {
        board::BoardProps {
            config: BoardConfig::new((self.cols, self.rows), !self.no_free_space),
            phrases_url: self.phrases.clone().into(),
            seed: self.seed,
        }
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("args: {:?}", args);

    let root = document()
        .get_element_by_id("bingo")
        .expect("Could not find id=\"bingo\" element");

    log::debug!("App started");
    yew::Renderer::<board::BoardView>::with_root_and_props(root, args.board_props()).render();
}
