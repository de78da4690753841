use clap::Parser;

use crate::{pages::game::Difficulty, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Seed for pipe gap placement, random when omitted
    #[arg(short, long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Skip the picker and start at this difficulty (easy, medium or hard)
    #[arg(short, long, value_name = "LEVEL")]
    pub difficulty: Option<Difficulty>,
}
