use clap::{Parser, Subcommand};

use self::{
    decide::DecideArg,
    evaluate::{EvaluateArg, SimulateArg},
    play::PlayArg,
    queue::{DrainArg, SendArg},
    train::TrainArg,
};

mod decide;
mod evaluate;
mod play;
mod queue;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Tune placement weights with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Play held-out games and report lines cleared
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Play a single simulated game
    Simulate(#[clap(flatten)] SimulateArg),
    /// Answer host observations with one action each
    Decide(#[clap(flatten)] DecideArg),
    /// Run the headless game loop driven by the decision engine
    Play(#[clap(flatten)] PlayArg),
    /// Append a key to the command queue file
    Send(#[clap(flatten)] SendArg),
    /// Remove and print records from the command queue file
    Drain(#[clap(flatten)] DrainArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run_evaluate(&arg)?,
        Mode::Simulate(arg) => evaluate::run_simulate(&arg)?,
        Mode::Decide(arg) => decide::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Send(arg) => queue::run_send(&arg)?,
        Mode::Drain(arg) => queue::run_drain(&arg)?,
    }
    Ok(())
}
