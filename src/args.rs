use clap::{Parser, Subcommand, ValueEnum};

use crate::*;

#[derive(Parser, Clone, Debug)]
#[command(name = "devgrid", version, about, disable_help_subcommand(true))]
pub struct Opt {
    #[command(subcommand)]
    pub subcommand: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Encode one clip per `Dev<N>` image group and tile four of them into a 2x2 video
    Grid(gen::grid::Opt),
    /// Zero-pad the `_fn<N>` sequence number in image filenames
    Rename(rename::Opt),
    ShellCompletions {
        #[arg(value_enum, default_value = "zsh")]
        shell: CompletionShell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CompletionShell {
    Zsh,
    Bash,
}
