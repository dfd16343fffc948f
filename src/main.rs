use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use devgrid::*;
use std::{fs, io, path::PathBuf};

fn main() -> BResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = args::Opt::parse();

    match opt.subcommand {
        args::Commands::Grid(opt) => gen::grid::main(opt)?,
        args::Commands::Rename(opt) => rename::main(opt)?,
        args::Commands::ShellCompletions { shell } => install_shell_completions(shell)?,
    }
    Ok(())
}

fn install_shell_completions(shell: args::CompletionShell) -> io::Result<()> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Can't find home directory"))?;
    let (path, shell): (PathBuf, Shell) = match shell {
        args::CompletionShell::Zsh => (home.join(".zsh/zfunctions/_devgrid"), Shell::Zsh),
        args::CompletionShell::Bash => (
            home.join(".local/share/bash-completion/completions/devgrid"),
            Shell::Bash,
        ),
    };
    if let Some(dir) = path.parent() {
        utils::mkdir(dir)?;
    }
    let mut f = fs::File::create(&path)?;
    generate(shell, &mut args::Opt::command(), "devgrid", &mut f);
    log::info!("Completions installed: {}", path.display());
    Ok(())
}
