mod cli;

use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

use cli::{Command, Opt};
use progtrack::view::{FormView, ListView, Submitted};
use progtrack::{AssumeYes, Deletion, DmenuPrompt, FileStorage, Prompt, Store, TerminalPrompt};

fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    let prompt: Box<dyn Prompt> = match &opt.cmd {
        Some(Command::Delete { yes: true, .. }) => Box::new(AssumeYes),
        Some(Command::Delete { dmenu: true, .. }) => Box::new(DmenuPrompt),
        _ => Box::new(TerminalPrompt::stdio()),
    };
    let storage = FileStorage::from_config_path(&opt.data_dir)?;
    let mut store = Store::open(Box::new(storage), prompt)
        .with_context(|| format!("Unable to open program list in {}", opt.data_dir))?;
    let list = ListView::attach(&store);
    let form = FormView::attach(&store);

    let cmd = match opt.cmd {
        Some(cmd) => cmd,
        None => {
            println!("{}", form.render());
            println!("\nFill it in with `progtrack add --name ... --period monthly`");
            return Ok(());
        }
    };
    match cmd {
        Command::Add(fields) => {
            form.fill(|f| fields.apply(f));
            form.submit(&mut store)?;
            println!("Program added, {} in total", store.len());
        }
        Command::Edit { index, fields } => {
            list.edit(&mut store, index)?;
            form.fill(|f| fields.apply(f));
            if let Submitted::Updated(index) = form.submit(&mut store)? {
                println!("Program #{} updated", index);
            }
        }
        Command::List { search, sort } => {
            if let Some(term) = search {
                list.search(&term);
            }
            for column in sort {
                list.sort_by(column);
            }
            println!("{}", list.render());
        }
        Command::Delete { index, .. } => match list.delete(&mut store, index)? {
            Deletion::Deleted(p) => println!("Program '{}' deleted", p.name),
            Deletion::Cancelled => println!("Nothing deleted"),
        },
        Command::Export { output } => {
            let dest = output.unwrap_or_else(|| PathBuf::from("."));
            let today = chrono::Local::now().date_naive();
            let path = list.export(&store, &dest, today)?;
            println!("Exported {} programs to {}", store.len(), path.display());
        }
        Command::Import { file } => {
            list.import(&mut store, &file)?;
            println!("Imported {} programs", store.len());
        }
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();
}
