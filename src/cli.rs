use std::path::PathBuf;
use structopt::StructOpt;

use progtrack::view::ProgramForm;
use progtrack::{Column, Period, DEFAULT_DATA_DIR};

/// Keep track of subscriptions: logins, billing and renewal periods.
#[derive(Debug, StructOpt)]
#[structopt(name = "progtrack")]
pub struct Opt {
    /// Increase verbosity (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences), global = true)]
    pub verbose: u8,

    /// Directory holding the program list
    #[structopt(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    /// Without a subcommand the empty add form is shown
    #[structopt(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Add a program
    Add(FormArgs),
    /// Edit the program at INDEX, changing only the given fields
    Edit {
        index: usize,
        #[structopt(flatten)]
        fields: FormArgs,
    },
    /// List programs
    List {
        /// Only show programs containing this text
        #[structopt(short, long)]
        search: Option<String>,
        /// Sort by column; repeat the same column to sort descending
        #[structopt(long, number_of_values = 1)]
        sort: Vec<Column>,
    },
    /// Delete the program at INDEX after confirmation
    Delete {
        index: usize,
        /// Do not ask for confirmation
        #[structopt(short, long)]
        yes: bool,
        /// Ask through dmenu instead of the terminal
        #[structopt(long, conflicts_with = "yes")]
        dmenu: bool,
    },
    /// Export all programs as JSON
    Export {
        /// Target file or directory, defaults to the current directory
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Replace all programs with the contents of a JSON export
    Import {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
pub struct FormArgs {
    #[structopt(long)]
    pub name: Option<String>,
    #[structopt(long)]
    pub link: Option<String>,
    #[structopt(long)]
    pub email: Option<String>,
    #[structopt(long)]
    pub secret: Option<String>,
    #[structopt(long)]
    pub account_kind: Option<String>,
    /// Mark as paid
    #[structopt(long)]
    pub paid: bool,
    /// Mark as free, clearing the card number
    #[structopt(long, conflicts_with = "paid")]
    pub free: bool,
    /// Expiry date, YYYY-MM-DD
    #[structopt(long)]
    pub expiry: Option<String>,
    #[structopt(long)]
    pub card: Option<String>,
    /// Monthly or Yearly
    #[structopt(long)]
    pub period: Option<Period>,
}

impl FormArgs {
    /// Overwrites the fields that were given on the command line.
    pub fn apply(self, form: &mut ProgramForm) {
        let set = |target: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        set(&mut form.name, self.name);
        set(&mut form.link, self.link);
        set(&mut form.email, self.email);
        set(&mut form.secret, self.secret);
        set(&mut form.account_kind, self.account_kind);
        set(&mut form.expiry_date, self.expiry);
        set(&mut form.card_number, self.card);
        if self.paid {
            form.is_paid = true;
        }
        if self.free {
            form.is_paid = false;
        }
        if self.period.is_some() {
            form.period = self.period;
        }
    }
}
