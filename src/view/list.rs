//! Browsable view over the store's record stream: search, column sort, and
//! the actions a list row offers.

use anyhow::Context;
use chrono::NaiveDate;
use feruca::Collator;
use itertools::Itertools;
use log::{debug, info};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;
use crate::model::{Column, EditTarget, Program};
use crate::observable::Subscription;
use crate::store::{export_file_name, Deletion, Store};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SortState {
    pub column: Option<Column>,
    pub direction: Direction,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            column: None,
            direction: Direction::Asc,
        }
    }
}

impl SortState {
    /// Same column flips the direction, a new column starts ascending.
    pub fn toggle(&mut self, column: Column) {
        if self.column == Some(column) {
            self.direction = match self.direction {
                Direction::Asc => Direction::Desc,
                Direction::Desc => Direction::Asc,
            };
        } else {
            self.column = Some(column);
            self.direction = Direction::Asc;
        }
    }

    pub fn icon(&self, column: Column) -> &'static str {
        match (self.column == Some(column), self.direction) {
            (false, _) => "↕",
            (true, Direction::Asc) => "↑",
            (true, Direction::Desc) => "↓",
        }
    }
}

/// A displayed program and its slot in the store's list.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Row {
    pub index: usize,
    pub program: Program,
}

fn contains(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

/// Case-insensitive substring match over the searchable fields.
pub fn matches(p: &Program, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    contains(&p.name, &term)
        || contains(&p.link, &term)
        || contains(&p.email, &term)
        || contains(&p.secret, &term)
        || contains(&p.account_kind, &term)
        || p.card_number.as_deref().map_or(false, |c| contains(c, &term))
        || contains(&p.expiry_date, &term)
}

/// Unicode collation (CLDR root order): case and accents only matter once
/// the base letters tie, so "Çiçeksepeti" sorts among the C names. The raw
/// strings break any remaining tie.
pub fn locale_cmp(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

pub fn filter_and_sort(programs: &[Program], search: &str, sort: SortState) -> Vec<Row> {
    let mut rows = programs
        .iter()
        .enumerate()
        .filter(|(_, p)| matches(p, search))
        .map(|(index, p)| Row {
            index,
            program: p.clone(),
        })
        .collect_vec();
    if let Some(column) = sort.column {
        let mut collator = Collator::default();
        // Vec::sort_by is stable, equal keys keep their filtered order
        rows.sort_by(|a, b| {
            let (a, b) = (column.value(&a.program), column.value(&b.program));
            match sort.direction {
                Direction::Asc => locale_cmp(&mut collator, &a, &b),
                Direction::Desc => locale_cmp(&mut collator, &b, &a),
            }
        });
    }
    rows
}

#[derive(Default)]
struct ListState {
    programs: Vec<Program>,
    search: String,
    sort: SortState,
    rows: Vec<Row>,
}

impl ListState {
    fn recompute(&mut self) {
        self.rows = filter_and_sort(&self.programs, &self.search, self.sort);
    }
}

pub struct ListView {
    state: Rc<RefCell<ListState>>,
    _subscription: Subscription,
}

impl ListView {
    pub fn attach(store: &Store) -> ListView {
        let state = Rc::new(RefCell::new(ListState::default()));
        let sink = state.clone();
        let subscription = store.subscribe_records(move |programs| {
            let mut state = sink.borrow_mut();
            state.programs = programs.clone();
            state.recompute();
        });
        ListView {
            state,
            _subscription: subscription,
        }
    }

    pub fn search(&self, term: &str) {
        let mut state = self.state.borrow_mut();
        state.search = term.to_lowercase();
        state.recompute();
    }

    pub fn sort_by(&self, column: Column) {
        let mut state = self.state.borrow_mut();
        state.sort.toggle(column);
        state.recompute();
    }

    pub fn sort(&self) -> SortState {
        self.state.borrow().sort
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state.borrow().rows.clone()
    }

    /// Hands the program at `index` to the form.
    pub fn edit(&self, store: &mut Store, index: usize) -> Result<(), StoreError> {
        let program = store.get(index)?.clone();
        debug!("Editing program #{} '{}'", index, program.name);
        store.set_edit_target(Some(EditTarget { index, program }));
        Ok(())
    }

    pub fn delete(&self, store: &mut Store, index: usize) -> Result<Deletion, StoreError> {
        store.delete(index)
    }

    /// Writes the export next to `dest` when it is a directory, or to `dest`
    /// itself otherwise.
    pub fn export(&self, store: &Store, dest: &Path, today: NaiveDate) -> anyhow::Result<PathBuf> {
        let path = if dest.is_dir() {
            dest.join(export_file_name(today))
        } else {
            dest.to_owned()
        };
        let bytes = store.export_snapshot()?;
        std::fs::write(&path, bytes).with_context(|| format!("Error writing export {:?}", path))?;
        info!("Exported {} programs to {:?}", store.len(), path);
        Ok(path)
    }

    pub fn import(&self, store: &mut Store, file: &Path) -> anyhow::Result<()> {
        let bytes = std::fs::read(file).with_context(|| format!("Unable to read {:?}", file))?;
        store.import_snapshot(&bytes)?;
        Ok(())
    }

    /// Plain-text table of the current rows.
    pub fn render(&self) -> String {
        let state = self.state.borrow();
        render_rows(&state.rows, state.sort)
    }
}

fn cell(column: Column, p: &Program) -> String {
    match column {
        Column::CardNumber => match p.card_number.as_deref() {
            None | Some("") => "-".to_owned(),
            Some(c) => c.to_owned(),
        },
        Column::IsPaid => (if p.is_paid.is_truthy() { "yes" } else { "no" }).to_owned(),
        other => other.value(p),
    }
}

pub fn render_rows(rows: &[Row], sort: SortState) -> String {
    let mut table: Vec<Vec<String>> = vec![std::iter::once("#".to_owned())
        .chain(
            Column::ALL
                .iter()
                .map(|c| format!("{} {}", c.header(), sort.icon(*c))),
        )
        .collect()];
    for row in rows {
        table.push(
            std::iter::once(row.index.to_string())
                .chain(Column::ALL.iter().map(|c| cell(*c, &row.program)))
                .collect(),
        );
    }
    let widths = (0..=Column::ALL.len())
        .map(|i| {
            table
                .iter()
                .map(|r| r[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect_vec();
    table
        .iter()
        .map(|r| {
            r.iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n")
}
