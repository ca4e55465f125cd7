//! The authoritative program list.
//!
//! [`Store`] owns the list, mirrors it into a single [`Storage`] key and
//! publishes the full snapshot to subscribers after every change. Every
//! mutation runs in the same order: build the new list, persist it, then
//! publish it. A failed persist leaves the list as it was and notifies nobody.

use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info, warn};
use serde_json::Value;

use crate::error::{ImportError, RecordError, StoreError};
use crate::model::validate::validate_program;
use crate::model::{EditTarget, Program};
use crate::observable::{Subject, Subscription};
use crate::prompt::Prompt;
use crate::storage::Storage;

pub const STORAGE_KEY: &str = "programlar";

/// Outcome of [`Store::delete`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Deletion {
    Deleted(Program),
    Cancelled,
}

pub struct Store {
    storage: Box<dyn Storage>,
    prompt: Box<dyn Prompt>,
    key: String,
    programs: Vec<Program>,
    records: Subject<Vec<Program>>,
    edit_target: Subject<Option<EditTarget>>,
}

/// Parses and validates a whole snapshot. All elements are checked before
/// anything is returned, so a single bad element rejects the lot.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Vec<Program>, ImportError> {
    let (programs, rejected) = hydrate_snapshot(bytes)?;
    if !rejected.is_empty() {
        return Err(ImportError::InvalidRecords(rejected));
    }
    Ok(programs)
}

/// Startup variant of [`parse_snapshot`]: valid elements are kept and the
/// rejected ones are reported beside them.
fn hydrate_snapshot(bytes: &[u8]) -> Result<(Vec<Program>, Vec<RecordError>), ImportError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ImportError::NotAnArray),
    };
    let mut programs = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match validate_program(item) {
            Ok(p) => programs.push(p),
            Err(fields) => rejected.push(RecordError { index, fields }),
        }
    }
    Ok((programs, rejected))
}

/// `program-listesi-DD-MM-YYYY.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("program-listesi-{}.json", date.format("%d-%m-%Y"))
}

impl Store {
    /// Opens the store on the default key, hydrating it once from `storage`.
    pub fn open(storage: Box<dyn Storage>, prompt: Box<dyn Prompt>) -> Result<Store, StoreError> {
        Store::open_with_key(storage, prompt, STORAGE_KEY)
    }

    /// Unreadable storage is an error. Content that is not a JSON array starts
    /// the store empty; an array keeps its valid records and drops the rest.
    /// Either way the raw text is first copied to `<key>.corrupt`.
    pub fn open_with_key(
        mut storage: Box<dyn Storage>,
        prompt: Box<dyn Prompt>,
        key: &str,
    ) -> Result<Store, StoreError> {
        let programs = match storage.read(key)? {
            None => {
                debug!("No stored programs under '{}', starting empty", key);
                vec![]
            }
            Some(raw) => match hydrate_snapshot(raw.as_bytes()) {
                Ok((programs, rejected)) if rejected.is_empty() => {
                    debug!("Loaded {} programs from '{}'", programs.len(), key);
                    programs
                }
                Ok((programs, rejected)) => {
                    let backup = format!("{}.corrupt", key);
                    warn!(
                        "Skipped {} unreadable programs under '{}' ({}); raw data kept under '{}'",
                        rejected.len(),
                        key,
                        rejected.iter().join("; "),
                        backup
                    );
                    storage.write(&backup, &raw)?;
                    programs
                }
                Err(e) => {
                    let backup = format!("{}.corrupt", key);
                    warn!(
                        "Stored programs under '{}' are unreadable ({}), starting empty; raw data kept under '{}'",
                        key, e, backup
                    );
                    storage.write(&backup, &raw)?;
                    vec![]
                }
            },
        };
        Ok(Store {
            storage,
            prompt,
            key: key.to_owned(),
            records: Subject::new(programs.clone()),
            programs,
            edit_target: Subject::new(None),
        })
    }

    /// Current snapshot.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs().is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Program, StoreError> {
        self.programs()
            .get(index)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn subscribe_records<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Vec<Program>) + 'static,
    {
        self.records.subscribe(listener)
    }

    pub fn edit_target(&self) -> Option<EditTarget> {
        (*self.edit_target.get()).clone()
    }

    pub fn subscribe_edit_target<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Option<EditTarget>) + 'static,
    {
        self.edit_target.subscribe(listener)
    }

    pub fn set_edit_target(&mut self, target: Option<EditTarget>) {
        self.edit_target.next(target);
    }

    pub fn add(&mut self, program: Program) -> Result<(), StoreError> {
        info!("Adding program '{}'", program.name);
        let mut programs = self.programs().to_vec();
        programs.push(program);
        self.commit(programs)
    }

    pub fn update(&mut self, index: usize, program: Program) -> Result<(), StoreError> {
        self.get(index)?;
        info!("Updating program #{} to '{}'", index, program.name);
        let mut programs = self.programs().to_vec();
        programs[index] = program;
        self.commit(programs)?;
        self.set_edit_target(None);
        Ok(())
    }

    /// Removes the program at `index` once the prompt confirms. Later indices
    /// shift down by one, so any index held from an older snapshot is stale.
    pub fn delete(&mut self, index: usize) -> Result<Deletion, StoreError> {
        let name = self.get(index)?.name.clone();
        let confirmed = self.prompt.confirm(
            "Emin misiniz?",
            &format!("'{}' silinsin mi? (delete this program)", name),
        )?;
        if !confirmed {
            debug!("Deletion of #{} cancelled", index);
            return Ok(Deletion::Cancelled);
        }
        info!("Deleting program #{} '{}'", index, name);
        let mut programs = self.programs().to_vec();
        let removed = programs.remove(index);
        self.commit(programs)?;
        Ok(Deletion::Deleted(removed))
    }

    /// Pretty-printed JSON of the current list.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let bytes = serde_json::to_vec_pretty(self.programs())
            .map_err(|e| StoreError::Storage(e.into()))?;
        Ok(bytes)
    }

    /// Replaces the whole list with `bytes`, or changes nothing.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        let programs = parse_snapshot(bytes)?;
        info!("Importing {} programs", programs.len());
        self.commit(programs)
    }

    fn commit(&mut self, programs: Vec<Program>) -> Result<(), StoreError> {
        let json = serde_json::to_string(&programs).map_err(|e| StoreError::Storage(e.into()))?;
        self.storage.write(&self.key, &json)?;
        self.programs = programs;
        self.records.next(self.programs.clone());
        Ok(())
    }
}
