use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::error::StoreError;
use crate::model::{Paid, Period, Program};
use crate::observable::Subscription;
use crate::store::Store;

const INPUT_DATE: &str = "%Y-%m-%d";
const STORED_DATE: &str = "%d.%m.%Y";

// Same shape the browser form accepted
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ValidationKind {
    Required,
    InvalidEmail,
    InvalidDate,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ValidationKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            ValidationKind::Required => "is required",
            ValidationKind::InvalidEmail => "must be a valid email address",
            ValidationKind::InvalidDate => "must be a date like 2026-10-17",
        };
        write!(f, "{} {}", self.field, message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form is invalid: {}", itertools::join(.0, ", "))]
    Invalid(Vec<ValidationError>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Submitted {
    Added,
    Updated(usize),
}

/// Raw form fields. The expiry date is in input form, `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProgramForm {
    pub name: String,
    pub link: String,
    pub email: String,
    pub secret: String,
    pub account_kind: String,
    pub is_paid: bool,
    pub expiry_date: String,
    pub card_number: String,
    pub period: Option<Period>,
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, INPUT_DATE)
        .or_else(|_| NaiveDate::parse_from_str(input, STORED_DATE))
        .ok()
}

impl ProgramForm {
    pub fn from_program(p: &Program) -> ProgramForm {
        ProgramForm {
            name: p.name.clone(),
            link: p.link.clone(),
            email: p.email.clone(),
            secret: p.secret.clone(),
            account_kind: p.account_kind.clone(),
            is_paid: p.is_paid.is_truthy(),
            expiry_date: parse_date(&p.expiry_date)
                .map(|d| d.format(INPUT_DATE).to_string())
                .unwrap_or_else(|| p.expiry_date.clone()),
            card_number: p.card_number.clone().unwrap_or_default(),
            period: p.period,
        }
    }

    pub fn validate(&self) -> Result<Program, Vec<ValidationError>> {
        let mut errors = vec![];
        let mut require = |field: &'static str, value: &str| {
            if value.is_empty() {
                errors.push(ValidationError {
                    field,
                    kind: ValidationKind::Required,
                });
            }
        };
        require("name", &self.name);
        require("link", &self.link);
        require("email", &self.email);
        require("secret", &self.secret);
        if self.is_paid {
            require("card", &self.card_number);
        }
        if self.period.is_none() {
            errors.push(ValidationError {
                field: "period",
                kind: ValidationKind::Required,
            });
        }
        if !self.email.is_empty() && !EMAIL.is_match(&self.email) {
            errors.push(ValidationError {
                field: "email",
                kind: ValidationKind::InvalidEmail,
            });
        }
        let expiry_date = if self.expiry_date.is_empty() {
            String::new()
        } else {
            match parse_date(&self.expiry_date) {
                Some(d) => d.format(STORED_DATE).to_string(),
                None => {
                    errors.push(ValidationError {
                        field: "expiry",
                        kind: ValidationKind::InvalidDate,
                    });
                    String::new()
                }
            }
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Program {
            name: self.name.clone(),
            link: self.link.clone(),
            email: self.email.clone(),
            secret: self.secret.clone(),
            account_kind: self.account_kind.clone(),
            is_paid: Paid::Flag(self.is_paid),
            expiry_date,
            // Unpaid programs never keep a card number
            card_number: Some(if self.is_paid {
                self.card_number.clone()
            } else {
                String::new()
            }),
            period: self.period,
        })
    }
}

#[derive(Default)]
struct FormState {
    form: ProgramForm,
    edit_index: Option<usize>,
}

/// Create/edit form bound to the store's edit target.
pub struct FormView {
    state: Rc<RefCell<FormState>>,
    _subscription: Subscription,
}

impl FormView {
    pub fn attach(store: &Store) -> FormView {
        let state = Rc::new(RefCell::new(FormState::default()));
        let sink = state.clone();
        let subscription = store.subscribe_edit_target(move |target| {
            if let Some(target) = target {
                debug!("Form editing program #{}", target.index);
                let mut state = sink.borrow_mut();
                state.edit_index = Some(target.index);
                state.form = ProgramForm::from_program(&target.program);
            }
        });
        FormView {
            state,
            _subscription: subscription,
        }
    }

    pub fn edit_index(&self) -> Option<usize> {
        self.state.borrow().edit_index
    }

    pub fn form(&self) -> ProgramForm {
        self.state.borrow().form.clone()
    }

    pub fn fill<F: FnOnce(&mut ProgramForm)>(&self, f: F) {
        f(&mut self.state.borrow_mut().form);
    }

    /// Adds or updates depending on the mode, then resets the form. A failed
    /// store call keeps the form as it was.
    pub fn submit(&self, store: &mut Store) -> Result<Submitted, FormError> {
        let (program, edit_index) = {
            let state = self.state.borrow();
            (state.form.validate().map_err(FormError::Invalid)?, state.edit_index)
        };
        let submitted = match edit_index {
            Some(index) => {
                store.update(index, program)?;
                Submitted::Updated(index)
            }
            None => {
                store.add(program)?;
                Submitted::Added
            }
        };
        self.reset();
        store.set_edit_target(None);
        Ok(submitted)
    }

    pub fn cancel(&self, store: &mut Store) {
        self.reset();
        store.set_edit_target(None);
    }

    fn reset(&self) {
        *self.state.borrow_mut() = FormState::default();
    }

    /// The form as text, one `--flag` per field. `*` marks required fields;
    /// the card number is only required once the program is paid.
    pub fn render(&self) -> String {
        let state = self.state.borrow();
        let f = &state.form;
        let title = match state.edit_index {
            Some(index) => format!("Editing program #{}", index),
            None => "New program".to_owned(),
        };
        let period = match f.period {
            Some(p) => p.to_string(),
            None => Period::ALL.iter().join(" | "),
        };
        let fields = vec![
            ("--name*", f.name.clone()),
            ("--link*", f.link.clone()),
            ("--email*", f.email.clone()),
            ("--secret*", f.secret.clone()),
            ("--account-kind", f.account_kind.clone()),
            ("--paid", (if f.is_paid { "yes" } else { "no" }).to_owned()),
            ("--expiry", f.expiry_date.clone()),
            (
                if f.is_paid { "--card*" } else { "--card" },
                f.card_number.clone(),
            ),
            ("--period*", period),
        ];
        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        std::iter::once(title)
            .chain(fields.into_iter().map(|(label, value)| {
                format!("  {:<width$}  {}", label, value, width = width)
                    .trim_end()
                    .to_owned()
            }))
            .join("\n")
    }
}
