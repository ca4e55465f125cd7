pub mod form;
pub mod list;

pub use form::{FormError, FormView, ProgramForm, Submitted, ValidationError, ValidationKind};
pub use list::{Direction, ListView, Row, SortState};
