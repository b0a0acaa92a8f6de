//! tb-label: run label parsing.
//!
//! A run label is the file name of a bench recording, for example
//! `92ml_m 10C battA4 disp6.xlsx` or the terse `92 10 A4 6.xlsx`. The
//! word prefixes are optional decorations on one positional grammar:
//!
//! ```text
//! <flow>[units] <target>[C] [batt_]<battery> [disp_]<disposable> [unit_]<unit> [trial_]<trial>
//! ```

pub mod params;
pub mod parse;

pub use params::RunParameters;
pub use parse::parse_label;

pub type LabelResult<T> = Result<T, LabelError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label '{label}' is missing the {field}")]
    Missing { label: String, field: &'static str },

    #[error("Label '{label}': {field} token '{token}' is not numeric")]
    NotNumeric {
        label: String,
        field: &'static str,
        token: String,
    },

    #[error("Label '{label}': {field} token '{token}' contains unsupported characters")]
    BadToken {
        label: String,
        field: &'static str,
        token: String,
    },

    #[error("Label '{label}' has unexpected trailing token '{token}'")]
    Unexpected { label: String, token: String },
}
