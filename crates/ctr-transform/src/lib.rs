//! Transforms applied to REDCap flat exports.
//!
//! - [`timestamps`] reconciles primary and archival survey timestamps and
//!   derives `date_survey`.
//! - [`checkbox`] collapses checkbox dummy columns into one grouped column.
//! - [`relabel`] swaps choice codes for data dictionary labels.
//! - [`pipeline`] chains the three in their standard order.
//!
//! Every transform takes ownership of the frame, keeps row count and row
//! order, and returns a new frame.

pub mod checkbox;
pub mod datetime;
pub mod error;
pub mod families;
pub mod pipeline;
pub mod relabel;
pub mod timestamps;

pub use checkbox::{
    RegroupOptions, RegroupOutcome, is_selected, regroup_checkboxes,
    regroup_checkboxes_with_options,
};
pub use error::{Result, TransformError};
pub use families::{
    CheckboxFamily, CheckboxOption, TimestampFamily, discover_checkbox_families,
    discover_timestamp_families,
};
pub use pipeline::{PipelineOptions, PipelineReport, PreparedExport, prepare_export};
pub use relabel::{RelabelOutcome, relabel};
pub use timestamps::{
    ParseWarning, ReconcileOptions, ReconcileOutcome, ReconcileReport, reconcile_timestamps,
    reconcile_timestamps_with_options,
};
