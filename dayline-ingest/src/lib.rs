//! dayline-ingest: schedule-service day records and their normalization into
//! compositor inputs.

pub mod normalize;
pub mod types;

pub use normalize::{
    normalize_day, parse_day_record, parse_time, NormalizeError, NormalizeOptions, NormalizedDay,
    TimeMode,
};
pub use types::{DayRecord, RawAppointment, RawBlock, RawShift};
