use crate::record::DayType;

/// Failure of an aggregation that has no meaningful numeric answer.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    /// A peak lookup was given no records to compare.
    #[error("no traffic records to compare")]
    EmptyInput,

    /// An overall day-type average was requested for a partition with no records.
    #[error("no {day_type} records to average")]
    EmptyPartition { day_type: DayType },
}
