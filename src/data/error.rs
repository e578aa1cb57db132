use thiserror::Error;

/// Pipeline error taxonomy. Every variant is recoverable: the UI surfaces
/// the message as a status notice and waits for new input.
#[derive(Debug, Error)]
pub enum DataError {
    /// The uploaded file's extension is neither `.csv` nor `.xlsx`.
    #[error("unsupported file format: .{0} (upload a .csv or .xlsx file)")]
    UnsupportedFormat(String),

    /// The file matched a supported extension but could not be parsed.
    #[error("failed to load file: {0}")]
    Load(String),

    /// A distribution was requested over a table with no rows. The pipeline
    /// guards against this; it should never reach the user.
    #[error("cannot compute a distribution over an empty table")]
    EmptyAggregationInput,

    /// A table could not be encoded as a spreadsheet.
    #[error("failed to encode spreadsheet: {0}")]
    Export(String),
}
