use crate::model::Dataset;

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty column name, output overwrites input, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// One or more required columns absent from an input table.
    #[error(
        "{dataset} file '{origin}' (sheet '{sheet}'): missing required column(s): {}",
        .missing.join(", ")
    )]
    MissingColumns {
        dataset: Dataset,
        origin: String,
        sheet: String,
        missing: Vec<String>,
    },
}
