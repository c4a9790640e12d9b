use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration, usually read from a `.rollcall.toml` file. Every field
/// has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default = "default_source_file")]
    pub file: PathBuf,
    /// Sheet name; first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: SourceColumns,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            file: default_source_file(),
            sheet: None,
            columns: SourceColumns::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    #[serde(default = "default_reference_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: ReferenceColumns,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            file: default_reference_file(),
            sheet: None,
            columns: ReferenceColumns::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceColumns {
    pub full_name: String,
    pub phone_number: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            full_name: "full_name".into(),
            phone_number: "phone_number".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReferenceColumns {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            first_name: "Ad".into(),
            last_name: "Soyad".into(),
            phone: "Telefon".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
        }
    }
}

/// Extensions the output writer understands.
pub const OUTPUT_EXTENSIONS: &[&str] = &["xlsx", "csv", "tsv"];

fn default_source_file() -> PathBuf {
    PathBuf::from("ai.xls")
}

fn default_reference_file() -> PathBuf {
    PathBuf::from("Kitap1.xlsx")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("fark.xlsx")
}

// ---------------------------------------------------------------------------
// Schema (the part the engine needs)
// ---------------------------------------------------------------------------

/// Column names for both input layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    pub source: SourceColumns,
    pub reference: ReferenceColumns,
}

impl ReconConfig {
    /// Parse and validate.
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config = Self::parse(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse only. For callers that adjust the config (path resolution,
    /// command-line overrides) before running `validate` once at the end.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn schema(&self) -> SchemaConfig {
        SchemaConfig {
            source: self.source.columns.clone(),
            reference: self.reference.columns.clone(),
        }
    }

    /// Resolve relative file paths against `base_dir` (the config file's directory).
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for path in [
            &mut self.source.file,
            &mut self.reference.file,
            &mut self.output.file,
        ] {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let source = &self.source.columns;
        let reference = &self.reference.columns;

        for (key, value) in [
            ("source.columns.full_name", &source.full_name),
            ("source.columns.phone_number", &source.phone_number),
            ("reference.columns.first_name", &reference.first_name),
            ("reference.columns.last_name", &reference.last_name),
            ("reference.columns.phone", &reference.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        if source.full_name == source.phone_number {
            return Err(ReconError::ConfigValidation(format!(
                "source name and phone columns must differ (both '{}')",
                source.full_name
            )));
        }

        let ref_cols = [&reference.first_name, &reference.last_name, &reference.phone];
        for (i, a) in ref_cols.iter().enumerate() {
            if ref_cols[i + 1..].contains(a) {
                return Err(ReconError::ConfigValidation(format!(
                    "reference column '{a}' is mapped more than once"
                )));
            }
        }

        let ext = self
            .output
            .file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some(e) if OUTPUT_EXTENSIONS.contains(&e) => {}
            _ => {
                return Err(ReconError::ConfigValidation(format!(
                    "output file '{}' must end in one of: {}",
                    self.output.file.display(),
                    OUTPUT_EXTENSIONS.join(", ")
                )))
            }
        }

        if same_file(&self.output.file, &self.source.file)
            || same_file(&self.output.file, &self.reference.file)
        {
            return Err(ReconError::ConfigValidation(format!(
                "output file '{}' would overwrite an input file",
                self.output.file.display()
            )));
        }

        Ok(())
    }
}

/// Whether two paths name the same file. Existing files are compared by
/// canonical path (symlinks resolved); otherwise both paths are made absolute
/// and `.`/`..` are folded lexically. Case is ignored on Windows and macOS.
fn same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        return a == b;
    }
    let (a, b) = (lexical_absolute(a), lexical_absolute(b));
    if cfg!(any(windows, target_os = "macos")) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

fn lexical_absolute(path: &Path) -> PathBuf {
    let joined = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[source]
file = "exports/ai.xls"
sheet = "Kişiler"
[source.columns]
full_name = "Name"
phone_number = "Mobile"

[reference]
file = "Kitap1.xlsx"
[reference.columns]
first_name = "First"
last_name = "Last"
phone = "Phone"

[output]
file = "out/diff.csv"
"#;

    #[test]
    fn parse_full_config() {
        let config = ReconConfig::from_toml(FULL).unwrap();
        assert_eq!(config.source.file, PathBuf::from("exports/ai.xls"));
        assert_eq!(config.source.sheet.as_deref(), Some("Kişiler"));
        assert_eq!(config.source.columns.full_name, "Name");
        assert_eq!(config.reference.columns.phone, "Phone");
        assert!(config.reference.sheet.is_none());
        assert_eq!(config.output.file, PathBuf::from("out/diff.csv"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config.source.file, PathBuf::from("ai.xls"));
        assert_eq!(config.reference.file, PathBuf::from("Kitap1.xlsx"));
        assert_eq!(config.output.file, PathBuf::from("fark.xlsx"));
        assert_eq!(config.schema(), SchemaConfig::default());
    }

    #[test]
    fn partial_columns_keep_other_defaults() {
        let config = ReconConfig::from_toml("[reference.columns]\nphone = \"GSM\"\n").unwrap();
        assert_eq!(config.reference.columns.first_name, "Ad");
        assert_eq!(config.reference.columns.last_name, "Soyad");
        assert_eq!(config.reference.columns.phone, "GSM");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = ReconConfig::from_toml("[source]\nfiel = \"x.xlsx\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn empty_column_name_rejected() {
        let err = ReconConfig::from_toml("[source.columns]\nfull_name = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("source.columns.full_name"));
    }

    #[test]
    fn duplicate_reference_column_rejected() {
        let input = "[reference.columns]\nfirst_name = \"Ad\"\nlast_name = \"Ad\"\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn unsupported_output_extension_rejected() {
        let err = ReconConfig::from_toml("[output]\nfile = \"fark.ods\"\n").unwrap_err();
        assert!(err.to_string().contains("xlsx, csv, tsv"));
    }

    #[test]
    fn output_overwriting_input_rejected() {
        let input = "[source]\nfile = \"same.xlsx\"\n[output]\nfile = \"same.xlsx\"\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("overwrite"));
    }

    #[test]
    fn output_overwriting_input_through_dotted_path_rejected() {
        for input in [
            "[source]\nfile = \"ai.xlsx\"\n[output]\nfile = \"./ai.xlsx\"\n",
            "[reference]\nfile = \"data/Kitap1.xlsx\"\n[output]\nfile = \"data/../data/./Kitap1.xlsx\"\n",
        ] {
            let err = ReconConfig::from_toml(input).unwrap_err();
            assert!(err.to_string().contains("overwrite"), "{input}: {err}");
        }
    }

    #[test]
    fn parse_defers_validation() {
        let input = "[source]\nfile = \"same.xlsx\"\n[output]\nfile = \"same.xlsx\"\n";
        let mut config = ReconConfig::parse(input).unwrap();
        assert!(config.validate().is_err());
        config.output.file = PathBuf::from("other.xlsx");
        config.validate().unwrap();
    }

    #[test]
    fn same_file_folds_dots() {
        assert!(same_file(Path::new("a/b/../c.xlsx"), Path::new("./a/c.xlsx")));
        assert!(!same_file(Path::new("a/c.xlsx"), Path::new("b/c.xlsx")));
    }

    #[test]
    fn relative_paths_resolved_against_base() {
        let mut config = ReconConfig::from_toml(FULL).unwrap();
        config.resolve_paths(Path::new("/data/run"));
        assert_eq!(config.source.file, PathBuf::from("/data/run/exports/ai.xls"));
        assert_eq!(config.output.file, PathBuf::from("/data/run/out/diff.csv"));
    }
}
