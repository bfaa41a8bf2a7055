//! Dataset files
//!
//! A dataset is a list of named columns, stored as YAML or JSON:
//!
//! ```yaml
//! - name: price
//!   type: numeric
//!   values: [12.5, 13.0, 9.75]
//! - name: store
//!   type: categorical
//!   values: [north, south, north]
//! ```

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail};
use rsample_core::{Column, Frame, Table};
use serde::{Deserialize, Serialize};

/// One column as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric { name: String, values: Vec<f64> },
    Categorical { name: String, values: Vec<String> },
}

/// Build a frame from stored columns, in file order
pub fn frame_from_columns(columns: Vec<ColumnData>) -> color_eyre::Result<Frame> {
    if columns.is_empty() {
        bail!("dataset has no columns");
    }

    let mut frame = Frame::new();
    for column in columns {
        let (name, values) = match column {
            ColumnData::Numeric { name, values } => (name, Column::Numeric(values)),
            ColumnData::Categorical { name, values } => (name, Column::Categorical(values)),
        };
        frame = frame
            .with_column(name.clone(), values)
            .wrap_err_with(|| format!("invalid column '{name}'"))?;
    }
    Ok(frame)
}

/// Parse dataset text; `json` selects JSON over YAML
pub fn parse_frame(content: &str, json: bool) -> color_eyre::Result<Frame> {
    let columns: Vec<ColumnData> = if json {
        serde_json::from_str(content).wrap_err("failed to parse JSON dataset")?
    } else {
        serde_saphyr::from_str(content).wrap_err("failed to parse YAML dataset")?
    };
    frame_from_columns(columns)
}

/// Load a dataset file. Files ending in `.json` are read as JSON, anything
/// else as YAML.
pub fn load_frame(path: &Path) -> color_eyre::Result<Frame> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read dataset {}", path.display()))?;
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let frame =
        parse_frame(&content, json).wrap_err_with(|| format!("in dataset {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rows = frame.nrow(),
        "loaded dataset"
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsample_core::ColumnRef;
    use tempfile::tempdir;

    const YAML: &str = "\
- name: price
  type: numeric
  values: [1.5, 2.0, 3.25]
- name: store
  type: categorical
  values: [north, south, north]
";

    #[test]
    fn test_parse_yaml_columns() {
        let frame = parse_frame(YAML, false).unwrap();
        assert_eq!(frame.nrow(), 3);
        assert_eq!(frame.column_names(), vec!["price", "store"]);
        assert_eq!(
            frame.column("price"),
            Some(ColumnRef::Numeric(&[1.5, 2.0, 3.25]))
        );
    }

    #[test]
    fn test_parse_json_columns() {
        let json = r#"[{"name": "y", "type": "numeric", "values": [1, 2, 3, 4]}]"#;
        let frame = parse_frame(json, true).unwrap();
        assert_eq!(frame.nrow(), 4);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let json = r#"[
            {"name": "a", "type": "numeric", "values": [1, 2, 3]},
            {"name": "b", "type": "categorical", "values": ["x"]}
        ]"#;
        let err = parse_frame(json, true).unwrap_err();
        assert!(format!("{err:#}").contains("invalid column 'b'"));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(parse_frame("[]", true).is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.yml");
        fs::write(&path, YAML).unwrap();
        assert_eq!(load_frame(&path).unwrap().nrow(), 3);

        let missing = dir.path().join("missing.json");
        assert!(load_frame(&missing).is_err());
    }
}
