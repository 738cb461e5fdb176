//! JSON rendering of reconstructed tables.

use crate::error::{Error, Result};
use crate::model::Table;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert tables to JSON.
pub fn to_json(tables: &[Table], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(tables),
        JsonFormat::Compact => serde_json::to_string(tables),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Row, TextFragment};

    fn table() -> Table {
        let frag = TextFragment::new("Total", BBox::new(10.0, 20.0, 40.0, 30.0));
        Table::new(4, vec![Row::seeded(frag)])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&[table()], JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"page_number\": 4"));
        assert!(json.contains("Total"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&[table()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["rows"][0]["seed_y"], 20.0);
        assert_eq!(value[0]["rows"][0]["fragments"][0]["text"], "Total");
    }
}
