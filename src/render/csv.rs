//! Delimited-text output of fragments and reconstructed tables.

use std::io;

use crate::error::Result;
use crate::model::{Row, Table, TextFragment};

/// How tables are laid out in CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvLayout {
    /// One `x0,y0,x1,y1,text` record per fragment, in row order
    #[default]
    Records,
    /// One record per row, one field per cell
    Grid,
}

/// Writes fragments and rows as CSV records.
///
/// Quoting follows the `csv` crate defaults, so fields containing commas,
/// quotes or newlines are quoted. Call [`TableWriter::flush`] (or
/// [`TableWriter::into_inner`]) to surface write errors.
pub struct TableWriter<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(writer);
        Self { inner }
    }

    /// Write one record per fragment, in the order given.
    pub fn write_fragments<'a, I>(&mut self, fragments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        for frag in fragments {
            let b = frag.bbox();
            self.inner.write_record([
                b.x0.to_string(),
                b.y0.to_string(),
                b.x1.to_string(),
                b.y1.to_string(),
                frag.text().to_string(),
            ])?;
        }
        Ok(())
    }

    /// Write the fragments of each row, rows in order.
    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        self.write_fragments(rows.iter().flat_map(|r| r.fragments.iter()))
    }

    /// Write each row as a single record of cell texts.
    pub fn write_grid(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            self.inner.write_record(row.cells())?;
        }
        Ok(())
    }

    /// Write a table in the given layout.
    pub fn write_table(&mut self, table: &Table, layout: CsvLayout) -> Result<()> {
        match layout {
            CsvLayout::Records => self.write_rows(&table.rows),
            CsvLayout::Grid => self.write_grid(&table.rows),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

/// Render tables to a CSV string.
pub fn to_csv(tables: &[Table], layout: CsvLayout) -> Result<String> {
    let mut writer = TableWriter::new(Vec::new());
    for table in tables {
        writer.write_table(table, layout)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(text: &str, x0: f32, y0: f32) -> TextFragment {
        TextFragment::new(text, BBox::new(x0, y0, x0 + 20.5, y0 + 10.0))
    }

    fn table() -> Table {
        let mut header = Row::seeded(frag("Item", 72.0, 700.0));
        header.fragments.push(frag("Price, USD", 200.0, 700.0));
        let body = Row::seeded(frag("Tea", 72.0, 680.0));
        Table::new(1, vec![header, body])
    }

    #[test]
    fn test_write_fragments_in_given_order() {
        let mut writer = TableWriter::new(Vec::new());
        writer
            .write_fragments(&[frag("b", 50.0, 10.0), frag("a", 0.0, 20.0)])
            .unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "50,10,70.5,20,b\n0,20,20.5,30,a\n");
    }

    #[test]
    fn test_records_quote_delimiters() {
        let csv = to_csv(&[table()], CsvLayout::Records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "72,700,92.5,710,Item");
        assert_eq!(lines[1], "200,700,220.5,710,\"Price, USD\"");
    }

    #[test]
    fn test_grid_layout() {
        let csv = to_csv(&[table()], CsvLayout::Grid).unwrap();
        assert_eq!(csv, "Item,\"Price, USD\"\nTea\n");
    }

    #[test]
    fn test_multiline_text_is_quoted() {
        let csv = to_csv(
            &[Table::new(1, vec![Row::seeded(frag("a\nb", 0.0, 0.0))])],
            CsvLayout::Grid,
        )
        .unwrap();
        assert_eq!(csv, "\"a\nb\"\n");
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(to_csv(&[], CsvLayout::Records).unwrap(), "");
    }
}
