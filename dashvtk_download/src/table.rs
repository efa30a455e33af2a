use dashvtk_nodes::NodeType;
use dashvtk_scene::SceneNode;
use dashvtk_variant::Variant;

use crate::error::DownloadError;
use crate::payload::{Download, DownloadOptions, send_writer};

/// Rows of named columns, exported as CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Variant>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub header: bool,
    /// Prepend a zero-based row index column.
    pub index: bool,
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            header: true,
            index: false,
            delimiter: b',',
        }
    }
}

fn cell_text(value: &Variant) -> String {
    match value {
        Variant::Null => String::new(),
        Variant::String(s) => s.to_string(),
        Variant::Array(_) | Variant::Object(_) => value.to_json_value().to_string(),
        other => other.to_string(),
    }
}

impl DataTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Variant>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<Variant>) -> Result<(), DownloadError> {
        if row.len() != self.columns.len() {
            return Err(DownloadError::RowLength {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Variant>, DownloadError> {
        let i = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[i]).collect())
    }

    fn column_index(&self, name: &str) -> Result<usize, DownloadError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DownloadError::UnknownColumn(name.to_string()))
    }

    /// Table restricted to `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<DataTable, DownloadError> {
        let picks = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataTable {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| picks.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    /// One row per tuple of a DataArray node.
    pub fn from_data_array(node: &SceneNode) -> Result<DataTable, DownloadError> {
        if node.ty() != NodeType::DataArray {
            return Err(DownloadError::NotADataArray(node.ty().to_string()));
        }
        let name = node.get_str("name").unwrap_or("values");
        let comps = node
            .get("numberOfComponents")
            .and_then(Variant::as_integral)
            .map_or(1, |n| n.max(1) as usize);
        let values = node.get("values").and_then(Variant::as_array).unwrap_or(&[]);

        let mut table = if comps == 1 {
            DataTable::new([name.to_string()])
        } else {
            DataTable::new((0..comps).map(|c| format!("{name}_{c}")))
        };
        for tuple in values.chunks(comps) {
            table.push_row(tuple.to_vec())?;
        }
        Ok(table)
    }

    pub fn write_csv<W: std::io::Write>(&self, out: W, options: &TableOptions) -> Result<(), DownloadError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_writer(out);

        if options.header {
            let mut header: Vec<&str> = Vec::with_capacity(self.columns.len() + 1);
            if options.index {
                header.push("");
            }
            header.extend(self.columns.iter().map(String::as_str));
            writer.write_record(&header)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
            if options.index {
                record.push(i.to_string());
            }
            record.extend(row.iter().map(cell_text));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self, options: &TableOptions) -> Result<String, DownloadError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, options)?;
        String::from_utf8(buf).map_err(|_| DownloadError::NotUtf8)
    }
}

/// Table download written lazily as CSV text.
pub fn send_table(table: DataTable, filename: impl Into<String>, options: TableOptions) -> Download {
    let download_options = DownloadOptions {
        mime_type: Some("text/csv".to_string()),
        text: true,
    };
    send_writer(
        move |out| table.write_csv(out, &options),
        filename,
        download_options,
    )
}
