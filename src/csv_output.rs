use std::{fs, path::Path};

use csv::Writer;

/// Tab-separated run report, appended to across runs.
#[derive(Debug)]
pub struct CsvOutput {
    pub writer: Writer<fs::File>,
}

impl CsvOutput {
    /// Open `path` for appending; a new (empty) table gets a header row.
    pub fn new(path: &Path) -> csv::Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        let mut output = Self {
            writer: csv::WriterBuilder::new().delimiter(b'\t').from_writer(file),
        };
        if is_empty {
            output.write_header()?;
        }
        Ok(output)
    }

    fn write_header(&mut self) -> csv::Result<()> {
        self.writer.write_record(["tag", "images", "clip", "status"])?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_group_row(
        &mut self,
        tag: &str,
        images: usize,
        clip: &str,
        status: &str,
    ) -> csv::Result<()> {
        let images = images.to_string();
        self.writer.write_record([tag, images.as_str(), clip, status])?;
        self.writer.flush()?;
        Ok(())
    }
}
