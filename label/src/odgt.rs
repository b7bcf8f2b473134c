use crate::AnnotationRecord;
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Load an `.odgt` annotation file, one JSON record per line.
pub fn load_odgt(path: impl AsRef<Path>) -> Result<Vec<AnnotationRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open annotation file '{}'", path.display()))?;
    parse_odgt(BufReader::new(file))
        .with_context(|| format!("failed to parse annotation file '{}'", path.display()))
}

/// Parse `.odgt` content. Blank lines are skipped.
pub fn parse_odgt<R>(reader: R) -> Result<Vec<AnnotationRecord>>
where
    R: BufRead,
{
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_num = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    return Some(Err(anyhow::Error::from(err)
                        .context(format!("failed to read line {}", line_num))))
                }
            };
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let record = serde_json::from_str(line)
                .with_context(|| format!("invalid record at line {}", line_num));
            Some(record)
        })
        .collect()
}
