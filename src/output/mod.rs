//! JSON output writing
//!
//! Serializes the extracted records and replaces the output file atomically:
//! the JSON is written to a temporary sibling file which is then renamed over
//! the destination, so readers never observe a partially written file and
//! prior content is fully replaced, never merged.

use crate::extract::AnnouncementRecord;
use crate::Result;
use std::fs;
use std::path::Path;

/// Writes the record list as pretty-printed UTF-8 JSON, replacing any prior file
///
/// # Arguments
///
/// * `records` - The records to persist
/// * `path` - Destination file path
///
/// # Returns
///
/// * `Ok(())` - File written and renamed into place
/// * `Err(ScrapeError)` - Serialization or filesystem failure
pub fn write_records(records: &[AnnouncementRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    // Rename within the destination directory so the replacement is atomic
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    // A failed write or rename must not leave the temp sibling behind
    if let Err(e) = fs::write(tmp, json.as_bytes()).and_then(|()| fs::rename(tmp, path)) {
        let _ = fs::remove_file(tmp);
        return Err(e.into());
    }

    Ok(())
}
