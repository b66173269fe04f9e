use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::FrequencyProfile;

/// Reads a serialized frequency profile. The profile is parsed but not
/// validated here: featurization output may legitimately carry both k=3 and
/// codons, and the optimizer applies the stricter target-profile rules
/// itself.
pub fn read_profile<P: AsRef<Path>>(path: P) -> Result<FrequencyProfile> {
    let file = File::open(path)?;
    let profile = serde_json::from_reader(BufReader::new(file))?;
    Ok(profile)
}

/// Writes a frequency profile as pretty-printed JSON.
pub fn write_profile<P: AsRef<Path>>(path: P, profile: &FrequencyProfile) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, profile)?;
    writer.write_all(b"\n")?;
    Ok(())
}
