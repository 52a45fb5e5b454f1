//! Tar encoding of build archives
//!
//! The backend receives the build context as a single tar stream. Entries are
//! written in archive order with fixed metadata so identical batches encode to
//! identical bytes.

use std::io::{self, Read};

use crate::domain::entities::BuildArchive;

const ENTRY_MODE: u32 = 0o644;

/// Encode `archive` as an uncompressed tar stream
pub fn encode_tar(archive: &BuildArchive) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    builder.mode(tar::HeaderMode::Deterministic);

    for entry in archive.entries() {
        let mut header = tar::Header::new_gnu();
        header.set_size(entry.bytes.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, &entry.name, entry.bytes.as_slice())?;
    }

    builder.into_inner()
}

/// Decode a tar stream back into `(name, bytes)` pairs, in order
pub fn decode_tar(bytes: &[u8]) -> io::Result<Vec<(String, Vec<u8>)>> {
    let mut archive = tar::Archive::new(bytes);
    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        entries.push((name, content));
    }
    Ok(entries)
}
