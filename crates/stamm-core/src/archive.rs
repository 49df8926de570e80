//! Read/write `.stamm` archives.
//!
//! A `.stamm` file is a ZIP container holding one record per person under
//! `profiles/` and a single `relationships.json` at the root.

use crate::config::Compression;
use crate::graph::{PersonId, RelationshipGraph};
use crate::profile::Profile;
use crate::schema::{self, RELATIONSHIPS_FILE, Relations};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Directory prefix of person records inside the container.
pub const PROFILES_DIR: &str = "profiles/";

/// Conventional extension of person record files.
pub const PROFILE_EXTENSION: &str = "dfile";

/// In-memory contents of a `.stamm` archive.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    /// Parsed records keyed by person id (the file name under `profiles/`).
    pub profiles: BTreeMap<PersonId, Profile>,
    pub relations: Relations,
}

impl Archive {
    pub fn new(profiles: BTreeMap<PersonId, Profile>, relations: Relations) -> Self {
        Self {
            profiles,
            relations,
        }
    }

    /// Build the layout input: every profile is a known person.
    pub fn graph(&self) -> RelationshipGraph {
        RelationshipGraph::new(self.profiles.keys().cloned(), self.relations.clone())
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// Raw record text, as shown by the inspector.
    pub fn raw_record(&self, id: &str) -> Option<&str> {
        self.profiles.get(id).map(|p| p.raw.as_str())
    }

    /// Display name of a person, falling back to the id for unknown persons.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.profiles.get(id).map_or(id, |p| p.name.as_str())
    }

    /// Write this archive to `path`.
    pub fn write(&self, path: &Path, compression: Compression) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create archive {}", path.display()))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = file_options(compression);

        for (id, profile) in &self.profiles {
            add_entry(&mut zip, &format!("{PROFILES_DIR}{id}"), profile.raw.as_bytes(), options)?;
        }
        let json = schema::to_json(&self.relations)?;
        add_entry(&mut zip, RELATIONSHIPS_FILE, json.as_bytes(), options)?;

        let mut writer = zip
            .finish()
            .with_context(|| format!("failed to finalize archive {}", path.display()))?;
        writer.flush()?;
        tracing::info!(
            "wrote {} profiles to {}",
            self.profiles.len(),
            path.display()
        );
        Ok(())
    }
}

fn file_options(compression: Compression) -> SimpleFileOptions {
    let method = match compression {
        Compression::Stored => CompressionMethod::Stored,
        Compression::Deflate => CompressionMethod::Deflated,
        Compression::Zstd => CompressionMethod::Zstd,
    };
    SimpleFileOptions::default().compression_method(method)
}

fn add_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .with_context(|| format!("failed to start archive entry {name}"))?;
    zip.write_all(content)
        .with_context(|| format!("failed to write archive entry {name}"))?;
    Ok(())
}

/// Final path segment of an entry name.
fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Load an archive from disk.
pub fn read(path: &Path) -> Result<Archive> {
    let file =
        File::open(path).with_context(|| format!("failed to open archive {}", path.display()))?;
    read_from(BufReader::new(file))
        .with_context(|| format!("failed to read archive {}", path.display()))
}

fn read_text(entry: &mut impl Read, name: &str) -> Result<String> {
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .with_context(|| format!("entry {name} is not valid UTF-8 text"))?;
    Ok(content)
}

/// Load an archive from any seekable reader.
pub fn read_from<R: Read + Seek>(reader: R) -> Result<Archive> {
    let mut zip = ZipArchive::new(reader).context("not a valid .stamm container")?;
    let mut profiles = BTreeMap::new();
    let mut relations = None;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        if name == RELATIONSHIPS_FILE {
            if relations.is_some() {
                anyhow::bail!("archive contains more than one {RELATIONSHIPS_FILE}");
            }
            let content = read_text(&mut entry, &name)?;
            relations = Some(schema::from_json(&content)?);
        } else if let Some(rest) = name.strip_prefix(PROFILES_DIR) {
            let id = base_name(rest).to_string();
            if id.is_empty() {
                continue;
            }
            let profile = Profile::parse(&read_text(&mut entry, &name)?);
            if !profile.has_name {
                tracing::warn!("profile {id} has no NAME line");
            }
            if profiles.insert(id.clone(), profile).is_some() {
                tracing::warn!("duplicate profile {id}, keeping the last one");
            }
        } else {
            tracing::debug!("ignoring archive entry {name}");
        }
    }

    let Some(relations) = relations else {
        anyhow::bail!("archive has no {RELATIONSHIPS_FILE}");
    };
    tracing::info!("loaded {} profiles, {} relations", profiles.len(), relations.len());
    Ok(Archive::new(profiles, relations))
}

/// Pack record files and a relationship document into a new archive.
///
/// Each record lands under `profiles/<file name>`. The JSON is checked before
/// anything is written.
pub fn write_files(
    path: &Path,
    profile_files: &[impl AsRef<Path>],
    relationships_json: &str,
    compression: Compression,
) -> Result<()> {
    let relations = schema::from_json(relationships_json)?;
    let mut profiles = BTreeMap::new();
    for file in profile_files {
        let file = file.as_ref();
        let id = file
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("profile path has no file name: {}", file.display()))?
            .to_string();
        let raw = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read profile {}", file.display()))?;
        if profiles.insert(id.clone(), Profile::parse(&raw)).is_some() {
            anyhow::bail!("two profile files share the name {id}");
        }
    }
    Archive::new(profiles, relations).write(path, compression)
}
