//! Package manifest model and file handling.
//!
//! A [`Manifest`] names the fields the merge engine understands and keeps every
//! other field verbatim, in document order, so merged output loses nothing the
//! primary manifest carried.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PmergeError;

/// Package name to version, in document order.
///
/// Versions are normally strings; anything else is kept but never compared.
pub type DependencyMap = Map<String, Value>;

/// Script name to shell command, in document order.
pub type ScriptMap = Map<String, Value>;

/// The fields the merge engine reads and rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognised {
    Author,
    Scripts,
    Dependencies,
}

impl Recognised {
    const ALL: [Self; 3] = [Self::Author, Self::Scripts, Self::Dependencies];

    fn key(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Scripts => "scripts",
            Self::Dependencies => "dependencies",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// A parsed `package.json`-style document.
///
/// Serialisation writes `author`, `scripts` and `dependencies` back where the
/// source document had them. Recognised fields the source lacked are
/// appended after the passthrough fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Fields the merge engine passes through untouched.
    pub fields: Map<String, Value>,
    pub author: Option<Author>,
    pub scripts: Option<ScriptMap>,
    pub dependencies: Option<DependencyMap>,
    /// Each recognised field read, with the number of passthrough fields
    /// that preceded it.
    layout: Vec<(Recognised, usize)>,
}

impl Manifest {
    fn from_document(document: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut manifest = Self::default();
        for (key, value) in document {
            let Some(field) = Recognised::from_key(&key) else {
                manifest.fields.insert(key, value);
                continue;
            };
            manifest.layout.push((field, manifest.fields.len()));
            let invalid = |err: serde_json::Error| {
                <serde_json::Error as de::Error>::custom(format_args!("`{key}`: {err}"))
            };
            match field {
                Recognised::Author => {
                    manifest.author = Some(serde_json::from_value(value).map_err(invalid)?);
                }
                Recognised::Scripts => {
                    manifest.scripts = serde_json::from_value(value).map_err(invalid)?;
                }
                Recognised::Dependencies => {
                    manifest.dependencies = serde_json::from_value(value).map_err(invalid)?;
                }
            }
        }
        Ok(manifest)
    }

    fn serialize_recognised<M: SerializeMap>(
        &self,
        map: &mut M,
        field: Recognised,
    ) -> Result<(), M::Error> {
        match field {
            Recognised::Author => self
                .author
                .as_ref()
                .map_or(Ok(()), |author| map.serialize_entry(field.key(), author)),
            Recognised::Scripts => self
                .scripts
                .as_ref()
                .map_or(Ok(()), |scripts| map.serialize_entry(field.key(), scripts)),
            Recognised::Dependencies => self
                .dependencies
                .as_ref()
                .map_or(Ok(()), |deps| map.serialize_entry(field.key(), deps)),
        }
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut placed = self.layout.iter().peekable();
        for (index, (key, value)) in self.fields.iter().enumerate() {
            while let Some((field, _)) = placed.next_if(|(_, at)| *at <= index) {
                self.serialize_recognised(&mut map, *field)?;
            }
            map.serialize_entry(key, value)?;
        }
        for (field, _) in placed {
            self.serialize_recognised(&mut map, *field)?;
        }
        for field in Recognised::ALL {
            if !self.layout.iter().any(|(seen, _)| *seen == field) {
                self.serialize_recognised(&mut map, field)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_document(document).map_err(de::Error::custom)
    }
}

/// The `author` field: a plain string, an npm person object, or any other
/// JSON value, which is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(flatten)]
        rest: Map<String, Value>,
    },
    Other(Value),
}

impl Author {
    /// `true` for an explicit `"author": null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Other(Value::Null))
    }
}

impl fmt::Display for Author {
    /// Renders people in the npm shorthand `Name <email> (url)` and any other
    /// value as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Person {
                name, email, url, ..
            } => {
                f.write_str(name)?;
                if let Some(email) = email {
                    write!(f, " <{email}>")?;
                }
                if let Some(url) = url {
                    write!(f, " ({url})")?;
                }
                Ok(())
            }
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Parse manifest JSON.
///
/// # Errors
///
/// Returns the JSON path of the offending value alongside the parse error.
pub fn parse_manifest(text: &str) -> Result<Manifest, (String, serde_json::Error)> {
    let mut de = serde_json::Deserializer::from_str(text);
    let manifest: Manifest = serde_path_to_error::deserialize(&mut de)
        .map_err(|err| (err.path().to_string(), err.into_inner()))?;
    de.end().map_err(|err| (String::from("."), err))?;
    Ok(manifest)
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`PmergeError::Read`] when the file cannot be read and
/// [`PmergeError::Parse`] when it is not a valid manifest.
pub fn read_manifest(path: &Path) -> Result<Manifest, PmergeError> {
    let text = fs::read_to_string(path).map_err(|source| PmergeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text).map_err(|(location, source)| PmergeError::Parse {
        path: path.to_path_buf(),
        location,
        source,
    })
}

/// Read the primary manifest, using an empty one when the file does not exist.
///
/// # Errors
///
/// Propagates read failures other than a missing file, and parse failures.
pub fn read_manifest_or_default(path: &Path) -> Result<Manifest, PmergeError> {
    match read_manifest(path) {
        Ok(manifest) => {
            info!("found main file {}", path.display());
            Ok(manifest)
        }
        Err(PmergeError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            warn!(
                "main file {} does not exist; merging into an empty manifest",
                path.display()
            );
            Ok(Manifest::default())
        }
        Err(e) => Err(e),
    }
}

/// List the files in `dir` whose names end with `manifest_name`.
///
/// The scan is not recursive. Paths are returned sorted by file name so merges
/// are reproducible across platforms.
///
/// # Errors
///
/// Returns [`PmergeError::Read`] when the directory cannot be listed.
pub fn discover_manifests(dir: &Path, manifest_name: &str) -> Result<Vec<PathBuf>, PmergeError> {
    let read_err = |source| PmergeError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(manifest_name));
        if matches && path.is_file() {
            found.push(path);
        } else {
            debug!("skipping {}", path.display());
        }
    }
    found.sort();
    for path in &found {
        info!("found {}", path.display());
    }
    Ok(found)
}

/// Render a manifest as two-space indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`PmergeError::Serialize`] if serialisation fails.
pub fn to_pretty_json(manifest: &Manifest) -> Result<String, PmergeError> {
    let mut text = serde_json::to_string_pretty(manifest)?;
    text.push('\n');
    Ok(text)
}

/// Write a manifest to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`PmergeError::Serialize`] or [`PmergeError::Write`].
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), PmergeError> {
    let text = to_pretty_json(manifest)?;
    fs::write(path, text).map_err(|source| PmergeError::Write {
        path: path.to_path_buf(),
        source,
    })
}
