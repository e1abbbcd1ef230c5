//! rpm-md parsing: `repomd.xml` and `primary.xml`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use obsoleter_core::Package;
use obsoleter_util::errors::ObsoleterError;

use crate::capability::{Capability, Flag};

/// Source package architecture. Source records never satisfy anything.
pub const SOURCE_ARCH: &str = "src";

/// One `<package>` of `primary.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub package: Package,
    #[serde(default)]
    pub provides: Vec<Capability>,
    #[serde(default)]
    pub requires: Vec<Capability>,
    #[serde(default)]
    pub obsoletes: Vec<Capability>,
    /// The file subset primary metadata lists (binaries, `/etc`, ...).
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Default)]
struct RecordBuilder {
    name: String,
    arch: String,
    epoch: String,
    version: String,
    release: String,
    provides: Vec<Capability>,
    requires: Vec<Capability>,
    obsoletes: Vec<Capability>,
    files: Vec<String>,
}

impl RecordBuilder {
    fn finish(self) -> miette::Result<PackageRecord> {
        if self.name.is_empty() || self.version.is_empty() || self.arch.is_empty() {
            return Err(metadata_error(format!(
                "package record `{}` lacks a name, version or arch",
                self.name
            )));
        }
        Ok(PackageRecord {
            package: Package::new(self.name, self.epoch, self.version, self.release, self.arch),
            provides: self.provides,
            requires: self.requires,
            obsoletes: self.obsoletes,
            files: self.files,
        })
    }
}

fn metadata_error(message: String) -> miette::Report {
    ObsoleterError::Metadata { message }.into()
}

fn attr(e: &BytesStart<'_>, key: &str) -> miette::Result<Option<String>> {
    let attribute = e
        .try_get_attribute(key)
        .map_err(|err| metadata_error(format!("bad attribute `{key}`: {err}")))?;
    match attribute {
        Some(a) => {
            let value = a
                .unescape_value()
                .map_err(|err| metadata_error(format!("bad attribute `{key}`: {err}")))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

fn entry(e: &BytesStart<'_>) -> miette::Result<Capability> {
    let name = attr(e, "name")?
        .ok_or_else(|| metadata_error("rpm:entry without a name".to_string()))?;
    let flag = attr(e, "flags")?.as_deref().and_then(Flag::from_repomd);
    Ok(Capability {
        name,
        flag,
        epoch: attr(e, "epoch")?,
        version: attr(e, "ver")?,
        release: attr(e, "rel")?,
    })
}

/// Attribute-carrying elements, whether written as `<x/>` or `<x></x>`.
fn element(
    ctx: &str,
    e: &BytesStart<'_>,
    current: &mut Option<RecordBuilder>,
) -> miette::Result<()> {
    if ctx == "metadata>package" {
        *current = Some(RecordBuilder::default());
        return Ok(());
    }
    let Some(record) = current.as_mut() else {
        return Ok(());
    };
    match ctx {
        "metadata>package>version" => {
            record.epoch = attr(e, "epoch")?.unwrap_or_default();
            record.version = attr(e, "ver")?.unwrap_or_default();
            record.release = attr(e, "rel")?.unwrap_or_default();
        }
        "metadata>package>format>rpm:provides>rpm:entry" => record.provides.push(entry(e)?),
        "metadata>package>format>rpm:requires>rpm:entry" => record.requires.push(entry(e)?),
        "metadata>package>format>rpm:obsoletes>rpm:entry" => record.obsoletes.push(entry(e)?),
        _ => {}
    }
    Ok(())
}

/// Parse `primary.xml` into package records, skipping source packages.
pub fn parse_primary(xml: &str) -> miette::Result<Vec<PackageRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<RecordBuilder> = None;
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
                element(&path.join(">"), e, &mut current)?;
            }
            Ok(Event::Empty(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                element(&path.join(">"), e, &mut current)?;
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e
                    .unescape()
                    .map_err(|err| {
                        metadata_error(format!(
                            "bad text at byte {}: {err}",
                            reader.buffer_position()
                        ))
                    })?
                    .into_owned();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");

                if ctx == "metadata>package" {
                    if let Some(record) = current.take() {
                        if record.arch == SOURCE_ARCH {
                            tracing::trace!("skipping source package {}", record.name);
                        } else {
                            records.push(record.finish()?);
                        }
                    }
                } else if let Some(record) = current.as_mut() {
                    match ctx.as_str() {
                        "metadata>package>name" => record.name = text_buf.clone(),
                        "metadata>package>arch" => record.arch = text_buf.clone(),
                        "metadata>package>format>file" => record.files.push(text_buf.clone()),
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(metadata_error(format!(
                    "Failed to parse primary.xml at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(records)
}

/// Find the `primary` data location (`repodata/...-primary.xml.gz`) in
/// `repomd.xml`.
pub fn primary_location(xml: &str) -> miette::Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut in_primary = false;

    loop {
        let (e, empty) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(_)) => {
                if path.join(">") == "repomd>data" {
                    in_primary = false;
                }
                path.pop();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(metadata_error(format!("Failed to parse repomd.xml: {e}")));
            }
            _ => continue,
        };

        path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
        match path.join(">").as_str() {
            "repomd>data" => in_primary = attr(&e, "type")?.as_deref() == Some("primary"),
            "repomd>data>location" if in_primary => {
                if let Some(href) = attr(&e, "href")? {
                    return Ok(href);
                }
            }
            _ => {}
        }
        if empty {
            path.pop();
        }
    }

    Err(metadata_error(
        "repomd.xml has no primary data location".to_string(),
    ))
}
