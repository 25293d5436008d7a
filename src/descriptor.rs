use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::models::{Coordinate, License};

/// Parsed form of a POM document.
///
/// Only the elements the resolver and the collector look at are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub licenses: Vec<License>,
    pub parent: Option<Coordinate>,
    pub dependencies: Vec<DeclaredDependency>,
    /// Entries of `<dependencyManagement>`, which pin versions and scopes for
    /// dependencies that leave them out.
    pub managed_dependencies: Vec<DeclaredDependency>,
    pub properties: HashMap<String, String>,
}

/// A `<dependency>` entry from `<dependencies>` or `<dependencyManagement>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("invalid XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("invalid text content: {0}")]
    Text(String),
    #[error("document has no root element")]
    Empty,
    #[error("document ended inside <{0}>")]
    Truncated(String),
}

#[derive(Default)]
struct ParentRef {
    group_id: String,
    artifact_id: String,
    version: String,
}

impl ParentRef {
    fn into_coordinate(self) -> Option<Coordinate> {
        if self.group_id.is_empty() || self.artifact_id.is_empty() || self.version.is_empty() {
            return None;
        }
        Some(Coordinate::new(self.group_id, self.artifact_id, self.version))
    }
}

/// Parse a POM document with the quick-xml event API.
///
/// Element paths are matched relative to the root element, so `<groupId>`
/// inside `<parent>` or `<dependencyManagement>` never leaks into the
/// project's own fields.
pub fn parse(xml: &str) -> Result<Descriptor, DescriptorError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptor = Descriptor::default();
    let mut parent: Option<ParentRef> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|source| DescriptorError::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;

        match event {
            Event::Start(ref e) => {
                stack.push(local_name(e));
                seen_root = true;
                open_element(&stack, &mut descriptor, &mut parent);
            }
            Event::Empty(ref e) => {
                stack.push(local_name(e));
                seen_root = true;
                open_element(&stack, &mut descriptor, &mut parent);
                stack.pop();
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| DescriptorError::Text(err.to_string()))?;
                apply_text(&stack, &text, &mut descriptor, &mut parent);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).into_owned();
                apply_text(&stack, &text, &mut descriptor, &mut parent);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DescriptorError::Truncated(open.clone()));
    }
    if !seen_root {
        return Err(DescriptorError::Empty);
    }

    descriptor.parent = parent.and_then(ParentRef::into_coordinate);
    Ok(descriptor)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned()
}

/// Path below the root element, e.g. `["licenses", "license", "name"]`.
fn relative(stack: &[String]) -> Vec<&str> {
    stack.iter().skip(1).map(String::as_str).collect()
}

fn open_element(stack: &[String], descriptor: &mut Descriptor, parent: &mut Option<ParentRef>) {
    match relative(stack).as_slice() {
        ["licenses", "license"] => descriptor.licenses.push(License::default()),
        ["parent"] => *parent = Some(ParentRef::default()),
        ["dependencies", "dependency"] => descriptor.dependencies.push(DeclaredDependency::default()),
        ["dependencyManagement", "dependencies", "dependency"] => descriptor
            .managed_dependencies
            .push(DeclaredDependency::default()),
        _ => {}
    }
}

fn apply_text(
    stack: &[String],
    text: &str,
    descriptor: &mut Descriptor,
    parent: &mut Option<ParentRef>,
) {
    match relative(stack).as_slice() {
        ["groupId"] | ["group"] => append(descriptor.group_id.get_or_insert_with(String::new), text),
        ["artifactId"] => append(descriptor.artifact_id.get_or_insert_with(String::new), text),
        ["version"] => append(descriptor.version.get_or_insert_with(String::new), text),

        ["licenses", "license", field] => {
            if let Some(license) = descriptor.licenses.last_mut() {
                match *field {
                    "name" => append(&mut license.name, text),
                    "url" => append(&mut license.url, text),
                    _ => {}
                }
            }
        }

        ["parent", field] => {
            if let Some(p) = parent.as_mut() {
                match *field {
                    "groupId" => append(&mut p.group_id, text),
                    "artifactId" => append(&mut p.artifact_id, text),
                    "version" => append(&mut p.version, text),
                    _ => {}
                }
            }
        }

        ["dependencies", "dependency", field] => {
            if let Some(dep) = descriptor.dependencies.last_mut() {
                apply_dependency_field(dep, field, text);
            }
        }

        ["dependencyManagement", "dependencies", "dependency", field] => {
            if let Some(dep) = descriptor.managed_dependencies.last_mut() {
                apply_dependency_field(dep, field, text);
            }
        }

        ["properties", key] => {
            append(
                descriptor.properties.entry(key.to_string()).or_default(),
                text,
            );
        }

        _ => {}
    }
}

fn apply_dependency_field(dep: &mut DeclaredDependency, field: &str, text: &str) {
    match field {
        "groupId" => append(&mut dep.group_id, text),
        "artifactId" => append(&mut dep.artifact_id, text),
        "version" => append(dep.version.get_or_insert_with(String::new), text),
        "scope" => append(dep.scope.get_or_insert_with(String::new), text),
        _ => {}
    }
}

fn append(target: &mut String, text: &str) {
    target.push_str(text);
}
