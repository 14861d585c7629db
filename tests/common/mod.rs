#![allow(dead_code)]

use scaffoldgen::generator::{FixedPackage, Generator, GeneratorOptions, SourceFormatter};
use scaffoldgen::model::{
    ActionDescription, ApiDescription, MediaTypeDescription, ResourceDescription,
    ResponseDescription, VersionInfo, ViewDescription,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const PACKAGE: &str = "github.com/goa/cellar";

pub fn view(name: &str) -> ViewDescription {
    ViewDescription {
        name: name.to_string(),
        attributes: vec![],
    }
}

pub fn action(name: &str, responses: Vec<ResponseDescription>) -> ActionDescription {
    ActionDescription {
        name: name.to_string(),
        responses,
    }
}

pub fn ok(media_type: &str) -> ResponseDescription {
    ResponseDescription {
        name: "OK".to_string(),
        status: 200,
        media_type: Some(media_type.to_string()),
    }
}

pub fn resource(name: &str, versions: &[&str], actions: Vec<ActionDescription>) -> ResourceDescription {
    ResourceDescription {
        name: name.to_string(),
        description: None,
        versions: versions.iter().map(|v| v.to_string()).collect(),
        actions,
    }
}

/// Three resources: two unversioned, one exposed under v1 and v2.
pub fn cellar_api() -> ApiDescription {
    ApiDescription {
        name: "cellar".to_string(),
        description: Some("The wine review service".to_string()),
        resources: vec![
            resource(
                "Account",
                &[],
                vec![
                    action("show", vec![ok("application/vnd.goa.example.account+json")]),
                    action(
                        "delete",
                        vec![ResponseDescription {
                            name: "NoContent".to_string(),
                            status: 204,
                            media_type: None,
                        }],
                    ),
                ],
            ),
            resource(
                "Bottle",
                &[],
                vec![
                    action("show", vec![ok("application/vnd.goa.example.bottle+json")]),
                    action("list", vec![ok("application/vnd.goa.example.bottle+json; type=collection")]),
                ],
            ),
            resource(
                "RatingReview",
                &["v1", "v2"],
                vec![action("rate", vec![ok("application/vnd.goa.example.account+json")])],
            ),
        ],
        versions: vec![
            VersionInfo {
                version: String::new(),
                description: None,
            },
            VersionInfo {
                version: "v1".to_string(),
                description: None,
            },
            VersionInfo {
                version: "v2".to_string(),
                description: None,
            },
        ],
        media_types: vec![
            MediaTypeDescription {
                identifier: "application/vnd.goa.example.account+json".to_string(),
                type_name: Some("Account".to_string()),
                views: vec![view("default")],
                collection: false,
            },
            MediaTypeDescription {
                identifier: "application/vnd.goa.example.bottle+json".to_string(),
                type_name: Some("Bottle".to_string()),
                views: vec![view("default"), view("tiny"), view("full")],
                collection: false,
            },
            MediaTypeDescription {
                identifier: "application/vnd.goa.example.bottle+json; type=collection".to_string(),
                type_name: Some("BottleCollection".to_string()),
                views: vec![view("default"), view("tiny")],
                collection: true,
            },
        ],
    }
}

pub fn generator() -> Generator {
    Generator::new(GeneratorOptions::default())
        .with_resolver(Box::new(FixedPackage(PACKAGE.to_string())))
}

/// Sorted file names directly under `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Passes source through untouched until the `fail_on`-th call, which errors.
pub struct FailingFormatter {
    calls: AtomicUsize,
    fail_on: usize,
}

impl FailingFormatter {
    pub fn new(fail_on: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

impl SourceFormatter for FailingFormatter {
    fn format(&self, path: &Path, source: &str) -> anyhow::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            anyhow::bail!("refusing to format {}", path.display());
        }
        Ok(source.to_string())
    }
}

pub fn paths(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| dir.join(n)).collect()
}

/// Replaces the destination of `file_name` with a directory while
/// formatting it, so the write that follows fails.
pub struct DirectoryInTheWay {
    pub file_name: &'static str,
}

impl SourceFormatter for DirectoryInTheWay {
    fn format(&self, path: &Path, source: &str) -> anyhow::Result<String> {
        if path.file_name().is_some_and(|n| n == self.file_name) {
            std::fs::create_dir(path)?;
        }
        Ok(source.to_string())
    }
}
