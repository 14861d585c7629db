use serde::{Deserialize, Serialize};

use crate::naming::goify;

/// Root of the API model handed over by the design parser.
///
/// The generator only ever reads it. Resource order is the declared order
/// and drives both the entrypoint mount order and the controller file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescription {
    /// API name, used as the default service name
    pub name: String,
    /// Free-form description (unused by the templates)
    #[serde(default)]
    pub description: Option<String>,
    /// Resources in declared order
    #[serde(default)]
    pub resources: Vec<ResourceDescription>,
    /// Declared API versions; an empty version is the default version
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
    /// Media type registry
    #[serde(default)]
    pub media_types: Vec<MediaTypeDescription>,
}

impl ApiDescription {
    /// Look up a media type by identifier, comparing canonical forms.
    pub fn media_type(&self, identifier: &str) -> Option<&MediaTypeDescription> {
        find_media_type(&self.media_types, identifier)
    }

    /// Non-default versions, in declared order.
    pub fn explicit_versions(&self) -> impl Iterator<Item = &VersionInfo> {
        self.versions.iter().filter(|v| !v.is_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl VersionInfo {
    pub fn is_default(&self) -> bool {
        self.version.is_empty()
    }
}

/// A named collection of actions, optionally bound to a set of API versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescription {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Versions this resource is exposed under; empty means unversioned
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionDescription>,
}

impl ResourceDescription {
    pub fn supports_no_version(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn supports_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// The (resource, version) pairs a controller file is rendered for.
    ///
    /// An unversioned resource yields a single binding with an empty
    /// version. A versioned resource yields one binding per declared
    /// version and no unversioned binding.
    pub fn bindings(&self) -> Vec<ControllerVersionBinding<'_>> {
        if self.versions.is_empty() {
            return vec![ControllerVersionBinding::new(self, "")];
        }
        self.versions
            .iter()
            .map(|v| ControllerVersionBinding::new(self, v))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescription {
    pub name: String,
    /// Possible responses in declaration order
    #[serde(default)]
    pub responses: Vec<ResponseDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescription {
    /// Response name; generated contexts expose one send method per name
    pub name: String,
    pub status: u16,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTypeDescription {
    pub identifier: String,
    /// Name of the generated data structure. Derived from the identifier when absent.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub views: Vec<ViewDescription>,
    /// Collections are rendered as slices and passed by value
    #[serde(default)]
    pub collection: bool,
}

impl MediaTypeDescription {
    pub fn has_multiple_views(&self) -> bool {
        self.views.len() > 1
    }

    /// Whether the generated data structure is handled through a pointer.
    pub fn by_reference(&self) -> bool {
        !self.collection
    }

    /// Go name of the generated data structure.
    ///
    /// `application/vnd.goa.example.bottle+json` becomes `GoaExampleBottle`.
    pub fn go_type_name(&self) -> String {
        if let Some(name) = self.type_name.as_deref().filter(|n| !n.is_empty()) {
            return goify(name, true);
        }
        let base = canonical_identifier(&self.identifier);
        let base = base.split(';').next().unwrap_or_default();
        let subtype = base.rsplit('/').next().unwrap_or(base);
        let subtype = subtype.strip_prefix("vnd.").unwrap_or(subtype);
        let mut name = goify(subtype, true);
        if self.collection {
            name.push_str("Collection");
        }
        name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDescription {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// A resource paired with the version it is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerVersionBinding<'a> {
    pub resource: &'a ResourceDescription,
    /// Empty for the unversioned binding
    pub version: String,
}

impl<'a> ControllerVersionBinding<'a> {
    pub fn new(resource: &'a ResourceDescription, version: &str) -> Self {
        Self {
            resource,
            version: version.to_string(),
        }
    }

    /// Mangled controller type name for this binding.
    pub fn controller_name(&self) -> String {
        crate::naming::mangle(&self.resource.name, &self.version)
    }
}

/// First entry of `registry` whose identifier has the same canonical form as
/// `identifier`.
pub fn find_media_type<'a>(
    registry: &'a [MediaTypeDescription],
    identifier: &str,
) -> Option<&'a MediaTypeDescription> {
    let wanted = canonical_identifier(identifier);
    registry
        .iter()
        .find(|mt| canonical_identifier(&mt.identifier) == wanted)
}

/// Canonical form of a media type identifier.
///
/// Lowercases, drops any `+suffix` from the base type and rewrites
/// parameters as `; key=value`. `application/vnd.Bottle+json; Type=Collection`
/// becomes `application/vnd.bottle; type=collection`.
pub fn canonical_identifier(identifier: &str) -> String {
    let lowered = identifier.trim().to_ascii_lowercase();
    let mut parts = lowered.split(';');
    let base = parts.next().unwrap_or_default().trim();
    let base = match base.find('+') {
        Some(idx) => &base[..idx],
        None => base,
    };
    let mut out = base.to_string();
    for param in parts {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        match param.split_once('=') {
            Some((k, v)) => {
                out.push_str("; ");
                out.push_str(k.trim());
                out.push('=');
                out.push_str(v.trim().trim_matches('"'));
            }
            None => {
                out.push_str("; ");
                out.push_str(param);
            }
        }
    }
    out
}
