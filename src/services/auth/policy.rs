//! Per-resource audience / role policy resolution.

use std::collections::HashMap;

use crate::config::AuthSettings;

/// Effective policy for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAuthPolicy {
    pub resource: String,
    pub audiences: Vec<String>,
    // None => no role restriction
    pub allowed_roles: Option<Vec<String>>,
}

impl ResourceAuthPolicy {
    /// Ad-hoc policy for routes that are not configured resources.
    pub fn new<I, S>(resource: impl Into<String>, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource: resource.into(),
            audiences: audiences.into_iter().map(Into::into).collect(),
            allowed_roles: None,
        }
    }

    pub fn with_allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }
}

/// Resolved once from the settings; read-only afterwards.
#[derive(Debug, Clone)]
pub struct AudiencePolicy {
    global: Vec<String>,
    // only resources with their own audience set; the rest inherit `global`
    audiences: HashMap<String, Vec<String>>,
    allowed_roles: HashMap<String, Vec<String>>,
}

impl AudiencePolicy {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let mut audiences = HashMap::new();
        let mut allowed_roles = HashMap::new();

        for (name, r) in &settings.resources {
            // full override, never a union with the global set
            if let Some(own) = &r.audiences {
                audiences.insert(name.clone(), dedup(own));
            }
            if let Some(roles) = &r.allowed_roles {
                allowed_roles.insert(name.clone(), dedup(roles));
            }
        }

        Self {
            global: dedup(&settings.audiences),
            audiences,
            allowed_roles,
        }
    }

    /// Accepted audiences for `resource`: its override if one is configured,
    /// otherwise the global set.
    pub fn audiences_for(&self, resource: &str) -> &[String] {
        self.audiences
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or(&self.global)
    }

    /// Full policy for `resource`. Unknown resources get the global audiences and
    /// no role restriction.
    pub fn resolve(&self, resource: &str) -> ResourceAuthPolicy {
        let policy =
            ResourceAuthPolicy::new(resource, self.audiences_for(resource).iter().cloned());
        match self.allowed_roles.get(resource) {
            Some(roles) => policy.with_allowed_roles(roles.iter().cloned()),
            None => policy,
        }
    }
}

// keeps first-seen order
fn dedup(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}
