use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity shared by services and service templates.
pub type ServiceId = i32;

/// A service or template as stored (business view).
///
/// The resolver only looks at `command_id` and `template_id` through the
/// repository; the remaining fields are display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: ServiceId,
    pub description: String,
    pub alias: Option<String>,
    pub is_template: bool,
    pub command_id: Option<i32>,
    pub template_id: Option<ServiceId>,
}

/// On-demand macro declared by one service or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMacro {
    pub name: String,
    pub value: String,
    pub is_password: bool,
    pub description: Option<String>,
    pub order: i32,
    /// Service or template declaring the macro.
    pub owner_id: ServiceId,
}

impl ServiceMacro {
    pub fn new(owner_id: ServiceId, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_password: false,
            description: None,
            order: 0,
            owner_id,
        }
    }

    pub fn with_password(mut self, is_password: bool) -> Self {
        self.is_password = is_password;
        self
    }
}

/// Which macros a resolution should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroScope {
    /// Only the macros declared on the queried service.
    OwnOnly,
    /// Macros of the whole inheritance chain, closer definitions winning.
    WithInheritance,
}

impl MacroScope {
    pub fn from_inheritance_flag(use_inheritance: bool) -> Self {
        if use_inheritance { MacroScope::WithInheritance } else { MacroScope::OwnOnly }
    }
}

/// Override-applied macro set, keyed by macro name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedMacros {
    macros: BTreeMap<String, ServiceMacro>,
}

impl ResolvedMacros {
    /// Insert-or-overwrite by name.
    pub(crate) fn apply(&mut self, m: ServiceMacro) {
        self.macros.insert(m.name.clone(), m);
    }

    pub fn get(&self, name: &str) -> Option<&ServiceMacro> { self.macros.get(name) }

    pub fn value(&self, name: &str) -> Option<&str> { self.macros.get(name).map(|m| m.value.as_str()) }

    pub fn len(&self) -> usize { self.macros.len() }

    pub fn is_empty(&self) -> bool { self.macros.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceMacro> { self.macros.values() }

    /// Plain `name -> value` view.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.macros.iter().map(|(k, m)| (k.clone(), m.value.clone())).collect()
    }

    pub fn into_vec(self) -> Vec<ServiceMacro> { self.macros.into_values().collect() }
}

impl FromIterator<ServiceMacro> for ResolvedMacros {
    fn from_iter<I: IntoIterator<Item = ServiceMacro>>(iter: I) -> Self {
        let mut set = ResolvedMacros::default();
        for m in iter {
            set.apply(m);
        }
        set
    }
}

/// Ids from the queried service up to the root template, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritanceChain {
    ids: Vec<ServiceId>,
}

impl InheritanceChain {
    pub(crate) fn new(ids: Vec<ServiceId>) -> Self { Self { ids } }

    /// The queried service.
    pub fn service_id(&self) -> Option<ServiceId> { self.ids.first().copied() }

    pub fn ids(&self) -> &[ServiceId] { &self.ids }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Furthest ancestor first, ending with the queried service.
    pub fn from_root(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.ids.iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_macro_with_same_name_overwrites() {
        let set: ResolvedMacros = vec![
            ServiceMacro::new(20, "WARN", "70"),
            ServiceMacro::new(20, "CRIT", "90"),
            ServiceMacro::new(3, "WARN", "80"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.value("WARN"), Some("80"));
        assert_eq!(set.get("WARN").map(|m| m.owner_id), Some(3));
        assert_eq!(set.value("CRIT"), Some("90"));
    }

    #[test]
    fn chain_walks_from_root() {
        let chain = InheritanceChain::new(vec![3, 20, 40]);
        assert_eq!(chain.service_id(), Some(3));
        assert_eq!(chain.from_root().collect::<Vec<_>>(), vec![40, 20, 3]);
    }

    #[test]
    fn scope_from_flag() {
        assert_eq!(MacroScope::from_inheritance_flag(true), MacroScope::WithInheritance);
        assert_eq!(MacroScope::from_inheritance_flag(false), MacroScope::OwnOnly);
    }
}
