// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of named device profiles.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{ConfigError, Error, Result};

use super::DeviceProfile;

/// Lookup table from profile name to [`DeviceProfile`].
///
/// Card configuration refers to profiles by name. The registry is an
/// explicit object handed to whoever builds cards, so there is no ambient
/// global table. It uses `parking_lot::RwLock` internally and can be shared
/// between tasks behind an `Arc`.
///
/// # Examples
///
/// ```
/// use hubcard_lib::profile::{DeviceProfileBuilder, ProfileRegistry};
///
/// let registry = ProfileRegistry::with_builtin();
/// assert!(registry.get("smart-plug").is_some());
///
/// let lock = DeviceProfileBuilder::new("lock").domain("lock").build().unwrap();
/// registry.register(lock).unwrap();
/// assert!(registry.contains("lock"));
/// ```
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<String, DeviceProfile>>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding every built-in preset.
    #[must_use]
    pub fn with_builtin() -> Self {
        let profiles = DeviceProfile::builtin()
            .into_iter()
            .map(|profile| (profile.name().to_string(), profile))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Registers a profile, replacing any profile with the same name.
    ///
    /// Returns the replaced profile, if any.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the profile is unusable.
    pub fn register(
        &self,
        profile: DeviceProfile,
    ) -> std::result::Result<Option<DeviceProfile>, ConfigError> {
        profile.validate()?;
        tracing::debug!(profile = %profile.name(), "Registering device profile");
        Ok(self
            .profiles
            .write()
            .insert(profile.name().to_string(), profile))
    }

    /// Removes a profile. Returns `true` if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.profiles.write().remove(name).is_some()
    }

    /// Returns a copy of the named profile.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<DeviceProfile> {
        self.profiles.read().get(name).cloned()
    }

    /// Returns the named profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProfile`] if no profile has that name.
    pub fn resolve(&self, name: &str) -> Result<DeviceProfile> {
        self.get(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }

    /// Returns `true` if a profile with that name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.read().contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Returns `true` if no profile is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

impl Default for ProfileRegistry {
    /// Same as [`new`](Self::new): an empty registry.
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("profiles", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DeviceProfileBuilder;

    #[test]
    fn new_registry_is_empty() {
        let registry = ProfileRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("generic").is_none());
    }

    #[test]
    fn default_matches_new() {
        let registry = ProfileRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.names(), ProfileRegistry::new().names());
        assert!(!ProfileRegistry::with_builtin().is_empty());
    }

    #[test]
    fn builtin_registry_has_presets() {
        let registry = ProfileRegistry::with_builtin();
        assert_eq!(registry.len(), DeviceProfile::builtin().len());
        assert_eq!(registry.names()[0], "contact-sensor");
        assert_eq!(registry.get("thermostat"), Some(DeviceProfile::thermostat()));
    }

    #[test]
    fn register_replaces_existing() {
        let registry = ProfileRegistry::with_builtin();
        let custom = DeviceProfileBuilder::new("generic")
            .icon("mdi:star")
            .build()
            .unwrap();

        let previous = registry.register(custom).unwrap();
        assert_eq!(previous, Some(DeviceProfile::generic()));
        assert_eq!(registry.get("generic").unwrap().icon(), "mdi:star");
    }

    #[test]
    fn register_rejects_invalid_profile() {
        let registry = ProfileRegistry::new();
        let bad: DeviceProfile = serde_json::from_str(
            r#"{"name":"bad","icon":"mdi:x","suffixes":[""]}"#,
        )
        .unwrap();

        assert_eq!(registry.register(bad), Err(ConfigError::EmptySuffix));
        assert!(registry.is_empty());
    }

    #[test]
    fn resolve_unknown_profile() {
        let registry = ProfileRegistry::new();
        let err = registry.resolve("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownProfile(name) if name == "nope"));
    }

    #[test]
    fn unregister_removes() {
        let registry = ProfileRegistry::with_builtin();
        assert!(registry.unregister("controller"));
        assert!(!registry.unregister("controller"));
        assert!(!registry.contains("controller"));
    }

    #[test]
    fn debug_lists_names() {
        let registry = ProfileRegistry::new();
        assert_eq!(format!("{registry:?}"), "ProfileRegistry { profiles: [] }");
    }
}
