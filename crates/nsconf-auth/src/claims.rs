//! Identity claims and the group-membership check.
//!
//! OIDC providers deliver the groups claim either as a single string or as
//! an array of strings, and some omit it entirely. Every check reads the
//! live identity; nothing is cached.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nsconf_core::config::{AccessConfig, DEFAULT_REQUIRED_GROUP};

/// Group required to access the application.
pub const REQUIRED_GROUP: &str = DEFAULT_REQUIRED_GROUP;

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// ID-token profile claims. `None` when the provider supplied no profile.
    #[serde(default)]
    pub profile: Option<Map<String, Value>>,
}

impl Identity {
    /// Identity whose profile carries only a groups claim.
    pub fn with_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups = groups.into_iter().map(|g| Value::String(g.into())).collect();
        let mut profile = Map::new();
        profile.insert("groups".to_string(), Value::Array(groups));
        Self {
            profile: Some(profile),
        }
    }

    /// Display name: `preferred_username`, then `name`, then `email`, then `sub`.
    pub fn display_name(&self) -> Option<&str> {
        let profile = self.profile.as_ref()?;
        ["preferred_username", "name", "email", "sub"]
            .iter()
            .find_map(|key| profile.get(*key).and_then(Value::as_str))
    }

    fn claim(&self, name: &str) -> Option<&Value> {
        self.profile.as_ref()?.get(name)
    }
}

/// Which group grants access and where to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub required_group: String,
    pub groups_claim: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            required_group: REQUIRED_GROUP.to_string(),
            groups_claim: "groups".to_string(),
        }
    }
}

impl From<&AccessConfig> for AccessPolicy {
    fn from(config: &AccessConfig) -> Self {
        Self {
            required_group: config.required_group.clone(),
            groups_claim: config.groups_claim.clone(),
        }
    }
}

impl AccessPolicy {
    /// True iff the identity's groups claim contains the required group.
    pub fn permits(&self, identity: Option<&Identity>) -> bool {
        match identity.and_then(|id| id.claim(&self.groups_claim)) {
            Some(Value::String(group)) => *group == self.required_group,
            Some(Value::Array(groups)) => groups
                .iter()
                .any(|g| g.as_str() == Some(self.required_group.as_str())),
            _ => false,
        }
    }

    /// The groups claim as a list. Absent or malformed claims give an empty list.
    pub fn groups(&self, identity: Option<&Identity>) -> Vec<String> {
        match identity.and_then(|id| id.claim(&self.groups_claim)) {
            Some(Value::String(group)) => vec![group.clone()],
            Some(Value::Array(groups)) => groups
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// [`AccessPolicy::permits`] with the default policy.
pub fn has_required_group(identity: Option<&Identity>) -> bool {
    AccessPolicy::default().permits(identity)
}

/// [`AccessPolicy::groups`] with the default policy.
pub fn get_user_groups(identity: Option<&Identity>) -> Vec<String> {
    AccessPolicy::default().groups(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(value: Value) -> Identity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn required_group_in_list_grants_access() {
        let id = identity(json!({ "profile": { "groups": ["/cicd_dev"] } }));
        assert!(has_required_group(Some(&id)));
    }

    #[test]
    fn other_groups_or_missing_claim_deny_access() {
        let other = identity(json!({ "profile": { "groups": ["/other"] } }));
        let empty = identity(json!({ "profile": {} }));
        let no_profile = identity(json!({}));
        assert!(!has_required_group(Some(&other)));
        assert!(!has_required_group(Some(&empty)));
        assert!(!has_required_group(Some(&no_profile)));
        assert!(!has_required_group(None));
    }

    #[test]
    fn single_string_claim_is_compared_exactly() {
        let id = identity(json!({ "profile": { "groups": "/cicd_dev" } }));
        assert!(has_required_group(Some(&id)));
        let id = identity(json!({ "profile": { "groups": "/cicd_dev_extra" } }));
        assert!(!has_required_group(Some(&id)));
    }

    #[test]
    fn user_groups_normalize_claim_shapes() {
        let list = identity(json!({ "profile": { "groups": ["/a", 7, "/b"] } }));
        assert_eq!(get_user_groups(Some(&list)), vec!["/a", "/b"]);
        let single = identity(json!({ "profile": { "groups": "/a" } }));
        assert_eq!(get_user_groups(Some(&single)), vec!["/a"]);
        let number = identity(json!({ "profile": { "groups": 3 } }));
        assert!(get_user_groups(Some(&number)).is_empty());
        assert!(get_user_groups(None).is_empty());
    }

    #[test]
    fn policy_reads_configured_claim() {
        let policy = AccessPolicy {
            required_group: "platform-admins".into(),
            groups_claim: "roles".into(),
        };
        let id = identity(json!({ "profile": { "roles": ["platform-admins"], "groups": ["/cicd_dev"] } }));
        assert!(policy.permits(Some(&id)));
        assert!(has_required_group(Some(&id)));
        assert!(!policy.permits(Some(&Identity::with_groups(["/cicd_dev"]))));
    }

    #[test]
    fn display_name_prefers_username() {
        let id = identity(json!({ "profile": { "email": "a@example.com", "preferred_username": "alex" } }));
        assert_eq!(id.display_name(), Some("alex"));
    }
}
