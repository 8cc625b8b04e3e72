use serde::{Deserialize, Serialize};

use crate::error::{WizardError, WizardResult};
use crate::feature::providers::{
    DEFAULT_GROUP_KEY, EntryTypeItem, EntryTypesProvider, MasterIdOption, MasterIdProvider,
};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Connection settings for the migration API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub version_path: String,

    #[serde(default)]
    pub subscription_key: Option<String>,

    #[serde(default = "default_customer_id")]
    pub customer_id: String,

    /// Group keys handed to master ids by position; later ids get the default
    #[serde(default = "default_group_keys")]
    pub group_keys: Vec<u32>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            version_path: String::new(),
            subscription_key: None,
            customer_id: default_customer_id(),
            group_keys: default_group_keys(),
        }
    }
}

fn default_customer_id() -> String {
    "test01".to_string()
}

fn default_group_keys() -> Vec<u32> {
    vec![1, 6, 9]
}

impl ApiSettings {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    fn endpoint(&self, resource: &str, context: &str) -> String {
        format!(
            "{}{}/migration/{}?context={}&cusId={}",
            self.base_url, self.version_path, resource, context, self.customer_id
        )
    }

    pub fn master_ids_url(&self) -> String {
        self.endpoint("master-ids", "mid")
    }

    pub fn entry_types_url(&self) -> String {
        self.endpoint("entry-types", "entryType")
    }

    pub fn group_key_for_index(&self, index: usize) -> u32 {
        self.group_keys
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_GROUP_KEY)
    }
}

/// Master id and entry type feeds served by the migration API.
pub struct HttpMigrationApi {
    settings: ApiSettings,
    client: reqwest::blocking::Client,
}

impl HttpMigrationApi {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            settings,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn get_text(&self, feed: &str, url: &str) -> WizardResult<String> {
        tracing::debug!(feed, url, "requesting");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.settings.subscription_key {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        let response = request.send().map_err(|source| WizardError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WizardError::HttpStatus {
                feed: feed.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| WizardError::Http {
            url: url.to_string(),
            source,
        })
    }
}

impl MasterIdProvider for HttpMigrationApi {
    fn fetch_master_ids(&self) -> WizardResult<Vec<MasterIdOption>> {
        let body = self.get_text("Master IDs", &self.settings.master_ids_url())?;
        let names = parse_master_id_names(&body)?;

        Ok(names
            .into_iter()
            .enumerate()
            .map(|(index, name)| MasterIdOption {
                id: name.clone(),
                label: name,
                group_key: self.settings.group_key_for_index(index),
            })
            .collect())
    }
}

impl EntryTypesProvider for HttpMigrationApi {
    fn fetch_entry_types(&self, group_key: u32) -> WizardResult<Vec<EntryTypeItem>> {
        let body = self.get_text("Entry Types", &self.settings.entry_types_url())?;
        let items = parse_entry_types_ndjson(&body);
        let filtered: Vec<EntryTypeItem> = items
            .into_iter()
            .filter(|item| item.ocisid == group_key)
            .collect();

        tracing::debug!(group_key, count = filtered.len(), "entry types filtered");
        Ok(filtered)
    }
}

/// Accepts a bare array, `{"idNames": [...]}` or `{"data": [...]}`.
/// Any other shape yields no names.
pub fn parse_master_id_names(body: &str) -> WizardResult<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| WizardError::fetch("Master IDs", e.to_string()))?;

    let list = if value.is_array() {
        Some(&value)
    } else {
        value
            .get("idNames")
            .filter(|v| v.is_array())
            .or_else(|| value.get("data").filter(|v| v.is_array()))
    };

    Ok(list
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

/// One JSON object per line; malformed lines are skipped.
pub fn parse_entry_types_ndjson(body: &str) -> Vec<EntryTypeItem> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<EntryTypeItem>(line) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed entry type line");
                None
            }
        })
        .collect()
}
