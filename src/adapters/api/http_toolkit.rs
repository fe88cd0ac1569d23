use std::collections::HashSet;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::adapters::api::resources::{
    ApiErrorBody, ConfigurationResource, ConfiguredPluginResource, PageMeta, PluginResource,
    PluginVersionResource, ReleaseResource,
};
use crate::adapters::api::snapshot_diff::{ConfigurationSnapshot, diff_snapshots};
use crate::config::app_config::Credentials;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::difference::ConfigurationsDiff;
use crate::core::models::plugin::{
    ACTIVE_CONFIGURATION, Configuration, ConfigurationSummary, DeployRequest, DeployedPlugin,
    PluginSummary, PluginVersionRef, PluginVersionSummary, Release,
};
use crate::core::traits::toolkit::{CreateConfigurationRequest, PluginsApiToolkit};

/// Default production endpoint of the Flex Plugins API.
pub const DEFAULT_BASE_URL: &str = "https://flex-api.twilio.com/v1/PluginService";

/// Page size requested from list endpoints.
const PAGE_SIZE: u32 = 50;

/// Plugins pinned by a configuration are loaded in this phase.
const DEFAULT_PHASE: i64 = 3;

/// `PluginsApiToolkit` backed by the Flex Plugins REST API.
///
/// Each call blocks on a private current-thread runtime, so callers stay
/// synchronous.
pub struct HttpToolkit {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: Url,
    credentials: Credentials,
}

impl HttpToolkit {
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("flex-plugins/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FlexPluginsError::Network {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        let base_url = Url::parse(base_url).map_err(|e| FlexPluginsError::InvalidConfig {
            detail: format!("Invalid [api] base_url '{base_url}': {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FlexPluginsError::InvalidConfig {
                detail: format!("[api] base_url '{base_url}' cannot hold a path"),
            });
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FlexPluginsError::Network {
                reason: format!("Failed to create async runtime: {e}"),
            })?;

        Ok(Self {
            client,
            runtime,
            base_url,
            credentials,
        })
    }

    /// `base_url` extended with `segments`, each percent-encoded on its own.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn execute(&self, request: reqwest::RequestBuilder, resource: &str) -> Result<Value> {
        let request = request.basic_auth(
            &self.credentials.account_sid,
            Some(&self.credentials.auth_token),
        );
        self.runtime.block_on(send(request, resource))
    }

    fn get<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        debug!(%url, "GET");
        let value = self.execute(self.client.get(url), resource)?;
        decode(value)
    }

    fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        form: &[(&str, String)],
        resource: &str,
    ) -> Result<T> {
        debug!(%url, "POST");
        let value = self.execute(self.client.post(url).form(form), resource)?;
        decode(value)
    }

    /// Fetch every page of a list endpoint, collecting the items stored under `key`.
    fn list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        key: &str,
        resource: &str,
    ) -> Result<Vec<T>> {
        let mut first = self.url(segments);
        first
            .query_pairs_mut()
            .append_pair("PageSize", &PAGE_SIZE.to_string());

        let mut items = Vec::new();
        let mut next = Some(first.to_string());

        while let Some(url) = next {
            debug!(%url, "GET page");
            let mut page = self.execute(self.client.get(&url), resource)?;
            let batch: Vec<T> = decode(page.get_mut(key).map(Value::take).unwrap_or(json!([])))?;
            items.extend(batch);

            let meta: PageMeta = page
                .get_mut("meta")
                .map(|m| serde_json::from_value(m.take()))
                .transpose()
                .map_err(|e| FlexPluginsError::Network {
                    reason: format!("Failed to parse page metadata: {e}"),
                })?
                .unwrap_or_default();
            next = meta.next_page_url;
        }

        Ok(items)
    }

    fn fetch_plugin(&self, name: &str) -> Result<PluginResource> {
        self.get(self.url(&["Plugins", name]), &format!("Plugin {name}"))
    }

    fn fetch_versions(&self, name: &str) -> Result<Vec<PluginVersionResource>> {
        self.list(
            &["Plugins", name, "Versions"],
            "plugin_versions",
            &format!("Plugin {name}"),
        )
    }

    fn fetch_configuration(&self, sid: &str) -> Result<ConfigurationResource> {
        self.get(self.url(&["Configurations", sid]), &format!("Configuration {sid}"))
    }

    fn fetch_configured_plugins(&self, sid: &str) -> Result<Vec<ConfiguredPluginResource>> {
        self.list(
            &["Configurations", sid, "Plugins"],
            "plugins",
            &format!("Configuration {sid}"),
        )
    }

    /// SID of the configuration in the latest release, if any release exists.
    fn active_configuration_sid(&self) -> Result<Option<String>> {
        let mut url = self.url(&["Releases"]);
        url.query_pairs_mut().append_pair("PageSize", "1");
        let mut page: Value = self.get(url, "Releases")?;
        let releases: Vec<ReleaseResource> =
            decode(page.get_mut("releases").map(Value::take).unwrap_or(json!([])))?;
        Ok(releases.into_iter().next().map(|r| r.configuration_sid))
    }

    fn active_plugins(&self) -> Result<Vec<ConfiguredPluginResource>> {
        match self.active_configuration_sid()? {
            Some(sid) => self.fetch_configured_plugins(&sid),
            None => Ok(Vec::new()),
        }
    }

    fn resolve_configuration_id(&self, id: &str) -> Result<String> {
        if id != ACTIVE_CONFIGURATION {
            return Ok(id.to_string());
        }
        self.active_configuration_sid()?
            .ok_or_else(|| FlexPluginsError::NotFound {
                resource: "Active configuration".into(),
            })
    }

    fn snapshot(&self, id: &str) -> Result<ConfigurationSnapshot> {
        let sid = self.resolve_configuration_id(id)?;
        Ok(ConfigurationSnapshot {
            configuration: self.fetch_configuration(&sid)?,
            plugins: self.fetch_configured_plugins(&sid)?,
        })
    }

    fn find_version(&self, name: &str, version: &str) -> Result<PluginVersionResource> {
        self.fetch_versions(name)?
            .into_iter()
            .find(|v| v.version == version)
            .ok_or_else(|| FlexPluginsError::NotFound {
                resource: format!("Plugin version {name}@{version}"),
            })
    }
}

/// Send a request and decode the JSON body, mapping HTTP failures to
/// domain errors. `resource` names the target in not-found errors.
async fn send(request: reqwest::RequestBuilder, resource: &str) -> Result<Value> {
    let resp = request.send().await.map_err(|e| FlexPluginsError::Network {
        reason: e.to_string(),
    })?;
    let status = resp.status();
    debug!(%status, url = %resp.url(), "plugins api response");

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(FlexPluginsError::NotFound {
            resource: resource.to_string(),
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| match (b.message, b.code) {
                (Some(m), Some(c)) => Some(format!("{m} (code {c})")),
                (Some(m), None) => Some(m),
                _ => None,
            })
            .unwrap_or(body);
        return Err(FlexPluginsError::Api {
            status: status.as_u16(),
            message,
        });
    }

    resp.json::<Value>().await.map_err(|e| FlexPluginsError::Network {
        reason: format!("Failed to parse response: {e}"),
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| FlexPluginsError::Network {
        reason: format!("Unexpected response from the Plugins API: {e}"),
    })
}

/// Plugins of the new configuration: the carried-over ones, with any
/// plugin named in `requested` replaced, followed by the requested ones.
pub fn merge_plugin_refs(
    carried: Vec<PluginVersionRef>,
    requested: &[PluginVersionRef],
) -> Vec<PluginVersionRef> {
    let mut merged: Vec<PluginVersionRef> = carried
        .into_iter()
        .filter(|c| !requested.iter().any(|r| r.name == c.name))
        .collect();
    merged.extend(requested.iter().cloned());
    merged
}

impl PluginsApiToolkit for HttpToolkit {
    fn list_plugins(&self) -> Result<Vec<PluginSummary>> {
        let active: HashSet<String> = self
            .active_plugins()?
            .into_iter()
            .map(|p| p.plugin_sid)
            .collect();
        let plugins: Vec<PluginResource> = self.list(&["Plugins"], "plugins", "Plugins")?;

        Ok(plugins
            .into_iter()
            .filter(|p| !p.archived)
            .map(|p| PluginSummary {
                is_active: active.contains(&p.sid),
                friendly_name: p.friendly_name.unwrap_or_else(|| p.unique_name.clone()),
                description: p.description.unwrap_or_default(),
                sid: p.sid,
                name: p.unique_name,
                date_created: p.date_created,
            })
            .collect())
    }

    fn list_plugin_versions(&self, name: &str) -> Result<Vec<PluginVersionSummary>> {
        // Surface a missing plugin as NotFound before listing its versions
        self.fetch_plugin(name)?;
        let active: HashSet<String> = self
            .active_plugins()?
            .into_iter()
            .map(|p| p.plugin_version_sid)
            .collect();

        Ok(self
            .fetch_versions(name)?
            .into_iter()
            .filter(|v| !v.archived)
            .map(|v| PluginVersionSummary {
                is_active: active.contains(&v.sid),
                sid: v.sid,
                plugin_sid: v.plugin_sid,
                version: v.version,
                url: v.plugin_url,
                changelog: v.changelog.unwrap_or_default(),
                is_private: v.private,
                date_created: v.date_created,
            })
            .collect())
    }

    fn list_configurations(&self) -> Result<Vec<ConfigurationSummary>> {
        let active = self.active_configuration_sid()?;
        let configurations: Vec<ConfigurationResource> =
            self.list(&["Configurations"], "configurations", "Configurations")?;

        Ok(configurations
            .into_iter()
            .filter(|c| !c.archived)
            .map(|c| ConfigurationSummary {
                is_active: active.as_deref() == Some(c.sid.as_str()),
                sid: c.sid,
                name: c.name,
                description: c.description.unwrap_or_default(),
                date_created: c.date_created,
            })
            .collect())
    }

    fn latest_version(&self, name: &str) -> Result<Option<semver::Version>> {
        let versions = match self.fetch_versions(name) {
            Ok(versions) => versions,
            Err(FlexPluginsError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(versions
            .iter()
            .filter_map(|v| v.version.parse::<semver::Version>().ok())
            .max())
    }

    fn deploy(&self, request: &DeployRequest) -> Result<DeployedPlugin> {
        let plugin = match self.fetch_plugin(&request.name) {
            Ok(plugin) => plugin,
            Err(FlexPluginsError::NotFound { .. }) => {
                debug!(name = %request.name, "registering new plugin");
                self.post(
                    self.url(&["Plugins"]),
                    &[
                        ("UniqueName", request.name.clone()),
                        ("FriendlyName", request.name.clone()),
                        ("Description", request.description.clone()),
                    ],
                    &format!("Plugin {}", request.name),
                )?
            }
            Err(e) => return Err(e),
        };

        let version: PluginVersionResource = self.post(
            self.url(&["Plugins", plugin.sid.as_str(), "Versions"]),
            &[
                ("Version", request.version.to_string()),
                ("PluginUrl", request.url.clone()),
                ("Changelog", request.changelog.clone()),
                ("Private", request.is_private.to_string()),
            ],
            &format!("Plugin {}", request.name),
        )?;

        Ok(DeployedPlugin {
            plugin_sid: plugin.sid,
            plugin_version_sid: version.sid,
            name: plugin.unique_name,
            version: version.version,
        })
    }

    fn create_configuration(&self, request: &CreateConfigurationRequest) -> Result<Configuration> {
        let carried = if request.from_active {
            self.active_plugins()?
                .into_iter()
                .map(|p| PluginVersionRef {
                    name: p.unique_name,
                    version: p.version,
                })
                .collect()
        } else {
            Vec::new()
        };
        let plugins = merge_plugin_refs(carried, &request.plugins);

        let mut form = vec![
            ("Name", request.name.clone()),
            ("Description", request.description.clone()),
        ];
        for plugin in &plugins {
            let version = self.find_version(&plugin.name, &plugin.version)?;
            if version.archived {
                return Err(FlexPluginsError::AlreadyArchived {
                    resource: format!("Plugin version {plugin}"),
                });
            }
            form.push((
                "Plugins",
                json!({ "plugin_version": version.sid, "phase": DEFAULT_PHASE }).to_string(),
            ));
        }

        let created: ConfigurationResource =
            self.post(self.url(&["Configurations"]), &form, "Configurations")?;
        Ok(Configuration {
            sid: created.sid,
            name: created.name,
            description: created.description.unwrap_or_default(),
            plugins,
            date_created: created.date_created,
        })
    }

    fn release(&self, configuration_sid: &str) -> Result<Release> {
        let release: ReleaseResource = self.post(
            self.url(&["Releases"]),
            &[("ConfigurationId", configuration_sid.to_string())],
            &format!("Configuration {configuration_sid}"),
        )?;
        Ok(Release {
            sid: release.sid,
            configuration_sid: release.configuration_sid,
            date_created: release.date_created,
        })
    }

    fn archive_plugin(&self, name: &str) -> Result<()> {
        let resource = format!("Plugin {name}");
        let plugin = self.fetch_plugin(name)?;
        if plugin.archived {
            return Err(FlexPluginsError::AlreadyArchived { resource });
        }
        if self.active_plugins()?.iter().any(|p| p.plugin_sid == plugin.sid) {
            return Err(FlexPluginsError::ActiveResource { resource });
        }
        let url = self.url(&["Plugins", plugin.sid.as_str(), "Archive"]);
        let _: Value = self.post(url, &[], &resource)?;
        Ok(())
    }

    fn archive_plugin_version(&self, name: &str, version: &str) -> Result<()> {
        let resource = format!("Plugin version {name}@{version}");
        let found = self.find_version(name, version)?;
        if found.archived {
            return Err(FlexPluginsError::AlreadyArchived { resource });
        }
        if self
            .active_plugins()?
            .iter()
            .any(|p| p.plugin_version_sid == found.sid)
        {
            return Err(FlexPluginsError::ActiveResource { resource });
        }
        let url = self.url(&[
            "Plugins",
            found.plugin_sid.as_str(),
            "Versions",
            found.sid.as_str(),
            "Archive",
        ]);
        let _: Value = self.post(url, &[], &resource)?;
        Ok(())
    }

    fn archive_configuration(&self, sid: &str) -> Result<()> {
        let resource = format!("Configuration {sid}");
        let configuration = self.fetch_configuration(sid)?;
        if configuration.archived {
            return Err(FlexPluginsError::AlreadyArchived { resource });
        }
        if self.active_configuration_sid()?.as_deref() == Some(sid) {
            return Err(FlexPluginsError::ActiveResource { resource });
        }
        let url = self.url(&["Configurations", sid, "Archive"]);
        let _: Value = self.post(url, &[], &resource)?;
        Ok(())
    }

    fn diff(&self, old_id: &str, new_id: &str) -> Result<ConfigurationsDiff> {
        let old = self.snapshot(old_id)?;
        let new = self.snapshot(new_id)?;
        Ok(diff_snapshots(&old, &new))
    }
}
