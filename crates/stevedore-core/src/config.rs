use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// stevedore.toml configuration
///
/// The pipeline is an ordered list of `[[step]]` tables; steps run strictly
/// in document order, and the first failure aborts the remainder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,
}

/// One pipeline step, discriminated by its `kind` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepConfig {
    Image(ImageConfig),
    TaskDefinition(TaskDefinitionConfig),
    Task(TaskConfig),
    Service(ServiceConfig),
}

impl StepConfig {
    pub fn name(&self) -> &str {
        match self {
            StepConfig::Image(c) => &c.name,
            StepConfig::TaskDefinition(c) => &c.name,
            StepConfig::Task(c) => &c.name,
            StepConfig::Service(c) => &c.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StepConfig::Image(_) => "image",
            StepConfig::TaskDefinition(_) => "task-definition",
            StepConfig::Task(_) => "task",
            StepConfig::Service(_) => "service",
        }
    }
}

/// An image to build (or re-tag) and push to a registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Local image name; also the key other steps use to reference the
    /// pushed image.
    pub name: String,
    /// Dockerfile path, relative to the invocation directory.
    pub dockerfile: String,
    /// Shell command whose stdout yields the image tag.
    pub tag_command: String,
    /// Remote registry path the image is pushed to.
    pub repository: String,
    /// Build from the Dockerfile. When false, an already-built local image
    /// named `name` is re-tagged instead.
    #[serde(default = "default_true")]
    pub build: bool,
}

/// A task definition revision to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinitionConfig {
    pub name: String,
    /// ECS family; revisions are keyed on this, not on `name`.
    pub family: String,
    #[serde(default)]
    pub task_role_arn: Option<String>,
    #[serde(default = "default_network_mode")]
    pub network_mode: String,
    /// Container definitions, passed through to ECS verbatim after image
    /// substitution. Each must carry an `image` field naming an image step.
    pub container_definitions: Vec<Value>,
    #[serde(default)]
    pub volumes: Vec<Value>,
    #[serde(default)]
    pub placement_constraints: Vec<Value>,
    /// Deregister every existing revision of `family` before registering
    /// the new one.
    #[serde(default = "default_true")]
    pub deregister_previous_definitions: bool,
}

impl TaskDefinitionConfig {
    /// Replace each container definition's `image` field through `images`
    /// (image step name → pushed `repository:tag`).
    ///
    /// A container whose `image` key is absent from the map is a
    /// configuration error, not a silent pass-through.
    pub fn set_images(&mut self, images: &HashMap<String, String>) -> crate::Result<()> {
        for def in &mut self.container_definitions {
            let container = container_label(def);
            let Some(obj) = def.as_object_mut() else {
                return Err(crate::Error::MissingImageField { container });
            };
            let key = match obj.get("image").and_then(Value::as_str) {
                Some(key) => key.to_owned(),
                None => return Err(crate::Error::MissingImageField { container }),
            };
            let resolved = images
                .get(&key)
                .ok_or_else(|| crate::Error::MissingImageMapping {
                    container: container.clone(),
                    image: key.clone(),
                })?;
            tracing::debug!(container = %container, image = %key, resolved = %resolved, "substituted image");
            obj.insert("image".to_owned(), Value::String(resolved.clone()));
        }
        Ok(())
    }
}

/// A one-off ECS task run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    /// Opaque run-task parameters, passed to ECS verbatim.
    #[serde(default)]
    pub config: serde_json::Map<String, Value>,
}

/// An update applied to every matching live service in a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Pattern fragment matched against service ARNs within `cluster`.
    /// With the default prefix mode, `billing` matches both `billing` and
    /// `billing-worker`.
    pub name: String,
    pub cluster: String,
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
    /// Opaque update-service parameters, passed to ECS verbatim.
    #[serde(default)]
    pub config: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// `name` matches any service it is a prefix of.
    #[default]
    Prefix,
    /// The service name must equal `name` exactly.
    Exact,
}

impl DeployConfig {
    /// Load from stevedore.toml at the given path.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn container_label(def: &Value) -> String {
    def.get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_owned()
}

fn default_true() -> bool {
    true
}

fn default_network_mode() -> String {
    "bridge".to_owned()
}
