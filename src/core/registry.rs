//! Task kind registry - maps kind names to construction and codec thunks
//!
//! The registry is the closed-plus-registered set of story task variants.
//! A kind name is a menu-style path ("builtin/branch", "vn/dialogue");
//! downstream crates register their own task types next to the built-ins,
//! and the graph codec resolves every serialized record through the
//! registry.

use crate::core::task::StoryTask;
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

type CreateFn = fn() -> Box<dyn StoryTask>;
type DecodeFn = fn(serde_json::Value) -> Result<Box<dyn StoryTask>>;
type EncodeFn = fn(&dyn StoryTask) -> Result<serde_json::Value>;

/// Registered story task kind.
struct TaskKind {
    create: CreateFn,
    decode: DecodeFn,
    encode: EncodeFn,
}

/// Registry of story task kinds.
#[derive(Default)]
pub struct TaskRegistry {
    kinds: HashMap<String, TaskKind>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry preloaded with every built-in task kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::tasks::register_builtins(&mut registry);
        registry
    }

    /// Register a task type under a kind name.
    ///
    /// The type's `Default` instance is what "create task of kind" yields;
    /// its serde representation is the record `config` payload. Registering
    /// the same name twice replaces the earlier entry.
    pub fn register<T>(&mut self, name: &str)
    where
        T: StoryTask + Default + Serialize + DeserializeOwned,
    {
        let kind = TaskKind {
            create: || Box::new(T::default()),
            decode: |config| {
                if config.is_null() {
                    // A record with no config is the kind's default instance.
                    return Ok(Box::new(T::default()) as Box<dyn StoryTask>);
                }
                let task: T = serde_json::from_value(config)?;
                Ok(Box::new(task))
            },
            encode: |task| {
                let task = task
                    .as_any()
                    .downcast_ref::<T>()
                    .ok_or_else(|| anyhow!("task does not match its registered kind"))?;
                Ok(serde_json::to_value(task)?)
            },
        };

        if self.kinds.insert(name.to_string(), kind).is_some() {
            log::warn!("Task kind '{}' was registered twice; replacing", name);
        }
    }

    /// Whether a kind name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// All registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create a default instance of a kind.
    pub fn create(&self, name: &str) -> Result<Box<dyn StoryTask>> {
        let kind = self.get(name)?;
        Ok((kind.create)())
    }

    /// Decode a task from its record payload.
    pub fn decode(&self, name: &str, config: serde_json::Value) -> Result<Box<dyn StoryTask>> {
        let kind = self.get(name)?;
        (kind.decode)(config).map_err(|e| anyhow!("invalid config for task kind '{}': {}", name, e))
    }

    /// Encode a task back into its record payload.
    pub fn encode(&self, name: &str, task: &dyn StoryTask) -> Result<serde_json::Value> {
        let kind = self.get(name)?;
        (kind.encode)(task).map_err(|e| anyhow!("cannot encode task as kind '{}': {}", name, e))
    }

    fn get(&self, name: &str) -> Result<&TaskKind> {
        self.kinds
            .get(name)
            .ok_or_else(|| anyhow!("unknown story task kind '{}'", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trigger::{EndTrigger, LinkId};
    use serde::Deserialize;
    use serde_json::json;
    use std::any::Any;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Probe {
        output: EndTrigger,
        label: String,
    }

    impl StoryTask for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn registry() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        registry.register::<Probe>("test/probe");
        registry
    }

    #[test]
    fn test_create_yields_default() {
        let task = registry().create("test/probe").unwrap();
        let probe = task.as_any().downcast_ref::<Probe>().unwrap();
        assert_eq!(probe.label, "");
        assert_eq!(probe.output.link, None);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = registry().create("test/missing").unwrap_err();
        assert!(err.to_string().contains("test/missing"));
    }

    #[test]
    fn test_decode_encode_roundtrip() {
        let registry = registry();
        let config = json!({ "output": { "link": 4 }, "label": "hello" });
        let task = registry.decode("test/probe", config.clone()).unwrap();
        let probe = task.as_any().downcast_ref::<Probe>().unwrap();
        assert_eq!(probe.output.link, Some(LinkId(4)));
        assert_eq!(probe.label, "hello");

        let encoded = registry.encode("test/probe", task.as_ref()).unwrap();
        assert_eq!(encoded, config);
    }

    #[test]
    fn test_null_config_decodes_as_default() {
        let task = registry()
            .decode("test/probe", serde_json::Value::Null)
            .unwrap();
        let probe = task.as_any().downcast_ref::<Probe>().unwrap();
        assert_eq!(probe.label, "");
    }

    #[test]
    fn test_encode_rejects_type_mismatch() {
        let mut registry = registry();

        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Other;
        impl StoryTask for Other {
            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
        registry.register::<Other>("test/other");

        let other = registry.create("test/other").unwrap();
        let err = registry.encode("test/probe", other.as_ref()).unwrap_err();
        assert!(err.to_string().contains("test/probe"));
    }

    #[test]
    fn test_kinds_are_sorted() {
        let mut registry = registry();
        registry.register::<Probe>("test/alpha");
        assert_eq!(registry.kinds(), vec!["test/alpha", "test/probe"]);
    }
}
