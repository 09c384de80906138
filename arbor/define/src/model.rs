//! The complete service model and its load-time validation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::name::Name;
use crate::service::Service;

/// A complete, immutable description of a remote API.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Locator, Model, Service};
///
/// let model = Model::new("Demo", "System")
///     .service(Service::new("System").locator(Locator::new("Items", "Items")))
///     .service(Service::new("Items"));
///
/// assert!(model.validate().is_ok());
/// assert_eq!(model.root_service().unwrap().name.to_string(), "System");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Name of the API, used for the generated crate and docs.
    pub name: Name,
    /// The service every path is resolved from.
    pub root: Name,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Model {
    pub fn new(name: impl Into<Name>, root: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            services: Vec::new(),
        }
    }

    pub fn service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Looks up a service by structural name.
    pub fn find_service(&self, name: &Name) -> Option<&Service> {
        self.services.iter().find(|s| &s.name == name)
    }

    /// Returns the index of a service in [`Model::services`].
    pub fn service_index(&self, name: &Name) -> Option<usize> {
        self.services.iter().position(|s| &s.name == name)
    }

    pub fn root_service(&self) -> Option<&Service> {
        self.find_service(&self.root)
    }

    /// Parses and validates a JSON model.
    ///
    /// ## Errors
    ///
    /// Returns `ModelError::Json` for malformed input, or any validation
    /// error from [`Model::validate`].
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let model: Model = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    /// Parses and validates a YAML model.
    ///
    /// ## Errors
    ///
    /// Returns `ModelError::Yaml` for malformed input, or any validation
    /// error from [`Model::validate`].
    pub fn from_yaml_str(text: &str) -> Result<Self, ModelError> {
        let model: Model = serde_yaml::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    /// Loads a model file, choosing the format from its extension.
    ///
    /// ## Errors
    ///
    /// Returns `ModelError::UnsupportedFormat` for unknown extensions,
    /// `ModelError::Io` if the file cannot be read, and parse or
    /// validation errors otherwise.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ModelError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        match extension.as_str() {
            "json" => Self::from_json_str(&read()?),
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            other => Err(ModelError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Checks the structural invariants generation relies on.
    ///
    /// - service names are unique
    /// - the root is a declared service
    /// - every `base` and every locator target is a declared service
    /// - the base relation is acyclic
    /// - no service has more than one parameterized locator, inherited ones included
    ///
    /// ## Errors
    ///
    /// Returns the first violated invariant as a [`ModelError`].
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(&service.name) {
                return Err(ModelError::DuplicateService(service.name.to_string()));
            }
        }

        if !seen.contains(&self.root) {
            return Err(ModelError::UnknownRoot(self.root.to_string()));
        }

        for service in &self.services {
            if let Some(base) = &service.base
                && !seen.contains(base)
            {
                return Err(ModelError::UnknownBase {
                    service: service.name.to_string(),
                    base: base.to_string(),
                });
            }

            for locator in &service.locators {
                if !seen.contains(&locator.service) {
                    return Err(ModelError::UnknownLocatorTarget {
                        service: service.name.to_string(),
                        locator: locator.name.to_string(),
                        target: locator.service.to_string(),
                    });
                }
            }

        }

        self.check_base_cycles()?;
        self.check_parameterized_locators()
    }

    /// Each service may route through at most one parameterized locator,
    /// counting the ones it inherits. A redeclared locator replaces the
    /// inherited one of the same name.
    fn check_parameterized_locators(&self) -> Result<(), ModelError> {
        let by_name: HashMap<&Name, &Service> =
            self.services.iter().map(|s| (&s.name, s)).collect();

        for service in &self.services {
            let mut declared = HashSet::new();
            let mut parameterized = Vec::new();
            let mut current = Some(service);
            while let Some(level) = current {
                for locator in &level.locators {
                    if declared.insert(&locator.name) && locator.is_parameterized() {
                        parameterized.push(locator.name.to_string());
                    }
                }
                current = level.base.as_ref().and_then(|b| by_name.get(b).copied());
            }

            if parameterized.len() > 1 {
                return Err(ModelError::MultipleParameterizedLocators {
                    service: service.name.to_string(),
                    locators: parameterized,
                });
            }
        }
        Ok(())
    }

    fn check_base_cycles(&self) -> Result<(), ModelError> {
        let bases: HashMap<&Name, &Name> = self
            .services
            .iter()
            .filter_map(|s| s.base.as_ref().map(|b| (&s.name, b)))
            .collect();

        for service in &self.services {
            let mut visited = HashSet::new();
            let mut current = &service.name;
            while let Some(base) = bases.get(current) {
                if !visited.insert(current) {
                    return Err(ModelError::BaseCycle(service.name.to_string()));
                }
                current = base;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Locator, Parameter};
    use crate::types::Type;

    fn id() -> Parameter {
        Parameter::input("id", Type::string())
    }

    fn base_model() -> Model {
        Model::new("Test", "Root")
            .service(Service::new("Root").locator(Locator::new("Items", "Items")))
            .service(Service::new("Items").locator(Locator::new("Item", "Item").with_parameter(id())))
            .service(Service::new("Item"))
    }

    #[test]
    fn valid_model_passes() {
        assert!(base_model().validate().is_ok());
    }

    #[test]
    fn duplicate_service_rejected() {
        let model = base_model().service(Service::new("items"));
        assert!(matches!(model.validate(), Err(ModelError::DuplicateService(name)) if name == "Items"));
    }

    #[test]
    fn unknown_root_rejected() {
        let mut model = base_model();
        model.root = Name::parse("Missing");
        assert!(matches!(model.validate(), Err(ModelError::UnknownRoot(_))));
    }

    #[test]
    fn dangling_base_rejected() {
        let model = base_model().service(Service::new("Extra").extends("Ghost"));
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnknownBase { service, base }) if service == "Extra" && base == "Ghost"
        ));
    }

    #[test]
    fn unknown_locator_target_rejected() {
        let model = base_model().service(Service::new("Extra").locator(Locator::new("Nowhere", "Nowhere")));
        assert!(matches!(model.validate(), Err(ModelError::UnknownLocatorTarget { .. })));
    }

    #[test]
    fn second_parameterized_locator_rejected() {
        let model = base_model().service(
            Service::new("Extra")
                .locator(Locator::new("Item", "Item").with_parameter(id()))
                .locator(Locator::new("Other", "Item").with_parameter(id())),
        );
        match model.validate() {
            Err(ModelError::MultipleParameterizedLocators { service, locators }) => {
                assert_eq!(service, "Extra");
                assert_eq!(locators, vec!["Item", "Other"]);
            }
            other => panic!("Expected MultipleParameterizedLocators, got {other:?}"),
        }
    }

    #[test]
    fn inherited_parameterized_locator_counts() {
        let model = base_model()
            .service(Service::new("Base").locator(Locator::new("Alpha", "Item").with_parameter(id())))
            .service(
                Service::new("Derived")
                    .extends("Base")
                    .locator(Locator::new("Beta", "Item").with_parameter(id())),
            );
        match model.validate() {
            Err(ModelError::MultipleParameterizedLocators { service, locators }) => {
                assert_eq!(service, "Derived");
                assert_eq!(locators, vec!["Beta", "Alpha"]);
            }
            other => panic!("Expected MultipleParameterizedLocators, got {other:?}"),
        }
    }

    #[test]
    fn redeclared_parameterized_locator_replaces_inherited_one() {
        let model = base_model()
            .service(Service::new("Base").locator(Locator::new("Alpha", "Item").with_parameter(id())))
            .service(
                Service::new("Derived")
                    .extends("Base")
                    .locator(Locator::new("Alpha", "Items").with_parameter(id())),
            );
        assert!(model.validate().is_ok());
    }

    #[test]
    fn base_cycle_rejected() {
        let model = base_model()
            .service(Service::new("A").extends("B"))
            .service(Service::new("B").extends("A"));
        assert!(matches!(model.validate(), Err(ModelError::BaseCycle(_))));
    }

    #[test]
    fn self_base_rejected() {
        let model = base_model().service(Service::new("Loop").extends("Loop"));
        assert!(matches!(model.validate(), Err(ModelError::BaseCycle(name)) if name == "Loop"));
    }

    #[test]
    fn json_round_trip_validates() {
        let json = serde_json::to_string(&base_model()).unwrap();
        let parsed = Model::from_json_str(&json).unwrap();
        assert_eq!(parsed, base_model());
    }

    #[test]
    fn yaml_model_loads() {
        let yaml = r#"
name: Demo
root: Root
services:
  - name: Root
    locators:
      - name: Items
        service: Items
  - name: Items
    methods:
      - name: List
        parameters:
          - name: items
            type: { kind: list, of: { kind: struct, of: Item } }
            out: true
"#;
        let model = Model::from_yaml_str(yaml).unwrap();
        assert_eq!(model.services.len(), 2);
        let items = model.find_service(&Name::parse("items")).unwrap();
        assert!(items.methods[0].parameters[0].is_out);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let result = Model::load(Path::new("model.toml"));
        assert!(matches!(result, Err(ModelError::UnsupportedFormat(ext)) if ext == "toml"));
    }
}
