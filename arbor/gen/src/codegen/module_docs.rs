//! Documentation generation for generated clients.
//!
//! [`ModuleDocBuilder`] renders the crate-level documentation of a generated
//! client: an introduction, the service tree, and a usage example. The free
//! functions render the per-item doc attributes, including the option keys
//! and status codes of each operation.

use proc_macro2::TokenStream;
use quote::quote;

use crate::classify::Strategy;
use crate::plan::{ClientPlan, OperationPlan, ServicePlan};

/// Builds crate-level documentation for a generated client.
///
/// ## Examples
///
/// ```
/// use arbor_definitions::define_library_model;
/// use arbor_gen::codegen::ModuleDocBuilder;
/// use arbor_gen::plan::compile;
///
/// let plan = compile(&define_library_model()).unwrap();
/// let tokens = ModuleDocBuilder::new(&plan).build();
/// assert!(tokens.to_string().contains("Library"));
/// ```
pub struct ModuleDocBuilder<'a> {
    plan: &'a ClientPlan,
}

impl<'a> ModuleDocBuilder<'a> {
    pub fn new(plan: &'a ClientPlan) -> Self {
        Self { plan }
    }

    /// Builds the `#![doc = "..."]` attributes for the crate root.
    ///
    /// Each line gets its own attribute so the formatted output uses `//!`
    /// line comments.
    pub fn build(&self) -> TokenStream {
        let sections = [
            self.intro_paragraph(),
            self.services_section(),
            self.example_section(),
        ];
        let text = sections.join("\n\n");
        let lines = text.lines();

        quote! {
            #( #![doc = #lines] )*
        }
    }

    fn intro_paragraph(&self) -> String {
        let mut intro = format!(" Generated client for the {} API.", self.plan.name);
        let Some(root) = self.plan.root_service() else {
            return intro;
        };
        if let Some(doc) = &root.doc {
            intro.push_str(&format!("\n\n {}", doc));
        }
        intro.push_str(&format!(
            "\n\n Every path is resolved from [`{}`], addressed by the empty path.",
            root.type_name
        ));
        intro
    }

    /// Lists every service with its operations and locators.
    fn services_section(&self) -> String {
        let mut lines = vec![" ## Services".to_string(), String::new()];
        for service in &self.plan.services {
            lines.push(format!(" - [`{}`]{}", service.type_name, summary(service)));
        }
        lines.join("\n")
    }

    fn example_section(&self) -> String {
        let Some(root) = self.plan.root_service() else {
            return String::new();
        };
        let accessor = root
            .locators
            .iter()
            .find(|l| !l.is_parameterized())
            .map(|l| format!("\n let child = root.{}();", l.accessor))
            .unwrap_or_default();

        format!(
            r#" ## Example

 ```ignore
 use std::sync::Arc;
 use arbor::{{Connection, HttpTransport}};

 let transport = HttpTransport::new("https://example.com/api/".parse()?)?;
 let root = {}::new(Arc::new(Connection::new(transport)), "");{}
 let resolved = root.resolve("some/path")?;
 println!("{{resolved}}");
 ```"#,
            root.type_name, accessor
        )
    }
}

fn summary(service: &ServicePlan) -> String {
    let mut parts = Vec::new();
    if !service.operations.is_empty() {
        let names: Vec<String> = service
            .operations
            .iter()
            .map(|o| format!("`{}`", o.ident))
            .collect();
        parts.push(format!("operations {}", names.join(", ")));
    }
    if !service.locators.is_empty() {
        let names: Vec<String> = service
            .locators
            .iter()
            .map(|l| format!("`{}`", l.accessor))
            .collect();
        parts.push(format!("locators {}", names.join(", ")));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(": {}", parts.join("; "))
    }
}

/// Turns text into one `#[doc]` attribute per line.
pub fn doc_attrs(text: &str) -> TokenStream {
    let lines = text.lines().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!(" {}", line)
        }
    });
    quote! {
        #( #[doc = #lines] )*
    }
}

/// Full documentation of a generated operation.
///
/// The model's doc (or the default for the strategy) is followed by the
/// accepted option keys and the status codes treated as success.
pub fn operation_doc(operation: &OperationPlan) -> String {
    let mut lines = vec![operation.doc.clone(), String::new(), "## Options".to_string(), String::new()];
    for key in operation.option_keys() {
        lines.push(format!("- `{}`", key));
    }
    lines.push("- `headers`, `query`: overrides merged into the request".to_string());
    lines.push(String::new());
    lines.push("## Errors".to_string());
    lines.push(String::new());

    let codes: Vec<String> = operation
        .success_codes
        .iter()
        .map(|c| c.to_string())
        .collect();
    let codes = codes.join(", ");
    match operation.strategy {
        Strategy::Action => lines.push(format!(
            "Succeeds on status {} unless the returned envelope reports a failure; \
             anything else returns `ArborError::Fault`.",
            codes
        )),
        _ => lines.push(format!(
            "Succeeds on status {}; any other status returns `ArborError::Fault`.",
            codes
        )),
    }
    lines.join("\n")
}
