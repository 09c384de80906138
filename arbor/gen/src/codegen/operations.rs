//! Operation method generation.
//!
//! Each [`OperationPlan`] becomes one method on its service struct. The five
//! body-oriented strategies share [`generate_standard`]; custom actions use
//! [`generate_action`].
//!
//! ## Generated Shape
//!
//! ```ignore
//! pub fn add(&self, book: impl Into<arbor::Value>, opts: &arbor::Options) -> Result<arbor::Value, arbor::ArborError> {
//!     let value = arbor::coerce_struct(book.into(), "Book");
//!     let body = self.connection.codec().write_one("Book", &value)?;
//!     let mut query = std::collections::BTreeMap::new();
//!     let notify = opts.get("notify");
//!     if let Some(text) = notify.map(|option| arbor::render_query_value("notify", Some(arbor::PrimitiveKind::Boolean), option)).transpose()?.flatten() {
//!         query.insert("notify".to_string(), text);
//!     }
//!     let request = arbor::HttpRequest::new(arbor::Verb::Post, self.path.clone())
//!         .with_query(query)
//!         .with_body(body)
//!         .with_options(opts);
//!     let response = self.connection.send(request)?;
//!     match response.status {
//!         200 | 201 | 202 => { /* read the body */ }
//!         _ => Err(self.connection.check_fault(&response)),
//!     }
//! }
//! ```

use arbor::{BodyShape, PrimitiveKind, Verb};
use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::classify::Strategy;
use crate::codegen::module_docs::{doc_attrs, operation_doc};
use crate::naming::rust_ident;
use crate::plan::{OperationPlan, QueryParameter, ResponsePlan};

/// Identifiers a primary argument may not take, since the method already
/// declares them.
const TAKEN_ARGUMENT_NAMES: &[&str] = &["opts"];

/// Generates the method for one operation.
pub fn generate_operation(operation: &OperationPlan) -> TokenStream {
    match operation.strategy {
        Strategy::Action => generate_action(operation),
        _ => generate_standard(operation),
    }
}

/// Generates an `Add`, `Get`, `List`, `Update` or `Remove` method.
pub fn generate_standard(operation: &OperationPlan) -> TokenStream {
    let method = rust_ident(&operation.ident);
    let docs = doc_attrs(&operation_doc(operation));
    let verb = verb_tokens(operation.verb);
    let codes = operation
        .success_codes
        .iter()
        .map(|code| Literal::u16_unsuffixed(*code));

    let (argument, body, with_body) = match &operation.primary {
        Some(primary) => {
            let name = argument_ident(&primary.ident);
            let coerce = coerce_tokens(&primary.shape, quote!(#name.into()));
            let write = write_tokens(&primary.shape);
            (
                quote!(#name: impl Into<arbor::Value>,),
                quote! {
                    let value = #coerce;
                    let body = #write;
                },
                quote!(.with_body(body)),
            )
        }
        None => (quote!(), quote!(), quote!()),
    };

    let (query, with_query) = query_tokens(&operation.query);

    let (return_type, on_success) = match (&operation.strategy, &operation.response) {
        (Strategy::Remove, _) => (quote!(()), quote!(Ok(()))),
        (_, ResponsePlan::Body { shape }) => {
            let read = read_tokens(shape);
            (
                quote!(arbor::Value),
                quote! {
                    if response.body.is_empty() {
                        return Ok(arbor::Value::Null);
                    }
                    Ok(#read)
                },
            )
        }
        _ => (quote!(arbor::Value), quote!(Ok(arbor::Value::Null))),
    };

    quote! {
        #docs
        pub fn #method(&self, #argument opts: &arbor::Options) -> Result<#return_type, arbor::ArborError> {
            #body
            #query
            let request = arbor::HttpRequest::new(#verb, self.path.clone())
                #with_query
                #with_body
                .with_options(opts);
            let response = self.connection.send(request)?;
            match response.status {
                #(#codes)|* => {
                    #on_success
                }
                _ => Err(self.connection.check_fault(&response)),
            }
        }
    }
}

/// Generates a custom action method.
///
/// Every parameter present in the options is copied into the action
/// envelope under its tag; structured values are coerced first.
pub fn generate_action(operation: &OperationPlan) -> TokenStream {
    let method = rust_ident(&operation.ident);
    let docs = doc_attrs(&operation_doc(operation));
    let verb = verb_tokens(operation.verb);
    let segment = operation.action_segment.clone().unwrap_or_default();

    let fields: Vec<TokenStream> = operation
        .envelope
        .iter()
        .map(|field| {
            let option = &field.option;
            let tag = &field.tag;
            let value = match &field.shape {
                Some(shape) => coerce_tokens(shape, quote!(option.clone())),
                None => quote!(option.clone()),
            };
            quote! {
                if let Some(option) = opts.get(#option) {
                    envelope = envelope.field(#tag, #value);
                }
            }
        })
        .collect();

    let envelope = if fields.is_empty() {
        quote!(let envelope = arbor::StructValue::new(arbor::ACTION_TYPE);)
    } else {
        quote! {
            let mut envelope = arbor::StructValue::new(arbor::ACTION_TYPE);
            #(#fields)*
        }
    };

    let (return_type, on_success) = match &operation.response {
        ResponsePlan::ActionField { tag, shape } => {
            let value = match shape {
                Some(shape) => coerce_tokens(shape, quote!(value)),
                None => quote!(value),
            };
            (
                quote!(arbor::Value),
                quote! {
                    let mut envelope = self.connection.check_action(&response)?;
                    let value = envelope.fields.remove(#tag).unwrap_or_default();
                    Ok(#value)
                },
            )
        }
        _ => (
            quote!(()),
            quote! {
                self.connection.check_action(&response)?;
                Ok(())
            },
        ),
    };

    quote! {
        #docs
        pub fn #method(&self, opts: &arbor::Options) -> Result<#return_type, arbor::ArborError> {
            #envelope
            let body = self
                .connection
                .codec()
                .write_one(arbor::ACTION_TYPE, &arbor::Value::Struct(envelope))?;
            let request = arbor::HttpRequest::new(#verb, arbor::join_path(&self.path, #segment))
                .with_body(body)
                .with_options(opts);
            let response = self.connection.send(request)?;
            #on_success
        }
    }
}

fn argument_ident(name: &str) -> proc_macro2::Ident {
    if TAKEN_ARGUMENT_NAMES.contains(&name) {
        rust_ident(&format!("{}_arg", name))
    } else {
        rust_ident(name)
    }
}

fn verb_tokens(verb: Verb) -> TokenStream {
    match verb {
        Verb::Get => quote!(arbor::Verb::Get),
        Verb::Post => quote!(arbor::Verb::Post),
        Verb::Put => quote!(arbor::Verb::Put),
        Verb::Delete => quote!(arbor::Verb::Delete),
    }
}

/// Statements building the query map, and the builder call that attaches it.
fn query_tokens(parameters: &[QueryParameter]) -> (TokenStream, TokenStream) {
    if parameters.is_empty() {
        return (quote!(), quote!());
    }

    let entries = parameters.iter().map(|parameter| {
        let option = &parameter.option;
        let tag = &parameter.tag;
        let kind = kind_tokens(parameter.kind);
        quote! {
            if let Some(text) = opts
                .get(#option)
                .map(|option| arbor::render_query_value(#option, #kind, option))
                .transpose()?
                .flatten()
            {
                query.insert(#tag.to_string(), text);
            }
        }
    });

    (
        quote! {
            let mut query = std::collections::BTreeMap::new();
            #(#entries)*
        },
        quote!(.with_query(query)),
    )
}

fn kind_tokens(kind: Option<PrimitiveKind>) -> TokenStream {
    match kind {
        Some(PrimitiveKind::Boolean) => quote!(Some(arbor::PrimitiveKind::Boolean)),
        Some(PrimitiveKind::Integer) => quote!(Some(arbor::PrimitiveKind::Integer)),
        Some(PrimitiveKind::Decimal) => quote!(Some(arbor::PrimitiveKind::Decimal)),
        Some(PrimitiveKind::Date) => quote!(Some(arbor::PrimitiveKind::Date)),
        Some(PrimitiveKind::String) => quote!(Some(arbor::PrimitiveKind::String)),
        None => quote!(None),
    }
}

fn coerce_tokens(shape: &BodyShape, value: TokenStream) -> TokenStream {
    match shape {
        BodyShape::One(name) => quote!(arbor::coerce_struct(#value, #name)),
        BodyShape::Many(name) => quote!(arbor::coerce_list(#value, #name)),
    }
}

fn write_tokens(shape: &BodyShape) -> TokenStream {
    match shape {
        BodyShape::One(name) => quote!(self.connection.codec().write_one(#name, &value)?),
        BodyShape::Many(name) => quote! {{
            let items = value.items().ok_or_else(|| arbor::CodecError::UnexpectedShape {
                type_name: #name.to_string(),
                expected: "a list".to_string(),
                found: value.kind_name().to_string(),
            })?;
            self.connection.codec().write_many(#name, items)?
        }},
    }
}

fn read_tokens(shape: &BodyShape) -> TokenStream {
    match shape {
        BodyShape::One(name) => quote!(self.connection.codec().read_one(#name, &response.body)?),
        BodyShape::Many(name) => quote! {
            arbor::Value::List(arbor::ListValue::new(
                #name,
                self.connection.codec().read_many(#name, &response.body)?,
            ))
        },
    }
}
