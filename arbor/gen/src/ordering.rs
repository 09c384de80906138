//! Base-first ordering of services.
//!
//! Services start in a pending queue sorted by name. The head is appended to
//! the output when it has no base or its base is already in the output;
//! otherwise it goes to the back of the queue. The result places every base
//! before each service that extends it.
//!
//! A full pass over the queue without appending anything means the remaining
//! services can never be placed (a cyclic or dangling base), and ordering
//! fails instead of looping.

use std::collections::{HashSet, VecDeque};

use arbor_define::{Name, Service};
use tracing::debug;

use crate::errors::GeneratorError;

/// Orders services so that every base precedes its descendants.
///
/// ## Errors
///
/// Returns `GeneratorError::UnresolvableBase` when some services wait on a
/// base that can never be placed.
///
/// ## Examples
///
/// ```
/// use arbor_define::Service;
/// use arbor_gen::ordering::order_services;
///
/// let services = vec![
///     Service::new("Vm").extends("Template"),
///     Service::new("Template"),
///     Service::new("Cluster"),
/// ];
///
/// let ordered: Vec<String> = order_services(&services)
///     .unwrap()
///     .iter()
///     .map(|s| s.name.to_string())
///     .collect();
/// assert_eq!(ordered, vec!["Cluster", "Template", "Vm"]);
/// ```
pub fn order_services(services: &[Service]) -> Result<Vec<&Service>, GeneratorError> {
    let mut sorted_input: Vec<&Service> = services.iter().collect();
    sorted_input.sort_by(|a, b| a.name.cmp(&b.name));

    let mut pending: VecDeque<&Service> = sorted_input.into_iter().collect();
    let mut placed: HashSet<&Name> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());
    let mut deferred_in_a_row = 0;

    while let Some(service) = pending.pop_front() {
        let ready = match &service.base {
            None => true,
            Some(base) => placed.contains(base),
        };

        if ready {
            placed.insert(&service.name);
            ordered.push(service);
            deferred_in_a_row = 0;
            continue;
        }

        pending.push_back(service);
        deferred_in_a_row += 1;
        if deferred_in_a_row >= pending.len() {
            let mut stuck: Vec<String> = pending.iter().map(|s| s.name.to_string()).collect();
            stuck.sort();
            return Err(GeneratorError::UnresolvableBase { services: stuck });
        }
    }

    debug!(count = ordered.len(), "Ordered services");
    Ok(ordered)
}
