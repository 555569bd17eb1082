//! Per-operation output names

// Internal imports (std, crate)
use std::collections::HashSet;

use crate::openapi::{ApiDescription, HttpMethod, Operation};
use crate::utils::{capitalize_first, route_to_pascal_case, to_pascal_case};

/// Derives the base name of the script generated for an operation
pub trait OperationNamer: Send + Sync {
    /// A non-empty name, unique across the operations of `description`
    fn operation_name(
        &self,
        description: &ApiDescription,
        route: &str,
        verb: HttpMethod,
        operation: &Operation,
    ) -> String;
}

/// Names operations after their `operationId`, or after verb and route
///
/// `listPets` becomes `ListPets`. Operations without an id, or whose id is
/// shared with another operation, are named like `GetPetsPetId`. When two
/// operations still end up with the same name (compared case-insensitively),
/// later ones in description order get a numeric suffix: `GetPets2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOperationNamer;

impl DefaultOperationNamer {
    fn base_name(description: &ApiDescription, route: &str, operation: &Operation) -> String {
        let unique_id = operation
            .operation_id
            .as_deref()
            .map(to_pascal_case)
            .filter(|id| !id.is_empty())
            .filter(|id| {
                description
                    .operations()
                    .filter(|(_, op)| {
                        op.operation_id.as_deref().map(to_pascal_case).as_ref() == Some(id)
                    })
                    .count()
                    == 1
            });

        unique_id.unwrap_or_else(|| {
            format!(
                "{}{}",
                operation.method.capitalized(),
                route_to_pascal_case(route)
            )
        })
    }
}

impl OperationNamer for DefaultOperationNamer {
    fn operation_name(
        &self,
        description: &ApiDescription,
        route: &str,
        verb: HttpMethod,
        operation: &Operation,
    ) -> String {
        let mut issued = HashSet::new();
        for (other_route, other) in description.operations() {
            let base = Self::base_name(description, other_route, other);
            let mut name = base.clone();
            let mut suffix = 2;
            while !issued.insert(name.to_lowercase()) {
                name = format!("{}{}", base, suffix);
                suffix += 1;
            }
            if other_route == route && other.method == verb {
                return name;
            }
        }

        // Not part of the description: nothing to collide with
        Self::base_name(description, route, operation)
    }
}

/// File name of a script, e.g. `GetPets.sh`
pub fn script_filename(name: &str, extension: &str) -> String {
    format!("{}.{}", capitalize_first(name), extension)
}
