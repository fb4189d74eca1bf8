//! Parameter-list resolution for a single blueprint.

use stampwork_schema::Parameter;

use crate::mapping::ParameterMapping;
use crate::stats::ResolveStats;

/// Resolve one blueprint's parameter list against `mapping`.
///
/// Every parameter counts toward `stats.parameters`. A `number`
/// parameter whose token is present additionally counts toward
/// `stats.number_parameters` and is looked up in the mapping by that
/// token; on a hit the override is shallow-merged over it and the
/// token's update tally is bumped. `id` parameters and tokenless
/// `number` parameters come back unchanged.
///
/// Lookup uses the parameter's value *before* merging, so an override
/// that rewrites `number` cannot cascade into later entries.
pub fn resolve_parameters(
    parameters: Vec<Parameter>,
    mapping: &ParameterMapping,
    stats: &mut ResolveStats,
) -> Vec<Parameter> {
    parameters
        .into_iter()
        .map(|parameter| {
            stats.parameters += 1;
            let Parameter::Number(number) = parameter else {
                return parameter;
            };
            let Some(token) = number.number.clone() else {
                return Parameter::Number(number);
            };
            stats.number_parameters += 1;
            match mapping.get(&token) {
                Some(over) => {
                    stats.parameter_update_instances.bump(&token);
                    Parameter::Number(over.apply(&number))
                }
                None => Parameter::Number(number),
            }
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================
