//! Solution descriptor.

use std::collections::{HashMap, HashSet};

use super::{EntityDescriptor, ProblemFactDescriptor, VariableDescriptor};
use crate::domain::variable::VariableKey;
use crate::error::ValidationError;

/// Static, validated description of a planning solution.
///
/// Built once with the `with_*` methods, checked by [`validate`], and
/// read-only afterwards.
///
/// [`validate`]: SolutionDescriptor::validate
///
/// # Example
///
/// ```
/// use stratum_core::domain::{
///     EntityDescriptor, ProblemFactDescriptor, SolutionDescriptor, VariableDescriptor,
/// };
///
/// let descriptor = SolutionDescriptor::new("Timetable")
///     .with_problem_fact(
///         ProblemFactDescriptor::new("Room", "rooms").with_value_range_provider("rooms"),
///     )
///     .with_entity(
///         EntityDescriptor::new("Lesson", "lessons")
///             .with_variable(VariableDescriptor::genuine("room").with_value_range("rooms")),
///     )
///     .with_score_field("score")
///     .validate()
///     .unwrap();
///
/// assert_eq!(descriptor.genuine_variable_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SolutionDescriptor {
    pub type_name: &'static str,
    pub entity_descriptors: Vec<EntityDescriptor>,
    pub problem_fact_descriptors: Vec<ProblemFactDescriptor>,
    pub score_field: Option<&'static str>,
    /// Value ranges computed by the solution rather than provided by a collection.
    pub value_ranges: Vec<&'static str>,
    shadow_order: Vec<VariableKey>,
    shadow_dependents: HashMap<VariableKey, Vec<VariableKey>>,
    validated: bool,
}

impl SolutionDescriptor {
    pub fn new(type_name: &'static str) -> Self {
        SolutionDescriptor {
            type_name,
            entity_descriptors: Vec::new(),
            problem_fact_descriptors: Vec::new(),
            score_field: None,
            value_ranges: Vec::new(),
            shadow_order: Vec::new(),
            shadow_dependents: HashMap::new(),
            validated: false,
        }
    }

    pub fn with_entity(mut self, descriptor: EntityDescriptor) -> Self {
        self.entity_descriptors.push(descriptor);
        self
    }

    pub fn with_problem_fact(mut self, descriptor: ProblemFactDescriptor) -> Self {
        self.problem_fact_descriptors.push(descriptor);
        self
    }

    pub fn with_score_field(mut self, field: &'static str) -> Self {
        self.score_field = Some(field);
        self
    }

    pub fn with_value_range(mut self, id: &'static str) -> Self {
        self.value_ranges.push(id);
        self
    }

    /// Checks the descriptor and orders shadow variables by dependency.
    ///
    /// Fails when no solution type or entity is declared, an entity has no
    /// genuine variable (list elements excepted), the score field is missing,
    /// a variable references an undeclared value range, or shadow variables
    /// depend on each other in a cycle.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.type_name.is_empty() {
            return Err(ValidationError::NoSolution);
        }
        if self.entity_descriptors.is_empty() {
            return Err(ValidationError::NoEntities {
                solution: self.type_name,
            });
        }
        if self.score_field.is_none() {
            return Err(ValidationError::MissingScoreField {
                solution: self.type_name,
            });
        }

        let declared = self.declared_value_ranges();
        let list_elements = self.list_element_ranges();
        for entity in &self.entity_descriptors {
            let is_list_element = entity
                .value_range_provider
                .is_some_and(|id| list_elements.contains(id));
            if !entity.has_genuine_variables() && !is_list_element {
                return Err(ValidationError::NoPlanningVariables {
                    entity: entity.type_name,
                });
            }

            let mut seen = HashSet::new();
            for variable in &entity.variable_descriptors {
                if !seen.insert(variable.name) {
                    return Err(ValidationError::DuplicateVariable {
                        entity: entity.type_name,
                        variable: variable.name,
                    });
                }
                Self::check_value_range(entity, variable, &declared)?;
            }
        }

        self.order_shadows()?;
        self.validated = true;
        Ok(self)
    }

    fn declared_value_ranges(&self) -> HashSet<&'static str> {
        self.problem_fact_descriptors
            .iter()
            .filter_map(|f| f.value_range_provider)
            .chain(
                self.entity_descriptors
                    .iter()
                    .filter_map(|e| e.value_range_provider),
            )
            .chain(self.value_ranges.iter().copied())
            .collect()
    }

    // Value ranges consumed by list variables. Entities providing them are
    // list elements and may carry shadow variables only.
    fn list_element_ranges(&self) -> HashSet<&'static str> {
        self.entity_descriptors
            .iter()
            .flat_map(|e| e.variable_descriptors.iter())
            .filter(|v| v.kind.is_list())
            .filter_map(|v| v.value_range)
            .collect()
    }

    fn check_value_range(
        entity: &EntityDescriptor,
        variable: &VariableDescriptor,
        declared: &HashSet<&'static str>,
    ) -> Result<(), ValidationError> {
        if !variable.kind.is_genuine() {
            return Ok(());
        }
        match variable.value_range {
            Some(range) if !declared.contains(range) => {
                Err(ValidationError::UnreferencedValueRange {
                    entity: entity.type_name,
                    variable: variable.name,
                    range,
                })
            }
            Some(_) => Ok(()),
            None if variable.kind.is_list() => Ok(()),
            None => Err(ValidationError::MissingValueRange {
                entity: entity.type_name,
                variable: variable.name,
            }),
        }
    }

    fn resolve(&self, entity: &str, variable: &str) -> Option<VariableKey> {
        self.entity_descriptors
            .iter()
            .enumerate()
            .find(|(_, e)| e.type_name == entity)
            .and_then(|(d, e)| e.variable_index(variable).map(|v| VariableKey::new(d, v)))
    }

    /// Depth-first topological sort over shadow-to-shadow dependencies.
    fn order_shadows(&mut self) -> Result<(), ValidationError> {
        let mut deps: HashMap<VariableKey, Vec<VariableKey>> = HashMap::new();
        let mut dependents: HashMap<VariableKey, Vec<VariableKey>> = HashMap::new();
        let mut shadows = Vec::new();

        for (d, entity) in self.entity_descriptors.iter().enumerate() {
            for (v, variable) in entity.variable_descriptors.iter().enumerate() {
                if !variable.kind.is_shadow() {
                    continue;
                }
                let key = VariableKey::new(d, v);
                shadows.push(key);
                let mut sources = Vec::new();
                for source in &variable.sources {
                    let source_key = self.resolve(source.entity, source.variable).ok_or(
                        ValidationError::UnknownShadowSource {
                            entity: entity.type_name,
                            variable: variable.name,
                            source_entity: source.entity,
                            source_variable: source.variable,
                        },
                    )?;
                    dependents.entry(source_key).or_default().push(key);
                    sources.push(source_key);
                }
                deps.insert(key, sources);
            }
        }

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks: HashMap<VariableKey, Mark> =
            shadows.iter().map(|&k| (k, Mark::Unvisited)).collect();
        let mut order = Vec::with_capacity(shadows.len());
        let mut stack: Vec<VariableKey> = Vec::new();

        fn visit(
            key: VariableKey,
            deps: &HashMap<VariableKey, Vec<VariableKey>>,
            marks: &mut HashMap<VariableKey, Mark>,
            stack: &mut Vec<VariableKey>,
            order: &mut Vec<VariableKey>,
        ) -> Result<(), Vec<VariableKey>> {
            match marks.get(&key).copied() {
                Some(Mark::Done) | None => return Ok(()),
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|&k| k == key).unwrap_or(0);
                    let mut cycle = stack[start..].to_vec();
                    cycle.push(key);
                    return Err(cycle);
                }
                Some(Mark::Unvisited) => {}
            }
            marks.insert(key, Mark::InProgress);
            stack.push(key);
            for &dep in deps.get(&key).map(Vec::as_slice).unwrap_or_default() {
                visit(dep, deps, marks, stack, order)?;
            }
            stack.pop();
            marks.insert(key, Mark::Done);
            order.push(key);
            Ok(())
        }

        for &key in &shadows {
            if let Err(cycle) = visit(key, &deps, &mut marks, &mut stack, &mut order) {
                return Err(ValidationError::ShadowCycle {
                    cycle: cycle.iter().map(|&k| self.variable_label(k)).collect(),
                });
            }
        }

        self.shadow_order = order;
        self.shadow_dependents = dependents;
        Ok(())
    }

    fn variable_label(&self, key: VariableKey) -> String {
        let entity = &self.entity_descriptors[key.descriptor_index];
        format!(
            "{}.{}",
            entity.type_name, entity.variable_descriptors[key.variable_index].name
        )
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Shadow variables in dependency order: every shadow appears after all
    /// shadows it is derived from.
    pub fn shadow_order(&self) -> &[VariableKey] {
        &self.shadow_order
    }

    /// Shadow variables declared with `key` as a direct source.
    pub fn shadow_dependents(&self, key: VariableKey) -> &[VariableKey] {
        self.shadow_dependents
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_entity_descriptor(&self, type_name: &str) -> Option<&EntityDescriptor> {
        self.entity_descriptors
            .iter()
            .find(|d| d.type_name == type_name)
    }

    pub fn entity_descriptor_index(&self, type_name: &str) -> Option<usize> {
        self.entity_descriptors
            .iter()
            .position(|d| d.type_name == type_name)
    }

    pub fn variable_key(&self, entity: &str, variable: &str) -> Option<VariableKey> {
        self.resolve(entity, variable)
    }

    pub fn variable(&self, key: VariableKey) -> Option<&VariableDescriptor> {
        self.entity_descriptors
            .get(key.descriptor_index)?
            .variable_descriptors
            .get(key.variable_index)
    }

    pub fn genuine_variable_descriptors(&self) -> Vec<&VariableDescriptor> {
        self.entity_descriptors
            .iter()
            .flat_map(|e| e.genuine_variable_descriptors())
            .collect()
    }

    pub fn genuine_variable_count(&self) -> usize {
        self.entity_descriptors
            .iter()
            .map(|e| e.genuine_variable_descriptors().count())
            .sum()
    }

    pub fn entity_descriptor_count(&self) -> usize {
        self.entity_descriptors.len()
    }

    pub fn problem_fact_descriptor_count(&self) -> usize {
        self.problem_fact_descriptors.len()
    }
}
