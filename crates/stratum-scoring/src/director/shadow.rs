//! Shadow variable cascade.
//!
//! A [`ShadowListener`] maintains one shadow variable. The cascade orders the
//! listeners by the dependency order computed during descriptor validation,
//! so a listener only runs after every shadow it reads has been refreshed.
//!
//! Listeners report the entities whose shadow actually changed. Those
//! entities feed the listeners further down the order and, once the cascade
//! settles, re-enter the constraint graph as ordinary source updates.

use std::fmt;
use std::sync::Arc;

use stratum_core::domain::{SolutionDescriptor, VariableKey, VariableSource};
use stratum_core::ValidationError;

/// Recomputes one shadow variable from its sources.
///
/// # Example
///
/// ```
/// use stratum_core::domain::VariableSource;
/// use stratum_scoring::director::ShadowListener;
///
/// struct Plan {
///     sizes: Vec<i64>,
///     doubled: Vec<i64>,
/// }
///
/// struct Doubled;
///
/// impl ShadowListener<Plan> for Doubled {
///     fn target(&self) -> VariableSource {
///         VariableSource { entity: "Item", variable: "doubled" }
///     }
///
///     fn update(
///         &self,
///         plan: &mut Plan,
///         _d: usize,
///         index: usize,
///         changed: &mut Vec<(usize, usize)>,
///     ) {
///         let value = plan.sizes[index] * 2;
///         if plan.doubled[index] != value {
///             plan.doubled[index] = value;
///             changed.push((0, index));
///         }
///     }
///
///     fn update_all(&self, plan: &mut Plan) {
///         plan.doubled = plan.sizes.iter().map(|s| s * 2).collect();
///     }
/// }
/// ```
pub trait ShadowListener<S>: Send + Sync {
    /// The shadow variable this listener maintains.
    fn target(&self) -> VariableSource;

    /// Refreshes the shadow on every entity affected by a change to source
    /// entity `(descriptor_index, entity_index)`.
    ///
    /// Pushes `(descriptor_index, entity_index)` for each entity whose shadow
    /// value changed.
    ///
    /// After the last entity of a class is removed, `entity_index` is one
    /// past the end. The listener then only clears shadows that still refer
    /// to the removed entity.
    fn update(
        &self,
        solution: &mut S,
        descriptor_index: usize,
        entity_index: usize,
        changed: &mut Vec<(usize, usize)>,
    );

    /// Recomputes the shadow on every entity.
    fn update_all(&self, solution: &mut S);
}

struct Entry<S> {
    target: VariableKey,
    sources: Vec<VariableKey>,
    listener: Arc<dyn ShadowListener<S>>,
}

impl<S> Clone for Entry<S> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            sources: self.sources.clone(),
            listener: Arc::clone(&self.listener),
        }
    }
}

/// A variable that changed on a set of entities.
struct Dirty {
    descriptor_index: usize,
    // None when the caller did not name the variable.
    variable_index: Option<usize>,
    entities: Vec<(usize, usize)>,
}

impl Dirty {
    fn matches(&self, source: VariableKey) -> bool {
        self.descriptor_index == source.descriptor_index
            && self
                .variable_index
                .map_or(true, |v| v == source.variable_index)
    }
}

/// Shadow listeners in dependency order.
pub struct ShadowCascade<S> {
    entries: Vec<Entry<S>>,
}

impl<S> ShadowCascade<S> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Orders `listeners` by the validated shadow order of `descriptor`.
    ///
    /// Fails when a listener targets something the descriptor does not
    /// declare as a shadow variable.
    pub fn new(
        descriptor: &SolutionDescriptor,
        listeners: Vec<Arc<dyn ShadowListener<S>>>,
    ) -> Result<Self, ValidationError> {
        let mut entries = Vec::with_capacity(listeners.len());
        for listener in listeners {
            let target = listener.target();
            let key = descriptor
                .variable_key(target.entity, target.variable)
                .filter(|&k| descriptor.variable(k).is_some_and(|v| v.kind.is_shadow()))
                .ok_or(ValidationError::UnknownShadowVariable {
                    entity: target.entity,
                    variable: target.variable,
                })?;
            let sources = descriptor
                .variable(key)
                .map(|v| {
                    v.sources
                        .iter()
                        .filter_map(|s| descriptor.variable_key(s.entity, s.variable))
                        .collect()
                })
                .unwrap_or_default();
            entries.push(Entry {
                target: key,
                sources,
                listener,
            });
        }

        let order = descriptor.shadow_order();
        entries.sort_by_key(|e| {
            order
                .iter()
                .position(|&k| k == e.target)
                .unwrap_or(usize::MAX)
        });
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the cascade for a change of `variable_index` (or any variable when
    /// `None`) on entity `(descriptor_index, entity_index)`.
    ///
    /// Appends every entity whose shadows changed to `changed`, deduplicated.
    pub fn cascade(
        &self,
        solution: &mut S,
        descriptor_index: usize,
        variable_index: Option<usize>,
        entity_index: usize,
        changed: &mut Vec<(usize, usize)>,
    ) {
        if self.entries.is_empty() {
            return;
        }
        let mut dirty = vec![Dirty {
            descriptor_index,
            variable_index,
            entities: vec![(descriptor_index, entity_index)],
        }];
        let start = changed.len();

        for entry in &self.entries {
            let mut touched: Vec<(usize, usize)> = dirty
                .iter()
                .filter(|d| entry.sources.iter().any(|&s| d.matches(s)))
                .flat_map(|d| d.entities.iter().copied())
                .collect();
            if touched.is_empty() {
                continue;
            }
            touched.sort_unstable();
            touched.dedup();

            let mut updated = Vec::new();
            for (d, i) in touched {
                entry.listener.update(solution, d, i, &mut updated);
            }
            updated.sort_unstable();
            updated.dedup();
            if updated.is_empty() {
                continue;
            }
            changed.extend_from_slice(&updated);
            dirty.push(Dirty {
                descriptor_index: entry.target.descriptor_index,
                variable_index: Some(entry.target.variable_index),
                entities: updated,
            });
        }

        let tail = &mut changed[start..];
        tail.sort_unstable();
        let mut unique = tail.to_vec();
        unique.dedup();
        changed.truncate(start);
        changed.extend(unique);
    }

    /// Recomputes every shadow from scratch, in dependency order.
    pub fn update_all(&self, solution: &mut S) {
        for entry in &self.entries {
            entry.listener.update_all(solution);
        }
    }
}

impl<S> Clone for ShadowCascade<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S> Default for ShadowCascade<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> fmt::Debug for ShadowCascade<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowCascade")
            .field(
                "targets",
                &self.entries.iter().map(|e| e.target).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// Indices to cascade after removing `entity_index` from a class that now
// has `count` entities: every shifted entity, and the removed index itself
// when nothing shifted into it.
pub(super) fn removal_cascade(entity_index: usize, count: usize) -> std::ops::Range<usize> {
    entity_index..count.max(entity_index + 1)
}
