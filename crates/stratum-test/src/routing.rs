//! Vehicle routing test fixtures with a list variable and shadow variables.
//!
//! Each vehicle owns an ordered list of visit indices (`Vehicle.visits`, the
//! list variable). Visits carry two shadows:
//!
//! - `vehicle`: the vehicle whose list holds the visit.
//! - `arrival_time`: when the vehicle reaches the visit, driving from the
//!   depot through the earlier visits and serving each one.
//!
//! `arrival_time` reads `vehicle`, so the descriptor orders it second.
//!
//! - Hard: demand above the vehicle capacity, per extra unit.
//! - Hard: arriving after a visit's due time, per time unit.
//! - Soft: the sum of arrival times.

use std::sync::Arc;

use stratum_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningSolution, SolutionDescriptor, VariableDescriptor,
    VariableSource,
};
use stratum_core::score::HardSoftScore;
use stratum_core::ValidationError;
use stratum_scoring::director::{
    IncrementalScoreDirector, ShadowCascade, ShadowListener, SimpleScoreDirector, SolvableSolution,
};
use stratum_scoring::stream::collector::sum;
use stratum_scoring::stream::joiner::equal_bi;
use stratum_scoring::stream::{entities, ConstraintFactory};
use stratum_scoring::ConstraintSet;

pub const VEHICLE_DESCRIPTOR: usize = 0;
pub const VISIT_DESCRIPTOR: usize = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: usize,
    pub capacity: i64,
    pub visits: Vec<usize>,
}

impl PlanningEntity for Vehicle {}

#[derive(Clone, Debug, PartialEq)]
pub struct Visit {
    pub id: usize,
    pub demand: i64,
    pub service_duration: i64,
    pub due_time: i64,
    pub vehicle: Option<usize>,
    pub arrival_time: Option<i64>,
}

impl PlanningEntity for Visit {}

#[derive(Clone, Debug)]
pub struct RoutingSolution {
    pub vehicles: Vec<Vehicle>,
    pub visits: Vec<Visit>,
    /// Travel times; location 0 is the depot and visit `i` is location `i + 1`.
    pub travel_times: Vec<Vec<i64>>,
    pub score: Option<HardSoftScore>,
}

impl RoutingSolution {
    /// Locations on a line at the given coordinates, depot at 0.
    ///
    /// Every visit has demand 1, service duration 1 and the given due time.
    pub fn on_line(positions: &[i64], due_times: &[i64], capacities: &[i64]) -> Self {
        let locations: Vec<i64> = std::iter::once(0).chain(positions.iter().copied()).collect();
        let travel_times = locations
            .iter()
            .map(|a| locations.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let visits = due_times
            .iter()
            .enumerate()
            .map(|(id, &due_time)| Visit {
                id,
                demand: 1,
                service_duration: 1,
                due_time,
                vehicle: None,
                arrival_time: None,
            })
            .collect();
        let vehicles = capacities
            .iter()
            .enumerate()
            .map(|(id, &capacity)| Vehicle {
                id,
                capacity,
                visits: Vec::new(),
            })
            .collect();
        Self {
            vehicles,
            visits,
            travel_times,
            score: None,
        }
    }

    /// Assigns routes without refreshing shadows.
    pub fn with_routes(mut self, routes: &[&[usize]]) -> Self {
        for (vehicle, route) in self.vehicles.iter_mut().zip(routes) {
            vehicle.visits = route.to_vec();
        }
        self
    }

    fn travel(&self, from: usize, to: usize) -> i64 {
        self.travel_times
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Arrival time at every visit of `route`, in route order.
    pub fn route_arrivals(&self, route: &[usize]) -> Vec<i64> {
        let mut time = 0;
        let mut location = 0;
        let mut arrivals = Vec::with_capacity(route.len());
        for &visit in route {
            time += self.travel(location, visit + 1);
            arrivals.push(time);
            time += self
                .visits
                .get(visit)
                .map_or(0, |v| v.service_duration);
            location = visit + 1;
        }
        arrivals
    }
}

impl PlanningSolution for RoutingSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        let assigned: usize = self.vehicles.iter().map(|v| v.visits.len()).sum();
        assigned == self.visits.len()
    }
}

impl SolvableSolution for RoutingSolution {
    fn entity_count(solution: &Self, descriptor_index: usize) -> usize {
        match descriptor_index {
            VEHICLE_DESCRIPTOR => solution.vehicles.len(),
            VISIT_DESCRIPTOR => solution.visits.len(),
            _ => 0,
        }
    }
}

pub fn vehicles(s: &RoutingSolution) -> &[Vehicle] {
    &s.vehicles
}

pub fn visits(s: &RoutingSolution) -> &[Visit] {
    &s.visits
}

pub fn vehicle_count(s: &RoutingSolution) -> usize {
    s.vehicles.len()
}

pub fn visit_count(s: &RoutingSolution) -> usize {
    s.visits.len()
}

/// Typed getter for the `visits` list variable.
pub fn route(s: &RoutingSolution, vehicle: usize) -> &[usize] {
    s.vehicles
        .get(vehicle)
        .map(|v| v.visits.as_slice())
        .unwrap_or_default()
}

/// Typed mutable access to the `visits` list variable.
///
/// # Panics
/// Panics if `vehicle` is out of bounds; list moves check bounds first.
pub fn route_mut(s: &mut RoutingSolution, vehicle: usize) -> &mut Vec<usize> {
    &mut s.vehicles[vehicle].visits
}

pub fn descriptor() -> Result<SolutionDescriptor, ValidationError> {
    SolutionDescriptor::new("RoutingSolution")
        .with_entity(
            EntityDescriptor::new("Vehicle", "vehicles")
                .with_variable(VariableDescriptor::list("visits").with_value_range("visits")),
        )
        .with_entity(
            EntityDescriptor::new("Visit", "visits")
                .with_value_range_provider("visits")
                .with_variable(
                    VariableDescriptor::shadow("arrival_time")
                        .with_source("Vehicle", "visits")
                        .with_source("Visit", "vehicle"),
                )
                .with_variable(
                    VariableDescriptor::shadow("vehicle").with_source("Vehicle", "visits"),
                ),
        )
        .with_score_field("score")
        .validate()
}

/// Maintains `Visit.vehicle`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleListener;

impl ShadowListener<RoutingSolution> for VehicleListener {
    fn target(&self) -> VariableSource {
        VariableSource {
            entity: "Visit",
            variable: "vehicle",
        }
    }

    fn update(
        &self,
        s: &mut RoutingSolution,
        descriptor_index: usize,
        entity_index: usize,
        changed: &mut Vec<(usize, usize)>,
    ) {
        let mut set = |s: &mut RoutingSolution, visit: usize, vehicle: Option<usize>| {
            if let Some(v) = s.visits.get_mut(visit) {
                if v.vehicle != vehicle {
                    v.vehicle = vehicle;
                    changed.push((VISIT_DESCRIPTOR, visit));
                }
            }
        };

        match descriptor_index {
            VEHICLE_DESCRIPTOR => {
                let route = route(s, entity_index).to_vec();
                let stale: Vec<usize> = s
                    .visits
                    .iter()
                    .filter(|v| v.vehicle == Some(entity_index) && !route.contains(&v.id))
                    .map(|v| v.id)
                    .collect();
                for visit in stale {
                    let owner = s.vehicles.iter().position(|v| v.visits.contains(&visit));
                    set(s, visit, owner);
                }
                for visit in route {
                    set(s, visit, Some(entity_index));
                }
            }
            VISIT_DESCRIPTOR => {
                let owner = s
                    .vehicles
                    .iter()
                    .position(|v| v.visits.contains(&entity_index));
                set(s, entity_index, owner);
            }
            _ => {}
        }
    }

    fn update_all(&self, s: &mut RoutingSolution) {
        for visit in &mut s.visits {
            visit.vehicle = None;
        }
        for vehicle in 0..s.vehicles.len() {
            for k in 0..s.vehicles[vehicle].visits.len() {
                let visit = s.vehicles[vehicle].visits[k];
                if let Some(v) = s.visits.get_mut(visit) {
                    v.vehicle = Some(vehicle);
                }
            }
        }
    }
}

/// Maintains `Visit.arrival_time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalTimeListener;

impl ArrivalTimeListener {
    fn refresh_route(s: &mut RoutingSolution, vehicle: usize, changed: &mut Vec<(usize, usize)>) {
        let route = route(s, vehicle).to_vec();
        let arrivals = s.route_arrivals(&route);
        for (visit, arrival) in route.into_iter().zip(arrivals) {
            if let Some(v) = s.visits.get_mut(visit) {
                if v.arrival_time != Some(arrival) {
                    v.arrival_time = Some(arrival);
                    changed.push((VISIT_DESCRIPTOR, visit));
                }
            }
        }
    }
}

impl ShadowListener<RoutingSolution> for ArrivalTimeListener {
    fn target(&self) -> VariableSource {
        VariableSource {
            entity: "Visit",
            variable: "arrival_time",
        }
    }

    fn update(
        &self,
        s: &mut RoutingSolution,
        descriptor_index: usize,
        entity_index: usize,
        changed: &mut Vec<(usize, usize)>,
    ) {
        match descriptor_index {
            VEHICLE_DESCRIPTOR => Self::refresh_route(s, entity_index, changed),
            VISIT_DESCRIPTOR => match s.visits.get(entity_index).map(|v| v.vehicle) {
                Some(Some(vehicle)) => Self::refresh_route(s, vehicle, changed),
                Some(None) => {
                    if let Some(v) = s.visits.get_mut(entity_index) {
                        if v.arrival_time.is_some() {
                            v.arrival_time = None;
                            changed.push((VISIT_DESCRIPTOR, entity_index));
                        }
                    }
                }
                None => {}
            },
            _ => {}
        }
    }

    fn update_all(&self, s: &mut RoutingSolution) {
        for visit in &mut s.visits {
            visit.arrival_time = None;
        }
        let mut ignored = Vec::new();
        for vehicle in 0..s.vehicles.len() {
            Self::refresh_route(s, vehicle, &mut ignored);
        }
    }
}

pub fn shadow_cascade(
    descriptor: &SolutionDescriptor,
) -> Result<ShadowCascade<RoutingSolution>, ValidationError> {
    ShadowCascade::new(
        descriptor,
        vec![Arc::new(ArrivalTimeListener), Arc::new(VehicleListener)],
    )
}

/// Full recalculation from the routes alone, ignoring stored shadows.
pub fn calculate_score(s: &RoutingSolution) -> HardSoftScore {
    let mut hard = 0;
    let mut soft = 0;
    for vehicle in &s.vehicles {
        let demand: i64 = vehicle
            .visits
            .iter()
            .filter_map(|&v| s.visits.get(v))
            .map(|v| v.demand)
            .sum();
        hard -= (demand - vehicle.capacity).max(0);

        for (&visit, arrival) in vehicle.visits.iter().zip(s.route_arrivals(&vehicle.visits)) {
            if let Some(v) = s.visits.get(visit) {
                hard -= (arrival - v.due_time).max(0);
            }
            soft -= arrival;
        }
    }
    HardSoftScore::of(hard, soft)
}

pub fn constraints() -> impl ConstraintSet<RoutingSolution, HardSoftScore> {
    let factory = ConstraintFactory::<RoutingSolution, HardSoftScore>::new();

    let vehicle_capacity = factory
        .for_each(entities(VISIT_DESCRIPTOR, visits))
        .filter(|v: &Visit| v.vehicle.is_some())
        .group_by(|v: &Visit| v.vehicle, sum(|v: &Visit| v.demand))
        .join(
            entities(VEHICLE_DESCRIPTOR, vehicles),
            equal_bi(
                |group: &(Option<usize>, i64)| group.0,
                |vehicle: &Vehicle| Some(vehicle.id),
            ),
        )
        .filter(|_: &Option<usize>, demand: &i64, vehicle: &Vehicle| *demand > vehicle.capacity)
        .penalize_with(
            HardSoftScore::ONE_HARD,
            |_: &Option<usize>, demand: &i64, vehicle: &Vehicle| demand - vehicle.capacity,
        )
        .as_constraint_in("routing", "Vehicle capacity");

    let late_arrival = factory
        .for_each(entities(VISIT_DESCRIPTOR, visits))
        .filter(|v: &Visit| v.arrival_time.is_some_and(|t| t > v.due_time))
        .penalize_with(HardSoftScore::ONE_HARD, |v: &Visit| {
            v.arrival_time.map_or(0, |t| t - v.due_time)
        })
        .as_constraint_in("routing", "Late arrival");

    let arrival_times = factory
        .for_each(entities(VISIT_DESCRIPTOR, visits))
        .filter(|v: &Visit| v.arrival_time.is_some())
        .penalize_with(HardSoftScore::ONE_SOFT, |v: &Visit| v.arrival_time.unwrap_or(0))
        .as_constraint_in("routing", "Arrival times");

    (vehicle_capacity, late_arrival, arrival_times)
}

pub fn incremental_director(
    solution: RoutingSolution,
) -> Result<
    IncrementalScoreDirector<RoutingSolution, impl ConstraintSet<RoutingSolution, HardSoftScore>>,
    ValidationError,
> {
    let descriptor = descriptor()?;
    let shadows = shadow_cascade(&descriptor)?;
    Ok(IncrementalScoreDirector::new(solution, descriptor, constraints()).with_shadows(shadows))
}

pub fn simple_director(
    solution: RoutingSolution,
) -> Result<
    SimpleScoreDirector<RoutingSolution, fn(&RoutingSolution) -> HardSoftScore>,
    ValidationError,
> {
    let descriptor = descriptor()?;
    let shadows = shadow_cascade(&descriptor)?;
    Ok(SimpleScoreDirector::new(
        solution,
        descriptor,
        calculate_score as fn(&RoutingSolution) -> HardSoftScore,
    )
    .with_shadows(shadows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_scoring::director::ScoreDirector;

    fn line() -> RoutingSolution {
        // Visits at 2, 5 and 9; due at 3, 10, 4.
        RoutingSolution::on_line(&[2, 5, 9], &[3, 10, 4], &[2, 2])
    }

    #[test]
    fn test_route_arrivals() {
        let s = line();
        // 0 -> 2 (t=2), serve 1, 2 -> 5 (t=6), serve 1, 5 -> 9 (t=11)
        assert_eq!(s.route_arrivals(&[0, 1, 2]), vec![2, 6, 11]);
    }

    #[test]
    fn test_full_recalculation() {
        let s = line().with_routes(&[&[0, 1, 2], &[]]);
        // Capacity 2 exceeded by 1; visit 2 is 7 late; arrivals sum to 19.
        assert_eq!(calculate_score(&s), HardSoftScore::of(-8, -19));
    }

    #[test]
    fn test_shadows_follow_routes() {
        let director = incremental_director(line().with_routes(&[&[1], &[2, 0]])).unwrap();
        let s = director.working_solution();
        assert_eq!(s.visits[0].vehicle, Some(1));
        assert_eq!(s.visits[1].vehicle, Some(0));
        assert_eq!(s.visits[0].arrival_time, Some(17));
        assert_eq!(s.visits[2].arrival_time, Some(9));
    }

    #[test]
    fn test_incremental_matches_full_recalculation() {
        let s = line().with_routes(&[&[0, 1, 2], &[]]);
        let expected = calculate_score(&s);
        let mut director = incremental_director(s).unwrap();
        assert_eq!(director.calculate_score(), expected);
    }

    fn remove_vehicle(director: &mut dyn ScoreDirector<RoutingSolution>, vehicle: usize) {
        director.before_entity_removed(VEHICLE_DESCRIPTOR, vehicle);
        director.working_solution_mut().vehicles.remove(vehicle);
        director.after_entity_removed(VEHICLE_DESCRIPTOR, vehicle);
    }

    #[test]
    fn test_removing_last_vehicle_unassigns_its_visits() {
        let mut director = incremental_director(line().with_routes(&[&[0, 1], &[2]])).unwrap();
        director.calculate_score();

        remove_vehicle(&mut director, 1);

        let s = director.working_solution();
        assert_eq!(s.visits[2].vehicle, None);
        assert_eq!(s.visits[2].arrival_time, None);
        assert_eq!(s.visits[1].vehicle, Some(0));
        let expected = calculate_score(director.working_solution());
        assert_eq!(director.calculate_score(), expected);
        assert!(director.assert_score_from_scratch().is_ok());
    }

    #[test]
    fn test_removing_first_vehicle_renumbers_later_routes() {
        let mut director = incremental_director(line().with_routes(&[&[1], &[2, 0]])).unwrap();
        director.calculate_score();

        remove_vehicle(&mut director, 0);

        let s = director.working_solution();
        assert_eq!(s.visits[1].vehicle, None);
        assert_eq!(s.visits[1].arrival_time, None);
        assert_eq!(s.visits[0].vehicle, Some(0));
        assert_eq!(s.visits[2].vehicle, Some(0));
        assert_eq!(s.visits[0].arrival_time, Some(17));
        let expected = calculate_score(director.working_solution());
        assert_eq!(director.calculate_score(), expected);
        assert!(director.assert_score_from_scratch().is_ok());
    }

    #[test]
    fn test_simple_director_refreshes_shadows_on_removal() {
        let mut director = simple_director(line().with_routes(&[&[0, 1], &[2]])).unwrap();
        remove_vehicle(&mut director, 1);
        assert_eq!(director.working_solution().visits[2].vehicle, None);
        assert_eq!(director.working_solution().visits[2].arrival_time, None);
    }

    #[test]
    fn test_descriptor_orders_vehicle_before_arrival() {
        let d = descriptor().unwrap();
        let vehicle = d.variable_key("Visit", "vehicle").unwrap();
        let arrival = d.variable_key("Visit", "arrival_time").unwrap();
        let order = d.shadow_order();
        let pos = |k| order.iter().position(|&o| o == k).unwrap();
        assert!(pos(vehicle) < pos(arrival));
    }
}
