// Stream-level tests: constraints built with the fluent API, driven through
// random changes and compared with hand-written full calculations.

use std::collections::{HashMap, HashSet};

use stratum_core::score::SimpleScore;

use super::collector::{count, sum};
use super::joiner::{equal, equal_bi, filtering, Joiner};
use super::{entities, facts, ConstraintFactory};
use crate::api::constraint_set::IncrementalConstraint;
use crate::graph::{SourceClass, SourceEvent};

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    id: usize,
    off_days: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq)]
struct Shift {
    employee: Option<usize>,
    day: u32,
    hours: i64,
}

#[derive(Clone, Debug)]
struct Roster {
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
}

fn employees(r: &Roster) -> &[Employee] {
    &r.employees
}

fn shifts(r: &Roster) -> &[Shift] {
    &r.shifts
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }

    fn shift(&mut self) -> Shift {
        Shift {
            employee: match self.next(5) {
                4 => None,
                e => Some(e),
            },
            day: self.next(3) as u32,
            hours: 1 + self.next(6) as i64,
        }
    }

    fn off_days(&mut self) -> Vec<u32> {
        (0..self.next(3)).map(|_| self.next(3) as u32).collect()
    }
}

fn roster(rng: &mut Lcg) -> Roster {
    Roster {
        employees: (0..3)
            .map(|id| Employee {
                id,
                off_days: rng.off_days(),
            })
            .collect(),
        shifts: (0..6).map(|_| rng.shift()).collect(),
    }
}

fn mutate(r: &mut Roster, rng: &mut Lcg) -> SourceEvent {
    let entity = SourceClass::Entity(0);
    let fact = SourceClass::Fact(0);
    match rng.next(9) {
        0..=3 if !r.shifts.is_empty() => {
            let index = rng.next(r.shifts.len());
            r.shifts[index] = rng.shift();
            SourceEvent::Update {
                class: entity,
                index,
            }
        }
        5 if !r.shifts.is_empty() => {
            r.shifts.pop();
            SourceEvent::Retract {
                class: entity,
                index: r.shifts.len(),
            }
        }
        6 => {
            let index = rng.next(r.employees.len());
            r.employees[index].off_days = rng.off_days();
            SourceEvent::Update { class: fact, index }
        }
        7 => {
            let id = r.employees.len();
            r.employees.push(Employee {
                id,
                off_days: rng.off_days(),
            });
            SourceEvent::Insert {
                class: fact,
                index: id,
            }
        }
        8 if r.employees.len() > 1 => {
            r.employees.pop();
            SourceEvent::Retract {
                class: fact,
                index: r.employees.len(),
            }
        }
        _ => {
            r.shifts.push(rng.shift());
            SourceEvent::Insert {
                class: entity,
                index: r.shifts.len() - 1,
            }
        }
    }
}

// Runs `constraint` through a random script, checking its score and every
// returned delta against `expected`.
fn check<C>(mut constraint: C, expected: impl Fn(&Roster) -> i64)
where
    C: IncrementalConstraint<Roster, SimpleScore>,
{
    let mut rng = Lcg(5);
    let mut r = roster(&mut rng);
    let mut running = constraint.initialize(&r);
    assert_eq!(running, SimpleScore::of(expected(&r)), "after initialize");

    for step in 0..300 {
        let event = mutate(&mut r, &mut rng);
        running = running + constraint.on_event(&r, &event);
        let want = SimpleScore::of(expected(&r));
        assert_eq!(constraint.score(), want, "step {step}: {event:?}");
        assert_eq!(running, want, "delta at step {step}");
    }
}

fn factory() -> ConstraintFactory<Roster, SimpleScore> {
    ConstraintFactory::new()
}

#[test]
fn test_if_not_exists() {
    let unknown = factory()
        .for_each(entities(0, shifts))
        .filter(|s: &Shift| s.employee.is_some())
        .if_not_exists(
            facts(0, employees),
            equal_bi(|s: &Shift| s.employee, |e: &Employee| Some(e.id)),
        )
        .penalize(SimpleScore::of(1))
        .as_constraint("Unknown employee");

    check(unknown, |r| {
        -(r.shifts
            .iter()
            .filter(|s| {
                s.employee
                    .is_some_and(|e| !r.employees.iter().any(|emp| emp.id == e))
            })
            .count() as i64)
    });
}

#[test]
fn test_if_exists_with_combined_joiner() {
    let off_day = factory()
        .for_each(entities(0, shifts))
        .if_exists(
            facts(0, employees),
            Joiner::<Shift, Employee>::and(
                equal_bi(|s: &Shift| s.employee, |e: &Employee| Some(e.id)),
                filtering(|s: &Shift, e: &Employee| e.off_days.contains(&s.day)),
            ),
        )
        .penalize(SimpleScore::of(1))
        .as_constraint("Shift on day off");

    check(off_day, |r| {
        -(r.shifts
            .iter()
            .filter(|s| {
                r.employees
                    .iter()
                    .any(|e| s.employee == Some(e.id) && e.off_days.contains(&s.day))
            })
            .count() as i64)
    });
}

#[test]
fn test_group_by_with_bi_complement() {
    let workload = factory()
        .for_each(entities(0, shifts))
        .filter(|s: &Shift| s.employee.is_some())
        .group_by(|s: &Shift| s.employee.unwrap_or_default(), sum(|s: &Shift| s.hours))
        .complement(facts(0, employees), |e: &Employee| e.id, |_: &Employee| 0i64)
        .penalize_with(SimpleScore::of(1), |_: &usize, hours: &i64| (hours - 8).abs())
        .as_constraint("Eight hours each");

    check(workload, |r| {
        let mut totals: HashMap<usize, i64> = HashMap::new();
        for s in &r.shifts {
            if let Some(e) = s.employee {
                *totals.entry(e).or_default() += s.hours;
            }
        }
        let busy: i64 = totals.values().map(|h| (h - 8).abs()).sum();
        let idle = r
            .employees
            .iter()
            .filter(|e| !totals.contains_key(&e.id))
            .count() as i64;
        -(busy + 8 * idle)
    });
}

#[test]
fn test_group_by_key_with_uni_complement() {
    let everyone = factory()
        .for_each(entities(0, shifts))
        .filter(|s: &Shift| s.employee.is_some())
        .group_by_key(|s: &Shift| s.employee.unwrap_or_default())
        .complement(facts(0, employees), |e: &Employee| e.id)
        .penalize(SimpleScore::of(1))
        .as_constraint("Known or idle");

    check(everyone, |r| {
        let assigned: HashSet<usize> = r.shifts.iter().filter_map(|s| s.employee).collect();
        let idle = r
            .employees
            .iter()
            .filter(|e| !assigned.contains(&e.id))
            .count();
        -((assigned.len() + idle) as i64)
    });
}

#[test]
fn test_flatten_last() {
    let off_day = factory()
        .for_each(entities(0, shifts))
        .join(
            facts(0, employees),
            equal_bi(|s: &Shift| s.employee, |e: &Employee| Some(e.id)),
        )
        .flatten_last(|e: &Employee| e.off_days.clone())
        .filter(|s: &Shift, day: &u32| s.day == *day)
        .penalize(SimpleScore::of(1))
        .as_constraint("Shift per matching day off");

    check(off_day, |r| {
        let mut n = 0i64;
        for s in &r.shifts {
            for e in r.employees.iter().filter(|e| s.employee == Some(e.id)) {
                n += e.off_days.iter().filter(|&&d| d == s.day).count() as i64;
            }
        }
        -n
    });
}

#[test]
fn test_collect_and_reward() {
    let shift_count = factory()
        .for_each(entities(0, shifts))
        .collect(count())
        .reward_with(SimpleScore::of(1), |n: &usize| *n as i64)
        .as_constraint("Shift count");

    check(shift_count, |r| r.shifts.len() as i64);
}

#[test]
fn test_tri_join() {
    let double_booked = factory()
        .for_each_unique_pair(entities(0, shifts), equal(|s: &Shift| s.employee))
        .filter(|a: &Shift, _: &Shift| a.employee.is_some())
        .join(
            facts(0, employees),
            equal_bi(|p: &(Shift, Shift)| p.0.employee, |e: &Employee| Some(e.id)),
        )
        .filter(|a: &Shift, b: &Shift, _: &Employee| a.day == b.day)
        .penalize_with(SimpleScore::of(1), |a: &Shift, b: &Shift, _: &Employee| {
            a.hours.min(b.hours)
        })
        .as_constraint("Double booked");

    check(double_booked, |r| {
        let mut total = 0;
        for (i, a) in r.shifts.iter().enumerate() {
            for b in &r.shifts[i + 1..] {
                let known = a
                    .employee
                    .is_some_and(|e| r.employees.iter().any(|emp| emp.id == e));
                if known && a.employee == b.employee && a.day == b.day {
                    total += a.hours.min(b.hours);
                }
            }
        }
        -total
    });
}

// Pairs of shifts sharing a known employee, per employee id.
fn shared_pairs(r: &Roster) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    for (i, a) in r.shifts.iter().enumerate() {
        for b in &r.shifts[i + 1..] {
            match a.employee {
                Some(e) if a.employee == b.employee && r.employees.iter().any(|x| x.id == e) => {
                    *pairs.entry(e).or_default() += 1;
                }
                _ => {}
            }
        }
    }
    pairs
}

#[test]
fn test_tri_group_by_and_collect() {
    let tri = || {
        factory()
            .for_each_unique_pair(entities(0, shifts), equal(|s: &Shift| s.employee))
            .join(
                facts(0, employees),
                equal_bi(|p: &(Shift, Shift)| p.0.employee, |e: &Employee| Some(e.id)),
            )
    };

    let crowded = tri()
        .group_by(|_: &Shift, _: &Shift, e: &Employee| e.id, count())
        .filter(|_: &usize, n: &usize| *n > 1)
        .penalize_with(SimpleScore::of(1), |_: &usize, n: &usize| *n as i64)
        .as_constraint("Crowded employee");
    check(crowded, |r| {
        -(shared_pairs(r).values().filter(|&&n| n > 1).sum::<usize>() as i64)
    });

    let total = tri()
        .collect(count())
        .penalize_with(SimpleScore::of(1), |n: &usize| *n as i64)
        .as_constraint("Shared shifts");
    check(total, |r| -(shared_pairs(r).values().sum::<usize>() as i64));
}

#[test]
fn test_map_then_group() {
    let days = factory()
        .for_each(entities(0, shifts))
        .map(|s: &Shift| s.day)
        .group_by(|d: &u32| *d, count())
        .filter(|_: &u32, n: &usize| *n > 2)
        .penalize_with(SimpleScore::of(1), |_: &u32, n: &usize| (*n - 2) as i64)
        .as_constraint("Crowded day");

    check(days, |r| {
        let mut per_day: HashMap<u32, usize> = HashMap::new();
        for s in &r.shifts {
            *per_day.entry(s.day).or_default() += 1;
        }
        -(per_day.values().map(|&n| n.saturating_sub(2) as i64).sum::<i64>())
    });
}

#[test]
fn test_constraint_metadata() {
    let c = factory()
        .for_each(entities(0, shifts))
        .penalize(SimpleScore::of(3))
        .as_constraint_in("roster", "Any shift");
    assert_eq!(c.name(), "Any shift");
    assert_eq!(c.constraint_ref().package, "roster");
    assert_eq!(c.weight(), SimpleScore::of(3));
    assert!(c.listens_to(SourceClass::Entity(0)));
    assert!(!c.listens_to(SourceClass::Fact(0)));
}

#[test]
fn test_matches_carry_justifications() {
    let mut c = factory()
        .for_each(entities(0, shifts))
        .filter(|s: &Shift| s.employee.is_none())
        .penalize(SimpleScore::of(2))
        .as_constraint("Unassigned");
    let r = Roster {
        employees: vec![],
        shifts: vec![
            Shift {
                employee: None,
                day: 1,
                hours: 4,
            },
            Shift {
                employee: Some(0),
                day: 1,
                hours: 4,
            },
        ],
    };
    assert_eq!(c.initialize(&r), SimpleScore::of(-2));
    let matches = c.matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, SimpleScore::of(-2));
    assert!(matches[0].justification.contains("employee: None"));
    assert_eq!(c.match_count(), 1);
}
