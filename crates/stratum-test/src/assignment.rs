//! Room assignment test fixtures.
//!
//! Lessons with a fixed timeslot are assigned to rooms. Rooms are problem
//! facts; a lesson's `room` is the index of its room.
//!
//! - Hard: two lessons in the same room and timeslot.
//! - Hard: students beyond the room capacity, per extra student.
//! - Soft: two lessons of the same teacher in different rooms.

use stratum_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningId, PlanningSolution, ProblemFact,
    ProblemFactDescriptor, SolutionDescriptor, VariableDescriptor,
};
use stratum_core::score::HardSoftScore;
use stratum_core::ValidationError;
use stratum_scoring::director::{IncrementalScoreDirector, SimpleScoreDirector, SolvableSolution};
use stratum_scoring::stream::joiner::{equal, equal_bi};
use stratum_scoring::stream::{entities, facts, ConstraintFactory};
use stratum_scoring::ConstraintSet;

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub id: usize,
    pub name: String,
    pub capacity: i64,
}

impl Room {
    pub fn new(id: usize, name: impl Into<String>, capacity: i64) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
        }
    }
}

impl ProblemFact for Room {}

#[derive(Clone, Debug, PartialEq)]
pub struct Lesson {
    pub id: usize,
    pub teacher: String,
    pub student_count: i64,
    pub timeslot: usize,
    pub room: Option<usize>,
}

impl Lesson {
    pub fn new(id: usize, teacher: impl Into<String>, student_count: i64, timeslot: usize) -> Self {
        Self {
            id,
            teacher: teacher.into(),
            student_count,
            timeslot,
            room: None,
        }
    }

    pub fn in_room(mut self, room: usize) -> Self {
        self.room = Some(room);
        self
    }
}

impl PlanningEntity for Lesson {}

impl PlanningId for Lesson {
    type Id = usize;

    fn planning_id(&self) -> usize {
        self.id
    }
}

#[derive(Clone, Debug)]
pub struct Timetable {
    pub rooms: Vec<Room>,
    pub lessons: Vec<Lesson>,
    pub score: Option<HardSoftScore>,
}

impl Timetable {
    pub fn new(rooms: Vec<Room>, lessons: Vec<Lesson>) -> Self {
        Self {
            rooms,
            lessons,
            score: None,
        }
    }

    /// Two rooms (capacity 30 and 20) and four lessons over two timeslots.
    pub fn small() -> Self {
        Self::new(
            vec![Room::new(0, "A", 30), Room::new(1, "B", 20)],
            vec![
                Lesson::new(0, "Curie", 25, 0),
                Lesson::new(1, "Curie", 18, 1),
                Lesson::new(2, "Turing", 20, 0),
                Lesson::new(3, "Turing", 22, 1),
            ],
        )
    }
}

impl PlanningSolution for Timetable {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.lessons.iter().all(|l| l.room.is_some())
    }
}

impl SolvableSolution for Timetable {
    fn entity_count(solution: &Self, _descriptor_index: usize) -> usize {
        solution.lessons.len()
    }

    fn fact_count(solution: &Self, _descriptor_index: usize) -> usize {
        solution.rooms.len()
    }
}

pub fn lessons(t: &Timetable) -> &[Lesson] {
    &t.lessons
}

pub fn rooms(t: &Timetable) -> &[Room] {
    &t.rooms
}

pub fn lesson_count(t: &Timetable) -> usize {
    t.lessons.len()
}

pub fn room_count(t: &Timetable) -> usize {
    t.rooms.len()
}

pub fn get_lesson_room(t: &Timetable, idx: usize) -> Option<usize> {
    t.lessons.get(idx).and_then(|l| l.room)
}

pub fn set_lesson_room(t: &mut Timetable, idx: usize, room: Option<usize>) {
    if let Some(lesson) = t.lessons.get_mut(idx) {
        lesson.room = room;
    }
}

pub fn descriptor() -> Result<SolutionDescriptor, ValidationError> {
    SolutionDescriptor::new("Timetable")
        .with_problem_fact(
            ProblemFactDescriptor::new("Room", "rooms").with_value_range_provider("rooms"),
        )
        .with_entity(
            EntityDescriptor::new("Lesson", "lessons")
                .with_variable(VariableDescriptor::genuine("room").with_value_range("rooms")),
        )
        .with_score_field("score")
        .validate()
}

/// Full recalculation of all three constraints.
pub fn calculate_score(t: &Timetable) -> HardSoftScore {
    let mut hard = 0;
    let mut soft = 0;
    let lessons = &t.lessons;

    for (i, a) in lessons.iter().enumerate() {
        if let Some(room) = a.room.and_then(|r| t.rooms.get(r)) {
            hard -= (a.student_count - room.capacity).max(0);
        }
        for b in &lessons[i + 1..] {
            let (Some(ra), Some(rb)) = (a.room, b.room) else {
                continue;
            };
            if ra == rb && a.timeslot == b.timeslot {
                hard -= 1;
            }
            if a.teacher == b.teacher && ra != rb {
                soft -= 1;
            }
        }
    }

    HardSoftScore::of(hard, soft)
}

pub fn constraints() -> impl ConstraintSet<Timetable, HardSoftScore> {
    let factory = ConstraintFactory::<Timetable, HardSoftScore>::new();

    let room_conflict = factory
        .for_each_unique_pair(
            entities(0, lessons),
            equal(|l: &Lesson| (l.timeslot, l.room)),
        )
        .filter(|a: &Lesson, _: &Lesson| a.room.is_some())
        .penalize(HardSoftScore::ONE_HARD)
        .as_constraint_in("timetable", "Room conflict");

    let room_capacity = factory
        .for_each(entities(0, lessons))
        .join(
            facts(0, rooms),
            equal_bi(|l: &Lesson| l.room, |r: &Room| Some(r.id)),
        )
        .filter(|l: &Lesson, r: &Room| l.student_count > r.capacity)
        .penalize_with(HardSoftScore::ONE_HARD, |l: &Lesson, r: &Room| {
            l.student_count - r.capacity
        })
        .as_constraint_in("timetable", "Room capacity");

    let teacher_room_stability = factory
        .for_each_unique_pair(entities(0, lessons), equal(|l: &Lesson| l.teacher.clone()))
        .filter(|a: &Lesson, b: &Lesson| a.room.is_some() && b.room.is_some() && a.room != b.room)
        .penalize(HardSoftScore::ONE_SOFT)
        .as_constraint_in("timetable", "Teacher room stability");

    (room_conflict, room_capacity, teacher_room_stability)
}

pub fn incremental_director(
    solution: Timetable,
) -> Result<
    IncrementalScoreDirector<Timetable, impl ConstraintSet<Timetable, HardSoftScore>>,
    ValidationError,
> {
    Ok(IncrementalScoreDirector::new(
        solution,
        descriptor()?,
        constraints(),
    ))
}

pub fn simple_director(
    solution: Timetable,
) -> Result<SimpleScoreDirector<Timetable, fn(&Timetable) -> HardSoftScore>, ValidationError> {
    Ok(SimpleScoreDirector::new(
        solution,
        descriptor()?,
        calculate_score as fn(&Timetable) -> HardSoftScore,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_scoring::director::ScoreDirector;

    fn assigned(rooms: &[usize]) -> Timetable {
        let mut t = Timetable::small();
        for (lesson, &room) in t.lessons.iter_mut().zip(rooms) {
            lesson.room = Some(room);
        }
        t
    }

    #[test]
    fn test_full_recalculation() {
        // Both timeslots double-book a room, lesson 3 (22 students) overflows
        // room B (20) by two, and both teachers switch rooms.
        let t = assigned(&[0, 1, 0, 1]);
        assert_eq!(calculate_score(&t), HardSoftScore::of(-4, -2));
    }

    #[test]
    fn test_feasible_assignment() {
        let t = assigned(&[0, 1, 1, 0]);
        assert_eq!(calculate_score(&t), HardSoftScore::of(0, -2));
    }

    #[test]
    fn test_incremental_matches_full_recalculation() {
        for rooms in [[0, 0, 0, 0], [0, 1, 0, 1], [1, 1, 0, 0], [0, 1, 1, 0]] {
            let t = assigned(&rooms);
            let expected = calculate_score(&t);
            let mut director = incremental_director(t).unwrap();
            assert_eq!(director.calculate_score(), expected, "rooms {rooms:?}");
        }
    }

    #[test]
    fn test_unassigned_lessons_score_zero() {
        let mut director = simple_director(Timetable::small()).unwrap();
        assert_eq!(director.calculate_score(), HardSoftScore::ZERO);
    }
}
