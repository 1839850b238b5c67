use super::*;
use crate::domain::VariableKey;
use crate::error::ValidationError;

fn timetable() -> SolutionDescriptor {
    SolutionDescriptor::new("Timetable")
        .with_problem_fact(
            ProblemFactDescriptor::new("Room", "rooms").with_value_range_provider("rooms"),
        )
        .with_problem_fact(
            ProblemFactDescriptor::new("Timeslot", "timeslots")
                .with_value_range_provider("timeslots"),
        )
        .with_entity(
            EntityDescriptor::new("Lesson", "lessons")
                .with_variable(VariableDescriptor::genuine("room").with_value_range("rooms"))
                .with_variable(
                    VariableDescriptor::genuine("timeslot").with_value_range("timeslots"),
                ),
        )
        .with_score_field("score")
}

fn routing() -> SolutionDescriptor {
    SolutionDescriptor::new("Routing")
        .with_entity(
            EntityDescriptor::new("Vehicle", "vehicles")
                .with_variable(VariableDescriptor::list("visits")),
        )
        .with_entity(
            EntityDescriptor::new("Visit", "visits")
                .with_variable(
                    VariableDescriptor::genuine("priority").with_value_range("priorities"),
                )
                .with_variable(
                    VariableDescriptor::shadow("arrival").with_source("Visit", "previous"),
                )
                .with_variable(
                    VariableDescriptor::shadow("previous").with_source("Vehicle", "visits"),
                )
                .with_variable(
                    VariableDescriptor::shadow("departure")
                        .with_source("Visit", "arrival")
                        .with_source("Visit", "priority"),
                ),
        )
        .with_value_range("priorities")
        .with_score_field("score")
}

#[test]
fn test_valid_descriptor() {
    let d = timetable().validate().unwrap();
    assert!(d.is_validated());
    assert_eq!(d.genuine_variable_count(), 2);
    assert_eq!(d.entity_descriptor_index("Lesson"), Some(0));
    assert_eq!(d.variable_key("Lesson", "timeslot"), Some(VariableKey::new(0, 1)));
    assert!(d.shadow_order().is_empty());
}

#[test]
fn test_missing_solution_type() {
    let err = SolutionDescriptor::new("").validate().unwrap_err();
    assert_eq!(err, ValidationError::NoSolution);
}

#[test]
fn test_no_entities() {
    let err = SolutionDescriptor::new("Empty")
        .with_score_field("score")
        .validate()
        .unwrap_err();
    assert!(matches!(err, ValidationError::NoEntities { solution: "Empty" }));
}

#[test]
fn test_entity_without_variables() {
    let err = timetable()
        .with_entity(EntityDescriptor::new("Teacher", "teachers"))
        .validate()
        .unwrap_err();
    assert!(matches!(err, ValidationError::NoPlanningVariables { entity: "Teacher" }));
}

#[test]
fn test_entity_with_only_shadows_has_no_planning_variables() {
    let err = timetable()
        .with_entity(
            EntityDescriptor::new("Report", "reports")
                .with_variable(VariableDescriptor::shadow("load").with_source("Lesson", "room")),
        )
        .validate()
        .unwrap_err();
    assert!(matches!(err, ValidationError::NoPlanningVariables { entity: "Report" }));
}

#[test]
fn test_missing_score_field() {
    let mut d = timetable();
    d.score_field = None;
    assert!(matches!(
        d.validate(),
        Err(ValidationError::MissingScoreField { .. })
    ));
}

#[test]
fn test_unreferenced_value_range() {
    let err = timetable()
        .with_entity(
            EntityDescriptor::new("Exam", "exams")
                .with_variable(VariableDescriptor::genuine("hall").with_value_range("halls")),
        )
        .validate()
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnreferencedValueRange {
            entity: "Exam",
            variable: "hall",
            range: "halls",
        }
    );
}

#[test]
fn test_basic_variable_requires_value_range() {
    let err = timetable()
        .with_entity(
            EntityDescriptor::new("Exam", "exams")
                .with_variable(VariableDescriptor::genuine("hall")),
        )
        .validate()
        .unwrap_err();
    assert!(matches!(err, ValidationError::MissingValueRange { .. }));
}

#[test]
fn test_duplicate_variable() {
    let err = timetable()
        .with_entity(
            EntityDescriptor::new("Exam", "exams")
                .with_variable(VariableDescriptor::genuine("room").with_value_range("rooms"))
                .with_variable(VariableDescriptor::genuine("room").with_value_range("rooms")),
        )
        .validate()
        .unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateVariable { .. }));
}

#[test]
fn test_shadow_order_respects_dependencies() {
    let d = routing().validate().unwrap();
    let order = d.shadow_order();
    let pos = |name: &str| {
        let key = d.variable_key("Visit", name).unwrap();
        order.iter().position(|&k| k == key).unwrap()
    };
    assert_eq!(order.len(), 3);
    assert!(pos("previous") < pos("arrival"));
    assert!(pos("arrival") < pos("departure"));

    let visits = d.variable_key("Vehicle", "visits").unwrap();
    assert_eq!(d.shadow_dependents(visits), &[d.variable_key("Visit", "previous").unwrap()]);
    let priority = d.variable_key("Visit", "priority").unwrap();
    assert_eq!(d.shadow_dependents(priority).len(), 1);
}

#[test]
fn test_shadow_cycle_is_rejected() {
    let err = SolutionDescriptor::new("Cyclic")
        .with_entity(
            EntityDescriptor::new("Task", "tasks")
                .with_variable(VariableDescriptor::list("steps"))
                .with_variable(VariableDescriptor::shadow("start").with_source("Task", "end"))
                .with_variable(VariableDescriptor::shadow("end").with_source("Task", "start")),
        )
        .with_score_field("score")
        .validate()
        .unwrap_err();
    match err {
        ValidationError::ShadowCycle { cycle } => {
            assert_eq!(cycle, vec!["Task.start", "Task.end", "Task.start"]);
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn test_unknown_shadow_source() {
    let err = routing()
        .with_entity(
            EntityDescriptor::new("Depot", "depots")
                .with_variable(VariableDescriptor::list("trucks"))
                .with_variable(VariableDescriptor::shadow("load").with_source("Truck", "cargo")),
        )
        .validate()
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::UnknownShadowSource {
            source_entity: "Truck",
            ..
        }
    ));
}

#[test]
fn test_list_elements_may_carry_only_shadows() {
    let d = SolutionDescriptor::new("Routing")
        .with_entity(
            EntityDescriptor::new("Vehicle", "vehicles")
                .with_variable(VariableDescriptor::list("visits").with_value_range("visits")),
        )
        .with_entity(
            EntityDescriptor::new("Visit", "visits")
                .with_value_range_provider("visits")
                .with_variable(
                    VariableDescriptor::shadow("vehicle").with_source("Vehicle", "visits"),
                ),
        )
        .with_score_field("score")
        .validate()
        .unwrap();
    assert_eq!(d.shadow_order(), &[VariableKey::new(1, 0)]);
}
