//! Pure diff between the guest lists an event has and the lists an editor
//! submitted. No database access; [`crate::ops::guest_list_ops::reconcile`]
//! applies the plan inside a transaction.

use std::collections::HashSet;

use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{GuestList, GuestListInput, Id};
use crate::validation;

/// A validated submitted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDraft {
    pub name: String,
    pub max_capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUpdate {
    pub id: Id<GuestList>,
    pub name: String,
    pub max_capacity: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_create: Vec<ListDraft>,
    pub to_update: Vec<ListUpdate>,
    pub to_delete: Vec<Id<GuestList>>,
    /// Matched lists whose name and capacity already agree.
    pub unchanged: Vec<Id<GuestList>>,
}

impl ReconcilePlan {
    pub fn write_count(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    pub fn is_noop(&self) -> bool {
        self.write_count() == 0
    }
}

/// Partitions `desired` against `current`.
///
/// An entry whose id equals a current id is an edit; an entry with no id,
/// or with an id that matches nothing, is a new list. Current lists whose id
/// is absent from `desired` are deleted, so an empty `desired` deletes all.
pub fn diff(current: &[GuestList], desired: &[GuestListInput]) -> GuestlistResult<ReconcilePlan> {
    let mut seen = HashSet::new();
    for id in desired.iter().filter_map(|d| d.id) {
        if !seen.insert(id) {
            return Err(GuestlistError::DuplicateId { id: id.to_string() });
        }
    }

    let mut plan = ReconcilePlan::default();
    for input in desired {
        let name = validation::non_blank(&input.name, "name")?;
        let max_capacity = validation::positive(input.max_capacity, "max_capacity")?;

        match input.id.and_then(|id| current.iter().find(|c| c.id == id)) {
            Some(existing) => {
                if existing.name == name && existing.max_capacity == Some(max_capacity) {
                    plan.unchanged.push(existing.id);
                } else {
                    plan.to_update.push(ListUpdate {
                        id: existing.id,
                        name,
                        max_capacity,
                    });
                }
            }
            None => plan.to_create.push(ListDraft { name, max_capacity }),
        }
    }

    plan.to_delete = current
        .iter()
        .filter(|c| !seen.contains(&c.id))
        .map(|c| c.id)
        .collect();

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn current(name: &str, max: Option<i32>) -> GuestList {
        GuestList::create(name.into(), Id::generate(), max, Id::generate())
    }

    #[test]
    fn partitions_update_delete_and_create() {
        let one = current("Friends", Some(10));
        let two = current("Press", Some(4));
        let desired = vec![
            GuestListInput::existing(one.id, "A", 5),
            GuestListInput::new("C", 3),
        ];

        let plan = diff(&[one.clone(), two.clone()], &desired).unwrap();

        assert_eq!(
            plan.to_update,
            vec![ListUpdate {
                id: one.id,
                name: "A".into(),
                max_capacity: 5
            }]
        );
        assert_eq!(plan.to_delete, vec![two.id]);
        assert_eq!(
            plan.to_create,
            vec![ListDraft {
                name: "C".into(),
                max_capacity: 3
            }]
        );
        assert_eq!(plan.write_count(), 3);
    }

    #[test]
    fn empty_desired_deletes_everything() {
        let lists = vec![current("a", None), current("b", Some(2)), current("c", Some(9))];
        let plan = diff(&lists, &[]).unwrap();
        assert_eq!(plan.to_delete.len(), 3);
        assert!(plan.to_create.is_empty());
        assert!(plan.to_update.is_empty());
    }

    #[test]
    fn matching_input_is_a_noop() {
        let one = current("Friends", Some(10));
        let plan = diff(&[one.clone()], &[GuestListInput::existing(one.id, "Friends", 10)]).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.unchanged, vec![one.id]);
    }

    #[test]
    fn unlimited_list_with_capacity_is_an_update() {
        let one = current("Door", None);
        let plan = diff(&[one.clone()], &[GuestListInput::existing(one.id, "Door", 50)]).unwrap();
        assert_eq!(plan.to_update.len(), 1);
    }

    #[test]
    fn unknown_id_is_created_and_does_not_protect_anything() {
        let one = current("Friends", Some(10));
        let stranger = Id::generate();
        let plan = diff(&[one.clone()], &[GuestListInput::existing(stranger, "New", 2)]).unwrap();
        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_delete, vec![one.id]);
    }

    #[test]
    fn name_is_trimmed_before_comparison() {
        let one = current("Friends", Some(10));
        let plan = diff(&[one.clone()], &[GuestListInput::existing(one.id, "  Friends ", 10)]).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn rejects_blank_name() {
        let err = diff(&[], &[GuestListInput::new("  ", 3)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = diff(&[], &[GuestListInput::new("VIP", 0)]).unwrap_err();
        assert!(matches!(err, GuestlistError::NonPositive { .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let one = current("Friends", Some(10));
        let desired = vec![
            GuestListInput::existing(one.id, "A", 1),
            GuestListInput::existing(one.id, "B", 2),
        ];
        assert!(matches!(
            diff(&[one], &desired),
            Err(GuestlistError::DuplicateId { .. })
        ));
    }
}
