use super::assignment::Assignment;
use super::Lit;


// Returns true if a clause is satisfied with assignment
pub fn satisfied_with_assignment(clause: &[Lit], assignment: &Assignment) -> bool {
    clause.iter().any(|&lit| assignment.is_assigned_pos(lit))
}
