use crate::groups::Group;

/// Chooses a move based on the Largest Group Priority strategy.
///
/// This strategy selects the group containing the largest number of cells.
/// If multiple groups have the same maximal size, the one encountered first
/// (based on `find_all_groups` row-major discovery order) is chosen.
///
/// # Arguments
/// * `groups`: The eligible groups, as returned by `find_all_groups`.
///
/// # Returns
/// The chosen group, or `None` if `groups` is empty. `None` is the normal
/// "no move available" signal, not an error.
///
/// # Examples
/// ```
/// use collect_solver::engine::{Cell, Tile};
/// use collect_solver::groups::Group;
/// use collect_solver::selector::select_best_move;
///
/// let small = Group::new(Tile::Red, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]);
/// let large = Group::new(Tile::Blue, (0..4).map(|c| Cell::new(1, c)).collect());
/// let groups = [small, large];
/// assert_eq!(select_best_move(&groups).map(|g| g.color()), Some(Tile::Blue));
/// assert!(select_best_move(&[]).is_none());
/// ```
pub fn select_best_move(groups: &[Group]) -> Option<&Group> {
    let mut best: Option<&Group> = None;
    for group in groups {
        // strict comparison keeps the first group on ties
        if best.map_or(true, |b| group.len() > b.len()) {
            best = Some(group);
        }
    }
    best
}

/// Orders groups from most to least preferred under the same policy as
/// [`select_best_move`]: larger first, ties in discovery order.
///
/// The first element, if any, is always the group `select_best_move` returns.
pub fn rank_groups(groups: &[Group]) -> Vec<&Group> {
    let mut ranked: Vec<&Group> = groups.iter().collect();
    // sort_by is stable, so equal sizes keep their discovery order
    ranked.sort_by(|a, b| b.len().cmp(&a.len()));
    ranked
}
