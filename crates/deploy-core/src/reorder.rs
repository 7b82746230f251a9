//! Moving libraries up and down the load order.
//!
//! A move swaps the sequence of the selected library with the next library
//! row in that direction (module rows are skipped) and persists both records
//! one after the other. The grid order only changes once both are
//! acknowledged.

use deploy_models::Library;
use tracing::{debug, warn};

use crate::error::Result;
use crate::gateway::DeployApi;
use crate::libraries::{LibraryGrid, Selection};
use crate::session::TaskScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// The two records to persist for a move.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// Selected library, with its new sequence and major flag.
    pub source: Library,
    /// Library it trades places with.
    pub target: Library,
    /// Row index the source moves from.
    pub from: usize,
    /// Row index the source moves to.
    pub to: usize,
}

/// Plan a move of the selected library.
///
/// Returns `None` when no library row is selected or there is no library
/// row further in that direction.
pub fn plan_move(grid: &LibraryGrid, direction: Direction) -> Option<MovePlan> {
    let mut source = grid.selected_library()?;
    let from = grid.selected_row()?;
    let rows = grid.rows();

    let mut to = from as isize;
    let target_name = loop {
        to += direction.step();
        if to < 0 || to as usize >= rows.len() {
            return None;
        }
        let row = &rows[to as usize];
        if row.is_library() {
            break row.library_name().to_string();
        }
    };
    let to = to as usize;
    let mut target = grid.get(&target_name)?.current();

    std::mem::swap(&mut source.sequence, &mut target.sequence);
    source.major = to == 0;
    target.major = from == 0;
    source.modules = None;
    target.modules = None;

    Some(MovePlan {
        source,
        target,
        from,
        to,
    })
}

/// Persist a planned move, then swap the rows.
///
/// The target is only sent after the source is acknowledged. If the first
/// request fails nothing else is sent and the grid order is unchanged. If
/// the second fails the source is sent again with its previous sequence and
/// major flag; when that is rejected too the grid is reloaded from the
/// server. Either way the error of the failed move is returned.
pub async fn execute_move(
    api: &dyn DeployApi,
    scope: TaskScope<'_>,
    grid: &mut LibraryGrid,
    plan: MovePlan,
) -> Result<()> {
    debug!(
        source = %plan.source.name,
        target = %plan.target.name,
        from = plan.from,
        to = plan.to,
        "moving library"
    );
    let previous = grid.get(&plan.source.name).map(|entry| {
        let mut library = entry.current();
        library.modules = None;
        library
    });
    grid.collapse(&plan.source.name);
    grid.collapse(&plan.target.name);

    let acknowledged = api.update_library(scope, &plan.source, None).await?;
    grid.apply_update(&acknowledged, false);

    match api.update_library(scope, &plan.target, None).await {
        Ok(acknowledged) => {
            grid.apply_update(&acknowledged, false);
            grid.swap(&plan.source.name, &plan.target.name);
            Ok(())
        }
        Err(err) => {
            if let Some(previous) = previous {
                restore_source(api, scope, grid, &previous).await;
            }
            Err(err)
        }
    }
}

/// Put the source library back where it was after a half-applied move.
async fn restore_source(
    api: &dyn DeployApi,
    scope: TaskScope<'_>,
    grid: &mut LibraryGrid,
    previous: &Library,
) {
    match api.update_library(scope, previous, None).await {
        Ok(acknowledged) => {
            grid.apply_update(&acknowledged, false);
        }
        Err(err) => {
            warn!(library = %previous.name, error = %err, "failed to restore library order, reloading");
            match api.load_libraries(scope).await {
                Ok(libraries) => {
                    grid.load(libraries);
                    grid.select(Selection::Library(previous.name.clone()));
                }
                Err(err) => warn!(error = %err, "failed to reload libraries"),
            }
        }
    }
}
