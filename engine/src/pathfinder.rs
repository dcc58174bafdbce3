use std::collections::HashSet;

use crate::log;
use super::snake::SnakeState;
use super::types::{Direction, Point};

/// One simulated step of a hypothetical future. Nodes share ancestry through
/// `parent`, so a whole path is never copied; the root stands for the real head.
struct SearchNode {
    parent: Option<usize>,
    direction: Direction,
    position: Point,
}

struct SearchOutcome {
    plan: Vec<Direction>,
    found: bool,
    nodes: usize,
}

pub struct PathFinder;

impl PathFinder {
    /// Directions leading the head onto `food`, stored so that `pop()` yields the
    /// next move. When the food is not reached the plan of the last explored path
    /// is returned instead; that plan carries no safety guarantee.
    pub fn next_moves(snake: &SnakeState, food: Point) -> Vec<Direction> {
        let outcome = Self::search(snake, food);
        if outcome.found {
            log!(
                "Path to food at ({}, {}) found: {} moves, {} nodes explored",
                food.x,
                food.y,
                outcome.plan.len(),
                outcome.nodes
            );
        } else {
            log!(
                "No path to food at ({}, {}) after {} nodes, falling back to {} moves",
                food.x,
                food.y,
                outcome.nodes,
                outcome.plan.len()
            );
        }
        outcome.plan
    }

    fn search(snake: &SnakeState, food: Point) -> SearchOutcome {
        let grid = snake.grid();
        let body = snake.positions();
        let window = snake.len();

        let mut nodes = Vec::with_capacity(grid.cell_count());
        nodes.push(SearchNode {
            parent: None,
            direction: snake.direction(),
            position: snake.head_position(),
        });

        // shared by every path: a cell claimed once is never explored again
        let mut visited = HashSet::with_capacity(grid.cell_count());
        visited.insert(snake.head_position());

        let mut cursor = 0;
        while cursor < nodes.len() {
            let position = nodes[cursor].position;
            let heading = nodes[cursor].direction;

            for direction in heading.search_order() {
                let candidate = grid.neighbor(position, direction);
                if visited.contains(&candidate)
                    || Self::window_contains(&nodes, &body, cursor, candidate, window)
                {
                    continue;
                }

                nodes.push(SearchNode {
                    parent: Some(cursor),
                    direction,
                    position: candidate,
                });

                if candidate == food {
                    return SearchOutcome {
                        plan: Self::plan_to(&nodes, nodes.len() - 1),
                        found: true,
                        nodes: nodes.len(),
                    };
                }
                visited.insert(candidate);
            }

            cursor += 1;
        }

        SearchOutcome {
            plan: Self::plan_to(&nodes, nodes.len() - 1),
            found: false,
            nodes: nodes.len(),
        }
    }

    /// Whether `candidate` is among the last `window` positions of the path
    /// ending at `node`: simulated steps first, then the real body from its head end.
    fn window_contains(
        nodes: &[SearchNode],
        body: &[Point],
        node: usize,
        candidate: Point,
        window: usize,
    ) -> bool {
        let mut remaining = window;
        let mut index = node;

        while let Some(parent) = nodes[index].parent {
            if remaining == 0 {
                return false;
            }
            if nodes[index].position == candidate {
                return true;
            }
            remaining -= 1;
            index = parent;
        }

        body[body.len().saturating_sub(remaining)..].contains(&candidate)
    }

    /// Walks parent links from `node`, which already yields the newest move first.
    fn plan_to(nodes: &[SearchNode], node: usize) -> Vec<Direction> {
        let mut plan = Vec::new();
        let mut index = node;
        while let Some(parent) = nodes[index].parent {
            plan.push(nodes[index].direction);
            index = parent;
        }
        plan
    }
}
