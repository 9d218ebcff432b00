//! The sheet: cell storage, the reference graph, and the edit pipeline.
//!
//! `set_cell` is atomic from the caller's perspective. Validation, parsing,
//! and cycle detection all run before the first observable mutation, so a
//! rejected edit leaves the grid, the graph, and every cache untouched.

use std::collections::HashSet;
use std::io::{self, Write};

use tabula_formula::{CellValue, Position, SheetView, Size};

use crate::cell::Cell;
use crate::error::{EngineError, Result};
use crate::graph::DependencyGraph;
use crate::storage::SheetStorage;

/// A spreadsheet: a sparse grid of cells plus the reference graph that keeps
/// formula caches honest.
#[derive(Default)]
pub struct Sheet {
    cells: SheetStorage<Cell>,
    graph: DependencyGraph,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet::default()
    }

    /// Set the cell at `pos` from user input.
    ///
    /// Every cell a new formula references is materialized as an empty cell
    /// if absent, and every cached result depending on `pos` is invalidated.
    /// Fails with `FormulaSyntax` or `CircularDependency` without changing
    /// any state.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(EngineError::InvalidPosition(pos));
        }

        let cell = Cell::from_input(text)?;

        let old_refs: HashSet<Position> = match self.cells.get(pos)? {
            Some(existing) => existing.referenced_cells().iter().copied().collect(),
            None => HashSet::new(),
        };
        let new_refs: HashSet<Position> =
            cell.referenced_cells().iter().copied().collect();

        let refs_add: Vec<Position> = new_refs.difference(&old_refs).copied().collect();
        let refs_del: HashSet<Position> = old_refs.difference(&new_refs).copied().collect();

        for &ref_add in &refs_add {
            if self.would_cycle(pos, ref_add, &refs_del) {
                return Err(EngineError::CircularDependency {
                    from: pos,
                    to: ref_add,
                });
            }
        }

        // Materialize an empty cell for every referenced position, so that
        // lookups of referenced cells always hit a stored cell.
        for &new_ref in &new_refs {
            if self.cells.get(new_ref)?.is_none() {
                self.cells.set(new_ref, Cell::new())?;
            }
        }

        for &ref_add in &refs_add {
            self.graph.add_edge(ref_add, pos);
        }
        for &ref_del in &refs_del {
            self.graph.remove_edge(ref_del, pos);
        }

        self.cells.set(pos, cell)?;
        self.invalidate_transitive(pos);
        Ok(())
    }

    /// The cell at `pos`, or None when nothing is stored there.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        self.cells.get(pos)
    }

    /// Value of the cell at `pos`; absent cells read as empty text.
    pub fn cell_value(&self, pos: Position) -> Result<CellValue> {
        Ok(match self.cells.get(pos)? {
            Some(cell) => cell.value(self),
            None => CellValue::Text(String::new()),
        })
    }

    /// Remove the cell at `pos` together with its outgoing reference edges,
    /// and invalidate every cached result that was reading it.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        let refs: Vec<Position> = match self.cells.get(pos)? {
            Some(cell) => cell.referenced_cells().to_vec(),
            None => return Ok(()),
        };
        for ref_del in refs {
            self.graph.remove_edge(ref_del, pos);
        }
        self.cells.clear(pos)?;
        self.invalidate_transitive(pos);
        Ok(())
    }

    /// Number of stored cells, materialized empty cells included.
    pub fn cell_count(&self) -> usize {
        self.cells.count()
    }

    /// Bounding box of the stored cells.
    pub fn printable_size(&self) -> Size {
        self.cells.printable_size()
    }

    /// Write the value projection of the printable box: cells joined by tabs,
    /// every row newline-terminated.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, |cell, sheet| cell.value(sheet).to_string())
    }

    /// Write the text projection of the printable box.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, |cell, _| cell.text())
    }

    fn print<W: Write>(
        &self,
        out: &mut W,
        render: impl Fn(&Cell, &dyn SheetView) -> String,
    ) -> io::Result<()> {
        let size = self.cells.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                if let Some(cell) = self.cells.get(Position::new(row, col)).ok().flatten() {
                    write!(out, "{}", render(cell, self))?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Would making `pos` refer to `ref_add` (while dropping the references
    /// in `refs_del`) close a cycle?
    ///
    /// `refs_from` edges run referenced-to-referrer, so "`ref_add`
    /// transitively refers back to `pos`" is exactly "`ref_add` is reachable
    /// from `pos` in `refs_from`". The walk skips edges into `pos` that this
    /// same edit removes.
    fn would_cycle(&self, pos: Position, ref_add: Position, refs_del: &HashSet<Position>) -> bool {
        if ref_add == pos {
            return true;
        }

        let mut discovered = HashSet::new();
        let mut queue = vec![pos];

        while let Some(v) = queue.pop() {
            if v == ref_add {
                return true;
            }
            if !discovered.insert(v) {
                continue;
            }
            for referrer in self.graph.referrers(v) {
                // This edge is dropped by the edit being checked.
                if referrer == pos && refs_del.contains(&v) {
                    continue;
                }
                if !discovered.contains(&referrer) {
                    queue.push(referrer);
                }
            }
        }
        false
    }

    /// Invalidate the cached result of `pos` and of every transitive
    /// referrer. The graph is acyclic, but the discovered set also guards
    /// against re-entry.
    fn invalidate_transitive(&self, pos: Position) {
        let mut discovered = HashSet::new();
        let mut queue = vec![pos];

        while let Some(v) = queue.pop() {
            if !discovered.insert(v) {
                continue;
            }
            if let Some(cell) = self.cells.get(v).ok().flatten() {
                cell.invalidate_cache();
            }
            for referrer in self.graph.referrers(v) {
                if !discovered.contains(&referrer) {
                    queue.push(referrer);
                }
            }
        }
    }
}

impl SheetView for Sheet {
    fn value_at(&self, pos: Position) -> Option<CellValue> {
        self.cells.get(pos).ok().flatten().map(|cell| cell.value(self))
    }

    fn printable_size(&self) -> Size {
        self.cells.printable_size()
    }
}
