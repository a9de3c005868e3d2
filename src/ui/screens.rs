//! Per-screen list state. Each screen owns its rows plus a selection cursor;
//! the app swaps whole screens in and out of the `Screen` enum as the user
//! navigates, reloading rows from the database on entry so the lists always
//! reflect what is stored.

use crate::models::{Brand, Needle, Project, Recipe};

/// Brand management screen backed by the `marcas` table.
pub(crate) struct BrandScreen {
    pub(crate) brands: Vec<Brand>,
    pub(crate) selected: usize,
}

impl BrandScreen {
    pub(crate) fn new(brands: Vec<Brand>) -> Self {
        Self {
            brands,
            selected: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<&Brand> {
        self.brands.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.brands.len(), offset);
    }

    pub(crate) fn set_brands(&mut self, brands: Vec<Brand>) {
        self.brands = brands;
        self.selected = clamp_selection(self.selected, self.brands.len());
    }
}

/// Needle catalog screen backed by the `agulhas` table.
pub(crate) struct NeedleScreen {
    pub(crate) needles: Vec<Needle>,
    pub(crate) selected: usize,
}

impl NeedleScreen {
    pub(crate) fn new(needles: Vec<Needle>) -> Self {
        Self {
            needles,
            selected: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<&Needle> {
        self.needles.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.needles.len(), offset);
    }

    pub(crate) fn set_needles(&mut self, needles: Vec<Needle>) {
        self.needles = needles;
        self.selected = clamp_selection(self.selected, self.needles.len());
    }
}

/// Recipe collection screen backed by the `receitas` table.
pub(crate) struct RecipeScreen {
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) selected: usize,
}

impl RecipeScreen {
    pub(crate) fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            selected: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<&Recipe> {
        self.recipes.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.recipes.len(), offset);
    }

    pub(crate) fn set_recipes(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
        self.selected = clamp_selection(self.selected, self.recipes.len());
    }
}

/// Read-only overview of in-progress projects. No maintenance flows exist
/// for projects, so the screen only needs a cursor for scrolling.
pub(crate) struct ProjectScreen {
    pub(crate) projects: Vec<Project>,
    pub(crate) selected: usize,
}

impl ProjectScreen {
    pub(crate) fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            selected: 0,
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.projects.len(), offset);
    }
}

/// Advance a selection by `offset`, clamped to the list bounds.
pub(crate) fn step_selection(selected: usize, len: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = (len - 1) as isize;
    (selected as isize + offset).clamp(0, max) as usize
}

/// Keep a selection in bounds after the backing list changed length.
pub(crate) fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selected.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_selection_clamps_at_both_ends() {
        assert_eq!(step_selection(0, 5, -3), 0);
        assert_eq!(step_selection(4, 5, 3), 4);
        assert_eq!(step_selection(2, 5, 1), 3);
        assert_eq!(step_selection(0, 0, 1), 0);
    }

    #[test]
    fn clamp_selection_follows_a_shrinking_list() {
        assert_eq!(clamp_selection(4, 3), 2);
        assert_eq!(clamp_selection(1, 3), 1);
        assert_eq!(clamp_selection(0, 0), 0);
    }
}
