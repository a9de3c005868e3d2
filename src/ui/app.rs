use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    bulk_insert_yarns, create_recipe, delete_brand, delete_needle_by_id, delete_recipe_by_id,
    delete_yarn_by_id, fetch_brand_names, fetch_brands, fetch_needles, fetch_projects,
    fetch_recipes, fetch_yarns, insert_brand, insert_needle, insert_yarn, SeedReport,
};
use crate::models::{BrandKey, InsertOutcome, Yarn};

use super::forms::{
    BrandForm, BulkYarnForm, ConfirmBrandDelete, ConfirmNeedleDelete, ConfirmRecipeDelete,
    ConfirmYarnDelete, NeedleForm, RecipeField, RecipeForm, YarnField, YarnForm,
};
use super::helpers::{centered_rect, format_grams, surface_error};
use super::screens::{step_selection, BrandScreen, NeedleScreen, ProjectScreen, RecipeScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states. The yarn stash is the home screen; the
/// others are entered from it and return to it on Esc.
enum Screen {
    Yarns,
    Brands(BrandScreen),
    Needles(NeedleScreen),
    Recipes(RecipeScreen),
    Projects(ProjectScreen),
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    AddingYarn(YarnForm),
    BulkAddingYarns(BulkYarnForm),
    ConfirmYarnDelete(ConfirmYarnDelete),
    AddingBrand(BrandForm),
    ConfirmBrandDelete(ConfirmBrandDelete),
    AddingNeedle(NeedleForm),
    ConfirmNeedleDelete(ConfirmNeedleDelete),
    AddingRecipe(RecipeForm),
    ConfirmRecipeDelete(ConfirmRecipeDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    yarns: Vec<Yarn>,
    selected: usize,
    brand_names: Vec<String>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, yarns: Vec<Yarn>, brand_names: Vec<String>) -> Self {
        Self {
            conn,
            yarns,
            selected: 0,
            brand_names,
            screen: Screen::Yarns,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Surface the startup catalog maintenance counts so repairs are visible
    /// instead of silent.
    pub fn note_seed_report(&mut self, report: SeedReport) {
        if report.removed > 0 || report.inserted > 0 {
            self.set_status(
                format!(
                    "Needle catalog: removed {} duplicate(s), added {} standard size(s).",
                    report.removed, report.inserted
                ),
                StatusKind::Info,
            );
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingYarn(form) => self.handle_add_yarn(code, form)?,
            Mode::BulkAddingYarns(form) => self.handle_bulk_add(code, form)?,
            Mode::ConfirmYarnDelete(confirm) => self.handle_confirm_yarn_delete(code, confirm)?,
            Mode::AddingBrand(form) => self.handle_add_brand(code, form)?,
            Mode::ConfirmBrandDelete(confirm) => {
                self.handle_confirm_brand_delete(code, confirm)?
            }
            Mode::AddingNeedle(form) => self.handle_add_needle(code, form)?,
            Mode::ConfirmNeedleDelete(confirm) => {
                self.handle_confirm_needle_delete(code, confirm)?
            }
            Mode::AddingRecipe(form) => self.handle_add_recipe(code, form)?,
            Mode::ConfirmRecipeDelete(confirm) => {
                self.handle_confirm_recipe_delete(code, confirm)?
            }
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Yarns => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => {
                        self.selected = step_selection(self.selected, self.yarns.len(), -1);
                    }
                    KeyCode::Down => {
                        self.selected = step_selection(self.selected, self.yarns.len(), 1);
                    }
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingYarn(YarnForm::default()));
                    }
                    KeyCode::Char('b') | KeyCode::Char('B') => {
                        self.clear_status();
                        return Ok(Mode::BulkAddingYarns(BulkYarnForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(yarn) = self.yarns.get(self.selected).cloned() {
                            self.clear_status();
                            return Ok(Mode::ConfirmYarnDelete(ConfirmYarnDelete { yarn }));
                        }
                        self.set_status("No yarn selected to remove.", StatusKind::Error);
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        self.clear_status();
                        let brands = fetch_brands(&self.conn)?;
                        self.screen = Screen::Brands(BrandScreen::new(brands));
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        self.clear_status();
                        let needles = fetch_needles(&self.conn)?;
                        self.screen = Screen::Needles(NeedleScreen::new(needles));
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.clear_status();
                        let recipes = fetch_recipes(&self.conn)?;
                        self.screen = Screen::Recipes(RecipeScreen::new(recipes));
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        self.clear_status();
                        let projects = fetch_projects(&self.conn)?;
                        self.screen = Screen::Projects(ProjectScreen::new(projects));
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Brands(ref mut brands) => {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc => self.screen = Screen::Yarns,
                    KeyCode::Up => brands.move_selection(-1),
                    KeyCode::Down => brands.move_selection(1),
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingBrand(BrandForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(brand) = brands.current().cloned() {
                            self.clear_status();
                            return Ok(Mode::ConfirmBrandDelete(ConfirmBrandDelete { brand }));
                        }
                        self.set_status("No brand selected to remove.", StatusKind::Error);
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Needles(ref mut needles) => {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc => self.screen = Screen::Yarns,
                    KeyCode::Up => needles.move_selection(-1),
                    KeyCode::Down => needles.move_selection(1),
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingNeedle(NeedleForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(needle) = needles.current().cloned() {
                            self.clear_status();
                            return Ok(Mode::ConfirmNeedleDelete(ConfirmNeedleDelete { needle }));
                        }
                        self.set_status("No needle selected to remove.", StatusKind::Error);
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Recipes(ref mut recipes) => {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc => self.screen = Screen::Yarns,
                    KeyCode::Up => recipes.move_selection(-1),
                    KeyCode::Down => recipes.move_selection(1),
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingRecipe(RecipeForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(recipe) = recipes.current().cloned() {
                            self.clear_status();
                            return Ok(Mode::ConfirmRecipeDelete(ConfirmRecipeDelete { recipe }));
                        }
                        self.set_status("No recipe selected to remove.", StatusKind::Error);
                    }
                    KeyCode::Enter => {
                        let target = recipes.current().and_then(|r| r.path.clone());
                        match target {
                            Some(path) => match open_path(&path) {
                                Ok(()) => {
                                    self.set_status(format!("Opened {path}"), StatusKind::Info);
                                }
                                Err(err) => {
                                    self.set_status(
                                        format!("Could not open {path}: {err}"),
                                        StatusKind::Error,
                                    );
                                }
                            },
                            None => {
                                self.set_status(
                                    "This recipe has no stored path.",
                                    StatusKind::Error,
                                );
                            }
                        }
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Projects(ref mut projects) => {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc => self.screen = Screen::Yarns,
                    KeyCode::Up => projects.move_selection(-1),
                    KeyCode::Down => projects.move_selection(1),
                    _ => {}
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_add_yarn(&mut self, code: KeyCode, mut form: YarnForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                if form.cancel_autocomplete() {
                    return Ok(Mode::AddingYarn(form));
                }
                Ok(Mode::Normal)
            }
            KeyCode::Tab => {
                if !form.accept_suggestion() {
                    form.toggle_field();
                }
                Ok(Mode::AddingYarn(form))
            }
            KeyCode::Right => {
                if form.has_active_suggestion() {
                    form.accept_suggestion();
                }
                Ok(Mode::AddingYarn(form))
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((name, brand, weight)) => {
                    match insert_yarn(&self.conn, &name, brand.as_deref(), weight)? {
                        InsertOutcome::Inserted => {
                            self.reload_yarns()?;
                            self.set_status(format!("Yarn \"{name}\" registered."), StatusKind::Info);
                            Ok(Mode::Normal)
                        }
                        InsertOutcome::Duplicate => {
                            form.error =
                                Some(format!("A yarn named \"{name}\" already exists."));
                            Ok(Mode::AddingYarn(form))
                        }
                    }
                }
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::AddingYarn(form))
                }
            },
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                form.update_suggestion(&self.brand_names);
                Ok(Mode::AddingYarn(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                    form.update_suggestion(&self.brand_names);
                }
                Ok(Mode::AddingYarn(form))
            }
            _ => Ok(Mode::AddingYarn(form)),
        }
    }

    fn handle_bulk_add(&mut self, code: KeyCode, mut form: BulkYarnForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Bulk entry cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                if form.line.trim().is_empty() {
                    if form.pending.is_empty() {
                        return Ok(Mode::Normal);
                    }
                    let results = bulk_insert_yarns(&self.conn, &form.pending)?;
                    let inserted = results
                        .iter()
                        .filter(|(_, outcome)| outcome.is_inserted())
                        .count();
                    let ignored: Vec<&str> = results
                        .iter()
                        .filter(|(_, outcome)| !outcome.is_inserted())
                        .map(|(name, _)| name.as_str())
                        .collect();
                    self.reload_yarns()?;
                    if ignored.is_empty() {
                        self.set_status(
                            format!("Inserted {inserted} yarn(s)."),
                            StatusKind::Info,
                        );
                    } else {
                        self.set_status(
                            format!(
                                "Inserted {inserted} yarn(s); ignored duplicates: {}.",
                                ignored.join(", ")
                            ),
                            StatusKind::Info,
                        );
                    }
                    Ok(Mode::Normal)
                } else {
                    form.commit_line();
                    Ok(Mode::BulkAddingYarns(form))
                }
            }
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::BulkAddingYarns(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::BulkAddingYarns(form))
            }
            _ => Ok(Mode::BulkAddingYarns(form)),
        }
    }

    fn handle_confirm_yarn_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmYarnDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let removed = delete_yarn_by_id(&self.conn, confirm.yarn.id)?;
                self.reload_yarns()?;
                self.set_status(format!("Removed: {removed}"), StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmYarnDelete(confirm)),
        }
    }

    fn handle_add_brand(&mut self, code: KeyCode, mut form: BrandForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(name) => match insert_brand(&self.conn, &name)? {
                    InsertOutcome::Inserted => {
                        self.reload_brands()?;
                        self.set_status(format!("Brand \"{name}\" added."), StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    InsertOutcome::Duplicate => {
                        form.error = Some(format!("Brand \"{name}\" already exists."));
                        Ok(Mode::AddingBrand(form))
                    }
                },
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::AddingBrand(form))
                }
            },
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::AddingBrand(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::AddingBrand(form))
            }
            _ => Ok(Mode::AddingBrand(form)),
        }
    }

    fn handle_confirm_brand_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmBrandDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let removed = delete_brand(&self.conn, &BrandKey::Id(confirm.brand.id))?;
                self.reload_brands()?;
                self.set_status(format!("Removed: {removed}"), StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmBrandDelete(confirm)),
        }
    }

    fn handle_add_needle(&mut self, code: KeyCode, mut form: NeedleForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(size) => match insert_needle(&self.conn, size)? {
                    InsertOutcome::Inserted => {
                        self.reload_needles()?;
                        self.set_status(format!("Needle {size} mm added."), StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    InsertOutcome::Duplicate => {
                        form.error = Some(format!("Needle {size} mm is already catalogued."));
                        Ok(Mode::AddingNeedle(form))
                    }
                },
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::AddingNeedle(form))
                }
            },
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::AddingNeedle(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::AddingNeedle(form))
            }
            _ => Ok(Mode::AddingNeedle(form)),
        }
    }

    fn handle_confirm_needle_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmNeedleDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let removed = delete_needle_by_id(&self.conn, confirm.needle.id)?;
                self.reload_needles()?;
                self.set_status(format!("Removed: {removed}"), StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmNeedleDelete(confirm)),
        }
    }

    fn handle_add_recipe(&mut self, code: KeyCode, mut form: RecipeForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Tab => {
                form.toggle_field();
                Ok(Mode::AddingRecipe(form))
            }
            KeyCode::Left | KeyCode::Right => {
                form.toggle_kind();
                Ok(Mode::AddingRecipe(form))
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((name, kind, path, notes)) => {
                    create_recipe(&self.conn, &name, kind, path.as_deref(), notes.as_deref())?;
                    self.reload_recipes()?;
                    self.set_status(format!("Recipe \"{name}\" saved."), StatusKind::Info);
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::AddingRecipe(form))
                }
            },
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::AddingRecipe(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::AddingRecipe(form))
            }
            _ => Ok(Mode::AddingRecipe(form)),
        }
    }

    fn handle_confirm_recipe_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmRecipeDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let removed = delete_recipe_by_id(&self.conn, confirm.recipe.id)?;
                self.reload_recipes()?;
                self.set_status(format!("Removed: {removed}"), StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmRecipeDelete(confirm)),
        }
    }

    fn reload_yarns(&mut self) -> Result<()> {
        self.yarns = fetch_yarns(&self.conn)?;
        if !self.yarns.is_empty() && self.selected >= self.yarns.len() {
            self.selected = self.yarns.len() - 1;
        }
        Ok(())
    }

    /// Refresh both the brand screen rows (when it is open) and the cached
    /// name list feeding the yarn-form autocomplete.
    fn reload_brands(&mut self) -> Result<()> {
        self.brand_names = fetch_brand_names(&self.conn)?;
        let brands = fetch_brands(&self.conn)?;
        if let Screen::Brands(screen) = &mut self.screen {
            screen.set_brands(brands);
        }
        Ok(())
    }

    fn reload_needles(&mut self) -> Result<()> {
        let needles = fetch_needles(&self.conn)?;
        if let Screen::Needles(screen) = &mut self.screen {
            screen.set_needles(needles);
        }
        Ok(())
    }

    fn reload_recipes(&mut self) -> Result<()> {
        let recipes = fetch_recipes(&self.conn)?;
        if let Screen::Recipes(screen) = &mut self.screen {
            screen.set_recipes(recipes);
        }
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_title(frame, chunks[0]);
        match &self.screen {
            Screen::Yarns => self.draw_yarns(frame, chunks[1]),
            Screen::Brands(screen) => draw_brands(frame, chunks[1], screen),
            Screen::Needles(screen) => draw_needles(frame, chunks[1], screen),
            Screen::Recipes(screen) => draw_recipes(frame, chunks[1], screen),
            Screen::Projects(screen) => draw_projects(frame, chunks[1], screen),
        }
        self.draw_footer(frame, chunks[2]);
        self.draw_modal(frame);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let (name, count) = match &self.screen {
            Screen::Yarns => ("Yarns", self.yarns.len()),
            Screen::Brands(s) => ("Brands", s.brands.len()),
            Screen::Needles(s) => ("Needles", s.needles.len()),
            Screen::Recipes(s) => ("Recipes", s.recipes.len()),
            Screen::Projects(s) => ("Projects", s.projects.len()),
        };
        let title = Paragraph::new(format!("Crochê Manager — {name} ({count})"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn draw_yarns(&self, frame: &mut Frame, area: Rect) {
        if self.yarns.is_empty() {
            let empty = Paragraph::new("No yarns registered yet. Press + to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Stash"));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .yarns
            .iter()
            .map(|yarn| {
                let brand = yarn.brand.as_deref().unwrap_or("—");
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<30}", yarn.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{:<20}", brand)),
                    Span::styled(
                        format_grams(yarn.skein_weight),
                        Style::default().fg(Color::Cyan),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Stash"))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("🧶 ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(status) = &self.status {
            Line::from(Span::styled(status.text.clone(), status.kind.style()))
        } else {
            let hints = match (&self.screen, &self.mode) {
                (_, Mode::AddingYarn(_)) => {
                    "Tab: next field | Tab/→: accept brand suggestion | Enter: save | Esc: cancel"
                }
                (_, Mode::BulkAddingYarns(_)) => {
                    "Type name,brand,weight | Enter: add line | Enter on empty line: apply | Esc: cancel"
                }
                (_, Mode::AddingRecipe(_)) => {
                    "Tab: next field | ←/→: toggle kind | Enter: save | Esc: cancel"
                }
                (
                    _,
                    Mode::ConfirmYarnDelete(_)
                    | Mode::ConfirmBrandDelete(_)
                    | Mode::ConfirmNeedleDelete(_)
                    | Mode::ConfirmRecipeDelete(_),
                ) => "y: confirm | n/Esc: keep",
                (_, Mode::AddingBrand(_) | Mode::AddingNeedle(_)) => {
                    "Enter: save | Esc: cancel"
                }
                (Screen::Yarns, _) => {
                    "↑↓: select | +: add | -: remove | b: bulk add | m: brands | n: needles | r: recipes | p: projects | q: quit"
                }
                (Screen::Brands(_), _) => "↑↓: select | +: add | -: remove | Esc: back | q: quit",
                (Screen::Needles(_), _) => "↑↓: select | +: add | -: remove | Esc: back | q: quit",
                (Screen::Recipes(_), _) => {
                    "↑↓: select | Enter: open | +: add | -: remove | Esc: back | q: quit"
                }
                (Screen::Projects(_), _) => "↑↓: scroll | Esc: back | q: quit",
            };
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        };

        let footer = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, area);
    }

    fn draw_modal(&self, frame: &mut Frame) {
        match &self.mode {
            Mode::Normal => {}
            Mode::AddingYarn(form) => {
                let mut lines = vec![
                    form.build_line("Name", YarnField::Name),
                    form.build_line("Brand", YarnField::Brand),
                    form.build_line("Skein weight", YarnField::Weight),
                ];
                push_error_line(&mut lines, form.error.as_deref());
                render_modal(frame, "Register Yarn", lines, 50, 30);
            }
            Mode::BulkAddingYarns(form) => {
                let mut lines = vec![Line::from(vec![
                    Span::raw("Line: "),
                    Span::styled(form.line.clone(), Style::default().fg(Color::Yellow)),
                ])];
                lines.push(Line::from(Span::styled(
                    format!("Pending: {}", form.pending.len()),
                    Style::default().fg(Color::DarkGray),
                )));
                for entry in form.pending.iter().rev().take(5) {
                    let brand = entry.brand.as_deref().unwrap_or("—");
                    lines.push(Line::from(format!(
                        "  {} | {} | {}",
                        entry.name,
                        brand,
                        format_grams(entry.skein_weight)
                    )));
                }
                push_error_line(&mut lines, form.error.as_deref());
                render_modal(frame, "Bulk Add Yarns", lines, 60, 45);
            }
            Mode::ConfirmYarnDelete(confirm) => {
                let lines = vec![Line::from(format!(
                    "Delete yarn \"{}\"? Projects that reference it keep their rows.",
                    confirm.yarn.name
                ))];
                render_modal(frame, "Confirm Delete", lines, 50, 20);
            }
            Mode::AddingBrand(form) => {
                let mut lines = vec![Line::from(vec![
                    Span::raw("Name: "),
                    Span::styled(form.name.clone(), Style::default().fg(Color::Yellow)),
                ])];
                push_error_line(&mut lines, form.error.as_deref());
                render_modal(frame, "Add Brand", lines, 40, 20);
            }
            Mode::ConfirmBrandDelete(confirm) => {
                let lines = vec![Line::from(format!(
                    "Delete brand \"{}\"? Yarns keep their brand text.",
                    confirm.brand.name
                ))];
                render_modal(frame, "Confirm Delete", lines, 50, 20);
            }
            Mode::AddingNeedle(form) => {
                let mut lines = vec![Line::from(vec![
                    Span::raw("Size (mm): "),
                    Span::styled(form.size.clone(), Style::default().fg(Color::Yellow)),
                ])];
                push_error_line(&mut lines, form.error.as_deref());
                render_modal(frame, "Add Needle", lines, 40, 20);
            }
            Mode::ConfirmNeedleDelete(confirm) => {
                let lines = vec![Line::from(format!(
                    "Delete needle {} mm from the catalog?",
                    confirm.needle.size
                ))];
                render_modal(frame, "Confirm Delete", lines, 50, 20);
            }
            Mode::AddingRecipe(form) => {
                let mut lines = vec![
                    form.build_line("Name", RecipeField::Name),
                    Line::from(vec![
                        Span::raw("Kind: "),
                        Span::styled(
                            form.kind.to_string(),
                            Style::default().fg(Color::Magenta),
                        ),
                    ]),
                    form.build_line("Path", RecipeField::Path),
                    form.build_line("Notes", RecipeField::Notes),
                ];
                push_error_line(&mut lines, form.error.as_deref());
                render_modal(frame, "Save Recipe", lines, 55, 35);
            }
            Mode::ConfirmRecipeDelete(confirm) => {
                let lines = vec![Line::from(format!(
                    "Delete recipe \"{}\"?",
                    confirm.recipe.name
                ))];
                render_modal(frame, "Confirm Delete", lines, 50, 20);
            }
        }
    }
}

fn push_error_line(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
}

fn render_modal(
    frame: &mut Frame,
    title: &str,
    lines: Vec<Line<'static>>,
    percent_x: u16,
    percent_y: u16,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(dialog, area);
}

fn draw_brands(frame: &mut Frame, area: Rect, screen: &BrandScreen) {
    if screen.brands.is_empty() {
        let empty = Paragraph::new("No brands registered. Press + to add one.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Brands"));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .brands
        .iter()
        .map(|brand| ListItem::new(brand.name.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Brands"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(screen.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_needles(frame: &mut Frame, area: Rect, screen: &NeedleScreen) {
    if screen.needles.is_empty() {
        let empty = Paragraph::new("The needle catalog is empty.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Needles"));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .needles
        .iter()
        .map(|needle| ListItem::new(needle.to_string()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Needles"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(screen.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_recipes(frame: &mut Frame, area: Rect, screen: &RecipeScreen) {
    if screen.recipes.is_empty() {
        let empty = Paragraph::new("No recipes saved. Press + to add one.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Recipes"));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .recipes
        .iter()
        .map(|recipe| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    recipe.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  [{}]", recipe.kind),
                    Style::default().fg(Color::Magenta),
                ),
            ])];
            if let Some(notes) = &recipe.notes {
                lines.push(Line::from(Span::styled(
                    format!("  {notes}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Recipes"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(screen.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_projects(frame: &mut Frame, area: Rect, screen: &ProjectScreen) {
    if screen.projects.is_empty() {
        let empty = Paragraph::new("No projects recorded.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Projects"));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .projects
        .iter()
        .map(|project| {
            let color = match (&project.color_name, &project.color_code) {
                (Some(name), Some(code)) => format!("{name} ({code})"),
                (Some(name), None) => name.clone(),
                (None, Some(code)) => code.clone(),
                (None, None) => "—".to_string(),
            };
            let lines = vec![
                Line::from(Span::styled(
                    project.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw(format!(
                    "  color {} | {} skein(s) of {} | {} left | started {}",
                    color,
                    project.skein_count,
                    format_grams(project.skein_weight),
                    format_grams(project.remaining_weight),
                    project.created_at
                ))),
            ];
            ListItem::new(lines)
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Projects"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(screen.selected));
    frame.render_stateful_widget(list, area, &mut state);
}
