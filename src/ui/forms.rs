use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Brand, Needle, NewYarn, Recipe, RecipeKind, Yarn};

/// Fields available within the yarn form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum YarnField {
    #[default]
    Name,
    Brand,
    Weight,
}

/// Form state for registering a yarn, including the brand autocomplete
/// tracking. The brand field suggests names from the `marcas` table the same
/// way a search box ghosts its completion.
#[derive(Default, Clone)]
pub(crate) struct YarnForm {
    pub(crate) name: String,
    pub(crate) brand: String,
    pub(crate) weight: String,
    pub(crate) active: YarnField,
    pub(crate) error: Option<String>,
    pub(crate) suggestion: Option<String>,
    pub(crate) autocomplete_disabled: bool,
}

impl YarnForm {
    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            YarnField::Name => YarnField::Brand,
            YarnField::Brand => YarnField::Weight,
            YarnField::Weight => YarnField::Name,
        };
        if self.active != YarnField::Brand {
            self.suggestion = None;
        }
    }

    /// Append a character to the active field, validating allowed input. The
    /// weight field only admits digits and one decimal separator so malformed
    /// numbers never reach the parse step, let alone storage.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            YarnField::Name => self.name.push(ch),
            YarnField::Brand => {
                self.autocomplete_disabled = false;
                self.brand.push(ch);
            }
            YarnField::Weight => {
                let accepts = ch.is_ascii_digit() || (ch == '.' && !self.weight.contains('.'));
                if !accepts {
                    return false;
                }
                self.weight.push(ch);
            }
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            YarnField::Name => {
                self.name.pop();
            }
            YarnField::Brand => {
                self.brand.pop();
                self.autocomplete_disabled = false;
            }
            YarnField::Weight => {
                self.weight.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for persistence. An
    /// empty brand becomes `None`; the weight must be a positive number.
    pub(crate) fn parse_inputs(&self) -> Result<(String, Option<String>, f64)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Yarn name is required."));
        }

        let brand = self.brand.trim();
        let brand = if brand.is_empty() {
            None
        } else {
            Some(brand.to_string())
        };

        let weight_raw = self.weight.trim();
        if weight_raw.is_empty() {
            return Err(anyhow!("Skein weight is required."));
        }
        let weight = weight_raw
            .parse::<f64>()
            .context("Skein weight must be a number, e.g. 50.0.")?;
        if weight <= 0.0 {
            return Err(anyhow!("Skein weight must be greater than zero."));
        }

        Ok((name.to_string(), brand, weight))
    }

    /// Update the brand autocomplete suggestion based on current input.
    pub(crate) fn update_suggestion(&mut self, brands: &[String]) {
        if self.active != YarnField::Brand
            || self.autocomplete_disabled
            || self.brand.chars().count() < 2
        {
            self.suggestion = None;
            return;
        }

        let current_lower = self.brand.to_lowercase();
        let maybe_match = brands
            .iter()
            .find(|candidate| candidate.to_lowercase().starts_with(&current_lower));

        self.suggestion = match maybe_match {
            Some(candidate) if candidate.to_lowercase() != current_lower => {
                Some(candidate.clone())
            }
            _ => None,
        };
    }

    /// Apply the suggested brand, marking autocomplete as satisfied.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        if self.suggestion_suffix().is_some() {
            if let Some(candidate) = self.suggestion.take() {
                self.brand = candidate;
                self.autocomplete_disabled = true;
                return true;
            }
        }
        false
    }

    /// Explicitly dismiss the suggestion for the rest of this interaction.
    pub(crate) fn cancel_autocomplete(&mut self) -> bool {
        if self.active == YarnField::Brand && self.suggestion.is_some() {
            self.autocomplete_disabled = true;
            self.suggestion = None;
            return true;
        }
        false
    }

    /// Remaining characters to display as a ghosted autocomplete hint.
    pub(crate) fn suggestion_suffix(&self) -> Option<String> {
        let candidate = self.suggestion.as_ref()?;
        let current_len = self.brand.chars().count();
        let mut chars = candidate.chars();
        for _ in 0..current_len {
            chars.next()?;
        }
        let suffix: String = chars.collect();
        if suffix.is_empty() {
            None
        } else {
            Some(suffix)
        }
    }

    /// Whether a suggestion is currently showing for the brand field.
    pub(crate) fn has_active_suggestion(&self) -> bool {
        self.active == YarnField::Brand && self.suggestion.is_some()
    }

    /// Render a styled line for the modal form, optionally appending the
    /// ghosted autocomplete suffix on the brand field.
    pub(crate) fn build_line(&self, field_name: &str, field: YarnField) -> Line<'static> {
        let (value, is_active) = match field {
            YarnField::Name => (&self.name, self.active == YarnField::Name),
            YarnField::Brand => (&self.brand, self.active == YarnField::Brand),
            YarnField::Weight => (&self.weight, self.active == YarnField::Weight),
        };

        let placeholder = match field {
            YarnField::Name => "<required>",
            YarnField::Brand => "<optional>",
            YarnField::Weight => "<required, grams>",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::raw(format!("{field_name}: "))];
        if field == YarnField::Brand && is_active && !value.is_empty() {
            spans.push(Span::styled(value.clone(), style));
            if let Some(suffix) = self.suggestion_suffix() {
                spans.push(Span::styled(suffix, Style::default().fg(Color::DarkGray)));
            }
        } else {
            spans.push(Span::styled(display, style));
        }

        Line::from(spans)
    }
}

/// Parse one `nome,marca,peso` bulk-entry line. The brand part may be blank;
/// the weight must be a positive number. Extra commas are treated as part of
/// the weight field being malformed rather than silently ignored.
pub(crate) fn parse_bulk_line(line: &str) -> Result<NewYarn> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(anyhow!("Use the format: name,brand,weight"));
    }

    let name = parts[0];
    if name.is_empty() {
        return Err(anyhow!("Yarn name is required."));
    }

    let brand = if parts[1].is_empty() {
        None
    } else {
        Some(parts[1].to_string())
    };

    let weight = parts[2]
        .parse::<f64>()
        .context("Weight must be a number, e.g. 50.0.")?;
    if weight <= 0.0 {
        return Err(anyhow!("Weight must be greater than zero."));
    }

    Ok(NewYarn {
        name: name.to_string(),
        brand,
        skein_weight: weight,
    })
}

/// State for the bulk yarn entry modal: one input line at a time, validated
/// on Enter and collected into a pending batch, applied when the user
/// submits an empty line.
#[derive(Default)]
pub(crate) struct BulkYarnForm {
    pub(crate) line: String,
    pub(crate) pending: Vec<NewYarn>,
    pub(crate) error: Option<String>,
}

impl BulkYarnForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.line.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.line.pop();
    }

    /// Validate the current line and move it into the pending batch. Invalid
    /// lines set the error and leave the input untouched for correction.
    pub(crate) fn commit_line(&mut self) {
        match parse_bulk_line(&self.line) {
            Ok(entry) => {
                self.pending.push(entry);
                self.line.clear();
                self.error = None;
            }
            Err(err) => {
                self.error = Some(super::helpers::surface_error(&err));
            }
        }
    }
}

/// Single-field form for adding a brand.
#[derive(Default, Clone)]
pub(crate) struct BrandForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl BrandForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Brand name is required."));
        }
        Ok(name.to_string())
    }
}

/// Single-field form for adding a needle size.
#[derive(Default, Clone)]
pub(crate) struct NeedleForm {
    pub(crate) size: String,
    pub(crate) error: Option<String>,
}

impl NeedleForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() || (ch == '.' && !self.size.contains('.')) {
            self.size.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.size.pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<f64> {
        let raw = self.size.trim();
        if raw.is_empty() {
            return Err(anyhow!("Needle size is required."));
        }
        let size = raw
            .parse::<f64>()
            .context("Needle size must be a number, e.g. 2.5.")?;
        if size <= 0.0 {
            return Err(anyhow!("Needle size must be greater than zero."));
        }
        Ok(size)
    }
}

/// Fields available within the recipe form. The kind is toggled rather than
/// typed, so it is not a text field here.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum RecipeField {
    #[default]
    Name,
    Path,
    Notes,
}

/// Form state for registering a recipe.
#[derive(Clone)]
pub(crate) struct RecipeForm {
    pub(crate) name: String,
    pub(crate) kind: RecipeKind,
    pub(crate) path: String,
    pub(crate) notes: String,
    pub(crate) active: RecipeField,
    pub(crate) error: Option<String>,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: RecipeKind::Video,
            path: String::new(),
            notes: String::new(),
            active: RecipeField::Name,
            error: None,
        }
    }
}

impl RecipeForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            RecipeField::Name => RecipeField::Path,
            RecipeField::Path => RecipeField::Notes,
            RecipeField::Notes => RecipeField::Name,
        };
    }

    pub(crate) fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            RecipeField::Name => self.name.push(ch),
            RecipeField::Path => self.path.push(ch),
            RecipeField::Notes => self.notes.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            RecipeField::Name => {
                self.name.pop();
            }
            RecipeField::Path => {
                self.path.pop();
            }
            RecipeField::Notes => {
                self.notes.pop();
            }
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<(String, RecipeKind, Option<String>, Option<String>)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Recipe name is required."));
        }
        let path = self.path.trim();
        let notes = self.notes.trim();
        Ok((
            name.to_string(),
            self.kind,
            (!path.is_empty()).then(|| path.to_string()),
            (!notes.is_empty()).then(|| notes.to_string()),
        ))
    }

    pub(crate) fn build_line(&self, field_name: &str, field: RecipeField) -> Line<'static> {
        let (value, is_active) = match field {
            RecipeField::Name => (&self.name, self.active == RecipeField::Name),
            RecipeField::Path => (&self.path, self.active == RecipeField::Path),
            RecipeField::Notes => (&self.notes, self.active == RecipeField::Notes),
        };

        let placeholder = match field {
            RecipeField::Name => "<required>",
            RecipeField::Path | RecipeField::Notes => "<optional>",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }
}

/// Confirmation state for removing a yarn.
pub(crate) struct ConfirmYarnDelete {
    pub(crate) yarn: Yarn,
}

/// Confirmation state for removing a brand.
pub(crate) struct ConfirmBrandDelete {
    pub(crate) brand: Brand,
}

/// Confirmation state for removing a needle.
pub(crate) struct ConfirmNeedleDelete {
    pub(crate) needle: Needle,
}

/// Confirmation state for removing a recipe.
pub(crate) struct ConfirmRecipeDelete {
    pub(crate) recipe: Recipe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_line_parses_name_brand_and_weight() {
        let entry = parse_bulk_line("Linha A, Marca X, 50.0").unwrap();
        assert_eq!(entry.name, "Linha A");
        assert_eq!(entry.brand.as_deref(), Some("Marca X"));
        assert_eq!(entry.skein_weight, 50.0);
    }

    #[test]
    fn bulk_line_allows_blank_brand() {
        let entry = parse_bulk_line("Duna,,100").unwrap();
        assert!(entry.brand.is_none());
        assert_eq!(entry.skein_weight, 100.0);
    }

    #[test]
    fn bulk_line_rejects_malformed_input() {
        assert!(parse_bulk_line("Linha A,Marca X").is_err());
        assert!(parse_bulk_line(",Marca X,50.0").is_err());
        assert!(parse_bulk_line("Linha A,Marca X,cinquenta").is_err());
        assert!(parse_bulk_line("Linha A,Marca X,-5").is_err());
    }

    #[test]
    fn yarn_form_requires_name_and_numeric_weight() {
        let mut form = YarnForm::default();
        assert!(form.parse_inputs().is_err());

        form.name = "Amigurumi Rosa".into();
        form.weight = "50.0".into();
        let (name, brand, weight) = form.parse_inputs().unwrap();
        assert_eq!(name, "Amigurumi Rosa");
        assert!(brand.is_none());
        assert_eq!(weight, 50.0);
    }

    #[test]
    fn yarn_form_weight_field_filters_input() {
        let mut form = YarnForm {
            active: YarnField::Weight,
            ..Default::default()
        };
        assert!(form.push_char('5'));
        assert!(form.push_char('.'));
        assert!(!form.push_char('.'));
        assert!(!form.push_char('x'));
        assert_eq!(form.weight, "5.");
    }

    #[test]
    fn yarn_form_suggests_and_accepts_a_brand() {
        let brands = vec!["Círculo".to_string(), "Pingouin".to_string()];
        let mut form = YarnForm {
            active: YarnField::Brand,
            brand: "pi".into(),
            ..Default::default()
        };
        form.update_suggestion(&brands);
        assert_eq!(form.suggestion_suffix().as_deref(), Some("ngouin"));

        assert!(form.accept_suggestion());
        assert_eq!(form.brand, "Pingouin");
        assert!(form.suggestion.is_none());
    }

    #[test]
    fn bulk_form_collects_valid_lines_and_flags_bad_ones() {
        let mut form = BulkYarnForm::default();
        form.line = "Linha A,Marca X,50.0".into();
        form.commit_line();
        assert_eq!(form.pending.len(), 1);
        assert!(form.error.is_none());
        assert!(form.line.is_empty());

        form.line = "so-um-campo".into();
        form.commit_line();
        assert_eq!(form.pending.len(), 1);
        assert!(form.error.is_some());
        assert_eq!(form.line, "so-um-campo");
    }

    #[test]
    fn needle_form_rejects_non_numeric_sizes() {
        let mut form = NeedleForm::default();
        assert!(!form.push_char('x'));
        assert!(form.parse_inputs().is_err());

        form.size = "2.5".into();
        assert_eq!(form.parse_inputs().unwrap(), 2.5);
    }
}
