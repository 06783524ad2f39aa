use crate::app::View;

pub const MISSING_VALUE: &str = "Please fill out this field.";
pub const BAD_NUMBER: &str = "Please enter a number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    CreateTeam,
    JoinTeam,
    Score,
}

impl FormId {
    pub fn title(&self) -> &'static str {
        match self {
            FormId::CreateTeam => "Create team",
            FormId::JoinTeam => "Join team",
            FormId::Score => "Submit score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Optional leading `-` followed by digits.
    Integer,
    /// Rendered masked.
    Secret,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self { name, label, kind, required, value: String::new() }
    }

    /// What the field shows on screen.
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(self.value.chars().count()),
            _ => self.value.clone(),
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Integer => c.is_ascii_digit() || (c == '-' && self.value.is_empty()),
            FieldKind::Text | FieldKind::Secret => !c.is_control(),
        }
    }
}

/// A field failing its constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    pub field: usize,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub id: FormId,
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn create_team() -> Self {
        Self {
            id: FormId::CreateTeam,
            fields: vec![
                FormField::new("team_name", "Team name", FieldKind::Text, true),
                FormField::new("player1", "Player 1", FieldKind::Text, true),
                FormField::new("player2", "Player 2", FieldKind::Text, true),
                FormField::new("contact", "Captain contact", FieldKind::Text, false),
            ],
        }
    }

    pub fn join_team() -> Self {
        Self {
            id: FormId::JoinTeam,
            fields: vec![
                FormField::new("team_code", "Team code", FieldKind::Text, true),
                FormField::new("player", "Player", FieldKind::Text, true),
            ],
        }
    }

    pub fn score() -> Self {
        Self {
            id: FormId::Score,
            fields: vec![
                FormField::new("matchId", "Match id", FieldKind::Text, true),
                FormField::new("scoreA", "Score A", FieldKind::Integer, true),
                FormField::new("scoreB", "Score B", FieldKind::Integer, true),
                FormField::new("pin", "Event PIN", FieldKind::Secret, true),
            ],
        }
    }

    /// Value of a named field; empty for unknown names.
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.into();
        }
    }

    /// Integer value of a named field. Only meaningful after `check_validity`.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).trim().parse().ok()
    }

    pub fn push_char(&mut self, field: usize, c: char) {
        if let Some(field) = self.fields.get_mut(field)
            && field.accepts(c)
        {
            field.value.push(c);
        }
    }

    pub fn pop_char(&mut self, field: usize) {
        if let Some(field) = self.fields.get_mut(field) {
            field.value.pop();
        }
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }

    /// First field violating its required/integer constraint.
    pub fn check_validity(&self) -> Result<(), Invalid> {
        for (idx, field) in self.fields.iter().enumerate() {
            let value = field.value.trim();
            if value.is_empty() {
                if field.required {
                    return Err(Invalid { field: idx, message: MISSING_VALUE });
                }
                continue;
            }
            if field.kind == FieldKind::Integer && value.parse::<i64>().is_err() {
                return Err(Invalid { field: idx, message: BAD_NUMBER });
            }
        }
        Ok(())
    }
}

/// Focus position: a form and a field index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFocus {
    pub form: FormId,
    pub field: usize,
}

#[derive(Debug)]
pub struct FormsState {
    pub create_team: Form,
    pub join_team: Form,
    pub score: Form,
    pub focus: Option<FieldFocus>,
    pub editing: bool,
    /// Constraint message from the last blocked submit.
    pub notice: Option<(FormId, &'static str)>,
}

impl Default for FormsState {
    fn default() -> Self {
        Self {
            create_team: Form::create_team(),
            join_team: Form::join_team(),
            score: Form::score(),
            focus: None,
            editing: false,
            notice: None,
        }
    }
}

impl FormsState {
    pub fn form(&self, id: FormId) -> &Form {
        match id {
            FormId::CreateTeam => &self.create_team,
            FormId::JoinTeam => &self.join_team,
            FormId::Score => &self.score,
        }
    }

    pub fn form_mut(&mut self, id: FormId) -> &mut Form {
        match id {
            FormId::CreateTeam => &mut self.create_team,
            FormId::JoinTeam => &mut self.join_team,
            FormId::Score => &mut self.score,
        }
    }

    /// Put focus on the first field of the view's first form, or clear it.
    pub fn focus_view(&mut self, view: Option<View>) {
        self.editing = false;
        self.notice = None;
        self.focus = view
            .and_then(|v| v.forms().first().copied())
            .map(|form| FieldFocus { form, field: 0 });
    }

    /// Move focus forward (or back) through every field of the view's forms.
    pub fn move_focus(&mut self, view: Option<View>, forward: bool) {
        let order: Vec<FieldFocus> = view
            .map(|v| v.forms())
            .unwrap_or_default()
            .iter()
            .flat_map(|&form| {
                (0..self.form(form).fields.len()).map(move |field| FieldFocus { form, field })
            })
            .collect();
        if order.is_empty() {
            self.focus = None;
            return;
        }
        let current = self.focus.and_then(|f| order.iter().position(|o| *o == f));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % order.len(),
            (Some(idx), false) => (idx + order.len() - 1) % order.len(),
        };
        self.focus = Some(order[next]);
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(focus) = self.focus {
            self.form_mut(focus.form).push_char(focus.field, c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(focus) = self.focus {
            self.form_mut(focus.form).pop_char(focus.field);
        }
    }
}
