//! Interaction state of the inline field-reference widget.
//!
//! This state lives outside the document. The document only holds the field
//! name the widget last committed; whether the chooser is open is per-render
//! state owned by whoever renders the widget, keyed by the inline's identity.

/// Value of the placeholder option, which never binds
pub const PLACEHOLDER: &str = "empty";

/// One entry of the chooser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn placeholder() -> Self {
        Self {
            value: PLACEHOLDER.to_string(),
            label: "-- select a field --".to_string(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER
    }
}

/// Placeholder first, then one option per name
pub fn options_from_names<I, S>(names: I) -> Vec<FieldOption>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    std::iter::once(FieldOption::placeholder())
        .chain(names.into_iter().map(FieldOption::named))
        .collect()
}

/// Names offered when no configuration overrides them
pub const DEFAULT_FIELD_NAMES: [&str; 4] = ["field1", "field2", "field3", "field4"];

pub fn default_options() -> Vec<FieldOption> {
    options_from_names(DEFAULT_FIELD_NAMES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWidget {
    /// Chooser open. Remembers the last bound name, if any, until a new one
    /// is picked.
    Selecting { remembered: Option<String> },
    /// Showing the bound name as a token
    Bound(String),
}

/// What the host has to do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEffect {
    /// Commit `name` to the inline, then move the cursor to the start of the
    /// next block and focus the editor
    Bind { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FieldWidget,
    pub effect: Option<WidgetEffect>,
}

impl Default for FieldWidget {
    fn default() -> Self {
        FieldWidget::Selecting { remembered: None }
    }
}

impl FieldWidget {
    /// Initial state for an inline whose document data may already hold a
    /// committed name
    pub fn for_committed(value: Option<&str>) -> Self {
        FieldWidget::Selecting {
            remembered: value.map(str::to_string),
        }
    }

    pub fn is_choosing(&self) -> bool {
        matches!(self, FieldWidget::Selecting { .. })
    }

    /// The bound name, or the remembered one while choosing again
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldWidget::Selecting { remembered } => remembered.as_deref(),
            FieldWidget::Bound(name) => Some(name),
        }
    }

    /// The user picked the option with `value` from the chooser
    pub fn pick(&self, value: &str) -> Transition {
        match self {
            FieldWidget::Selecting { .. } if !value.is_empty() && value != PLACEHOLDER => {
                Transition {
                    state: FieldWidget::Bound(value.to_string()),
                    effect: Some(WidgetEffect::Bind {
                        name: value.to_string(),
                    }),
                }
            }
            _ => Transition {
                state: self.clone(),
                effect: None,
            },
        }
    }

    /// The user activated the bound token: reopen the chooser
    pub fn activate(&self) -> FieldWidget {
        match self {
            FieldWidget::Bound(name) => FieldWidget::Selecting {
                remembered: Some(name.clone()),
            },
            selecting => selecting.clone(),
        }
    }

    /// Chooser entries matching `query` (case-insensitive substring of the
    /// label). The placeholder is always offered first.
    pub fn options<'a>(all: &'a [FieldOption], query: &str) -> Vec<&'a FieldOption> {
        let query = query.trim().to_lowercase();
        all.iter()
            .filter(|option| {
                option.is_placeholder() || option.label.to_lowercase().contains(&query)
            })
            .collect()
    }
}
