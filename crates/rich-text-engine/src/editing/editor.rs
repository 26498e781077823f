use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use uuid::Uuid;

use crate::editing::toolbar::{Button, ToolbarState};
use crate::editing::{Cmd, MoveTarget, Patch, Value};
use crate::error::EditError;
use crate::keymap::{self, Hotkey};
use crate::model::{Inline, InlineType, Path};
use crate::widgets::field::{self, FieldOption, FieldWidget, WidgetEffect};
use crate::widgets::EMOJIS;

/// An editing session: the current value plus the per-render state of the
/// field widgets living in it.
///
/// Commands go through [`Editor::apply`], which swaps the value as a whole
/// or not at all.
#[derive(Debug, Clone)]
pub struct Editor {
    value: Value,
    version: u64,
    widgets: HashMap<Uuid, FieldWidget>,
    field_options: Vec<FieldOption>,
    emojis: Vec<String>,
}

impl Editor {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            version: 0,
            widgets: HashMap::new(),
            field_options: field::default_options(),
            emojis: EMOJIS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the chooser entries. The placeholder is prepended.
    pub fn with_field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_options = field::options_from_names(names);
        self
    }

    /// Replace the emoji palette. An empty palette keeps the default one.
    pub fn with_emojis(mut self, emojis: Vec<String>) -> Self {
        if !emojis.is_empty() {
            self.emojis = emojis;
        }
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn emojis(&self) -> &[String] {
        &self.emojis
    }

    pub fn field_options(&self) -> &[FieldOption] {
        &self.field_options
    }

    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        self.apply_all(std::slice::from_ref(&cmd))
    }

    /// Apply `cmds` in order as one step. If any of them fails the value is
    /// left as it was before the first.
    pub fn apply_all(&mut self, cmds: &[Cmd]) -> Result<Patch, EditError> {
        let mut next = self.value.clone();
        for cmd in cmds {
            next = match next.apply(cmd) {
                Ok(value) => value,
                Err(err) => {
                    warn!("rejected {cmd:?}: {err}");
                    return Err(err);
                }
            };
        }

        let changed = next != self.value;
        self.value = next;
        self.version += 1;
        self.forget_removed_widgets();
        Ok(Patch {
            version: self.version,
            changed,
        })
    }

    /// Run the command bound to `hotkey`. Unbound chords return `None`.
    pub fn handle_hotkey(&mut self, hotkey: &Hotkey) -> Option<Result<Patch, EditError>> {
        let Some(cmd) = keymap::command_for(hotkey) else {
            debug!("no command bound to {hotkey}");
            return None;
        };
        Some(self.apply(cmd))
    }

    pub fn press(&mut self, button: &Button) -> Result<Patch, EditError> {
        self.apply(button.command())
    }

    /// The toolbar's emoji button: `code` if given, else the first emoji of
    /// the palette
    pub fn insert_emoji(&mut self, code: Option<&str>) -> Result<Patch, EditError> {
        let code = code
            .map(str::to_string)
            .or_else(|| self.emojis.first().cloned())
            .unwrap_or_else(|| EMOJIS[0].to_string());
        self.apply(Cmd::insert_emoji(code))
    }

    pub fn toolbar(&self) -> ToolbarState {
        ToolbarState::compute(&self.value)
    }

    /// Field inlines in document order
    pub fn fields(&self) -> Vec<(Path, &Inline)> {
        self.value
            .document
            .descendants()
            .filter_map(|(path, node)| {
                node.as_inline()
                    .filter(|inline| inline.kind() == InlineType::Field)
                    .map(|inline| (path, inline))
            })
            .collect()
    }

    /// Widget state of the field with `key`. Fields not interacted with yet
    /// start out choosing, remembering any value already in the document.
    pub fn field_widget(&self, key: Uuid) -> Result<FieldWidget, EditError> {
        let inline = self.field_inline(key)?;
        Ok(self
            .widgets
            .get(&key)
            .cloned()
            .unwrap_or_else(|| FieldWidget::for_committed(inline.get("value"))))
    }

    /// The user picked `value` in the chooser of field `key`.
    ///
    /// Binding commits the name to the inline, moves the cursor to the start
    /// of the next block and focuses the editor, all as one step.
    pub fn pick_field(&mut self, key: Uuid, value: &str) -> Result<Patch, EditError> {
        let transition = self.field_widget(key)?.pick(value);
        let patch = match &transition.effect {
            Some(WidgetEffect::Bind { name }) => {
                debug!("binding field {key} to {name}");
                self.apply_all(&[
                    Cmd::SetInlineData {
                        key,
                        data: BTreeMap::from([("value".to_string(), name.clone())]),
                    },
                    Cmd::Move(MoveTarget::StartOfNextBlock),
                    Cmd::Focus,
                ])?
            }
            None => Patch {
                version: self.version,
                changed: false,
            },
        };
        self.widgets.insert(key, transition.state);
        Ok(patch)
    }

    /// The user activated the bound token of field `key`
    pub fn activate_field(&mut self, key: Uuid) -> Result<FieldWidget, EditError> {
        let next = self.field_widget(key)?.activate();
        self.widgets.insert(key, next.clone());
        Ok(next)
    }

    /// Chooser entries for `query`
    pub fn field_choices(&self, query: &str) -> Vec<&FieldOption> {
        FieldWidget::options(&self.field_options, query)
    }

    fn field_inline(&self, key: Uuid) -> Result<&Inline, EditError> {
        self.value
            .document
            .descendants()
            .find_map(|(_, node)| {
                node.as_inline()
                    .filter(|inline| inline.kind() == InlineType::Field && inline.key() == key)
            })
            .ok_or(EditError::UnknownInline { key })
    }

    fn forget_removed_widgets(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        let live: Vec<Uuid> = self.fields().iter().map(|(_, inline)| inline.key()).collect();
        self.widgets.retain(|key, _| live.contains(key));
    }
}
