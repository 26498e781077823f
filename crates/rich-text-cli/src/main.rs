use anyhow::{Context, Result, bail};
use rich_text_config::Config;
use rich_text_engine::editing::{Button, Cmd, Editor, MoveTarget, Point, Selection, Value};
use rich_text_engine::model::{BlockType, Mark, Path, format_outline};
use rich_text_engine::widgets::FieldWidget;
use rich_text_engine::{Hotkey, io};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::{env, process};
use uuid::Uuid;

/// One line of input
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Key(Hotkey),
    Mark(Mark),
    Block(BlockType),
    Wrap(BlockType),
    Unwrap(BlockType),
    Emoji(Option<String>),
    Field,
    Pick { field: usize, name: String },
    Activate { field: usize },
    Select(Selection),
    NextText,
    NextBlock,
    Toolbar,
    Show,
    Save(PathBuf),
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  key <hotkey>                      mod+b mod+i mod+u mod+` mod+3
  mark <mark>                       bold italic underlined code
  block <type>                      toolbar block button
  wrap <type> | unwrap <type>
  emoji [code]                      insert an emoji (default: first of palette)
  field                             insert a field
  pick <n> <name> | activate <n>    interact with the n-th field (1-based)
  select <path>:<off> [<path>:<off>]
  next-text | next-block
  toolbar | show | save <file> | help | quit";

fn parse_point(s: &str) -> Result<Point> {
    let Some((path, offset)) = s.rsplit_once(':') else {
        bail!("expected <path>:<offset>, got {s:?}");
    };
    let path: Path = path.parse()?;
    let offset = offset
        .parse()
        .with_context(|| format!("invalid offset in {s:?}"))?;
    Ok(Point { path, offset })
}

fn parse_field_index(s: Option<&str>) -> Result<usize> {
    let n: usize = s
        .context("missing field number")?
        .parse()
        .context("field number must be a positive integer")?;
    if n == 0 {
        bail!("fields are numbered from 1");
    }
    Ok(n - 1)
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("empty command");
    };
    let arg = words.next();
    let command = match verb {
        "key" => Command::Key(arg.context("missing hotkey")?.parse()?),
        "mark" => Command::Mark(arg.context("missing mark")?.parse()?),
        "block" => Command::Block(arg.context("missing block type")?.parse()?),
        "wrap" => Command::Wrap(arg.context("missing block type")?.parse()?),
        "unwrap" => Command::Unwrap(arg.context("missing block type")?.parse()?),
        "emoji" => Command::Emoji(arg.map(str::to_string)),
        "field" => Command::Field,
        "pick" => {
            let field = parse_field_index(arg)?;
            let name = words.next().context("missing field name")?.to_string();
            Command::Pick { field, name }
        }
        "activate" => Command::Activate {
            field: parse_field_index(arg)?,
        },
        "select" => {
            let anchor = parse_point(arg.context("missing point")?)?;
            let focus = match words.next() {
                Some(point) => parse_point(point)?,
                None => anchor.clone(),
            };
            Command::Select(Selection::new(anchor, focus))
        }
        "next-text" => Command::NextText,
        "next-block" => Command::NextBlock,
        "toolbar" => Command::Toolbar,
        "show" => Command::Show,
        "save" => Command::Save(PathBuf::from(arg.context("missing file name")?)),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {other:?}, try help"),
    };
    Ok(command)
}

struct App {
    editor: Editor,
}

impl App {
    fn new(value: Value, config: &Config) -> Self {
        let editor = Editor::new(value)
            .with_field_names(config.field_options.iter().cloned())
            .with_emojis(config.emojis.clone());
        Self { editor }
    }

    fn field_key(&self, index: usize) -> Result<Uuid> {
        self.editor
            .fields()
            .get(index)
            .map(|(_, inline)| inline.key())
            .with_context(|| format!("there are only {} fields", self.editor.fields().len()))
    }

    /// Run one command. `Ok(false)` means quit.
    fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        let result = match command {
            Command::Key(hotkey) => match self.editor.handle_hotkey(&hotkey) {
                Some(result) => result.map(|_| ()),
                None => {
                    writeln!(out, "{hotkey} is not bound")?;
                    return Ok(true);
                }
            },
            Command::Mark(mark) => self.editor.press(&Button::Mark(mark)).map(|_| ()),
            Command::Block(kind) => self.editor.press(&Button::Block(kind)).map(|_| ()),
            Command::Wrap(kind) => self.editor.apply(Cmd::WrapBlock(kind)).map(|_| ()),
            Command::Unwrap(kind) => self.editor.apply(Cmd::UnwrapBlock(kind)).map(|_| ()),
            Command::Emoji(code) => self.editor.insert_emoji(code.as_deref()).map(|_| ()),
            Command::Field => self.editor.apply(Cmd::insert_field()).map(|_| ()),
            Command::Pick { field, name } => {
                let key = self.field_key(field)?;
                self.editor.pick_field(key, &name).map(|_| ())
            }
            Command::Activate { field } => {
                let key = self.field_key(field)?;
                self.editor.activate_field(key).map(|_| ())
            }
            Command::Select(selection) => self.editor.apply(Cmd::Select(selection)).map(|_| ()),
            Command::NextText => self
                .editor
                .apply(Cmd::Move(MoveTarget::StartOfNextText))
                .map(|_| ()),
            Command::NextBlock => self
                .editor
                .apply(Cmd::Move(MoveTarget::StartOfNextBlock))
                .map(|_| ()),
            Command::Toolbar => {
                write!(out, "{}", self.render_toolbar())?;
                return Ok(true);
            }
            Command::Show => Ok(()),
            Command::Save(path) => {
                io::save_value(&path, self.editor.value())?;
                writeln!(out, "saved {}", path.display())?;
                return Ok(true);
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        if let Err(err) = result {
            writeln!(out, "rejected: {err}")?;
        }
        write!(out, "{}", self.render())?;
        Ok(true)
    }

    fn render(&self) -> String {
        let value = self.editor.value();
        let mut text = format_outline(&value.document);

        let selection = &value.selection;
        let focus = if selection.is_focused { "" } else { " (blurred)" };
        if selection.is_collapsed() {
            text.push_str(&format!(
                "cursor {}:{}{focus}\n",
                selection.focus.path, selection.focus.offset
            ));
        } else {
            text.push_str(&format!(
                "selection {}:{} -> {}:{}{focus}\n",
                selection.anchor.path,
                selection.anchor.offset,
                selection.focus.path,
                selection.focus.offset
            ));
        }

        for (n, (path, inline)) in self.editor.fields().into_iter().enumerate() {
            let state = match self.editor.field_widget(inline.key()) {
                Ok(FieldWidget::Bound(name)) => format!("bound to {name}"),
                Ok(FieldWidget::Selecting { remembered }) => match remembered {
                    Some(name) => format!("choosing (was {name})"),
                    None => "choosing".to_string(),
                },
                Err(err) => err.to_string(),
            };
            text.push_str(&format!("field {} at {path}: {state}\n", n + 1));
        }
        text
    }

    fn render_toolbar(&self) -> String {
        let toolbar = self.editor.toolbar();
        let marks = toolbar
            .marks
            .iter()
            .map(|(mark, on)| if *on { format!("[{mark}]") } else { mark.to_string() });
        let blocks = toolbar
            .blocks
            .iter()
            .map(|(kind, on)| if *on { format!("[{kind}]") } else { kind.to_string() });
        let emoji = self.editor.emojis().first().cloned().unwrap_or_default();
        let buttons: Vec<String> = marks.chain(blocks).chain([emoji]).collect();
        format!("{}\n", buttons.join(" "))
    }
}

fn load_initial_value(config: &Config) -> Result<Value> {
    let from_args = env::args().nth(1).map(PathBuf::from);
    match from_args.or_else(|| config.value_path.clone()) {
        Some(path) => {
            log::info!("Loading value from {}", path.display());
            io::load_value(&path).with_context(|| format!("cannot open {}", path.display()))
        }
        None => {
            log::info!("No value given, using the built-in sample");
            Ok(io::sample_value()?)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!(
                "No config at {}, using defaults",
                Config::config_path().display()
            );
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut app = App::new(load_initial_value(&config)?, &config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", app.render())?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let keep_going = match parse_command(&line) {
            Ok(command) => app.execute(command, &mut out),
            Err(e) => {
                writeln!(out, "error: {e}")?;
                Ok(true)
            }
        };
        match keep_going {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
        out.flush()?;
    }
    Ok(())
}
