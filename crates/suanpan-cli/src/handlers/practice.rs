//! Practice command handler: a line-driven shell over a live abacus

use std::io::{BufRead, Write};
use std::str::FromStr;

use suanpan::core::{Bead, Difficulty, Locale, LOWER_BEADS};
use suanpan::hint::HintRequest;
use suanpan::session::PracticeSession;

use crate::coach::Coach;
use crate::commands::PracticeArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_abacus, render_header, render_lesson, render_question, render_wrong_columns};

const HELP: &str = "\
commands:
  new [difficulty]   pose a new question
  up <rod>           toggle the upper bead on a rod (1 = ones)
  low <rod> <bead>   toggle a lower bead, 1 nearest the beam
  set <value>        enter a whole value
  check              check the abacus against the question
  teach              walk through the correct moves
  next, prev         move through the walk-through
  exit               leave the walk-through
  explain            explain the formula of the current step
  reset              clear the abacus
  show               draw the abacus
  help               this text
  quit               leave";

/// One line of shell input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    /// Pose a new question, optionally in another band
    New(Option<Difficulty>),
    /// Toggle the upper bead of a rod counted from the right
    Upper(usize),
    /// Toggle a lower bead of a rod counted from the right
    Lower {
        /// Rod, 1 for the ones
        rod: usize,
        /// Bead, 1 nearest the beam
        bead: usize,
    },
    /// Enter a whole value
    Set(u64),
    /// Check the answer
    Check,
    /// Start the walk-through
    Teach,
    /// Next walk-through step
    Next,
    /// Previous walk-through step
    Prev,
    /// Leave the walk-through
    Exit,
    /// Explain the current formula
    Explain,
    /// Clear the abacus
    Reset,
    /// Draw the abacus
    Show,
    /// List the commands
    Help,
    /// Leave the shell
    Quit,
    /// Blank line
    Empty,
}

impl FromStr for ShellCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };
        let args: Vec<&str> = words.collect();
        let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("new", []) => Self::New(None),
            ("new", [band]) => Self::New(Some(parse(band, "difficulty")?)),
            ("up", [rod]) => Self::Upper(parse(rod, "rod")?),
            ("low", [rod, bead]) => Self::Lower {
                rod: parse(rod, "rod")?,
                bead: parse(bead, "bead")?,
            },
            ("set", [value]) => Self::Set(parse(value, "value")?),
            ("check", []) => Self::Check,
            ("teach", []) => Self::Teach,
            ("next" | "n", []) => Self::Next,
            ("prev" | "p", []) => Self::Prev,
            ("exit", []) => Self::Exit,
            ("explain", []) => Self::Explain,
            ("reset", []) => Self::Reset,
            ("show", []) => Self::Show,
            ("help" | "?", []) => Self::Help,
            ("quit" | "q", []) => Self::Quit,
            (name, _) => {
                return Err(CliError::invalid_argument(format!(
                    "unknown or malformed command: {name} (try `help`)"
                )))
            }
        };
        Ok(command)
    }
}

fn parse<T: FromStr>(word: &str, what: &str) -> CliResult<T> {
    word.parse()
        .map_err(|_| CliError::invalid_argument(format!("invalid {what}: {word}")))
}

/// Shell settings
#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    /// Band for `new` without an argument
    pub difficulty: Difficulty,
    /// Styled output
    pub use_color: bool,
    /// Print a prompt before each line
    pub prompt: bool,
}

/// Runs the shell until `quit` or end of input.
///
/// Bad commands and moves are reported and the shell carries on; only I/O
/// failures end it.
pub fn run_shell<I: BufRead, W: Write>(
    session: &mut PracticeSession,
    options: ShellOptions,
    coach: Option<&Coach>,
    input: I,
    out: &mut W,
) -> CliResult<()> {
    flush_announcements(session, out)?;
    draw(session, options, out)?;

    let mut lines = input.lines();
    loop {
        if options.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let command = match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        tracing::debug!(?command, "shell command");
        match dispatch(session, options, coach, command, out) {
            Ok(()) => {}
            Err(CliError::Io(err)) => return Err(CliError::Io(err)),
            Err(err) => writeln!(out, "{err}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn dispatch<W: Write>(
    session: &mut PracticeSession,
    options: ShellOptions,
    coach: Option<&Coach>,
    command: ShellCommand,
    out: &mut W,
) -> CliResult<()> {
    let locale = session.locale();
    match command {
        ShellCommand::New(band) => {
            session.new_question(band.unwrap_or(options.difficulty))?;
            flush_announcements(session, out)?;
            draw(session, options, out)
        }
        ShellCommand::Upper(rod) => {
            let index = rod_index(session, rod)?;
            moved(session.toggle(index, Bead::Upper)?, session, options, out)
        }
        ShellCommand::Lower { rod, bead } => {
            let index = rod_index(session, rod)?;
            if !(1..=LOWER_BEADS).contains(&bead) {
                return Err(CliError::invalid_argument(format!(
                    "bead {bead} outside 1..={LOWER_BEADS}"
                )));
            }
            moved(
                session.toggle(index, Bead::Lower(bead - 1))?,
                session,
                options,
                out,
            )
        }
        ShellCommand::Set(value) => moved(session.enter_value(value)?, session, options, out),
        ShellCommand::Check => check(session, options, coach, out),
        ShellCommand::Teach => {
            if session.start_teaching()?.is_none() {
                return no_question(out);
            }
            flush_announcements(session, out)?;
            draw(session, options, out)
        }
        ShellCommand::Next | ShellCommand::Prev => {
            let step = if command == ShellCommand::Next {
                session.next_step()
            } else {
                session.prev_step()
            };
            if step.is_none() {
                writeln!(out, "not teaching; type `teach` first")?;
                return Ok(());
            }
            flush_announcements(session, out)?;
            draw(session, options, out)
        }
        ShellCommand::Exit => {
            if session.exit_teaching() {
                flush_announcements(session, out)?;
            }
            Ok(())
        }
        ShellCommand::Explain => {
            let formula = session
                .teaching()
                .and_then(|walk| walk.current().formula())
                .map(str::to_string);
            let Some(formula) = formula else {
                writeln!(out, "no formula at this step")?;
                return Ok(());
            };
            let text = coach.map_or_else(
                || locale.fallback_formula().to_string(),
                |coach| coach.explain(&formula),
            );
            writeln!(out, "{formula}: {text}")?;
            Ok(())
        }
        ShellCommand::Reset => {
            session.reset();
            flush_announcements(session, out)?;
            draw(session, options, out)
        }
        ShellCommand::Show => draw(session, options, out),
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        ShellCommand::Quit | ShellCommand::Empty => Ok(()),
    }
}

fn check<W: Write>(
    session: &mut PracticeSession,
    options: ShellOptions,
    coach: Option<&Coach>,
    out: &mut W,
) -> CliResult<()> {
    let Some(question) = session.question().copied() else {
        return no_question(out);
    };
    let locale = session.locale();
    let correction = session.check()?;
    let announcements = session.take_announcements();
    let Some(correction) = correction else {
        return write_lines(&announcements, out);
    };

    // verdict line, then the rods that are off, then the walk-through
    if let Some((verdict, rest)) = announcements.split_first() {
        writeln!(out, "{}", verdict.display)?;
        if !correction.wrong_columns.is_empty() {
            writeln!(out, "{}", render_wrong_columns(&correction.wrong_columns, locale))?;
        }
        for line in rest {
            writeln!(out, "{}", render_header(&line.display, options.use_color))?;
        }
    }
    writeln!(
        out,
        "{}",
        render_lesson(&correction.lesson, false, false, options.use_color)
    )?;
    if let Some(coach) = coach {
        let tip = coach.tip(&HintRequest::new(&question, correction.verdict.entered));
        writeln!(out, "{tip}")?;
    }
    Ok(())
}

fn rod_index(session: &PracticeSession, rod: usize) -> CliResult<usize> {
    let width = session.abacus().width();
    if rod == 0 || rod > width {
        return Err(CliError::invalid_argument(format!(
            "rod {rod} outside 1..={width}"
        )));
    }
    Ok(width - rod)
}

fn moved<W: Write>(
    applied: bool,
    session: &mut PracticeSession,
    options: ShellOptions,
    out: &mut W,
) -> CliResult<()> {
    if !applied {
        writeln!(out, "the abacus is locked while teaching; type `exit` first")?;
        return Ok(());
    }
    draw(session, options, out)
}

fn no_question<W: Write>(out: &mut W) -> CliResult<()> {
    writeln!(out, "no question yet; type `new`")?;
    Ok(())
}

fn flush_announcements<W: Write>(session: &mut PracticeSession, out: &mut W) -> CliResult<()> {
    write_lines(&session.take_announcements(), out)
}

fn write_lines<W: Write>(lines: &[suanpan::core::narration::Utterance], out: &mut W) -> CliResult<()> {
    for line in lines {
        writeln!(out, "{}", line.display)?;
    }
    Ok(())
}

fn draw<W: Write>(session: &PracticeSession, options: ShellOptions, out: &mut W) -> CliResult<()> {
    if let Some(question) = session.question() {
        writeln!(out, "{}", render_question(question, options.use_color))?;
    }
    let highlight = session
        .teaching()
        .and_then(|walk| walk.current().active_column());
    writeln!(
        out,
        "{}",
        render_abacus(session.abacus(), highlight, options.use_color)
    )?;
    Ok(())
}

/// Execute the practice command on stdin and stdout
pub fn execute_practice(config: &CliConfig, args: &PracticeArgs) -> CliResult<()> {
    let mut session = match args.seed {
        Some(seed) => PracticeSession::seeded(config.width, config.locale, seed)?,
        None => PracticeSession::from_entropy(config.width, config.locale)?,
    };
    let coach = if args.hint || config.hint.enabled {
        Some(Coach::new(&config.hint, config.locale)?)
    } else {
        None
    };
    let difficulty = args.difficulty.unwrap_or(config.difficulty);
    session.new_question(difficulty)?;

    let stdin = std::io::stdin();
    let prompt = std::io::IsTerminal::is_terminal(&stdin);
    let options = ShellOptions {
        difficulty,
        use_color: config.use_color(),
        prompt,
    };
    let mut out = std::io::stdout().lock();
    if prompt && !config.verbosity.is_quiet() {
        writeln!(out, "{}", greeting(config.locale))?;
    }
    run_shell(&mut session, options, coach.as_ref(), stdin.lock(), &mut out)
}

const fn greeting(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "珠算練習：輸入 help 查看指令",
        Locale::En => "Abacus practice: type help for commands",
    }
}
