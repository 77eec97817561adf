//! Menu-driven command dispatcher over an [`OrderedTree`] of `f64` values.
//!
//! Input text is parsed into a [`Command`], executed against the session's tree,
//! and answered with a [`Reply`] whose `Display` output is what the console shows.

use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};
use log::debug;
use thiserror::Error;

use crate::{Entry, OrderedTree};

/// The numbered menu shown before each prompt
pub const MENU: &str = "\n=== Red-black tree ===\n\
1. Insert a value\n\
2. Preorder traversal\n\
3. Inorder traversal\n\
4. Sum of leaf values\n\
5. Average of all values\n\
0. Exit\n";

/// Errors raised while parsing console input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The menu selection is not one of the listed choices
    #[error("unknown menu choice `{0}`")]
    UnknownChoice(String),

    /// The value text is not a number
    #[error("`{0}` is not a real number")]
    InvalidNumber(String),

    /// The value parsed to NaN or an infinity
    #[error("`{0}` is not a finite number")]
    NotFinite(String),
}

/// A selection from the numbered menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `1`
    Insert,
    /// `2`
    Preorder,
    /// `3`
    Inorder,
    /// `4`
    LeafSum,
    /// `5`
    Average,
    /// `0`
    Exit,
}

impl FromStr for MenuChoice {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::Insert),
            "2" => Ok(MenuChoice::Preorder),
            "3" => Ok(MenuChoice::Inorder),
            "4" => Ok(MenuChoice::LeafSum),
            "5" => Ok(MenuChoice::Average),
            "0" => Ok(MenuChoice::Exit),
            other => Err(SessionError::UnknownChoice(other.to_owned())),
        }
    }
}

impl MenuChoice {
    /// Returns `true` if the choice needs a value before it can run
    pub const fn needs_value(self) -> bool {
        matches!(self, MenuChoice::Insert)
    }

    /// Builds the command for this choice
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert, ignored by every other choice
    ///
    /// # Returns
    ///
    /// * `Command` - The command to execute
    pub const fn into_command(self, value: f64) -> Command {
        match self {
            MenuChoice::Insert => Command::Insert(value),
            MenuChoice::Preorder => Command::Preorder,
            MenuChoice::Inorder => Command::Inorder,
            MenuChoice::LeafSum => Command::LeafSum,
            MenuChoice::Average => Command::Average,
            MenuChoice::Exit => Command::Exit,
        }
    }
}

/// Parses a finite real number from console input
///
/// # Arguments
///
/// * `text` - The raw input line
///
/// # Returns
///
/// * `Result<f64, SessionError>` - The parsed value
///
/// # Examples
///
/// ```
/// # use rb_aggregates::session::{parse_value, SessionError};
/// assert_eq!(parse_value(" 2.5\n"), Ok(2.5));
/// assert!(matches!(parse_value("abc"), Err(SessionError::InvalidNumber(_))));
/// assert!(matches!(parse_value("NaN"), Err(SessionError::NotFinite(_))));
/// ```
pub fn parse_value(text: &str) -> Result<f64, SessionError> {
    let text = text.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| SessionError::InvalidNumber(text.to_owned()))?;
    if !value.is_finite() {
        return Err(SessionError::NotFinite(text.to_owned()));
    }
    Ok(value)
}

/// A command the session can execute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Insert one value into the tree
    Insert(f64),
    /// List the entries in preorder
    Preorder,
    /// List the entries in sorted order
    Inorder,
    /// Sum the values stored in leaves
    LeafSum,
    /// Average every stored value
    Average,
    /// Tear the tree down and end the session
    Exit,
}

/// The outcome of an executed command, rendered through `Display`
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The value that was inserted
    Inserted(f64),
    /// Entries in preorder
    Preorder(Vec<Entry<f64>>),
    /// Entries in sorted order
    Inorder(Vec<Entry<f64>>),
    /// Sum of the leaf values
    LeafSum(f64),
    /// Mean of all values
    Average(f64),
    /// The session has ended
    Exit,
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[Entry<f64>]) -> fmt::Result {
    let mut first = true;
    for entry in entries {
        if !first {
            f.write_str(" ")?;
        }
        write!(f, "{entry}")?;
        first = false;
    }
    Ok(())
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Inserted(value) => write!(f, "Inserted {value}."),
            Reply::Preorder(entries) => {
                f.write_str("Preorder: ")?;
                write_entries(f, entries)
            }
            Reply::Inorder(entries) => {
                f.write_str("Inorder: ")?;
                write_entries(f, entries)
            }
            Reply::LeafSum(sum) => write!(f, "Sum of leaves: {sum}"),
            Reply::Average(avg) => write!(f, "Average: {avg:.4}"),
            Reply::Exit => f.write_str("Shutting down."),
        }
    }
}

/// A console session owning one tree
///
/// # Examples
///
/// ```
/// # use rb_aggregates::session::{Command, Session};
/// let mut session = Session::new();
/// for value in [10.0, 20.0, 30.0] {
///     session.execute(Command::Insert(value));
/// }
/// assert_eq!(session.execute(Command::Inorder).to_string(), "Inorder: 10(R) 20(B) 30(R)");
/// assert_eq!(session.execute(Command::Average).to_string(), "Average: 20.0000");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The tree every command operates on
    tree: OrderedTree<f64>,
    /// Set once `Exit` has run
    finished: bool,
}

impl Session {
    /// Creates a session over an empty tree
    pub const fn new() -> Self {
        Self {
            tree: OrderedTree::new(),
            finished: false,
        }
    }

    /// Returns the session's tree
    pub const fn tree(&self) -> &OrderedTree<f64> {
        &self.tree
    }

    /// Returns `true` once the `Exit` command has run
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Executes a command against the tree
    ///
    /// # Arguments
    ///
    /// * `command` - The command to execute
    ///
    /// # Returns
    ///
    /// * `Reply` - The outcome, ready to display
    pub fn execute(&mut self, command: Command) -> Reply {
        debug!("executing {command:?}");
        match command {
            Command::Insert(value) => {
                self.tree.insert(value);
                debug!(
                    "inserted {value}, tree holds {} values, root {}",
                    self.tree.len(),
                    self.tree
                        .root()
                        .map_or_else(|| "none".to_string(), |e| e.to_string())
                );
                Reply::Inserted(value)
            }
            Command::Preorder => Reply::Preorder(self.tree.preorder()),
            Command::Inorder => Reply::Inorder(self.tree.inorder()),
            Command::LeafSum => Reply::LeafSum(self.tree.sum_of_leaves()),
            Command::Average => Reply::Average(self.tree.average()),
            Command::Exit => {
                debug!("releasing {} nodes", self.tree.len());
                self.tree.reset();
                self.finished = true;
                Reply::Exit
            }
        }
    }
}
