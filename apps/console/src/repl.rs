//! Line-oriented front end. One command per line, parsed with clap, each
//! dispatched to the [`AdminConsole`] and followed by a redraw of the view it
//! changed. Errors become alerts; only I/O failures end the loop.

use std::io::{self, BufRead, Write};

use admin_core::{AdminConsole, DraftField, RemoveOutcome, SubmitError};
use clap::{CommandFactory, Parser, Subcommand};
use shared::domain::ProductId;
use tracing::debug;

use crate::render;

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(
    name = "catalog",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Sign in; the password is asked for on the next line
    Login { username: String },
    /// Sign out and forget the stored token
    Logout,
    /// Reload and show the current page
    #[command(alias = "ls")]
    List,
    /// Jump to a page number shown in the pager
    Page { number: u32 },
    /// Step to the next page
    Next,
    /// Step to the previous page
    #[command(alias = "previous")]
    Prev,
    /// Open a blank product form
    New,
    /// Open the form on a listed product
    Edit { id: String },
    /// Set a form field, e.g. `set price 250`
    Set {
        field: String,
        #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
        value: Vec<String>,
    },
    /// Manage extra image slots
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Show the open form
    Show,
    /// Validate and send the open form
    Submit,
    /// Close the form without saving
    Cancel,
    /// Delete a product after confirmation
    #[command(alias = "rm")]
    Delete { id: String },
    /// List commands
    Help,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ImageAction {
    /// Append an empty slot
    Add,
    /// Drop the last slot
    Remove,
    /// Fill slot INDEX with URL
    Set { index: usize, url: String },
}

/// `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    Line::try_parse_from(words).map(|line| Some(line.command))
}

pub struct Repl<R, W> {
    console: AdminConsole,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(console: AdminConsole, input: R, output: W) -> Self {
        Self {
            console,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        if self.console.session().is_authenticated() {
            self.show_listing()?;
        } else {
            writeln!(self.output, "not signed in; use `login <username>`")?;
        }

        loop {
            write!(self.output, "catalog> ")?;
            self.output.flush()?;
            let Some(line) = read_line(&mut self.input)? else {
                break;
            };
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.dispatch(command).await?,
                Err(err) => write!(self.output, "{}", err.render())?,
            }
        }
        Ok(())
    }

    pub async fn dispatch(&mut self, command: Command) -> io::Result<()> {
        debug!(?command, "console: dispatch");
        match command {
            Command::Login { username } => {
                write!(self.output, "password: ")?;
                self.output.flush()?;
                let password = read_line(&mut self.input)?.unwrap_or_default();
                match self.console.login(&username, password.trim()).await {
                    Ok(_) => {
                        writeln!(self.output, "signed in as {username}")?;
                        self.show_listing()?;
                    }
                    Err(err) => render::alert(&mut self.output, err)?,
                }
            }
            Command::Logout => {
                self.console.logout().await;
                writeln!(self.output, "signed out")?;
            }
            Command::List => {
                if let Err(err) = self.console.refresh().await {
                    render::alert(&mut self.output, err)?;
                }
                self.show_listing()?;
            }
            Command::Page { number } => {
                let result = self.console.go_to_page(number).await;
                self.after_fetch(result)?;
            }
            Command::Next => {
                let result = self.console.next_page().await;
                self.after_fetch(result)?;
            }
            Command::Prev => {
                let result = self.console.previous_page().await;
                self.after_fetch(result)?;
            }
            Command::New => {
                self.console.catalog_mut().open_create();
                self.show_form()?;
            }
            Command::Edit { id } => {
                if self
                    .console
                    .catalog_mut()
                    .open_edit(&ProductId::new(id.clone()))
                    .is_some()
                {
                    self.show_form()?;
                } else {
                    render::alert(&mut self.output, format!("no product '{id}' on this page"))?;
                }
            }
            Command::Set { field, value } => {
                let field = match field.parse::<DraftField>() {
                    Ok(field) => field,
                    Err(err) => return render::alert(&mut self.output, err),
                };
                match self.console.catalog_mut().draft_mut() {
                    Some(draft) => draft.set_field(field, value.join(" ")),
                    None => return render::alert(&mut self.output, SubmitError::FormClosed),
                }
            }
            Command::Image { action } => {
                let Some(draft) = self.console.catalog_mut().draft_mut() else {
                    return render::alert(&mut self.output, SubmitError::FormClosed);
                };
                match action {
                    ImageAction::Add => draft.add_image_slot(),
                    ImageAction::Remove => draft.remove_last_image_slot(),
                    ImageAction::Set { index, url } => {
                        if !draft.set_image_at(index, url) {
                            return render::alert(
                                &mut self.output,
                                format!("no image slot {index}; use `image add` first"),
                            );
                        }
                    }
                }
                self.show_form()?;
            }
            Command::Show => self.show_form()?,
            Command::Submit => match self.console.submit().await {
                Ok(receipt) => {
                    writeln!(self.output, "{}", receipt.message)?;
                    self.show_listing()?;
                }
                Err(err) => render::alert(&mut self.output, err)?,
            },
            Command::Cancel => {
                self.console.catalog_mut().close_form();
                writeln!(self.output, "form closed")?;
            }
            Command::Delete { id } => {
                let id = ProductId::new(id);
                let (input, output) = (&mut self.input, &mut self.output);
                let mut confirm = |prompt: &str| ask_yes_no(&mut *input, &mut *output, prompt);
                match self.console.remove(&id, &mut confirm).await {
                    Ok(RemoveOutcome::Cancelled) => writeln!(self.output, "kept {id}")?,
                    Ok(RemoveOutcome::Removed(receipt)) => {
                        writeln!(self.output, "{}", receipt.message)?;
                        self.show_listing()?;
                    }
                    Err(err) => render::alert(&mut self.output, err)?,
                }
            }
            Command::Help => {
                write!(self.output, "{}", Line::command().render_help())?;
            }
            Command::Quit => {}
        }
        Ok(())
    }

    fn after_fetch<E: std::fmt::Display>(
        &mut self,
        result: Result<admin_core::FetchOutcome, E>,
    ) -> io::Result<()> {
        match result {
            Ok(_) => self.show_listing(),
            Err(err) => render::alert(&mut self.output, err),
        }
    }

    fn show_listing(&mut self) -> io::Result<()> {
        let catalog = self.console.catalog();
        render::product_table(&mut self.output, catalog.products())?;
        render::pager_line(&mut self.output, &catalog.pager())
    }

    fn show_form(&mut self) -> io::Result<()> {
        match self.console.catalog().form() {
            Some(form) => render::product_form(&mut self.output, form),
            None => render::alert(&mut self.output, SubmitError::FormClosed),
        }
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

// Anything but an explicit yes declines, including EOF and I/O errors.
fn ask_yes_no(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> bool {
    if write!(output, "{prompt} [y/N] ")
        .and_then(|()| output.flush())
        .is_err()
    {
        return false;
    }
    matches!(
        read_line(input).ok().flatten().as_deref().map(str::trim),
        Some("y" | "Y" | "yes")
    )
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
