//! Routes user interface events to the [`Controller`]
//!
//! Meeting cards expose their actions as `(action, id)` pairs (`data-action` and `data-id`
//! attributes in the markup). These pairs resolve through a table that is built once, when the
//! [`Dispatcher`] is created.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::TimeZone;

use crate::controller::Controller;
use crate::error::{Error, ValidationFailure};
use crate::meeting::{MeetingForm, MeetingId};
use crate::traits::Confirm;

/// An action that targets a single meeting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    OpenEdit,
    Delete,
}

impl Action {
    /// The name used in `data-action` attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::OpenEdit => "open-edit",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open-edit" => Ok(Action::OpenEdit),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action {:?}", other)),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            _ => Key::Other(name.trim().to_string()),
        }
    }
}

/// Something the user did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// The create form was submitted
    SubmitCreate(MeetingForm),
    /// The edit form was submitted
    SubmitEdit(MeetingForm),
    /// An action button of a meeting card was clicked
    Action { action: Action, id: MeetingId },
    /// The close button of the edit overlay was clicked
    CloseOverlay,
    /// A click landed on the edit overlay, either inside the edit form or on the backdrop around it
    OverlayClick { inside: bool },
    KeyPress(Key),
    /// The refresh timer fired
    Tick,
}

/// What came out of an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The dashboard state changed
    Done,
    /// Nothing had to be done
    Ignored,
    /// A form was invalid. It stays on screen for the user to fix.
    Rejected(ValidationFailure),
}

type ActionHandler<Tz> = fn(&mut Controller<Tz>, MeetingId, &mut dyn Confirm) -> Outcome;


/// Maps user interface events to the controller methods that handle them
pub struct Dispatcher<Tz: TimeZone> {
    actions: HashMap<Action, ActionHandler<Tz>>,
}

impl<Tz: TimeZone> Dispatcher<Tz> {
    pub fn new() -> Self {
        let mut actions: HashMap<Action, ActionHandler<Tz>> = HashMap::new();
        actions.insert(Action::OpenEdit, open_edit::<Tz>);
        actions.insert(Action::Delete, delete::<Tz>);
        Self { actions }
    }

    /// Apply `event` to `controller`. `confirm` is asked before anything destructive happens.
    pub fn dispatch(&self, controller: &mut Controller<Tz>, event: UiEvent, confirm: &mut dyn Confirm) -> Outcome {
        match event {
            UiEvent::SubmitCreate(form) => outcome_of(controller.create(form).map(|_| ())),
            UiEvent::SubmitEdit(_) if controller.is_editing() == false => Outcome::Ignored,
            UiEvent::SubmitEdit(form) => outcome_of(controller.update(form)),
            UiEvent::Action { action, id } => match self.actions.get(&action) {
                Some(handler) => handler(controller, id, confirm),
                None => {
                    log::warn!("No handler registered for action {}", action);
                    Outcome::Ignored
                },
            },
            UiEvent::CloseOverlay => close_overlay(controller),
            UiEvent::OverlayClick { inside: false } => close_overlay(controller),
            UiEvent::OverlayClick { inside: true } => Outcome::Ignored,
            UiEvent::KeyPress(Key::Escape) => close_overlay(controller),
            UiEvent::KeyPress(Key::Other(_)) => Outcome::Ignored,
            UiEvent::Tick => {
                controller.refresh();
                Outcome::Done
            },
        }
    }

    /// Apply an action as found in the markup, e.g. `("delete", "1714557600000")`
    pub fn dispatch_markup(&self, controller: &mut Controller<Tz>, action: &str, id: &str, confirm: &mut dyn Confirm) -> Outcome {
        let action: Action = match action.parse() {
            Ok(action) => action,
            Err(err) => {
                log::warn!("Ignoring markup event: {}", err);
                return Outcome::Ignored;
            },
        };
        let id: MeetingId = match id.parse() {
            Ok(id) => id,
            Err(err) => {
                log::warn!("Ignoring markup event {}: invalid id {:?} ({})", action, id, err);
                return Outcome::Ignored;
            },
        };
        self.dispatch(controller, UiEvent::Action { action, id }, confirm)
    }
}

impl<Tz: TimeZone> Default for Dispatcher<Tz> {
    fn default() -> Self {
        Self::new()
    }
}

fn open_edit<Tz: TimeZone>(controller: &mut Controller<Tz>, id: MeetingId, _confirm: &mut dyn Confirm) -> Outcome {
    outcome_of(controller.begin_edit(id))
}

fn delete<Tz: TimeZone>(controller: &mut Controller<Tz>, id: MeetingId, confirm: &mut dyn Confirm) -> Outcome {
    match controller.delete(id, confirm) {
        true => Outcome::Done,
        false => Outcome::Ignored,
    }
}

/// Escape and clicks outside the overlay only matter while it is open
fn close_overlay<Tz: TimeZone>(controller: &mut Controller<Tz>) -> Outcome {
    if controller.is_editing() == false {
        return Outcome::Ignored;
    }
    controller.cancel_edit();
    Outcome::Done
}

fn outcome_of(result: Result<(), Error>) -> Outcome {
    match result {
        Ok(()) => Outcome::Done,
        Err(Error::ValidationFailure(failure)) => Outcome::Rejected(failure),
        Err(Error::NotFound(_)) => Outcome::Ignored,
        Err(err) => {
            log::error!("{}", err);
            Outcome::Ignored
        },
    }
}
