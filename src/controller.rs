//! The state of the dashboard, and the operations that change it
//!
//! Every change is followed by a save of the whole list and a redraw of the dashboard.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::meeting::{Meeting, MeetingForm, MeetingId};
use crate::render::Renderer;
use crate::storage::MeetingStore;
use crate::traits::{Clock, Confirm, RenderTarget};

/// Asked before a meeting is deleted
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this meeting?";


/// The meeting being edited, and the current values of the edit form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSurface {
    pub id: MeetingId,
    pub form: MeetingForm,
}

/// Everything the dashboard displays
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    meetings: Vec<Meeting>,
    create_form: MeetingForm,
    /// At most one meeting is edited at a time
    edit_surface: Option<EditSurface>,
}

impl AppState {
    pub fn new(meetings: Vec<Meeting>) -> Self {
        Self { meetings, ..Self::default() }
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn meeting(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id() == id)
    }

    pub fn create_form(&self) -> &MeetingForm {
        &self.create_form
    }

    pub fn edit_surface(&self) -> Option<&EditSurface> {
        self.edit_surface.as_ref()
    }

    /// The id of the meeting being edited, if any
    pub fn editing_id(&self) -> Option<MeetingId> {
        self.edit_surface.as_ref().map(|surface| surface.id)
    }
}



/// Owns the dashboard state, and applies user actions to it
pub struct Controller<Tz: TimeZone> {
    state: AppState,
    store: MeetingStore,
    renderer: Renderer<Tz>,
    clock: Box<dyn Clock>,
    target: Box<dyn RenderTarget>,
}

impl<Tz: TimeZone> Controller<Tz> {
    /// Load the stored meetings and draw the dashboard a first time
    pub fn new(mut store: MeetingStore, renderer: Renderer<Tz>, clock: Box<dyn Clock>, target: Box<dyn RenderTarget>) -> Self {
        let meetings = store.load();
        log::info!("Starting with {} meeting(s)", meetings.len());

        let mut controller = Self {
            state: AppState::new(meetings),
            store,
            renderer,
            clock,
            target,
        };
        controller.redraw();
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &MeetingStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer<Tz> {
        &self.renderer
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Render the dashboard at the current time, and hand it to the render target
    pub fn redraw(&mut self) {
        let now = self.clock.now();
        match self.renderer.render_dashboard(&self.state, now) {
            Ok(page) => self.target.draw(&page),
            Err(err) => log::error!("Unable to draw the dashboard: {}", err),
        }
    }

    /// Redraw so that statuses follow the clock. Nothing else changes.
    pub fn refresh(&mut self) {
        log::trace!("Refreshing the dashboard");
        self.redraw();
    }

    fn persist_and_redraw(&mut self) {
        self.store.save(&self.state.meetings);
        self.redraw();
    }


    /// Mirror what the user typed in the create form
    pub fn set_create_form(&mut self, form: MeetingForm) {
        self.state.create_form = form;
    }

    /// Mirror what the user typed in the edit form. Does nothing when no meeting is being edited.
    pub fn set_edit_form(&mut self, form: MeetingForm) {
        if let Some(surface) = self.state.edit_surface.as_mut() {
            surface.form = form;
        }
    }

    /// Add a meeting from the create form.
    ///
    /// An invalid form is kept as is, so that the user can fix it.
    pub fn create(&mut self, form: MeetingForm) -> Result<MeetingId> {
        if let Err(failure) = form.validate(self.renderer.time_zone()) {
            log::debug!("Rejecting new meeting: {}", failure);
            self.state.create_form = form;
            self.redraw();
            return Err(failure.into());
        }

        let id = MeetingId::next(self.clock.now(), self.state.meetings.iter().map(|m| m.id()));
        log::debug!("Adding meeting {} ({:?})", id, form.name);
        self.state.meetings.push(Meeting::from_form(id, form));
        self.state.create_form.reset();
        self.persist_and_redraw();
        Ok(id)
    }

    /// Overwrite the meeting being edited with the edit form values, then close the edit surface
    pub fn update(&mut self, form: MeetingForm) -> Result<()> {
        let id = match self.state.editing_id() {
            Some(id) => id,
            None => {
                log::debug!("No meeting is being edited, ignoring an update");
                return Ok(());
            },
        };
        self.update_meeting(id, form)
    }

    /// Overwrite the name, time and link of meeting `id`
    pub fn update_meeting(&mut self, id: MeetingId, form: MeetingForm) -> Result<()> {
        if let Err(failure) = form.validate(self.renderer.time_zone()) {
            log::debug!("Rejecting changes to meeting {}: {}", id, failure);
            self.set_edit_form(form);
            self.redraw();
            return Err(failure.into());
        }

        let meeting = match self.state.meetings.iter_mut().find(|m| m.id() == id) {
            Some(meeting) => meeting,
            None => {
                log::debug!("Meeting {} does not exist anymore, ignoring its changes", id);
                return Err(Error::NotFound(id));
            },
        };
        meeting.overwrite(form);

        if self.state.editing_id() == Some(id) {
            self.state.edit_surface = None;
        }
        self.persist_and_redraw();
        Ok(())
    }

    /// Delete meeting `id`, once the user has confirmed it.
    ///
    /// Returns whether a meeting has been deleted.
    pub fn delete(&mut self, id: MeetingId, confirm: &mut dyn Confirm) -> bool {
        if confirm.confirm(DELETE_CONFIRMATION) == false {
            log::debug!("Deletion of meeting {} cancelled", id);
            return false;
        }

        let count_before = self.state.meetings.len();
        self.state.meetings.retain(|m| m.id() != id);
        let deleted = self.state.meetings.len() != count_before;
        if deleted == false {
            log::debug!("Meeting {} does not exist, nothing to delete", id);
        }

        self.persist_and_redraw();
        deleted
    }

    /// Open the edit surface for meeting `id`, pre-filled with its current values.
    ///
    /// This replaces any edit surface that was open.
    pub fn begin_edit(&mut self, id: MeetingId) -> Result<()> {
        let form = match self.state.meeting(id) {
            Some(meeting) => meeting.to_form(),
            None => {
                log::debug!("Cannot edit meeting {}: it does not exist", id);
                return Err(Error::NotFound(id));
            },
        };
        self.state.edit_surface = Some(EditSurface { id, form });
        self.redraw();
        Ok(())
    }

    /// Close the edit surface, discarding the edit form
    pub fn cancel_edit(&mut self) {
        if self.state.edit_surface.take().is_some() {
            self.redraw();
        }
    }

    /// Whether the edit surface is open
    pub fn is_editing(&self) -> bool {
        self.state.edit_surface.is_some()
    }
}
