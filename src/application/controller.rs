use chrono::NaiveDate;

use crate::domain::{EntryForm, TransactionId};
use crate::storage::StorageBackend;

use super::{AppError, LedgerPage, LedgerService};

pub const CONFIRM_DELETE: &str = "Delete this transaction?";
pub const CONFIRM_RESET: &str = "Clear all saved transactions? This cannot be undone.";

/// Rendering surface the controller draws on.
pub trait LedgerView {
    /// Draw the full ledger.
    fn render(&mut self, page: &LedgerPage);

    /// Show a message the user can act on (e.g. a rejected amount).
    fn report(&mut self, message: &str);

    /// Clear amount and description and move the date back to `today`.
    fn reset_form(&mut self, today: NaiveDate);
}

/// Yes/no decision gating destructive actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What happened to a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran and the ledger was re-rendered
    Applied,
    /// Input was invalid; the user was told why and nothing changed
    Rejected,
    /// The user declined the confirmation prompt; nothing changed
    Declined,
}

/// Event handlers binding a ledger service to a view and a confirmation prompt.
/// Each handler runs to completion: mutate, persist, re-render.
pub struct LedgerController<B, V, C>
where
    B: StorageBackend,
    V: LedgerView,
    C: Confirm,
{
    service: LedgerService<B>,
    view: V,
    confirm: C,
}

impl<B, V, C> LedgerController<B, V, C>
where
    B: StorageBackend,
    V: LedgerView,
    C: Confirm,
{
    pub fn new(service: LedgerService<B>, view: V, confirm: C) -> Self {
        Self {
            service,
            view,
            confirm,
        }
    }

    pub fn render(&mut self) {
        let page = self.service.page();
        self.view.render(&page);
    }

    pub fn on_submit(&mut self, form: &EntryForm) -> Result<Outcome, AppError> {
        match self.service.add_entry(form) {
            Ok(_) => {
                self.render();
                let today = self.service.clock().today();
                self.view.reset_form(today);
                Ok(Outcome::Applied)
            }
            Err(err) if err.is_user_error() => {
                tracing::debug!(error = %err, "entry rejected");
                self.view.report(&err.to_string());
                Ok(Outcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }

    pub fn on_delete(&mut self, id: &TransactionId) -> Result<Outcome, AppError> {
        if !self.confirm.confirm(CONFIRM_DELETE) {
            return Ok(Outcome::Declined);
        }
        self.service.delete_transaction(id)?;
        self.render();
        Ok(Outcome::Applied)
    }

    pub fn on_reset(&mut self) -> Result<Outcome, AppError> {
        if !self.confirm.confirm(CONFIRM_RESET) {
            return Ok(Outcome::Declined);
        }
        self.service.reset()?;
        self.render();
        Ok(Outcome::Applied)
    }

    pub fn service(&self) -> &LedgerService<B> {
        &self.service
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
