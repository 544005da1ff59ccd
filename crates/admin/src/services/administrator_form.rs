//! Administrator creation form.

use backoffice_core::Email;
use tracing::{error, info, instrument, warn};

use crate::models::Notice;
use crate::store::{NewAdministrator, StoreApi};

/// Result of [`AdministratorForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CreateOutcome {
    Created,
    /// The input did not validate; nothing was sent.
    Invalid,
    Failed,
}

/// State of the "new administrator" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdministratorForm {
    pub name: String,
    pub email: String,
    notice: Option<Notice>,
}

impl AdministratorForm {
    #[must_use]
    pub fn new(name: String, email: String) -> Self {
        Self {
            name,
            email,
            notice: None,
        }
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validate and create the administrator.
    ///
    /// Invalid input and failed requests leave both fields as typed and set
    /// an error notice; success sets the success notice.
    #[instrument(skip(self, api), fields(email = %self.email))]
    pub async fn submit<A: StoreApi>(&mut self, api: &A) -> CreateOutcome {
        let name = self.name.trim();
        if name.is_empty() {
            self.notice = Some(Notice::error("El nombre es obligatorio."));
            return CreateOutcome::Invalid;
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => email,
            Err(e) => {
                warn!(error = %e, "Rejected administrator email");
                self.notice = Some(Notice::error(format!("Correo inválido: {e}")));
                return CreateOutcome::Invalid;
            }
        };

        let admin = NewAdministrator {
            name: name.to_string(),
            email,
        };

        match api.create_administrator(&admin).await {
            Ok(()) => {
                info!("Administrator created");
                self.notice = Some(Notice::administrator_created());
                CreateOutcome::Created
            }
            Err(e) => {
                error!(error = %e, "Failed to create administrator");
                self.notice = Some(Notice::administrator_create_failed());
                CreateOutcome::Failed
            }
        }
    }
}
