//! Search, select or register the client a pawn application belongs to.

use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::forms::FieldErrors;
use crate::forms::client::ClientForm;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::wizard::errors::{WizardError, WizardResult};

/// Client picker state: a snapshot of the client registry, the current
/// search query and the selection.
#[derive(Debug, Default)]
pub struct ClientPicker {
    clients: Vec<Client>,
    query: String,
    open: bool,
    selected: Option<Client>,
}

impl ClientPicker {
    /// Loads the registry snapshot the picker filters over.
    pub fn load<R: ClientReader + ?Sized>(repo: &R) -> RepositoryResult<Self> {
        let (_total, clients) = repo.list_clients(ClientListQuery::new())?;
        Ok(Self {
            clients,
            ..Self::default()
        })
    }

    /// Replaces the snapshot, keeping the selection and query.
    pub fn refresh<R: ClientReader + ?Sized>(&mut self, repo: &R) -> RepositoryResult<()> {
        let (_total, clients) = repo.list_clients(ClientListQuery::new())?;
        self.clients = clients;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Snapshot entries matching the current query, in snapshot order.
    pub fn filtered(&self) -> Vec<&Client> {
        self.clients
            .iter()
            .filter(|client| client.matches(&self.query))
            .collect()
    }

    /// Creating a client is offered only when nothing matches.
    pub fn offers_creation(&self) -> bool {
        self.filtered().is_empty()
    }

    pub fn selected(&self) -> Option<&Client> {
        self.selected.as_ref()
    }

    /// Selects a client from the snapshot and closes the picker.
    pub fn select(&mut self, client_id: ClientId) -> Result<&Client, FieldErrors> {
        let client = self
            .clients
            .iter()
            .find(|client| client.id == client_id)
            .cloned()
            .ok_or_else(|| FieldErrors::single("client", "Select a client from the list"))?;
        self.open = false;
        Ok(self.selected.insert(client))
    }

    /// Registers a new client, appends it to the snapshot and selects it.
    pub fn create_client<R: ClientWriter + ?Sized>(
        &mut self,
        repo: &R,
        form: &ClientForm,
    ) -> WizardResult<&Client> {
        let new_client = form.to_new_client().map_err(FieldErrors::from)?;
        let client = repo.create_client(&new_client).map_err(|e| {
            log::error!("Failed to create client from the pawn wizard: {e}");
            WizardError::External(e)
        })?;

        self.clients.push(client.clone());
        self.query.clear();
        self.open = false;
        Ok(self.selected.insert(client))
    }

    /// Clears the selection. The registry is left untouched.
    pub fn remove_selected_client(&mut self) -> Option<Client> {
        self.selected.take()
    }
}
