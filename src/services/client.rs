//! Client registry workflows.

use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::forms::client::ClientForm;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{DEFAULT_ITEMS_PER_PAGE, ServiceError, ServiceResult};

/// Query parameters accepted by the client list.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional free-form search over names, email and phone.
    pub search: Option<String>,
    /// Optional page number for pagination.
    pub page: Option<usize>,
}

#[derive(Debug)]
pub struct ClientsResponse {
    /// Total number of clients matching the filter.
    pub total: usize,
    pub page: usize,
    pub clients: Vec<Client>,
}

/// Lists clients, optionally filtered and paginated.
pub fn list_clients<R>(repo: &R, params: ClientsQuery) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    let page = params.page.unwrap_or(1).max(1);
    let mut query = ClientListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        query = query.search(term);
    }

    let (total, clients) = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        ServiceError::from(err)
    })?;

    Ok(ClientsResponse {
        total,
        page,
        clients,
    })
}

pub fn get_client<R>(repo: &R, client_id: i32) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let client_id = ClientId::new(client_id)?;
    repo.get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form and registers a new client.
pub fn create_client<R>(repo: &R, form: &ClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let new_client = form.to_new_client()?;

    let client = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Client {} created", client.id);
    Ok(client)
}

/// Validates the form and overwrites the client's contact details.
pub fn update_client<R>(repo: &R, client_id: i32, form: &ClientForm) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client_id = ClientId::new(client_id)?;
    let updates = form.to_update_client()?;

    if repo.get_client_by_id(client_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    repo.update_client(client_id, &updates).map_err(|err| {
        log::error!("Failed to update client {client_id}: {err}");
        ServiceError::from(err)
    })
}
