use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::fold_case;
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, DieselRepository};
use crate::schema::clients;

/// `LIKE` pattern matching `term` literally anywhere in a case-folded value.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Clients matching the optional search term, newest last.
///
/// Same rule as [`Client::matches`]: a case-insensitive substring of the first
/// name, last name, email or phone.
fn filtered(search: Option<&str>) -> clients::BoxedQuery<'static, Sqlite> {
    let mut query = clients::table.into_boxed();

    if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
        let pattern = contains_pattern(term);
        query = query.filter(
            fold_case(clients::first_name)
                .like(pattern.clone())
                .escape('\\')
                .or(fold_case(clients::last_name)
                    .like(pattern.clone())
                    .escape('\\'))
                .or(fold_case(clients::email).like(pattern.clone()).escape('\\'))
                .or(fold_case(clients::phone).like(pattern).escape('\\')),
        );
    }

    query
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client.map(Client::try_from).transpose().map_err(Into::into)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let total = filtered(query.search.as_deref())
            .count()
            .get_result::<i64>(&mut conn)?;

        let mut items = filtered(query.search.as_deref()).order(clients::id.asc());

        if let Some(pagination) = &query.pagination {
            let Some(offset) = pagination.offset() else {
                return Ok((total as usize, Vec::new()));
            };
            items = items.offset(offset).limit(pagination.limit());
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(clients::table)
            .values(DbNewClient::from(new_client))
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(created)?)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let changes = DbUpdateClient::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(clients::table.find(client_id.get()))
            .set(&changes)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }
}
