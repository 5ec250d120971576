use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::loan::{Loan, LoanStatus, NewLoan, UpdateLoan};
use crate::domain::types::LoanId;
use crate::models::loan::{
    Loan as DbLoan, LoanImage as DbLoanImage, NewLoan as DbNewLoan,
    NewLoanImage as DbNewLoanImage, UpdateLoan as DbUpdateLoan,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LoanListQuery, LoanReader, LoanWriter};
use crate::schema::{loan_images, loans};

/// Attaches stored images to each loan, preserving the loan order.
fn with_images(conn: &mut SqliteConnection, db_loans: Vec<DbLoan>) -> RepositoryResult<Vec<Loan>> {
    let images = DbLoanImage::belonging_to(&db_loans)
        .order(loan_images::position.asc())
        .load::<DbLoanImage>(conn)?
        .grouped_by(&db_loans);

    db_loans
        .into_iter()
        .zip(images)
        .map(|(loan, images)| loan.into_domain(images).map_err(Into::into))
        .collect()
}

fn load_loan(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Option<Loan>> {
    let Some(db_loan) = loans::table.find(id).first::<DbLoan>(conn).optional()? else {
        return Ok(None);
    };
    Ok(with_images(conn, vec![db_loan])?.pop())
}

impl LoanReader for DieselRepository {
    fn get_loan_by_id(&self, id: LoanId) -> RepositoryResult<Option<Loan>> {
        let mut conn = self.conn()?;
        load_loan(&mut conn, id.get())
    }

    fn list_loans(&self, query: LoanListQuery) -> RepositoryResult<(usize, Vec<Loan>)> {
        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = loans::table.into_boxed::<Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(loans::status.eq(status.as_str()));
            }
            if let Some(loan_type) = query.loan_type {
                items = items.filter(loans::loan_type.eq(loan_type.as_str()));
            }
            if let Some(client_id) = query.client_id {
                items = items.filter(loans::client_id.eq(client_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(loans::id.desc());
        if let Some(pagination) = &query.pagination {
            let Some(offset) = pagination.offset() else {
                return Ok((total, Vec::new()));
            };
            items = items.offset(offset).limit(pagination.limit());
        }

        let db_loans = items.load::<DbLoan>(&mut conn)?;
        Ok((total, with_images(&mut conn, db_loans)?))
    }
}

impl LoanWriter for DieselRepository {
    fn create_loan(&self, new_loan: &NewLoan) -> RepositoryResult<Loan> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let insertable = DbNewLoan::try_from(new_loan)?;
            let created = diesel::insert_into(loans::table)
                .values(&insertable)
                .get_result::<DbLoan>(conn)?;

            let images = new_loan
                .images
                .iter()
                .enumerate()
                .map(|(position, image)| DbNewLoanImage {
                    loan_id: created.id,
                    position: position as i32,
                    file_name: &image.file_name,
                    content_type: &image.content_type,
                    data: &image.data,
                })
                .collect::<Vec<_>>();

            if !images.is_empty() {
                diesel::insert_into(loan_images::table)
                    .values(&images)
                    .execute(conn)?;
            }

            load_loan(conn, created.id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_loan(&self, loan_id: LoanId, updates: &UpdateLoan) -> RepositoryResult<Loan> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let changes = DbUpdateLoan::new(updates, Utc::now().naive_utc());
            let updated = diesel::update(
                loans::table
                    .find(loan_id.get())
                    .filter(loans::status.eq(LoanStatus::Pending.as_str())),
            )
            .set(&changes)
            .execute(conn)?;
            if updated == 0 {
                let exists = diesel::select(diesel::dsl::exists(loans::table.find(loan_id.get())))
                    .get_result::<bool>(conn)?;
                return Err(if exists {
                    RepositoryError::ConstraintViolation(format!(
                        "only pending loans can be edited, loan {loan_id} is not pending"
                    ))
                } else {
                    RepositoryError::NotFound
                });
            }
            load_loan(conn, loan_id.get())?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_loan_status(&self, loan_id: LoanId, status: LoanStatus) -> RepositoryResult<Loan> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let current = loans::table
                .find(loan_id.get())
                .select(loans::status)
                .first::<String>(conn)?
                .parse::<LoanStatus>()?;

            if !current.can_transition_to(status) {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "loan cannot move from {current} to {status}"
                )));
            }

            diesel::update(loans::table.find(loan_id.get()))
                .set((
                    loans::status.eq(status.as_str()),
                    loans::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            load_loan(conn, loan_id.get())?.ok_or(RepositoryError::NotFound)
        })
    }
}
