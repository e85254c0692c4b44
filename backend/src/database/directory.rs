//! Read access to tenant, member and contract records.
//!
//! These tables are maintained by the membership side of the application.
//! The engine only reads them, for tenant checks and preview sample data.

use super::{Database, DbError};
use common::model::context::{ContractRecord, MemberRecord, TenantRecord};
use rusqlite::{params, OptionalExtension, Row};

const TENANT_COLUMNS: &str =
    "id, name, legal_name, street, postal_code, city, email, phone, website, creditor_id";

const MEMBER_COLUMNS: &str = "id, member_number, first_name, last_name, email, phone, \
     birth_date, street, postal_code, city, last_active_at";

const CONTRACT_COLUMNS: &str = "id, member_id, contract_number, tariff_name, \
     monthly_fee_cents, start_date, end_date, minimum_term_months, notice_period_months, \
     iban, mandate_reference";

fn tenant_from_row(row: &Row<'_>) -> rusqlite::Result<TenantRecord> {
    Ok(TenantRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        legal_name: row.get(2)?,
        street: row.get(3)?,
        postal_code: row.get(4)?,
        city: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        website: row.get(8)?,
        creditor_id: row.get(9)?,
    })
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<MemberRecord> {
    Ok(MemberRecord {
        id: row.get(0)?,
        member_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        birth_date: row.get(6)?,
        street: row.get(7)?,
        postal_code: row.get(8)?,
        city: row.get(9)?,
        last_active_at: row.get(10)?,
    })
}

fn contract_from_row(row: &Row<'_>) -> rusqlite::Result<ContractRecord> {
    Ok(ContractRecord {
        id: row.get(0)?,
        member_id: row.get(1)?,
        contract_number: row.get(2)?,
        tariff_name: row.get(3)?,
        monthly_fee_cents: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        minimum_term_months: row.get(7)?,
        notice_period_months: row.get(8)?,
        iban: row.get(9)?,
        mandate_reference: row.get(10)?,
    })
}

impl Database {
    pub fn tenant_exists(&self, tenant_id: &str) -> Result<bool, DbError> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM tenants WHERE id = ?1",
                params![tenant_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn get_tenant(&self, tenant_id: &str) -> Result<Option<TenantRecord>, DbError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM tenants WHERE id = ?1", TENANT_COLUMNS);
        Ok(conn
            .query_row(&sql, params![tenant_id], tenant_from_row)
            .optional()?)
    }

    /// The member of a tenant with the most recent activity.
    pub fn most_recently_active_member(
        &self,
        tenant_id: &str,
    ) -> Result<Option<MemberRecord>, DbError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM members WHERE tenant_id = ?1
             ORDER BY last_active_at IS NULL, last_active_at DESC, id
             LIMIT 1",
            MEMBER_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![tenant_id], member_from_row)
            .optional()?)
    }

    /// The latest-starting contract of a member within a tenant.
    pub fn latest_contract(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> Result<Option<ContractRecord>, DbError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM contracts WHERE tenant_id = ?1 AND member_id = ?2
             ORDER BY start_date IS NULL, start_date DESC, id
             LIMIT 1",
            CONTRACT_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![tenant_id, member_id], contract_from_row)
            .optional()?)
    }
}

#[cfg(test)]
impl Database {
    pub fn insert_tenant(&self, tenant: &TenantRecord) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tenants (id, name, legal_name, street, postal_code, city, email, phone, website, creditor_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                tenant.id,
                tenant.name,
                tenant.legal_name,
                tenant.street,
                tenant.postal_code,
                tenant.city,
                tenant.email,
                tenant.phone,
                tenant.website,
                tenant.creditor_id
            ],
        )?;
        Ok(())
    }

    pub fn insert_member(&self, tenant_id: &str, member: &MemberRecord) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO members (id, tenant_id, member_number, first_name, last_name, email, phone, birth_date, street, postal_code, city, last_active_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                member.id,
                tenant_id,
                member.member_number,
                member.first_name,
                member.last_name,
                member.email,
                member.phone,
                member.birth_date,
                member.street,
                member.postal_code,
                member.city,
                member.last_active_at
            ],
        )?;
        Ok(())
    }

    pub fn insert_contract(&self, tenant_id: &str, contract: &ContractRecord) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO contracts (id, tenant_id, member_id, contract_number, tariff_name, monthly_fee_cents, start_date, end_date, minimum_term_months, notice_period_months, iban, mandate_reference)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                contract.id,
                tenant_id,
                contract.member_id,
                contract.contract_number,
                contract.tariff_name,
                contract.monthly_fee_cents,
                contract.start_date,
                contract.end_date,
                contract.minimum_term_months,
                contract.notice_period_months,
                contract.iban,
                contract.mandate_reference
            ],
        )?;
        Ok(())
    }
}
