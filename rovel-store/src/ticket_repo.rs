use chrono::{DateTime, Utc};
use rovel_domain::ticket::{NewTicket, ReservationStat, Ticket, TransportMode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    agency: String,
    mode: String,
    name: String,
    email: String,
    date: String,
    departure_time: String,
    total_amount: f64,
    class: String,
    from_location: String,
    to_location: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TicketRow {
    fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.id,
            agency: self.agency,
            // mode is CHECK-constrained in the schema
            mode: self.mode.parse().unwrap_or(TransportMode::BUS),
            name: self.name,
            email: self.email,
            date: self.date,
            departure_time: self.departure_time,
            total_amount: self.total_amount,
            class: self.class,
            from_location: self.from_location,
            to_location: self.to_location,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatRow {
    agent_name: String,
    client_name: String,
    agency: String,
}

const TICKET_SELECT: &str = "SELECT id, agency, mode, name, email, date, departure_time, \
     total_amount, class, from_location, to_location, user_id, created_at FROM tickets";

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single-row insert; the database assigns the identifier.
    pub async fn insert(&self, ticket: &NewTicket, owner: Uuid) -> Result<Ticket, StoreError> {
        let row = sqlx::query_as::<_, TicketRow>(
            "INSERT INTO tickets (agency, mode, name, email, date, departure_time,
                                  total_amount, class, from_location, to_location, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id, agency, mode, name, email, date, departure_time,
                       total_amount, class, from_location, to_location, user_id, created_at",
        )
        .bind(&ticket.agency)
        .bind(ticket.mode.as_str())
        .bind(&ticket.name)
        .bind(&ticket.email)
        .bind(&ticket.date)
        .bind(&ticket.departure_time)
        .bind(ticket.total_amount)
        .bind(&ticket.class)
        .bind(&ticket.from_location)
        .bind(&ticket.to_location)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_ticket())
    }

    pub async fn list_all(&self) -> Result<Vec<Ticket>, StoreError> {
        let sql = format!("{TICKET_SELECT} ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TicketRow::into_ticket).collect())
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Ticket>, StoreError> {
        let sql = format!("{TICKET_SELECT} WHERE user_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TicketRow::into_ticket).collect())
    }

    /// Owner-scoped read: an id belonging to someone else looks absent.
    pub async fn find_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Ticket>, StoreError> {
        let sql = format!("{TICKET_SELECT} WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TicketRow::into_ticket))
    }

    pub async fn find_any(&self, id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let sql = format!("{TICKET_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TicketRow::into_ticket))
    }

    pub async fn update_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        ticket: &NewTicket,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE tickets
             SET agency = $1, mode = $2, name = $3, email = $4, date = $5,
                 departure_time = $6, total_amount = $7, class = $8,
                 from_location = $9, to_location = $10
             WHERE id = $11 AND user_id = $12",
        )
        .bind(&ticket.agency)
        .bind(ticket.mode.as_str())
        .bind(&ticket.name)
        .bind(&ticket.email)
        .bind(&ticket.date)
        .bind(&ticket.departure_time)
        .bind(ticket.total_amount)
        .bind(&ticket.class)
        .bind(&ticket.from_location)
        .bind(&ticket.to_location)
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_for_owner(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Administrator override: delete regardless of owner.
    pub async fn delete_any(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// One row per ticket, joined with its booking agent, ordered by agency
    /// then agent then client.
    pub async fn reservation_stats(&self) -> Result<Vec<ReservationStat>, StoreError> {
        let rows = sqlx::query_as::<_, StatRow>(
            "SELECT u.name AS agent_name, t.name AS client_name, t.agency
             FROM tickets t
             JOIN users u ON t.user_id = u.id
             ORDER BY t.agency, u.name, t.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReservationStat {
                agent_name: row.agent_name,
                client_name: row.client_name,
                agency: row.agency,
                tickets_issued: 1,
            })
            .collect())
    }
}
