//! Conversions between SeaORM models and domain entities
//!
//! Enum columns are stored as their wire names. A value that fails to
//! parse back means the row was written outside this service and surfaces
//! as a storage error.

use std::str::FromStr;

use sea_orm::Set;

use super::entities::{
    account, financial_transaction, guest, housekeeping_task, reservation, room,
};
use crate::domain::{
    Account, DomainError, DomainResult, FinancialTransaction, Guest, HousekeepingTask,
    Reservation, Room,
};

fn parse_column<T: FromStr<Err = DomainError>>(value: &str) -> DomainResult<T> {
    value
        .parse()
        .map_err(|e: DomainError| DomainError::Storage(format!("Corrupt column value: {}", e)))
}

// ── Reservations ───────────────────────────────────────────────

pub fn reservation_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        status: parse_column(&m.status)?,
        id: m.id,
        guest_id: m.guest_id,
        room_id: m.room_id,
        check_in_date: m.check_in_date,
        check_out_date: m.check_out_date,
        adults: m.adults,
        children: m.children,
        total_amount: m.total_amount,
        special_requests: m.special_requests,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn reservation_active(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id.clone()),
        guest_id: Set(r.guest_id.clone()),
        room_id: Set(r.room_id.clone()),
        check_in_date: Set(r.check_in_date),
        check_out_date: Set(r.check_out_date),
        adults: Set(r.adults),
        children: Set(r.children),
        status: Set(r.status.as_str().to_string()),
        total_amount: Set(r.total_amount),
        special_requests: Set(r.special_requests.clone()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

// ── Rooms ──────────────────────────────────────────────────────

pub fn room_to_domain(m: room::Model) -> DomainResult<Room> {
    Ok(Room {
        room_type: parse_column(&m.room_type)?,
        status: parse_column(&m.status)?,
        id: m.id,
        number: m.number,
        floor: m.floor,
        capacity: m.capacity,
        price_per_night: m.price_per_night,
        description: m.description,
        last_cleaned: m.last_cleaned,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn room_active(r: &Room) -> room::ActiveModel {
    room::ActiveModel {
        id: Set(r.id.clone()),
        number: Set(r.number.clone()),
        room_type: Set(r.room_type.as_str().to_string()),
        floor: Set(r.floor),
        capacity: Set(r.capacity),
        price_per_night: Set(r.price_per_night),
        description: Set(r.description.clone()),
        status: Set(r.status.as_str().to_string()),
        last_cleaned: Set(r.last_cleaned),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

// ── Guests ─────────────────────────────────────────────────────

pub fn guest_to_domain(m: guest::Model) -> Guest {
    Guest {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        phone: m.phone,
        address: m.address,
        id_number: m.id_number,
        total_stays: m.total_stays,
        total_spent: m.total_spent,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub fn guest_active(g: &Guest) -> guest::ActiveModel {
    guest::ActiveModel {
        id: Set(g.id.clone()),
        first_name: Set(g.first_name.clone()),
        last_name: Set(g.last_name.clone()),
        email: Set(g.email.clone()),
        phone: Set(g.phone.clone()),
        address: Set(g.address.clone()),
        id_number: Set(g.id_number.clone()),
        total_stays: Set(g.total_stays),
        total_spent: Set(g.total_spent),
        created_at: Set(g.created_at),
        updated_at: Set(g.updated_at),
    }
}

// ── Housekeeping ───────────────────────────────────────────────

pub fn task_to_domain(m: housekeeping_task::Model) -> DomainResult<HousekeepingTask> {
    Ok(HousekeepingTask {
        task_type: parse_column(&m.task_type)?,
        status: parse_column(&m.status)?,
        priority: parse_column(&m.priority)?,
        id: m.id,
        room_id: m.room_id,
        assigned_to: m.assigned_to,
        notes: m.notes,
        scheduled_for: m.scheduled_for,
        completed_at: m.completed_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn task_active(t: &HousekeepingTask) -> housekeeping_task::ActiveModel {
    housekeeping_task::ActiveModel {
        id: Set(t.id.clone()),
        room_id: Set(t.room_id.clone()),
        task_type: Set(t.task_type.as_str().to_string()),
        status: Set(t.status.as_str().to_string()),
        priority: Set(t.priority.as_str().to_string()),
        assigned_to: Set(t.assigned_to.clone()),
        notes: Set(t.notes.clone()),
        scheduled_for: Set(t.scheduled_for),
        completed_at: Set(t.completed_at),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

// ── Ledger ─────────────────────────────────────────────────────

pub fn account_to_domain(m: account::Model) -> DomainResult<Account> {
    Ok(Account {
        account_type: parse_column(&m.account_type)?,
        id: m.id,
        code: m.code,
        name: m.name,
        balance: m.balance,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn account_active(a: &Account) -> account::ActiveModel {
    account::ActiveModel {
        id: Set(a.id.clone()),
        code: Set(a.code.clone()),
        name: Set(a.name.clone()),
        account_type: Set(a.account_type.as_str().to_string()),
        balance: Set(a.balance),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

pub fn transaction_to_domain(
    m: financial_transaction::Model,
) -> DomainResult<FinancialTransaction> {
    Ok(FinancialTransaction {
        direction: parse_column(&m.direction)?,
        status: parse_column(&m.status)?,
        id: m.id,
        account_id: m.account_id,
        counter_account_id: m.counter_account_id,
        amount: m.amount,
        description: m.description,
        reference: m.reference,
        transaction_date: m.transaction_date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn transaction_active(t: &FinancialTransaction) -> financial_transaction::ActiveModel {
    financial_transaction::ActiveModel {
        id: Set(t.id.clone()),
        account_id: Set(t.account_id.clone()),
        counter_account_id: Set(t.counter_account_id.clone()),
        direction: Set(t.direction.as_str().to_string()),
        amount: Set(t.amount),
        description: Set(t.description.clone()),
        reference: Set(t.reference.clone()),
        transaction_date: Set(t.transaction_date),
        status: Set(t.status.as_str().to_string()),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}
